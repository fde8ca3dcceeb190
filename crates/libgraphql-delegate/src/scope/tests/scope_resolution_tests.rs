use crate::ast;
use crate::scope::resolve;
use crate::scope::ExecutionScope;
use crate::scope::ScopeFrame;
use crate::scope::ScopeResolutionError;
use crate::scope::ScopedExpr;
use crate::scope::VariableSet;
use crate::scope::VariableValue;
use serde_json::json;

fn non_null(name: &str) -> ast::query::Type {
    ast::query::Type::NonNullType(Box::new(
        ast::query::Type::NamedType(name.to_string()),
    ))
}

fn nested_scope() -> ExecutionScope {
    ExecutionScope::new()
        .with_frame(
            ScopeFrame::new("organization")
                .with_argument("orgId", json!("org-1"))
                .with_argument("id", json!("outer")),
        )
        .with_frame(
            ScopeFrame::new("member")
                .with_argument("id", json!(7)),
        )
}

#[test]
fn context_ref_resolves_innermost_binding_first() {
    let scope = nested_scope();
    let resolved = resolve(
        &scope,
        &ScopedExpr::ContextRef("id".to_string()),
        &non_null("ID"),
    ).unwrap().unwrap();

    assert_eq!(resolved.name(), "id");
    assert_eq!(resolved.value(), Some(&json!(7)));
}

#[test]
fn context_ref_falls_back_to_ancestor_frames() {
    let scope = nested_scope();
    let resolved = resolve(
        &scope,
        &ScopedExpr::ContextRef("orgId".to_string()),
        &non_null("ID"),
    ).unwrap().unwrap();

    assert_eq!(resolved.value(), Some(&json!("org-1")));
}

#[test]
fn declared_type_comes_from_expected_type() {
    // The bound value is an integer, but the remote argument is `String!`.
    let scope = nested_scope();
    let expected = non_null("String");
    let resolved = resolve(
        &scope,
        &ScopedExpr::ContextRef("id".to_string()),
        &expected,
    ).unwrap().unwrap();

    assert_eq!(resolved.declared_type(), &expected);
}

#[test]
fn literal_produces_no_variable() {
    let scope = ExecutionScope::new();
    let resolved = resolve(
        &scope,
        &ScopedExpr::Literal(ast::query::Value::Boolean(true)),
        &non_null("Boolean"),
    ).unwrap();

    assert_eq!(resolved, None);
}

#[test]
fn unbound_reference_is_an_error() {
    let scope = nested_scope();
    let result = resolve(
        &scope,
        &ScopedExpr::ContextRef("missing".to_string()),
        &non_null("ID"),
    );

    assert_eq!(
        result,
        Err(ScopeResolutionError::UnboundReference {
            binding: "missing".to_string(),
        }),
    );
}

#[test]
fn serving_schema_is_tracked_innermost_first() {
    let mut scope = ExecutionScope::new()
        .with_frame(ScopeFrame::new("viewer").with_serving_schema("accounts"))
        .with_frame(ScopeFrame::new("reviews"));
    assert_eq!(scope.current_remote_schema(), Some("accounts"));

    scope.set_serving_schema("reviews");
    assert_eq!(scope.current_remote_schema(), Some("reviews"));
    assert_eq!(scope.frames()[0].serving_schema(), Some("accounts"));
}

#[test]
fn serving_schema_on_empty_scope_adds_a_frame() {
    let mut scope = ExecutionScope::new();
    scope.set_serving_schema("accounts");
    assert_eq!(scope.frames().len(), 1);
    assert_eq!(scope.current_remote_schema(), Some("accounts"));
}

#[test]
fn variable_set_overwrites_in_place() {
    let mut set = VariableSet::new();
    set.insert(VariableValue::new("a", non_null("ID"), Some(json!(1))));
    set.insert(VariableValue::new("b", non_null("ID"), None));
    set.insert(VariableValue::new("a", non_null("ID"), Some(json!(2))));

    let names: Vec<&str> = set.iter().map(VariableValue::name).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(set.get("a").unwrap().value(), Some(&json!(2)));

    // Variables without a value are defined but not sent.
    let payload = set.to_json_values();
    assert_eq!(payload.len(), 1);
    assert_eq!(payload.get("a"), Some(&json!(2)));
}
