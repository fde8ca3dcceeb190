use crate::ast;
use crate::extract::ExtractedField;
use crate::extract::FieldExtractor;
use crate::path::SelectionPath;
use crate::request::referenced_variable_names;
use crate::request::RemoteQuery;
use crate::request::RemoteQueryRequest;
use crate::scope::VariableSet;
use crate::scope::VariableValue;
use crate::OperationKind;
use serde_json::json;

fn extract(source: &str, field_name: &str) -> ExtractedField {
    let doc = ast::query::parse(source).unwrap();
    let op = doc.definitions
        .iter()
        .find_map(|def| match def {
            ast::query::Definition::Operation(op) => Some(op),
            _ => None,
        })
        .unwrap();
    let selection_set = match op {
        ast::query::OperationDefinition::Query(query) => &query.selection_set,
        ast::query::OperationDefinition::SelectionSet(set) => set,
        _ => panic!("Expected a query"),
    };
    let field = selection_set.items
        .iter()
        .find_map(|sel| match sel {
            ast::query::Selection::Field(field) if field.name == field_name => Some(field),
            _ => None,
        })
        .unwrap();
    FieldExtractor::new().extract_field(&doc, op, field).unwrap()
}

fn named(name: &str) -> ast::query::Type {
    ast::query::Type::NamedType(name.to_string())
}

fn operation_of(doc: &ast::query::Document) -> &ast::query::OperationDefinition {
    match &doc.definitions[0] {
        ast::query::Definition::Operation(op) => op,
        other => panic!("Expected an operation first, found {other:?}"),
    }
}

fn single_field(selection_set: &ast::query::SelectionSet) -> &ast::query::Field {
    match selection_set.items.as_slice() {
        [ast::query::Selection::Field(field)] => field,
        other => panic!("Expected exactly one field, found {other:?}"),
    }
}

#[test]
fn empty_path_puts_the_selection_at_the_root() {
    let extracted = extract("{ me { name } }", "me");
    let variables = VariableSet::new();
    let path = SelectionPath::empty();

    let doc = RemoteQuery {
        extracted: &extracted,
        operation_kind: OperationKind::Query,
        selection_path: &path,
        variables: &variables,
    }.build_document();

    let ast::query::OperationDefinition::Query(query) = operation_of(&doc) else {
        panic!("Expected a query operation");
    };
    assert!(query.variable_definitions.is_empty());
    assert_eq!(single_field(&query.selection_set).name, "me");
    assert_eq!(doc.definitions.len(), 1);
}

#[test]
fn path_components_wrap_the_selection_root_first() {
    let extracted = extract("{ product { name } }", "product");
    let path = SelectionPath::parse("store(id: 1).catalog").unwrap();
    let variables = VariableSet::new();

    let doc = RemoteQuery {
        extracted: &extracted,
        operation_kind: OperationKind::Query,
        selection_path: &path,
        variables: &variables,
    }.build_document();

    let ast::query::OperationDefinition::Query(query) = operation_of(&doc) else {
        panic!("Expected a query operation");
    };
    let store = single_field(&query.selection_set);
    assert_eq!(store.name, "store");
    assert_eq!(store.arguments, vec![(
        "id".to_string(),
        ast::query::Value::Int(1.into()),
    )]);
    let catalog = single_field(&store.selection_set);
    assert_eq!(catalog.name, "catalog");
    assert!(catalog.arguments.is_empty());
    let product = single_field(&catalog.selection_set);
    assert_eq!(product.name, "product");
}

#[test]
fn one_definition_per_variable_and_fragments_follow_the_operation() {
    let extracted = extract(r#"
        query Q($first: Int) {
            member { ...M }
        }
        fragment M on Member { posts(first: $first) { title } }
    "#, "member");
    let path = SelectionPath::parse("org(slug: $slug)").unwrap();

    let mut variables = VariableSet::new();
    variables.insert(VariableValue::new("slug", named("String"), Some(json!("acme"))));
    variables.insert(VariableValue::new("first", named("Int"), Some(json!(3))));
    variables.insert(VariableValue::new("slug", named("String"), Some(json!("other"))));

    let doc = RemoteQuery {
        extracted: &extracted,
        operation_kind: OperationKind::Query,
        selection_path: &path,
        variables: &variables,
    }.build_document();

    let ast::query::OperationDefinition::Query(query) = operation_of(&doc) else {
        panic!("Expected a query operation");
    };
    let names: Vec<&str> =
        query.variable_definitions.iter().map(|var_def| var_def.name.as_str()).collect();
    assert_eq!(names, vec!["slug", "first"]);

    assert_eq!(doc.definitions.len(), 2);
    assert!(matches!(
        &doc.definitions[1],
        ast::query::Definition::Fragment(frag) if frag.name == "M",
    ));
}

#[test]
fn operation_kind_is_preserved() {
    let extracted = extract("{ rename(name: \"x\") { id } }", "rename");
    let path = SelectionPath::empty();
    let variables = VariableSet::new();

    let doc = RemoteQuery {
        extracted: &extracted,
        operation_kind: OperationKind::Mutation,
        selection_path: &path,
        variables: &variables,
    }.build_document();

    assert!(matches!(operation_of(&doc), ast::query::OperationDefinition::Mutation(_)));
}

#[test]
fn building_is_deterministic() {
    let extracted = extract("query Q($a: Int) { x(a: $a) { y } }", "x");
    let path = SelectionPath::parse("root(id: $id).inner").unwrap();
    let mut variables = VariableSet::new();
    variables.insert(VariableValue::new("id", named("ID"), Some(json!(1))));
    variables.insert(VariableValue::new("a", named("Int"), None));

    let query = RemoteQuery {
        extracted: &extracted,
        operation_kind: OperationKind::Query,
        selection_path: &path,
        variables: &variables,
    };
    let first = query.build_document();
    let second = query.build_document();

    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn rendered_document_parses_back() {
    let extracted = extract("query Q($a: Int = 4) { x(a: $a) { y } }", "x");
    let path = SelectionPath::parse("root(id: $id, kind: ADMIN)").unwrap();
    let mut variables = VariableSet::new();
    variables.insert(VariableValue::new("id", named("ID"), Some(json!("u1"))));
    variables.insert(
        VariableValue::new("a", named("Int"), None)
            .with_default_value(Some(ast::query::Value::Int(4.into()))),
    );

    let doc = RemoteQuery {
        extracted: &extracted,
        operation_kind: OperationKind::Query,
        selection_path: &path,
        variables: &variables,
    }.build_document();

    let request = RemoteQueryRequest::new(doc.clone(), variables.to_json_values());
    let reparsed = ast::query::parse(request.document_source().as_str()).unwrap();
    assert_eq!(reparsed.to_string(), doc.to_string());

    // `$a` has no value and is left to its default.
    assert_eq!(request.variables().len(), 1);
    assert_eq!(request.variables().get("id"), Some(&json!("u1")));
}

#[test]
fn request_serializes_as_a_graphql_request_body() {
    let extracted = extract("{ me { id } }", "me");
    let path = SelectionPath::empty();
    let variables = VariableSet::new();
    let doc = RemoteQuery {
        extracted: &extracted,
        operation_kind: OperationKind::Query,
        selection_path: &path,
        variables: &variables,
    }.build_document();

    let request =
        RemoteQueryRequest::new(doc, variables.to_json_values())
            .with_property("autoGenerated", json!(true));
    let body = serde_json::to_value(&request).unwrap();

    assert_eq!(body["query"], json!(request.document_source()));
    assert_eq!(body["variables"], json!({}));
    assert!(body.get("properties").is_none());
    assert_eq!(request.property("autoGenerated"), Some(&json!(true)));
}

#[test]
fn referenced_names_list_path_bindings_before_caller_variables() {
    let extracted = extract("query Q($b: Int, $a: Int) { x(a: $a, b: $b) }", "x");
    let path = SelectionPath::parse("p(id: $id).q(id: $id, other: $other)").unwrap();

    let names: Vec<String> =
        referenced_variable_names(&path, &extracted).into_iter().collect();
    assert_eq!(names, vec!["id", "other", "b", "a"]);
}
