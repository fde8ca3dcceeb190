use crate::ast;
use crate::extract::ExtractedField;
use crate::extract::FieldExtractor;
use crate::materialize::IdentityInputRewriter;
use crate::materialize::MaterializeError;
use crate::materialize::RenamingInputRewriter;
use crate::materialize::VariableMaterializer;
use crate::path::SelectionPath;
use crate::schema::SchemaCatalog;
use crate::schema::SchemaCatalogBuilder;
use crate::scope::ExecutionScope;
use crate::scope::ScopeFrame;
use crate::scope::ScopeResolutionError;
use crate::OperationKind;
use serde_json::json;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

const REMOTE_SDL: &str = r#"
    type Query {
        organization(slug: String!): Organization
        user(id: ID!): User
        search(filter: SearchFilter): [User]
        version: String
    }

    type Organization {
        member(id: ID!): User
        name: String
        team(slug: String!): Organization
    }

    type User {
        id: ID!
        name: String
        posts(first: Int, after: String): [Post]
    }

    type Post { title: String }

    input SearchFilter {
        full_name: String
        tags: [TagFilter!]
    }

    input TagFilter { tag_name: String! }
"#;

fn remote_schema() -> SchemaCatalog {
    SchemaCatalogBuilder::from_str(REMOTE_SDL).unwrap().build().unwrap()
}

fn extract(source: &str, field_name: &str) -> ExtractedField {
    let doc = ast::query::parse(source).unwrap();
    let op = doc.definitions
        .iter()
        .find_map(|def| match def {
            ast::query::Definition::Operation(op) => Some(op),
            _ => None,
        })
        .unwrap();
    let ast::query::OperationDefinition::Query(query) = op else {
        panic!("Expected a named query");
    };
    let field = query.selection_set.items
        .iter()
        .find_map(|sel| match sel {
            ast::query::Selection::Field(field) if field.name == field_name => Some(field),
            _ => None,
        })
        .unwrap();
    FieldExtractor::new().extract_field(&doc, op, field).unwrap()
}

fn vars(value: JsonValue) -> JsonMap<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        _ => panic!("Expected an object"),
    }
}

#[test]
fn scoped_variables_take_the_remote_argument_type() {
    let schema = remote_schema();
    let extracted = extract("query Q { me { name } }", "me");
    let path = SelectionPath::parse("user(id: $userId)").unwrap();
    let scope = ExecutionScope::new().with_frame(
        ScopeFrame::new("me").with_argument("userId", json!(42)),
    );

    let variables =
        VariableMaterializer::new("accounts", &schema, &IdentityInputRewriter)
            .materialize(OperationKind::Query, &path, &scope, &extracted, &JsonMap::new())
            .unwrap();

    assert_eq!(variables.len(), 1);
    let user_id = variables.get("userId").unwrap();
    assert_eq!(
        user_id.declared_type(),
        &ast::query::Type::NonNullType(Box::new(
            ast::query::Type::NamedType("ID".to_string()),
        )),
    );
    assert_eq!(user_id.value(), Some(&json!(42)));
}

#[test]
fn caller_variable_overrides_scoped_variable_of_the_same_name() {
    let schema = remote_schema();
    let extracted = extract("query Q($id: ID!) { me(id: $id) { name } }", "me");
    let path = SelectionPath::parse("user(id: $id)").unwrap();
    let scope = ExecutionScope::new().with_frame(
        ScopeFrame::new("me").with_argument("id", json!("1")),
    );

    let variables =
        VariableMaterializer::new("accounts", &schema, &IdentityInputRewriter)
            .materialize(
                OperationKind::Query,
                &path,
                &scope,
                &extracted,
                &vars(json!({ "id": "2" })),
            )
            .unwrap();

    assert_eq!(variables.len(), 1);
    assert_eq!(variables.get("id").unwrap().value(), Some(&json!("2")));
}

#[test]
fn one_reference_in_three_caller_variables_yields_one_variable() {
    let schema = remote_schema();
    let extracted = extract(r#"
        query Q($first: Int, $unusedA: String, $unusedB: Boolean) {
            me { posts(first: $first) { title } }
            other(a: $unusedA, b: $unusedB)
        }
    "#, "me");
    let path = SelectionPath::empty();

    let variables =
        VariableMaterializer::new("accounts", &schema, &IdentityInputRewriter)
            .materialize(
                OperationKind::Query,
                &path,
                &ExecutionScope::new(),
                &extracted,
                &vars(json!({ "first": 5, "unusedA": "a", "unusedB": true })),
            )
            .unwrap();

    let names: Vec<&str> = variables.iter().map(|variable| variable.name()).collect();
    assert_eq!(names, vec!["first"]);
    assert_eq!(variables.to_json_values().get("first"), Some(&json!(5)));
}

#[test]
fn caller_variable_without_a_value_keeps_its_definition() {
    let schema = remote_schema();
    let extracted = extract(
        "query Q($after: String = \"c1\") { me { posts(after: $after) { title } } }",
        "me",
    );

    let variables =
        VariableMaterializer::new("accounts", &schema, &IdentityInputRewriter)
            .materialize(
                OperationKind::Query,
                &SelectionPath::empty(),
                &ExecutionScope::new(),
                &extracted,
                &JsonMap::new(),
            )
            .unwrap();

    let after = variables.get("after").unwrap();
    assert_eq!(after.value(), None);
    assert_eq!(after.default_value(), Some(&ast::query::Value::String("c1".to_string())));
    assert!(variables.to_json_values().is_empty());
}

#[test]
fn one_binding_at_arguments_of_different_types_is_rejected() {
    let schema = remote_schema();
    let extracted = extract("query Q { me { name } }", "me");
    let path = SelectionPath::parse("organization(slug: $x).member(id: $x)").unwrap();
    let scope = ExecutionScope::new().with_frame(
        ScopeFrame::new("me").with_argument("x", json!("acme")),
    );

    let result =
        VariableMaterializer::new("orgs", &schema, &IdentityInputRewriter)
            .materialize(OperationKind::Query, &path, &scope, &extracted, &JsonMap::new());

    assert_eq!(result, Err(MaterializeError::ConflictingVariableType {
        binding: "x".to_string(),
        first_type: "String!".to_string(),
        second_type: "ID!".to_string(),
    }));
}

#[test]
fn one_binding_at_arguments_of_the_same_type_is_shared() {
    let schema = remote_schema();
    let extracted = extract("query Q { me { name } }", "me");
    let path = SelectionPath::parse("organization(slug: $slug).team(slug: $slug)").unwrap();
    let scope = ExecutionScope::new().with_frame(
        ScopeFrame::new("me").with_argument("slug", json!("acme")),
    );

    let variables =
        VariableMaterializer::new("orgs", &schema, &IdentityInputRewriter)
            .materialize(OperationKind::Query, &path, &scope, &extracted, &JsonMap::new())
            .unwrap();

    assert_eq!(variables.len(), 1);
    assert_eq!(variables.get("slug").unwrap().value(), Some(&json!("acme")));
}

#[test]
fn literal_arguments_produce_no_variables() {
    let schema = remote_schema();
    let extracted = extract("query Q { me { name } }", "me");
    let path = SelectionPath::parse(r#"organization(slug: "acme").member(id: "7")"#).unwrap();

    let variables =
        VariableMaterializer::new("orgs", &schema, &IdentityInputRewriter)
            .materialize(
                OperationKind::Query,
                &path,
                &ExecutionScope::new(),
                &extracted,
                &JsonMap::new(),
            )
            .unwrap();

    assert!(variables.is_empty());
}

#[test]
fn descending_through_a_scalar_fails() {
    let schema = remote_schema();
    let extracted = extract("query Q { me { name } }", "me");
    let path = SelectionPath::parse("version.user(id: 1)").unwrap();

    let result =
        VariableMaterializer::new("accounts", &schema, &IdentityInputRewriter)
            .materialize(
                OperationKind::Query,
                &path,
                &ExecutionScope::new(),
                &extracted,
                &JsonMap::new(),
            );

    assert_eq!(result, Err(MaterializeError::CannotDescend {
        field_name: "version".to_string(),
        type_name: "String".to_string(),
    }));
}

#[test]
fn unknown_path_field_and_argument_fail() {
    let schema = remote_schema();
    let extracted = extract("query Q { me { name } }", "me");
    let materializer =
        VariableMaterializer::new("accounts", &schema, &IdentityInputRewriter);

    let result = materializer.materialize(
        OperationKind::Query,
        &SelectionPath::parse("organization(slug: \"x\").owner").unwrap(),
        &ExecutionScope::new(),
        &extracted,
        &JsonMap::new(),
    );
    assert_eq!(result, Err(MaterializeError::FieldNotFound {
        field_name: "owner".to_string(),
        type_name: "Organization".to_string(),
    }));

    let result = materializer.materialize(
        OperationKind::Query,
        &SelectionPath::parse("user(handle: $h)").unwrap(),
        &ExecutionScope::new(),
        &extracted,
        &JsonMap::new(),
    );
    assert_eq!(result, Err(MaterializeError::ArgumentNotFound {
        argument_name: "handle".to_string(),
        field_name: "user".to_string(),
        type_name: "Query".to_string(),
    }));
}

#[test]
fn unbound_scope_reference_fails() {
    let schema = remote_schema();
    let extracted = extract("query Q { me { name } }", "me");

    let result =
        VariableMaterializer::new("accounts", &schema, &IdentityInputRewriter)
            .materialize(
                OperationKind::Query,
                &SelectionPath::parse("user(id: $missing)").unwrap(),
                &ExecutionScope::new(),
                &extracted,
                &JsonMap::new(),
            );

    assert_eq!(result, Err(MaterializeError::ScopeResolution(
        ScopeResolutionError::UnboundReference {
            binding: "missing".to_string(),
        },
    )));
}

#[test]
fn missing_mutation_root_fails() {
    let schema = remote_schema();
    let extracted = extract("query Q { me { name } }", "me");

    let result =
        VariableMaterializer::new("accounts", &schema, &IdentityInputRewriter)
            .materialize(
                OperationKind::Mutation,
                &SelectionPath::parse("user(id: 1)").unwrap(),
                &ExecutionScope::new(),
                &extracted,
                &JsonMap::new(),
            );

    assert_eq!(result, Err(MaterializeError::UndefinedRootType {
        operation_kind: OperationKind::Mutation,
        schema_name: "accounts".to_string(),
    }));
}

#[test]
fn input_object_variables_are_rewritten_for_the_remote_schema() {
    let schema = remote_schema();
    let extracted = extract(
        "query Q($filter: SearchFilter) { people(filter: $filter) { name } }",
        "people",
    );
    let path = SelectionPath::empty();
    let rewriter =
        RenamingInputRewriter::new()
            .rename("accounts", "SearchFilter", "fullName", "full_name")
            .rename("accounts", "TagFilter", "tagName", "tag_name");

    let variables =
        VariableMaterializer::new("accounts", &schema, &rewriter)
            .materialize(
                OperationKind::Query,
                &path,
                &ExecutionScope::new(),
                &extracted,
                &vars(json!({
                    "filter": {
                        "fullName": "Ada",
                        "tags": [{ "tagName": "math" }, { "tagName": "logic" }],
                    },
                })),
            )
            .unwrap();

    assert_eq!(
        variables.get("filter").unwrap().value(),
        Some(&json!({
            "full_name": "Ada",
            "tags": [{ "tag_name": "math" }, { "tag_name": "logic" }],
        })),
    );
}
