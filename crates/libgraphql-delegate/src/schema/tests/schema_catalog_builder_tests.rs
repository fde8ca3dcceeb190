use crate::ast;
use crate::schema::CatalogBuildError;
use crate::schema::CatalogType;
use crate::schema::RemoteSchemaRegistry;
use crate::schema::SchemaCatalogBuilder;
use crate::OperationKind;

#[test]
fn builds_object_fields_with_arguments() {
    let catalog = SchemaCatalogBuilder::from_str(r#"
        type Query {
            user(id: ID!, locale: String = "en"): User
        }

        type User {
            id: ID!
            friends(first: Int): [User!]!
        }
    "#).unwrap().build().unwrap();

    let query = catalog.root_type(OperationKind::Query).unwrap();
    assert_eq!(query.name(), "Query");

    let user_field = query.field("user").unwrap();
    assert_eq!(user_field.named_type(), "User");
    assert_eq!(user_field.arguments().len(), 2);
    assert_eq!(
        user_field.argument("id").unwrap().value_type(),
        &ast::query::Type::NonNullType(Box::new(
            ast::query::Type::NamedType("ID".to_string()),
        )),
    );
    assert_eq!(
        user_field.argument("locale").unwrap().default_value(),
        Some(&ast::query::Value::String("en".to_string())),
    );

    let friends = catalog.composite_type("User").unwrap().field("friends").unwrap();
    assert_eq!(friends.named_type(), "User");
}

#[test]
fn default_root_types_are_detected_by_name() {
    let catalog = SchemaCatalogBuilder::from_str(r#"
        type Query { a: Int }
        type Mutation { b: Int }
    "#).unwrap().build().unwrap();

    assert_eq!(catalog.root_type_name(OperationKind::Query), Some("Query"));
    assert_eq!(catalog.root_type_name(OperationKind::Mutation), Some("Mutation"));
    assert_eq!(catalog.root_type_name(OperationKind::Subscription), None);
    assert_eq!(catalog.root_operation_kind("Mutation"), Some(OperationKind::Mutation));
    assert_eq!(catalog.root_operation_kind("Query"), Some(OperationKind::Query));
}

#[test]
fn schema_block_overrides_root_type_names() {
    let catalog = SchemaCatalogBuilder::from_str(r#"
        schema {
            query: RootQuery
            mutation: RootMutation
        }
        type RootQuery { a: Int }
        type RootMutation { b: Int }
        type Query { unused: Int }
    "#).unwrap().build().unwrap();

    assert_eq!(catalog.root_type(OperationKind::Query).unwrap().name(), "RootQuery");
    assert_eq!(catalog.root_operation_kind("Query"), None);
    assert_eq!(catalog.root_operation_kind("RootMutation"), Some(OperationKind::Mutation));
}

#[test]
fn missing_query_type_is_an_error() {
    let result = SchemaCatalogBuilder::from_str("type User { id: ID }")
        .unwrap()
        .build();

    assert!(matches!(
        result,
        Err(CatalogBuildError::UndefinedRootOperationType {
            operation_kind: OperationKind::Query,
            ..
        }),
    ));
}

#[test]
fn extensions_merge_fields_even_when_loaded_first() {
    let catalog = SchemaCatalogBuilder::new()
        .load_str(None, "extend type Query { extra: String }")
        .unwrap()
        .load_str(None, "type Query { base: String }")
        .unwrap()
        .build()
        .unwrap();

    let query = catalog.root_type(OperationKind::Query).unwrap();
    let field_names: Vec<&str> = query.fields().keys().map(String::as_str).collect();
    assert_eq!(field_names, vec!["base", "extra"]);
}

#[test]
fn extension_of_undefined_type_is_an_error() {
    let result = SchemaCatalogBuilder::from_str(r#"
        type Query { a: Int }
        extend type Missing { b: Int }
    "#).unwrap().build();

    match result {
        Err(CatalogBuildError::ExtensionOfUndefinedType { type_name, .. }) =>
            assert_eq!(type_name, "Missing"),
        other => panic!("Expected ExtensionOfUndefinedType, got {other:?}"),
    }
}

#[test]
fn duplicate_type_definition_is_an_error() {
    let result = SchemaCatalogBuilder::from_str(r#"
        type Query { a: Int }
        type Query { b: Int }
    "#);

    assert!(matches!(
        result,
        Err(CatalogBuildError::DuplicateTypeDefinition { type_name, .. })
            if type_name == "Query",
    ));
}

#[test]
fn duplicate_field_definition_is_an_error() {
    let result = SchemaCatalogBuilder::from_str(r#"
        type Query { a: Int a: String }
    "#);

    assert!(matches!(
        result,
        Err(CatalogBuildError::DuplicateFieldDefinition { field_name, .. })
            if field_name == "a",
    ));
}

#[test]
fn parse_errors_name_the_source() {
    let result = SchemaCatalogBuilder::from_str("type Query {");
    match result {
        Err(CatalogBuildError::ParseError { file, .. }) =>
            assert_eq!(file.to_str(), Some("str://0")),
        other => panic!("Expected ParseError, got {other:?}"),
    }
}

#[test]
fn input_objects_and_other_kinds_are_cataloged() {
    let catalog = SchemaCatalogBuilder::from_str(r#"
        type Query { search(filter: Filter): [Result] }
        input Filter { term: String nested: Filter }
        extend input Filter { limit: Int }
        union Result = Query
        enum Color { RED }
        scalar Date
    "#).unwrap().build().unwrap();

    let filter = catalog.input_object_type("Filter").unwrap();
    assert_eq!(filter.fields().len(), 3);
    assert_eq!(ast::innermost_type_name(filter.field("nested").unwrap().value_type()), "Filter");

    assert!(matches!(catalog.get_type("Result"), Some(CatalogType::Union(_))));
    assert!(matches!(catalog.get_type("Color"), Some(CatalogType::Enum(_))));
    assert!(matches!(catalog.get_type("Date"), Some(CatalogType::Scalar(_))));
    assert!(catalog.composite_type("Result").is_none());
    assert!(catalog.input_object_type("Query").is_none());
}

#[test]
fn registry_resolves_remote_root_types() {
    let catalog = SchemaCatalogBuilder::from_str("type Query { a: Int }")
        .unwrap()
        .build()
        .unwrap();
    let registry = RemoteSchemaRegistry::new().with_schema("accounts", catalog);

    assert_eq!(
        registry.remote_schema_type("accounts", OperationKind::Query).map(|t| t.name()),
        Some("Query"),
    );
    assert!(registry.remote_schema_type("accounts", OperationKind::Mutation).is_none());
    assert!(registry.remote_schema_type("reviews", OperationKind::Query).is_none());
}

#[test]
fn prebuilt_ast_documents_can_be_loaded() {
    let ast_doc = ast::schema::parse("type Query { ping: Boolean }").unwrap();
    let catalog = SchemaCatalogBuilder::from_ast(ast_doc).unwrap().build().unwrap();

    let ping = catalog.root_type(OperationKind::Query).unwrap().field("ping").unwrap();
    assert_eq!(ping.named_type(), "Boolean");
}
