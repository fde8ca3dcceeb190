use crate::ast;
use crate::delegate::GraphQLError;
use crate::delegate::ResponsePath;
use crate::scope::ExecutionScope;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;
use std::borrow::Cow;

/// The host's per-field execution state handed to
/// [`Delegator::process_field`](crate::Delegator::process_field).
///
/// The caller's document, operation and request variables are borrowed. The
/// field selection is usually borrowed too, but may be owned when several
/// selections of the same response key were merged into one. The field's result, its errors and its execution scope are
/// owned and written by the pipeline stages.
#[derive(Clone, Debug)]
pub struct FieldContext<'a> {
    document: &'a ast::query::Document,
    errors: Vec<GraphQLError>,
    field: Cow<'a, ast::query::Field>,
    operation: &'a ast::query::OperationDefinition,
    parent_type: String,
    request_variables: &'a JsonMap<String, JsonValue>,
    response_path: ResponsePath,
    result: Option<JsonValue>,
    scope: ExecutionScope,
}
impl<'a> FieldContext<'a> {
    pub fn document(&self) -> &'a ast::query::Document {
        self.document
    }

    pub fn errors(&self) -> &[GraphQLError] {
        self.errors.as_slice()
    }

    pub fn field(&self) -> &ast::query::Field {
        &self.field
    }

    /// Split the context into the field's result, its reported errors and
    /// its final execution scope.
    pub fn into_parts(self) -> (Option<JsonValue>, Vec<GraphQLError>, ExecutionScope) {
        (self.result, self.errors, self.scope)
    }

    /// Create the context for resolving `field`, a field of `parent_type`.
    ///
    /// The response path defaults to the field's response key at the root
    /// of the response and the scope defaults to empty; use
    /// [`FieldContext::with_response_path()`] and
    /// [`FieldContext::with_scope()`] for nested fields.
    pub fn new(
        document: &'a ast::query::Document,
        operation: &'a ast::query::OperationDefinition,
        parent_type: impl Into<String>,
        field: impl Into<Cow<'a, ast::query::Field>>,
        request_variables: &'a JsonMap<String, JsonValue>,
    ) -> Self {
        let field = field.into();
        let response_key = field.alias.as_ref().unwrap_or(&field.name).to_owned();
        Self {
            document,
            errors: vec![],
            field,
            operation,
            parent_type: parent_type.into(),
            request_variables,
            response_path: ResponsePath::root().join_key(response_key),
            result: None,
            scope: ExecutionScope::new(),
        }
    }

    pub fn operation(&self) -> &'a ast::query::OperationDefinition {
        self.operation
    }

    pub fn parent_type(&self) -> &str {
        self.parent_type.as_str()
    }

    pub fn report_error(&mut self, error: GraphQLError) {
        self.errors.push(error);
    }

    pub fn request_variables(&self) -> &'a JsonMap<String, JsonValue> {
        self.request_variables
    }

    pub fn response_path(&self) -> &ResponsePath {
        &self.response_path
    }

    pub fn result(&self) -> Option<&JsonValue> {
        self.result.as_ref()
    }

    pub fn scope(&self) -> &ExecutionScope {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut ExecutionScope {
        &mut self.scope
    }

    pub fn set_result(&mut self, value: JsonValue) {
        self.result = Some(value);
    }

    pub fn with_response_path(mut self, response_path: ResponsePath) -> Self {
        self.response_path = response_path;
        self
    }

    pub fn with_scope(mut self, scope: ExecutionScope) -> Self {
        self.scope = scope;
        self
    }
}
