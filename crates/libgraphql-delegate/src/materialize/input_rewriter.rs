use crate::ast;
use crate::schema::InputObjectType;
use crate::schema::SchemaCatalog;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use thiserror::Error;

/// Rewrites an input-object value from the caller's naming to the naming of
/// a remote schema.
pub trait InputObjectRewriter: std::fmt::Debug + Send + Sync {
    fn rewrite_input_object(
        &self,
        schema_name: &str,
        schema: &SchemaCatalog,
        input_type: &InputObjectType,
        value: JsonValue,
    ) -> Result<JsonValue, InputRewriteError>;
}

/// Leaves every value unchanged; for remote schemas whose input field names
/// match the gateway's.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityInputRewriter;
impl InputObjectRewriter for IdentityInputRewriter {
    fn rewrite_input_object(
        &self,
        _schema_name: &str,
        _schema: &SchemaCatalog,
        _input_type: &InputObjectType,
        value: JsonValue,
    ) -> Result<JsonValue, InputRewriteError> {
        Ok(value)
    }
}

/// Renames input object fields according to a configured table, recursing
/// through nested input objects and lists of them.
///
/// Fields without a configured rename keep their name.
#[derive(Clone, Debug, Default)]
pub struct RenamingInputRewriter {
    // schema name -> remote input type -> caller field name -> remote field name
    renames: HashMap<String, HashMap<String, HashMap<String, String>>>,
}
impl RenamingInputRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send the caller's `caller_field` as `remote_field` whenever a value of
    /// `input_type` is sent to `schema_name`.
    pub fn rename(
        mut self,
        schema_name: impl Into<String>,
        input_type: impl Into<String>,
        caller_field: impl Into<String>,
        remote_field: impl Into<String>,
    ) -> Self {
        self.renames
            .entry(schema_name.into())
            .or_default()
            .entry(input_type.into())
            .or_default()
            .insert(caller_field.into(), remote_field.into());
        self
    }

    fn remote_field_name<'a>(
        &'a self,
        schema_name: &str,
        input_type: &str,
        caller_field: &'a str,
    ) -> &'a str {
        self.renames
            .get(schema_name)
            .and_then(|types| types.get(input_type))
            .and_then(|fields| fields.get(caller_field))
            .map(String::as_str)
            .unwrap_or(caller_field)
    }

    fn rewrite_field_value(
        &self,
        schema_name: &str,
        schema: &SchemaCatalog,
        field_type: &ast::query::Type,
        value: JsonValue,
    ) -> Result<JsonValue, InputRewriteError> {
        match field_type {
            ast::query::Type::NonNullType(inner) =>
                self.rewrite_field_value(schema_name, schema, inner, value),

            ast::query::Type::ListType(inner) => match value {
                JsonValue::Array(items) => Ok(JsonValue::Array(
                    items.into_iter()
                        .map(|item| self.rewrite_field_value(schema_name, schema, inner, item))
                        .collect::<Result<Vec<_>, _>>()?,
                )),
                // A single value is accepted where a list is expected.
                single => self.rewrite_field_value(schema_name, schema, inner, single),
            },

            ast::query::Type::NamedType(type_name) => match schema.input_object_type(type_name) {
                Some(nested_type) if !value.is_null() =>
                    self.rewrite_input_object(schema_name, schema, nested_type, value),
                _ => Ok(value),
            },
        }
    }
}
impl InputObjectRewriter for RenamingInputRewriter {
    fn rewrite_input_object(
        &self,
        schema_name: &str,
        schema: &SchemaCatalog,
        input_type: &InputObjectType,
        value: JsonValue,
    ) -> Result<JsonValue, InputRewriteError> {
        let JsonValue::Object(entries) = value else {
            return Err(InputRewriteError::NotAnObject {
                input_type: input_type.name().to_string(),
                value,
            });
        };

        let mut rewritten = JsonMap::new();
        for (caller_field, field_value) in entries {
            let remote_field =
                self.remote_field_name(schema_name, input_type.name(), &caller_field)
                    .to_string();
            let field_value = match input_type.field(&remote_field) {
                Some(field_def) => self.rewrite_field_value(
                    schema_name,
                    schema,
                    field_def.value_type(),
                    field_value,
                )?,
                None => field_value,
            };
            rewritten.insert(remote_field, field_value);
        }
        Ok(JsonValue::Object(rewritten))
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum InputRewriteError {
    #[error("Expected an object value for input type `{input_type}`, found `{value}`")]
    NotAnObject {
        input_type: String,
        value: JsonValue,
    },
}
