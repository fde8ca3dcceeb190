use crate::ast;
use crate::extract::ExtractedField;
use crate::materialize::InputObjectRewriter;
use crate::materialize::InputRewriteError;
use crate::path::SelectionPath;
use crate::request::referenced_variable_names;
use crate::schema::SchemaCatalog;
use crate::scope;
use crate::scope::ExecutionScope;
use crate::scope::ScopeResolutionError;
use crate::scope::VariableSet;
use crate::scope::VariableValue;
use crate::OperationKind;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;
use thiserror::Error;

type Result<T> = std::result::Result<T, MaterializeError>;

/// Produces the variables of one remote request from the three places
/// variable values come from: scope bindings referenced by the selection
/// path, the caller's request variables, and the remote schema's naming of
/// input object fields.
#[derive(Clone, Copy, Debug)]
pub struct VariableMaterializer<'a> {
    input_rewriter: &'a dyn InputObjectRewriter,
    remote_schema: &'a SchemaCatalog,
    schema_name: &'a str,
}
impl<'a> VariableMaterializer<'a> {
    /// Materialize the variable set for a request.
    ///
    /// Scope bindings are collected first while walking `selection_path`
    /// through the remote schema, then caller variables are layered on top,
    /// so a caller variable replaces a scoped variable of the same name.
    /// Only variables that the built document references survive.
    pub fn materialize(
        &self,
        operation_kind: OperationKind,
        selection_path: &SelectionPath,
        scope: &ExecutionScope,
        extracted: &ExtractedField,
        request_variables: &JsonMap<String, JsonValue>,
    ) -> Result<VariableSet> {
        let mut variables =
            self.collect_scoped_variables(operation_kind, selection_path, scope)?;

        for var_def in extracted.referenced_variables() {
            let value = request_variables.get(&var_def.name).cloned();
            variables.insert(
                VariableValue::new(var_def.name.as_str(), var_def.var_type.clone(), value)
                    .with_default_value(var_def.default_value.clone()),
            );
        }

        let referenced = referenced_variable_names(selection_path, extracted);
        variables.retain(|variable| {
            let keep = referenced.contains(variable.name());
            if !keep {
                log::trace!("Dropping unreferenced variable `${}`.", variable.name());
            }
            keep
        });

        self.rewrite_input_objects(&mut variables)?;
        Ok(variables)
    }

    pub fn new(
        schema_name: &'a str,
        remote_schema: &'a SchemaCatalog,
        input_rewriter: &'a dyn InputObjectRewriter,
    ) -> Self {
        Self {
            input_rewriter,
            remote_schema,
            schema_name,
        }
    }

    fn collect_scoped_variables(
        &self,
        operation_kind: OperationKind,
        selection_path: &SelectionPath,
        scope: &ExecutionScope,
    ) -> Result<VariableSet> {
        let mut variables = VariableSet::new();
        let mut current_type =
            self.remote_schema
                .root_type(operation_kind)
                .ok_or_else(|| MaterializeError::UndefinedRootType {
                    operation_kind,
                    schema_name: self.schema_name.to_string(),
                })?;

        let components = selection_path.components();
        for (index, component) in components.iter().enumerate() {
            let field =
                current_type
                    .field(component.name())
                    .ok_or_else(|| MaterializeError::FieldNotFound {
                        field_name: component.name().to_string(),
                        type_name: current_type.name().to_string(),
                    })?;

            for (arg_name, expr) in component.arguments() {
                let arg_def =
                    field.argument(arg_name)
                        .ok_or_else(|| MaterializeError::ArgumentNotFound {
                            argument_name: arg_name.to_owned(),
                            field_name: field.name().to_string(),
                            type_name: current_type.name().to_string(),
                        })?;

                let Some(variable) = scope::resolve(scope, expr, arg_def.value_type())? else {
                    continue
                };
                // One binding becomes one variable definition, so every use
                // must expect the same type.
                if let Some(existing) = variables.get(variable.name())
                    && existing.declared_type() != variable.declared_type() {
                    return Err(MaterializeError::ConflictingVariableType {
                        binding: variable.name().to_string(),
                        first_type: existing.declared_type().to_string(),
                        second_type: variable.declared_type().to_string(),
                    });
                }
                variables.insert(variable);
            }

            if index + 1 < components.len() {
                current_type =
                    self.remote_schema
                        .composite_type(field.named_type())
                        .ok_or_else(|| MaterializeError::CannotDescend {
                            field_name: field.name().to_string(),
                            type_name: field.named_type().to_string(),
                        })?;
            }
        }

        Ok(variables)
    }

    fn rewrite_input_objects(&self, variables: &mut VariableSet) -> Result<()> {
        for variable in variables.iter_mut() {
            let type_name = ast::innermost_type_name(&variable.declared_type);
            if self.remote_schema.input_object_type(type_name).is_none() {
                continue
            }
            if let Some(value) = variable.value.take() {
                variable.value = Some(self.rewrite_wrapped(&variable.declared_type, value)?);
            }
        }
        Ok(())
    }

    /// Rewrite `value` according to `type_ref`, keeping its list and
    /// non-null structure.
    fn rewrite_wrapped(
        &self,
        type_ref: &ast::query::Type,
        value: JsonValue,
    ) -> Result<JsonValue> {
        match type_ref {
            ast::query::Type::NonNullType(inner) => self.rewrite_wrapped(inner, value),

            ast::query::Type::ListType(inner) => match value {
                JsonValue::Array(items) => Ok(JsonValue::Array(
                    items.into_iter()
                        .map(|item| self.rewrite_wrapped(inner, item))
                        .collect::<Result<Vec<_>>>()?,
                )),
                single => self.rewrite_wrapped(inner, single),
            },

            ast::query::Type::NamedType(type_name) => {
                match self.remote_schema.input_object_type(type_name) {
                    Some(input_type) if !value.is_null() => Ok(
                        self.input_rewriter.rewrite_input_object(
                            self.schema_name,
                            self.remote_schema,
                            input_type,
                            value,
                        )?,
                    ),
                    _ => Ok(value),
                }
            },
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum MaterializeError {
    #[error("Argument `{argument_name}` is not defined on the remote field `{type_name}.{field_name}`")]
    ArgumentNotFound {
        argument_name: String,
        field_name: String,
        type_name: String,
    },

    #[error("Cannot descend through `{field_name}`: its type `{type_name}` is not an object or interface type")]
    CannotDescend {
        field_name: String,
        type_name: String,
    },

    #[error(
        "`${binding}` is passed to remote arguments of different types \
        (`{first_type}` and `{second_type}`)",
    )]
    ConflictingVariableType {
        binding: String,
        first_type: String,
        second_type: String,
    },

    #[error("Field `{field_name}` not found on remote type `{type_name}`")]
    FieldNotFound {
        field_name: String,
        type_name: String,
    },

    #[error(transparent)]
    InputRewrite(#[from] InputRewriteError),

    #[error(transparent)]
    ScopeResolution(#[from] ScopeResolutionError),

    #[error("Remote schema `{schema_name}` does not define a {operation_kind} root type")]
    UndefinedRootType {
        operation_kind: OperationKind,
        schema_name: String,
    },
}
