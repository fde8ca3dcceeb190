use crate::annotation::DelegationAnnotation;
use crate::annotation::DelegationConfig;
use crate::annotation::FieldDelegation;
use crate::ast;
use crate::path::SelectionPathParseError;
use crate::schema::CatalogBuildError;
use crate::schema::SchemaCatalogBuilder;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

type Result<T> = std::result::Result<T, DelegationConfigBuildError>;

pub const DEFAULT_DIRECTIVE_NAME: &str = "delegate";

/// Builds a [`DelegationConfig`] from the gateway's SDL.
///
/// Every field annotated with `@delegate(schema: String!, path: String)` (or
/// the directive name given to
/// [`DelegationConfigBuilder::with_directive_name()`]) becomes a
/// [`FieldDelegation`]. Delegations may also be added programmatically with
/// [`DelegationConfigBuilder::add_field_delegation()`].
#[derive(Debug)]
pub struct DelegationConfigBuilder {
    added_delegations: Vec<(String, String, DelegationAnnotation)>,
    catalog_builder: SchemaCatalogBuilder,
    directive_name: String,
}
impl DelegationConfigBuilder {
    pub fn add_field_delegation(
        mut self,
        parent_type: impl Into<String>,
        field_name: impl Into<String>,
        annotation: DelegationAnnotation,
    ) -> Self {
        self.added_delegations.push((parent_type.into(), field_name.into(), annotation));
        self
    }

    pub fn build(self) -> Result<DelegationConfig> {
        let gateway_schema = self.catalog_builder.build()?;

        let mut delegations: HashMap<String, HashMap<String, FieldDelegation>> = HashMap::new();
        let mut insert_delegation = |
            type_name: &str,
            field_name: &str,
            annotation: DelegationAnnotation,
        | -> Result<()> {
            let delegation = FieldDelegation::new(annotation).map_err(
                |error| DelegationConfigBuildError::InvalidSelectionPath {
                    error,
                    field_name: field_name.to_string(),
                    type_name: type_name.to_string(),
                },
            )?;

            let fields = delegations.entry(type_name.to_string()).or_default();
            if fields.contains_key(field_name) {
                return Err(DelegationConfigBuildError::DuplicateAnnotation {
                    field_name: field_name.to_string(),
                    type_name: type_name.to_string(),
                });
            }
            log::debug!(
                "Field `{type_name}.{field_name}` delegates to `{}`.",
                delegation.target_schema(),
            );
            fields.insert(field_name.to_string(), delegation);
            Ok(())
        };

        for (type_name, catalog_type) in gateway_schema.types() {
            let Some(composite) = catalog_type.as_composite() else {
                continue
            };
            for field in composite.fields().values() {
                for directive in field.directives() {
                    if directive.name != self.directive_name {
                        continue
                    }
                    let annotation =
                        annotation_from_directive(type_name, field.name(), directive)?;
                    insert_delegation(type_name, field.name(), annotation)?;
                }
            }
        }

        for (type_name, field_name, annotation) in self.added_delegations {
            let field_exists =
                gateway_schema
                    .composite_type(&type_name)
                    .and_then(|composite| composite.field(&field_name))
                    .is_some();
            if !field_exists {
                return Err(DelegationConfigBuildError::UndefinedField {
                    field_name,
                    type_name,
                });
            }
            insert_delegation(&type_name, &field_name, annotation)?;
        }

        Ok(DelegationConfig {
            delegations,
            gateway_schema,
        })
    }

    pub fn from_file(file_path: impl AsRef<Path>) -> Result<Self> {
        Self::new().load_file(file_path)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        Self::new().load_str(None, content)
    }

    pub fn load_file(mut self, file_path: impl AsRef<Path>) -> Result<Self> {
        self.catalog_builder = self.catalog_builder.load_file(file_path)?;
        Ok(self)
    }

    pub fn load_str(mut self, file_path: Option<PathBuf>, content: &str) -> Result<Self> {
        self.catalog_builder = self.catalog_builder.load_str(file_path, content)?;
        Ok(self)
    }

    pub fn new() -> Self {
        Self {
            added_delegations: vec![],
            catalog_builder: SchemaCatalogBuilder::new(),
            directive_name: DEFAULT_DIRECTIVE_NAME.to_string(),
        }
    }

    pub fn with_directive_name(mut self, directive_name: impl Into<String>) -> Self {
        self.directive_name = directive_name.into();
        self
    }
}
impl Default for DelegationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn annotation_from_directive(
    type_name: &str,
    field_name: &str,
    directive: &ast::schema::Directive,
) -> Result<DelegationAnnotation> {
    let mut target_schema = None;
    let mut path = None;
    for (arg_name, value) in &directive.arguments {
        match (arg_name.as_str(), value) {
            ("schema", ast::schema::Value::String(name)) => target_schema = Some(name.to_owned()),
            ("path", ast::schema::Value::String(text)) => path = Some(text.to_owned()),
            ("path", ast::schema::Value::Null) => (),
            ("schema", _) | ("path", _) => return Err(
                DelegationConfigBuildError::InvalidDirectiveArgumentValue {
                    argument_name: arg_name.to_owned(),
                    expected_type: if arg_name == "schema" { "String!" } else { "String" },
                    field_name: field_name.to_string(),
                    type_name: type_name.to_string(),
                    value: value.to_string(),
                },
            ),
            _ => return Err(DelegationConfigBuildError::InvalidDirectiveArgument {
                argument_name: arg_name.to_owned(),
                field_name: field_name.to_string(),
                type_name: type_name.to_string(),
            }),
        }
    }

    let Some(target_schema) = target_schema else {
        return Err(DelegationConfigBuildError::MissingTargetSchema {
            field_name: field_name.to_string(),
            type_name: type_name.to_string(),
        });
    };

    let annotation = DelegationAnnotation::new(target_schema);
    Ok(match path {
        Some(path) => annotation.with_path(path),
        None => annotation,
    })
}

#[derive(Clone, Debug, Error)]
pub enum DelegationConfigBuildError {
    #[error("Error building the gateway schema: {0}")]
    CatalogBuildError(#[from] CatalogBuildError),

    #[error("Field `{type_name}.{field_name}` has more than one delegation")]
    DuplicateAnnotation {
        field_name: String,
        type_name: String,
    },

    #[error(
        "Unexpected argument `{argument_name}` in the delegation directive on \
        `{type_name}.{field_name}`; expected `schema: String!` and `path: String`",
    )]
    InvalidDirectiveArgument {
        argument_name: String,
        field_name: String,
        type_name: String,
    },

    #[error(
        "Argument `{argument_name}` of the delegation directive on \
        `{type_name}.{field_name}` must be a `{expected_type}`; found `{value}`",
    )]
    InvalidDirectiveArgumentValue {
        argument_name: String,
        expected_type: &'static str,
        field_name: String,
        type_name: String,
        value: String,
    },

    #[error("Invalid delegation path on `{type_name}.{field_name}`: {error}")]
    InvalidSelectionPath {
        error: SelectionPathParseError,
        field_name: String,
        type_name: String,
    },

    #[error("The delegation directive on `{type_name}.{field_name}` is missing its `schema` argument")]
    MissingTargetSchema {
        field_name: String,
        type_name: String,
    },

    #[error("Cannot delegate `{type_name}.{field_name}`: no such field in the gateway schema")]
    UndefinedField {
        field_name: String,
        type_name: String,
    },
}
