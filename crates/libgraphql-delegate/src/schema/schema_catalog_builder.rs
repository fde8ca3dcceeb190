use crate::ast;
use crate::file_reader;
use crate::loc;
use crate::schema::CatalogType;
use crate::schema::CompositeType;
use crate::schema::FieldDef;
use crate::schema::InputObjectType;
use crate::schema::InputValueDef;
use crate::schema::SchemaCatalog;
use crate::OperationKind;
use indexmap::IndexMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

type Result<T> = std::result::Result<T, CatalogBuildError>;

#[derive(Debug)]
enum PendingExtension {
    Composite {
        fields: Vec<ast::schema::Field>,
        location: loc::FilePosition,
        type_name: String,
    },
    InputObject {
        fields: Vec<ast::schema::InputValue>,
        location: loc::FilePosition,
        type_name: String,
    },
}

#[derive(Debug)]
struct RootTypeNames {
    mutation: Option<String>,
    query: Option<String>,
    subscription: Option<String>,
}

/// Accumulates SDL documents and produces a [`SchemaCatalog`].
///
/// Type extensions may appear before the definitions they extend (even in a
/// later-loaded file); they are applied when [`SchemaCatalogBuilder::build()`]
/// is called.
#[derive(Debug, Default)]
pub struct SchemaCatalogBuilder {
    pending_extensions: Vec<PendingExtension>,
    root_type_names: Option<(loc::FilePosition, RootTypeNames)>,
    str_load_counter: u16,
    types: IndexMap<String, CatalogType>,
}
impl SchemaCatalogBuilder {
    pub fn build(mut self) -> Result<SchemaCatalog> {
        for ext in std::mem::take(&mut self.pending_extensions) {
            self.apply_extension(ext)?;
        }

        let root_type_names = match self.root_type_names.take() {
            Some((_, names)) => names,
            None => RootTypeNames {
                mutation: self.default_root_type_name("Mutation"),
                query: Some("Query".to_string()),
                subscription: self.default_root_type_name("Subscription"),
            },
        };

        let query_type_name = root_type_names.query.unwrap_or_else(
            || "Query".to_string(),
        );
        self.check_root_type(OperationKind::Query, &query_type_name)?;
        if let Some(type_name) = &root_type_names.mutation {
            self.check_root_type(OperationKind::Mutation, type_name)?;
        }
        if let Some(type_name) = &root_type_names.subscription {
            self.check_root_type(OperationKind::Subscription, type_name)?;
        }

        Ok(SchemaCatalog {
            mutation_type_name: root_type_names.mutation,
            query_type_name,
            subscription_type_name: root_type_names.subscription,
            types: self.types,
        })
    }

    pub fn from_ast(ast_doc: ast::schema::Document) -> Result<Self> {
        Self::new().load_ast(None, ast_doc)
    }

    pub fn from_file(file_path: impl AsRef<Path>) -> Result<Self> {
        Self::new().load_file(file_path)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        Self::new().load_str(None, content)
    }

    /// Load an already-parsed SDL document.
    pub fn load_ast(
        mut self,
        file_path: Option<PathBuf>,
        ast_doc: ast::schema::Document,
    ) -> Result<Self> {
        let file_path = self.file_path_or_str_path(file_path);
        for def in ast_doc.definitions {
            self.visit_ast_def(file_path.as_path(), def)?;
        }
        Ok(self)
    }

    pub fn load_file(self, file_path: impl AsRef<Path>) -> Result<Self> {
        self.load_files(vec![file_path])
    }

    pub fn load_files(
        mut self,
        file_paths: Vec<impl AsRef<Path>>,
    ) -> Result<Self> {
        for file_path in file_paths {
            let file_path = file_path.as_ref();
            let file_content = file_reader::read_content(file_path)
                .map_err(|err| CatalogBuildError::SchemaFileReadError(
                    Arc::new(err),
                ))?;
            self = self.load_str(
                Some(file_path.to_path_buf()),
                file_content.as_str(),
            )?;
        }
        Ok(self)
    }

    pub fn load_str(
        mut self,
        file_path: Option<PathBuf>,
        content: &str,
    ) -> Result<Self> {
        let file_path = self.file_path_or_str_path(file_path);
        let ast_doc = ast::schema::parse(content)
            .map_err(|err| CatalogBuildError::ParseError {
                file: file_path.to_owned(),
                err: err.to_string(),
            })?;

        self.load_ast(Some(file_path), ast_doc)
    }

    pub fn new() -> Self {
        Self::default()
    }

    fn apply_extension(&mut self, ext: PendingExtension) -> Result<()> {
        match ext {
            PendingExtension::Composite { fields, location, type_name } => {
                let file_path = location.file.clone();
                let Some(composite) = self.types.get_mut(&type_name).and_then(
                    |t| match t {
                        CatalogType::Interface(c) | CatalogType::Object(c) => Some(c),
                        _ => None,
                    },
                ) else {
                    return Err(CatalogBuildError::ExtensionOfUndefinedType {
                        location,
                        type_name,
                    });
                };
                insert_fields(
                    file_path.as_deref(),
                    &type_name,
                    fields,
                    &mut composite.fields,
                )
            },

            PendingExtension::InputObject { fields, location, type_name } => {
                let file_path = location.file.clone();
                let Some(CatalogType::InputObject(input_obj)) =
                    self.types.get_mut(&type_name) else {
                    return Err(CatalogBuildError::ExtensionOfUndefinedType {
                        location,
                        type_name,
                    });
                };
                insert_input_fields(
                    file_path.as_deref(),
                    &type_name,
                    fields,
                    &mut input_obj.fields,
                )
            },
        }
    }

    fn file_path_or_str_path(&mut self, file_path: Option<PathBuf>) -> PathBuf {
        if let Some(file_path) = file_path {
            file_path
        } else {
            let ctr = self.str_load_counter;
            self.str_load_counter += 1;
            PathBuf::from(format!("str://{ctr}"))
        }
    }

    fn check_root_type(&self, kind: OperationKind, type_name: &str) -> Result<()> {
        if let Some(CatalogType::Object(_)) = self.types.get(type_name) {
            Ok(())
        } else {
            Err(CatalogBuildError::UndefinedRootOperationType {
                operation_kind: kind,
                type_name: type_name.to_string(),
            })
        }
    }

    fn default_root_type_name(&self, type_name: &str) -> Option<String> {
        self.types
            .get(type_name)
            .map(|_| type_name.to_string())
    }

    fn insert_type(
        &mut self,
        location: loc::FilePosition,
        catalog_type: CatalogType,
    ) -> Result<()> {
        let type_name = catalog_type.name().to_string();
        if self.types.contains_key(&type_name) {
            return Err(CatalogBuildError::DuplicateTypeDefinition {
                location,
                type_name,
            });
        }
        self.types.insert(type_name, catalog_type);
        Ok(())
    }

    fn visit_ast_def(
        &mut self,
        file_path: &Path,
        def: ast::schema::Definition,
    ) -> Result<()> {
        use ast::schema::Definition;
        match def {
            Definition::SchemaDefinition(schema_def) =>
                self.visit_ast_schemablock_def(file_path, schema_def),
            Definition::TypeDefinition(type_def) =>
                self.visit_ast_type_def(file_path, type_def),
            Definition::TypeExtension(type_ext) =>
                self.visit_ast_type_extension(file_path, type_ext),
            Definition::DirectiveDefinition(_) => Ok(()),
        }
    }

    fn visit_ast_schemablock_def(
        &mut self,
        file_path: &Path,
        def: ast::schema::SchemaDefinition,
    ) -> Result<()> {
        let location = loc::FilePosition::from_pos(Some(file_path), def.position);
        if let Some((first_location, _)) = &self.root_type_names {
            return Err(CatalogBuildError::DuplicateSchemaDefinition {
                location1: first_location.to_owned(),
                location2: location,
            });
        }

        self.root_type_names = Some((location, RootTypeNames {
            mutation: def.mutation,
            query: def.query,
            subscription: def.subscription,
        }));
        Ok(())
    }

    fn visit_ast_type_def(
        &mut self,
        file_path: &Path,
        def: ast::schema::TypeDefinition,
    ) -> Result<()> {
        use ast::schema::TypeDefinition;
        match def {
            TypeDefinition::Enum(enum_def) => self.insert_type(
                loc::FilePosition::from_pos(Some(file_path), enum_def.position),
                CatalogType::Enum(enum_def.name),
            ),

            TypeDefinition::InputObject(input_def) => {
                let def_location =
                    loc::FilePosition::from_pos(Some(file_path), input_def.position);
                let mut fields = IndexMap::new();
                insert_input_fields(
                    Some(file_path),
                    &input_def.name,
                    input_def.fields,
                    &mut fields,
                )?;
                self.insert_type(
                    def_location.clone(),
                    CatalogType::InputObject(InputObjectType {
                        def_location,
                        fields,
                        name: input_def.name,
                    }),
                )
            },

            TypeDefinition::Interface(iface_def) => {
                let composite = build_composite(
                    file_path,
                    iface_def.name,
                    iface_def.position,
                    iface_def.fields,
                )?;
                self.insert_type(
                    composite.def_location.clone(),
                    CatalogType::Interface(composite),
                )
            },

            TypeDefinition::Object(obj_def) => {
                let composite = build_composite(
                    file_path,
                    obj_def.name,
                    obj_def.position,
                    obj_def.fields,
                )?;
                self.insert_type(
                    composite.def_location.clone(),
                    CatalogType::Object(composite),
                )
            },

            TypeDefinition::Scalar(scalar_def) => self.insert_type(
                loc::FilePosition::from_pos(Some(file_path), scalar_def.position),
                CatalogType::Scalar(scalar_def.name),
            ),

            TypeDefinition::Union(union_def) => self.insert_type(
                loc::FilePosition::from_pos(Some(file_path), union_def.position),
                CatalogType::Union(union_def.name),
            ),
        }
    }

    fn visit_ast_type_extension(
        &mut self,
        file_path: &Path,
        ext: ast::schema::TypeExtension,
    ) -> Result<()> {
        use ast::schema::TypeExtension;
        match ext {
            TypeExtension::Interface(iface_ext) =>
                self.pending_extensions.push(PendingExtension::Composite {
                    fields: iface_ext.fields,
                    location: loc::FilePosition::from_pos(
                        Some(file_path),
                        iface_ext.position,
                    ),
                    type_name: iface_ext.name,
                }),

            TypeExtension::InputObject(input_ext) =>
                self.pending_extensions.push(PendingExtension::InputObject {
                    fields: input_ext.fields,
                    location: loc::FilePosition::from_pos(
                        Some(file_path),
                        input_ext.position,
                    ),
                    type_name: input_ext.name,
                }),

            TypeExtension::Object(obj_ext) =>
                self.pending_extensions.push(PendingExtension::Composite {
                    fields: obj_ext.fields,
                    location: loc::FilePosition::from_pos(
                        Some(file_path),
                        obj_ext.position,
                    ),
                    type_name: obj_ext.name,
                }),

            // Scalar, enum, and union extensions add nothing that delegation
            // reads.
            TypeExtension::Enum(_)
                | TypeExtension::Scalar(_)
                | TypeExtension::Union(_) => (),
        }
        Ok(())
    }
}

fn build_composite(
    file_path: &Path,
    name: String,
    position: ast::AstPos,
    ast_fields: Vec<ast::schema::Field>,
) -> Result<CompositeType> {
    let mut fields = IndexMap::new();
    insert_fields(Some(file_path), &name, ast_fields, &mut fields)?;
    Ok(CompositeType {
        def_location: loc::FilePosition::from_pos(Some(file_path), position),
        fields,
        name,
    })
}

fn insert_fields(
    file_path: Option<&Path>,
    type_name: &str,
    ast_fields: Vec<ast::schema::Field>,
    fields: &mut IndexMap<String, FieldDef>,
) -> Result<()> {
    for ast_field in ast_fields {
        let def_location = loc::FilePosition::from_pos(file_path, ast_field.position);
        if fields.contains_key(&ast_field.name) {
            return Err(CatalogBuildError::DuplicateFieldDefinition {
                field_name: ast_field.name,
                location: def_location,
                type_name: type_name.to_string(),
            });
        }

        let mut arguments = IndexMap::new();
        for ast_arg in ast_field.arguments {
            arguments.insert(ast_arg.name.to_owned(), InputValueDef::from_ast(ast_arg));
        }

        fields.insert(ast_field.name.to_owned(), FieldDef {
            arguments,
            def_location,
            directives: ast_field.directives,
            field_type: ast_field.field_type,
            name: ast_field.name,
        });
    }
    Ok(())
}

fn insert_input_fields(
    file_path: Option<&Path>,
    type_name: &str,
    ast_fields: Vec<ast::schema::InputValue>,
    fields: &mut IndexMap<String, InputValueDef>,
) -> Result<()> {
    for ast_field in ast_fields {
        if fields.contains_key(&ast_field.name) {
            return Err(CatalogBuildError::DuplicateFieldDefinition {
                field_name: ast_field.name,
                location: loc::FilePosition::from_pos(file_path, ast_field.position),
                type_name: type_name.to_string(),
            });
        }
        fields.insert(ast_field.name.to_owned(), InputValueDef::from_ast(ast_field));
    }
    Ok(())
}

#[derive(Clone, Debug, Error)]
pub enum CatalogBuildError {
    #[error("Found multiple definitions of the field `{type_name}.{field_name}`")]
    DuplicateFieldDefinition {
        field_name: String,
        location: loc::FilePosition,
        type_name: String,
    },

    #[error("Found multiple `schema` definitions ({location1} and {location2})")]
    DuplicateSchemaDefinition {
        location1: loc::FilePosition,
        location2: loc::FilePosition,
    },

    #[error("Found multiple definitions of the type `{type_name}`")]
    DuplicateTypeDefinition {
        location: loc::FilePosition,
        type_name: String,
    },

    #[error("Attempted to extend `{type_name}`, which is not defined as an extendable type")]
    ExtensionOfUndefinedType {
        location: loc::FilePosition,
        type_name: String,
    },

    #[error("Error parsing schema document {file:?}: {err}")]
    ParseError {
        file: PathBuf,
        err: String,
    },

    #[error("Failure while trying to read a schema file from disk: {0}")]
    SchemaFileReadError(Arc<file_reader::ReadContentError>),

    #[error("The {operation_kind} root type `{type_name}` is not an object type defined in this schema")]
    UndefinedRootOperationType {
        operation_kind: OperationKind,
        type_name: String,
    },
}
