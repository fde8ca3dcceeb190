use crate::ast;
use crate::loc;
use crate::OperationKind;
use indexmap::IndexMap;

/// A read-only catalog of the types defined by one schema.
///
/// The gateway's own schema and every remote schema are each represented by a
/// [`SchemaCatalog`]. Once built, a catalog is immutable and may be shared
/// across any number of concurrent delegations.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaCatalog {
    pub(super) mutation_type_name: Option<String>,
    pub(super) query_type_name: String,
    pub(super) subscription_type_name: Option<String>,
    pub(super) types: IndexMap<String, CatalogType>,
}
impl SchemaCatalog {
    /// Look up an object or interface type by name.
    pub fn composite_type(&self, name: &str) -> Option<&CompositeType> {
        self.types.get(name).and_then(CatalogType::as_composite)
    }

    pub fn get_type(&self, name: &str) -> Option<&CatalogType> {
        self.types.get(name)
    }

    /// Look up an input object type by name.
    pub fn input_object_type(&self, name: &str) -> Option<&InputObjectType> {
        self.types.get(name).and_then(CatalogType::as_input_object)
    }

    /// If `type_name` is one of this schema's root operation types, return
    /// the kind of operation it is the root of.
    pub fn root_operation_kind(&self, type_name: &str) -> Option<OperationKind> {
        [OperationKind::Query, OperationKind::Mutation, OperationKind::Subscription]
            .into_iter()
            .find(|kind| self.root_type_name(*kind) == Some(type_name))
    }

    /// The root type that operations of the given kind start from.
    pub fn root_type(&self, kind: OperationKind) -> Option<&CompositeType> {
        self.root_type_name(kind)
            .and_then(|type_name| self.composite_type(type_name))
    }

    pub fn root_type_name(&self, kind: OperationKind) -> Option<&str> {
        match kind {
            OperationKind::Mutation => self.mutation_type_name.as_deref(),
            OperationKind::Query => Some(self.query_type_name.as_str()),
            OperationKind::Subscription => self.subscription_type_name.as_deref(),
        }
    }

    pub fn types(&self) -> &IndexMap<String, CatalogType> {
        &self.types
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CatalogType {
    Enum(String),
    InputObject(InputObjectType),
    Interface(CompositeType),
    Object(CompositeType),
    Scalar(String),
    Union(String),
}
impl CatalogType {
    /// Unwrap the [`CompositeType`] if this is an object or interface type.
    pub fn as_composite(&self) -> Option<&CompositeType> {
        match self {
            Self::Interface(composite) | Self::Object(composite) => Some(composite),
            _ => None,
        }
    }

    pub fn as_input_object(&self) -> Option<&InputObjectType> {
        if let Self::InputObject(input_obj) = self {
            Some(input_obj)
        } else {
            None
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Enum(name)
                | Self::Scalar(name)
                | Self::Union(name) => name.as_str(),
            Self::InputObject(input_obj) => input_obj.name(),
            Self::Interface(composite)
                | Self::Object(composite) => composite.name(),
        }
    }
}

/// An object or interface type: a complex output type with selectable fields.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeType {
    pub(super) def_location: loc::FilePosition,
    pub(super) fields: IndexMap<String, FieldDef>,
    pub(super) name: String,
}
impl CompositeType {
    pub fn def_location(&self) -> &loc::FilePosition {
        &self.def_location
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &IndexMap<String, FieldDef> {
        &self.fields
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    pub(super) arguments: IndexMap<String, InputValueDef>,
    pub(super) def_location: loc::FilePosition,
    pub(super) directives: Vec<ast::schema::Directive>,
    pub(super) field_type: ast::query::Type,
    pub(super) name: String,
}
impl FieldDef {
    pub fn argument(&self, name: &str) -> Option<&InputValueDef> {
        self.arguments.get(name)
    }

    pub fn arguments(&self) -> &IndexMap<String, InputValueDef> {
        &self.arguments
    }

    pub fn def_location(&self) -> &loc::FilePosition {
        &self.def_location
    }

    pub fn directives(&self) -> &[ast::schema::Directive] {
        self.directives.as_slice()
    }

    pub fn field_type(&self) -> &ast::query::Type {
        &self.field_type
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The name of the field's type with all list and non-null wrappers
    /// removed.
    pub fn named_type(&self) -> &str {
        ast::innermost_type_name(&self.field_type)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputObjectType {
    pub(super) def_location: loc::FilePosition,
    pub(super) fields: IndexMap<String, InputValueDef>,
    pub(super) name: String,
}
impl InputObjectType {
    pub fn def_location(&self) -> &loc::FilePosition {
        &self.def_location
    }

    pub fn field(&self, name: &str) -> Option<&InputValueDef> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &IndexMap<String, InputValueDef> {
        &self.fields
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// A field argument or an input object field.
#[derive(Clone, Debug, PartialEq)]
pub struct InputValueDef {
    pub(super) default_value: Option<ast::query::Value>,
    pub(super) name: String,
    pub(super) value_type: ast::query::Type,
}
impl InputValueDef {
    pub fn default_value(&self) -> Option<&ast::query::Value> {
        self.default_value.as_ref()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn value_type(&self) -> &ast::query::Type {
        &self.value_type
    }

    pub(super) fn from_ast(input_value: ast::schema::InputValue) -> Self {
        Self {
            default_value: input_value.default_value,
            name: input_value.name,
            value_type: input_value.value_type,
        }
    }
}
