use crate::schema::CompositeType;
use crate::schema::SchemaCatalog;
use crate::OperationKind;
use std::collections::HashMap;
use std::sync::Arc;

/// The set of remote schemas that gateway fields may delegate to, keyed by
/// the name used in `@delegate(schema: "...")`.
#[derive(Clone, Debug, Default)]
pub struct RemoteSchemaRegistry {
    schemas: HashMap<String, Arc<SchemaCatalog>>,
}
impl RemoteSchemaRegistry {
    pub fn get(&self, schema_name: &str) -> Option<&SchemaCatalog> {
        self.schemas.get(schema_name).map(|catalog| catalog.as_ref())
    }

    /// Register `catalog` under `schema_name`, returning any catalog that was
    /// previously registered under the same name.
    pub fn insert(
        &mut self,
        schema_name: impl Into<String>,
        catalog: SchemaCatalog,
    ) -> Option<Arc<SchemaCatalog>> {
        self.schemas.insert(schema_name.into(), Arc::new(catalog))
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// The root type of `schema_name` for operations of the given kind.
    pub fn remote_schema_type(
        &self,
        schema_name: &str,
        kind: OperationKind,
    ) -> Option<&CompositeType> {
        self.get(schema_name).and_then(|catalog| catalog.root_type(kind))
    }

    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn with_schema(
        mut self,
        schema_name: impl Into<String>,
        catalog: SchemaCatalog,
    ) -> Self {
        self.insert(schema_name, catalog);
        self
    }
}
