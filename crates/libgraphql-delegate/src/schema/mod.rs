mod remote_schema_registry;
mod schema_catalog;
mod schema_catalog_builder;

pub use remote_schema_registry::RemoteSchemaRegistry;
pub use schema_catalog::CatalogType;
pub use schema_catalog::CompositeType;
pub use schema_catalog::FieldDef;
pub use schema_catalog::InputObjectType;
pub use schema_catalog::InputValueDef;
pub use schema_catalog::SchemaCatalog;
pub use schema_catalog_builder::CatalogBuildError;
pub use schema_catalog_builder::SchemaCatalogBuilder;

#[cfg(test)]
mod tests;
