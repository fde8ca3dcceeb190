use crate::ast;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Request property marking a request as generated by delegation rather than
/// sent by a client.
pub const AUTO_GENERATED_PROPERTY: &str = "autoGenerated";

/// A complete request against a remote schema.
///
/// Serializes to the standard GraphQL-over-HTTP request body
/// (`{"query": ..., "variables": ...}`); `properties` are side-channel
/// metadata for the executor and are not serialized.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RemoteQueryRequest {
    #[serde(rename = "query", serialize_with = "serialize_document")]
    document: ast::query::Document,

    #[serde(skip)]
    properties: IndexMap<String, JsonValue>,

    variables: IndexMap<String, JsonValue>,
}
impl RemoteQueryRequest {
    pub fn document(&self) -> &ast::query::Document {
        &self.document
    }

    /// The document rendered as GraphQL source text.
    pub fn document_source(&self) -> String {
        self.document.to_string()
    }

    pub fn new(
        document: ast::query::Document,
        variables: IndexMap<String, JsonValue>,
    ) -> Self {
        Self {
            document,
            properties: IndexMap::new(),
            variables,
        }
    }

    pub fn properties(&self) -> &IndexMap<String, JsonValue> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&JsonValue> {
        self.properties.get(name)
    }

    pub fn variables(&self) -> &IndexMap<String, JsonValue> {
        &self.variables
    }

    pub fn with_property(mut self, name: impl Into<String>, value: JsonValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }
}

fn serialize_document<S: serde::Serializer>(
    document: &ast::query::Document,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(document.to_string().as_str())
}
