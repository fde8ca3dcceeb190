use serde::Deserialize;
use serde::Serialize;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

/// The standard response shape returned by a remote schema for a
/// query-shaped request.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct RemoteQueryResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonMap<String, JsonValue>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<RemoteError>,
}
impl RemoteQueryResult {
    pub fn with_data(data: JsonMap<String, JsonValue>) -> Self {
        Self {
            data: Some(data),
            errors: vec![],
        }
    }

    pub fn with_errors(mut self, errors: Vec<RemoteError>) -> Self {
        self.errors = errors;
        self
    }
}

/// An error reported by a remote schema, as found in its response's
/// `errors` list.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct RemoteError {
    #[serde(skip_serializing_if = "JsonMap::is_empty")]
    pub extensions: JsonMap<String, JsonValue>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<ErrorLocation>,

    pub message: String,

    /// The path of the failing field in the *remote* response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<JsonValue>>,
}
impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ErrorLocation {
    pub column: u32,
    pub line: u32,
}
