use crate::delegate::ResponsePath;
use crate::request::RemoteError;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

/// Extension added to every re-reported remote error, holding the caller's
/// response path of the delegated field.
pub const CALLER_PATH_EXTENSION: &str = "callerPath";

/// An error destined for the caller's response.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct GraphQLError {
    #[serde(skip_serializing_if = "JsonMap::is_empty")]
    pub extensions: JsonMap<String, JsonValue>,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<ResponsePath>,
}
impl GraphQLError {
    pub fn at_path(message: impl Into<String>, path: ResponsePath) -> Self {
        Self {
            extensions: JsonMap::new(),
            message: message.into(),
            path: Some(path),
        }
    }

    pub fn extension(&self, name: &str) -> Option<&JsonValue> {
        self.extensions.get(name)
    }

    /// Re-home an error reported by a remote schema at the delegated field's
    /// position in the caller's response.
    ///
    /// The remote error's path and locations describe the generated remote
    /// document, so they are replaced by `caller_path`, which is also recorded
    /// under the [`CALLER_PATH_EXTENSION`] extension. The remote error's own
    /// extensions are kept.
    pub fn from_remote(remote_error: RemoteError, caller_path: &ResponsePath) -> Self {
        let mut extensions = remote_error.extensions;
        extensions.insert(
            CALLER_PATH_EXTENSION.to_string(),
            caller_path.to_json(),
        );
        Self {
            extensions,
            message: remote_error.message,
            path: Some(caller_path.clone()),
        }
    }

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_extension(mut self, name: impl Into<String>, value: JsonValue) -> Self {
        self.extensions.insert(name.into(), value);
        self
    }
}
impl std::fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) if !path.is_root() => write!(f, "{} (at `{path}`)", self.message),
            _ => f.write_str(self.message.as_str()),
        }
    }
}
