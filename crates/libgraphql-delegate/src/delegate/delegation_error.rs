use crate::delegate::RemoteExecutionError;
use crate::extract::ExtractionError;
use crate::materialize::MaterializeError;
use thiserror::Error;

/// A failure that prevents a field from being delegated.
///
/// Every variant is scoped to the one field being delegated: it becomes a
/// single error at the field's response path and a `null` field value.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DelegationError {
    #[error(
        "Remote result has {} entries at nesting level {level} ({}); expected at most one",
        .entries.len(),
        .entries.join(", "),
    )]
    AmbiguousRemoteResult {
        entries: Vec<String>,
        level: usize,
    },

    #[error("Failed to execute the delegated request against `{schema_name}`: {source}")]
    Execution {
        schema_name: String,
        source: RemoteExecutionError,
    },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    #[error("Remote result has a non-object value at nesting level {level}")]
    UnexpectedResultShape {
        level: usize,
    },

    #[error("Unknown remote schema `{schema_name}`")]
    UnknownRemoteSchema {
        schema_name: String,
    },

    #[error(
        "Remote schema `{schema_name}` returned a stream: only query-shaped results are \
        supported for delegation",
    )]
    UnsupportedResultShape {
        schema_name: String,
    },
}
