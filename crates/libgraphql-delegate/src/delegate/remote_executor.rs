use crate::delegate::FieldContext;
use crate::request::RemoteQueryRequest;
use crate::request::RemoteQueryResult;
use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

/// Executes generated requests against remote schemas.
///
/// Transport, retries, timeouts and cancellation all belong to the
/// implementation; a cancelled execution is reported as
/// [`RemoteExecutionError::Cancelled`].
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn execute(
        &self,
        schema_name: &str,
        request: RemoteQueryRequest,
    ) -> Result<RemoteExecutionOutcome, RemoteExecutionError>;
}

/// What a [`RemoteExecutor`] produced for a request.
pub enum RemoteExecutionOutcome {
    /// A single query-shaped response.
    Response(RemoteQueryResult),

    /// A stream of responses, as produced for a subscription. Delegation
    /// rejects this shape.
    Stream(BoxStream<'static, RemoteQueryResult>),
}
impl std::fmt::Debug for RemoteExecutionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Response(result) => f.debug_tuple("Response").field(result).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum RemoteExecutionError {
    #[error("Remote execution was cancelled")]
    Cancelled,

    #[error("Transport failure: {reason}")]
    Transport {
        reason: String,
    },

    #[error("No executor is registered for remote schema `{schema_name}`")]
    UnknownSchema {
        schema_name: String,
    },
}

/// The rest of the host's field-resolution pipeline, run after delegation
/// has populated (or declined to populate) the field.
#[async_trait]
pub trait NextStage: Send + Sync {
    async fn run(&self, ctx: &mut FieldContext<'_>);
}

/// A [`NextStage`] that does nothing, for hosts where delegation is the last
/// stage.
#[derive(Clone, Copy, Debug, Default)]
pub struct EndOfPipeline;
#[async_trait]
impl NextStage for EndOfPipeline {
    async fn run(&self, _ctx: &mut FieldContext<'_>) {}
}
