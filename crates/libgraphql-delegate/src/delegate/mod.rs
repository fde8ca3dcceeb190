mod delegation_error;
mod delegator;
mod field_context;
mod field_locator;
mod graphql_error;
mod remote_executor;
mod response_path;
mod result_unwrap;

pub use delegation_error::DelegationError;
pub use delegator::DelegationOutcome;
pub use delegator::Delegator;
pub use field_context::FieldContext;
pub use field_locator::locate_field;
pub use field_locator::select_operation;
pub use field_locator::LocateFieldError;
pub use field_locator::LocatedField;
pub use graphql_error::GraphQLError;
pub use graphql_error::CALLER_PATH_EXTENSION;
pub use remote_executor::EndOfPipeline;
pub use remote_executor::NextStage;
pub use remote_executor::RemoteExecutionError;
pub use remote_executor::RemoteExecutionOutcome;
pub use remote_executor::RemoteExecutor;
pub use response_path::PathSegment;
pub use response_path::ResponsePath;
pub use result_unwrap::unwrap_result;

#[cfg(test)]
mod tests;
