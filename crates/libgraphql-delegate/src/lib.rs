//! Field-level query delegation for GraphQL gateways.
//!
//! A gateway field annotated with `@delegate(schema: "...", path: "...")` is
//! answered by synthesizing a standalone operation against a named remote
//! schema, executing it through an injected [`RemoteExecutor`], and splicing
//! the single resulting value back into the caller's response.
//!
//! The entry point is [`Delegator::process_field`].

pub mod annotation;
pub mod ast;
pub mod delegate;
pub mod extract;
pub mod file_reader;
pub mod loc;
pub mod materialize;
mod operation_kind;
pub mod path;
pub mod request;
pub mod schema;
pub mod scope;
mod value;

pub use delegate::DelegationOutcome;
pub use delegate::Delegator;
pub use delegate::FieldContext;
pub use delegate::NextStage;
pub use delegate::RemoteExecutor;
pub use operation_kind::OperationKind;
pub use value::ast_value_to_json;
pub use value::contains_variable;
