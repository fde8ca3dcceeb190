mod remote_query;
mod remote_query_request;
mod remote_query_result;

pub use remote_query::referenced_variable_names;
pub use remote_query::RemoteQuery;
pub use remote_query_request::RemoteQueryRequest;
pub use remote_query_request::AUTO_GENERATED_PROPERTY;
pub use remote_query_result::ErrorLocation;
pub use remote_query_result::RemoteError;
pub use remote_query_result::RemoteQueryResult;

#[cfg(test)]
mod tests;
