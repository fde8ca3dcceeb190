use crate::ast;

/// The kind of a GraphQL operation, without any of its contents.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OperationKind {
    Mutation,
    Query,
    Subscription,
}
impl OperationKind {
    /// The kind of an operation definition. The `{ ... }` shorthand form is a
    /// query.
    pub fn of(operation: &ast::query::OperationDefinition) -> Self {
        use ast::query::OperationDefinition as Op;
        match operation {
            Op::SelectionSet(_) | Op::Query(_) => Self::Query,
            Op::Mutation(_) => Self::Mutation,
            Op::Subscription(_) => Self::Subscription,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mutation => "mutation",
            Self::Query => "query",
            Self::Subscription => "subscription",
        }
    }
}
impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
