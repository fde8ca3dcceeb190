mod execution_scope;
mod scoped_expr;
mod variable_value;

pub use execution_scope::ExecutionScope;
pub use execution_scope::ScopeFrame;
pub use scoped_expr::resolve;
pub use scoped_expr::ScopeResolutionError;
pub use scoped_expr::ScopedExpr;
pub use variable_value::VariableSet;
pub use variable_value::VariableValue;

#[cfg(test)]
mod tests;
