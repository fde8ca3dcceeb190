use crate::ast;
use crate::scope::ExecutionScope;
use crate::scope::VariableValue;
use thiserror::Error;

/// An argument value written in a delegation path: either a literal that is
/// sent inline, or a reference to a value bound in the caller's execution
/// scope that is sent as a variable.
#[derive(Clone, Debug, PartialEq)]
pub enum ScopedExpr {
    ContextRef(String),
    Literal(ast::query::Value),
}
impl ScopedExpr {
    /// The scope binding this expression refers to, if it is a
    /// [`ScopedExpr::ContextRef`].
    pub fn binding(&self) -> Option<&str> {
        if let Self::ContextRef(binding) = self {
            Some(binding.as_str())
        } else {
            None
        }
    }

    /// The value to write into the generated document for this expression.
    /// Context references are written as a variable named after the binding.
    pub fn to_ast_value(&self) -> ast::query::Value {
        match self {
            Self::ContextRef(binding) => ast::query::Value::Variable(binding.to_owned()),
            Self::Literal(value) => value.clone(),
        }
    }
}

/// Resolve a scoped expression into the variable that carries it.
///
/// Literals are written inline and produce no variable (`Ok(None)`). A
/// [`ScopedExpr::ContextRef`] produces a variable named after the binding
/// whose declared type is `expected_type` (the static type of the remote
/// argument receiving it), regardless of where the value came from.
pub fn resolve(
    scope: &ExecutionScope,
    expr: &ScopedExpr,
    expected_type: &ast::query::Type,
) -> Result<Option<VariableValue>, ScopeResolutionError> {
    let Some(binding) = expr.binding() else {
        return Ok(None);
    };

    let value = scope.lookup(binding).ok_or_else(
        || ScopeResolutionError::UnboundReference {
            binding: binding.to_string(),
        },
    )?;

    log::trace!("Resolved scoped variable `${binding}` to `{value}`.");
    Ok(Some(VariableValue::new(
        binding,
        expected_type.clone(),
        Some(value.clone()),
    )))
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ScopeResolutionError {
    #[error("`${binding}` does not refer to an argument of the delegated field or any of its ancestors")]
    UnboundReference {
        binding: String,
    },
}
