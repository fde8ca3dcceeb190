use crate::ast;

/// The minimal, self-contained part of a caller's document needed to answer
/// one delegated field.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedField {
    pub(super) fragments: Vec<ast::query::FragmentDefinition>,
    pub(super) referenced_variables: Vec<ast::query::VariableDefinition>,
    pub(super) selection: ast::query::Field,
}
impl ExtractedField {
    /// Fragment definitions reachable from the selection, in first-use order.
    pub fn fragments(&self) -> &[ast::query::FragmentDefinition] {
        self.fragments.as_slice()
    }

    /// The caller's variable definitions referenced anywhere in the
    /// selection or its fragments, in the caller's declaration order.
    pub fn referenced_variables(&self) -> &[ast::query::VariableDefinition] {
        self.referenced_variables.as_slice()
    }

    pub fn selection(&self) -> &ast::query::Field {
        &self.selection
    }
}
