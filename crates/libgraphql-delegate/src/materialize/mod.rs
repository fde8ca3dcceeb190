mod input_rewriter;
mod variable_materializer;

pub use input_rewriter::IdentityInputRewriter;
pub use input_rewriter::InputObjectRewriter;
pub use input_rewriter::InputRewriteError;
pub use input_rewriter::RenamingInputRewriter;
pub use variable_materializer::MaterializeError;
pub use variable_materializer::VariableMaterializer;

#[cfg(test)]
mod tests;
