mod extracted_field;
mod field_extractor;
mod rewrite_hook;

pub use extracted_field::ExtractedField;
pub use field_extractor::remote_operation_kind;
pub use field_extractor::ExtractionError;
pub use field_extractor::FieldExtractor;
pub use rewrite_hook::SelectionRewriteHook;
pub use rewrite_hook::StripClientFields;
