use crate::path::SelectionPath;
use crate::path::SelectionPathParseError;

/// Declares that a field's value comes from `target_schema`, optionally after
/// descending `path` inside that schema.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DelegationAnnotation {
    path: Option<String>,
    target_schema: String,
}
impl DelegationAnnotation {
    pub fn new(target_schema: impl Into<String>) -> Self {
        Self {
            path: None,
            target_schema: target_schema.into(),
        }
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn target_schema(&self) -> &str {
        self.target_schema.as_str()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// A [`DelegationAnnotation`] together with its parsed [`SelectionPath`].
///
/// Constructing one validates the path text, so a malformed path is caught
/// when the gateway configuration is built rather than on every request.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDelegation {
    annotation: DelegationAnnotation,
    selection_path: SelectionPath,
}
impl FieldDelegation {
    pub fn annotation(&self) -> &DelegationAnnotation {
        &self.annotation
    }

    pub fn new(annotation: DelegationAnnotation) -> Result<Self, SelectionPathParseError> {
        let selection_path = SelectionPath::parse_optional(annotation.path())?;
        Ok(Self {
            annotation,
            selection_path,
        })
    }

    pub fn selection_path(&self) -> &SelectionPath {
        &self.selection_path
    }

    pub fn target_schema(&self) -> &str {
        self.annotation.target_schema()
    }
}
