use crate::scope::ScopedExpr;

/// One field to traverse inside a remote schema on the way to the field that
/// receives the delegated selection.
#[derive(Clone, Debug, PartialEq)]
pub struct PathComponent {
    pub(super) arguments: Vec<(String, ScopedExpr)>,
    pub(super) name: String,
}
impl PathComponent {
    pub fn arguments(&self) -> &[(String, ScopedExpr)] {
        self.arguments.as_slice()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            arguments: vec![],
            name: name.into(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, expr: ScopedExpr) -> Self {
        self.arguments.push((name.into(), expr));
        self
    }
}
