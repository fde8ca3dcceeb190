use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// One step in a [`ResponsePath`]: an object key or a list index.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}
impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Key(key) => f.write_str(key),
        }
    }
}

/// The position of a field in the caller's response tree, e.g.
/// `["user", "friends", 0, "name"]`.
///
/// Serializes as the JSON array used for the `path` of GraphQL errors.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponsePath {
    segments: Vec<PathSegment>,
}
impl ResponsePath {
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn join_index(&self, index: usize) -> Self {
        let mut joined = self.clone();
        joined.push_index(index);
        joined
    }

    pub fn join_key(&self, key: impl Into<String>) -> Self {
        let mut joined = self.clone();
        joined.push_key(key);
        joined
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        self.segments.as_slice()
    }

    pub fn to_json(&self) -> JsonValue {
        JsonValue::Array(
            self.segments
                .iter()
                .map(|segment| match segment {
                    PathSegment::Index(index) => JsonValue::from(*index),
                    PathSegment::Key(key) => JsonValue::String(key.to_owned()),
                })
                .collect(),
        )
    }
}
impl std::fmt::Display for ResponsePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
