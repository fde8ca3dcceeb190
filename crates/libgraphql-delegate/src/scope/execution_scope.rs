use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// The resolver state of one field on the path from the operation root to
/// the field currently being resolved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScopeFrame {
    arguments: IndexMap<String, JsonValue>,
    field_name: String,
    serving_schema: Option<String>,
}
impl ScopeFrame {
    pub fn argument(&self, name: &str) -> Option<&JsonValue> {
        self.arguments.get(name)
    }

    pub fn arguments(&self) -> &IndexMap<String, JsonValue> {
        &self.arguments
    }

    pub fn field_name(&self) -> &str {
        self.field_name.as_str()
    }

    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            arguments: IndexMap::new(),
            field_name: field_name.into(),
            serving_schema: None,
        }
    }

    /// The remote schema that served this field's data, if the field was
    /// delegated.
    pub fn serving_schema(&self) -> Option<&str> {
        self.serving_schema.as_deref()
    }

    pub fn with_argument(
        mut self,
        name: impl Into<String>,
        value: JsonValue,
    ) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }

    pub fn with_serving_schema(mut self, schema_name: impl Into<String>) -> Self {
        self.serving_schema = Some(schema_name.into());
        self
    }
}

/// The bindings visible to scoped-variable expressions: one [`ScopeFrame`]
/// per ancestor field, outermost first, ending with the field being resolved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecutionScope {
    frames: Vec<ScopeFrame>,
}
impl ExecutionScope {
    /// The innermost remote schema recorded by any frame.
    pub fn current_remote_schema(&self) -> Option<&str> {
        self.frames.iter().rev().find_map(ScopeFrame::serving_schema)
    }

    pub fn current_frame(&self) -> Option<&ScopeFrame> {
        self.frames.last()
    }

    pub fn frames(&self) -> &[ScopeFrame] {
        self.frames.as_slice()
    }

    /// Find the value bound to `binding`, searching frames innermost-first.
    pub fn lookup(&self, binding: &str) -> Option<&JsonValue> {
        self.frames.iter().rev().find_map(|frame| frame.argument(binding))
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_frame(&mut self, frame: ScopeFrame) {
        self.frames.push(frame);
    }

    /// Record that the current field's data was served by `schema_name`.
    ///
    /// A scope with no frames gains an anonymous frame to carry the record.
    pub fn set_serving_schema(&mut self, schema_name: impl Into<String>) {
        if self.frames.is_empty() {
            self.frames.push(ScopeFrame::default());
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.serving_schema = Some(schema_name.into());
        }
    }

    pub fn with_frame(mut self, frame: ScopeFrame) -> Self {
        self.push_frame(frame);
        self
    }
}
