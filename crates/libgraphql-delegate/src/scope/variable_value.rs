use crate::ast;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// A variable bound for a remote request: its definition in the generated
/// document plus the value to send for it.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableValue {
    pub(crate) declared_type: ast::query::Type,
    pub(crate) default_value: Option<ast::query::Value>,
    pub(crate) name: String,
    pub(crate) value: Option<JsonValue>,
}
impl VariableValue {
    pub fn declared_type(&self) -> &ast::query::Type {
        &self.declared_type
    }

    pub fn default_value(&self) -> Option<&ast::query::Value> {
        self.default_value.as_ref()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn new(
        name: impl Into<String>,
        declared_type: ast::query::Type,
        value: Option<JsonValue>,
    ) -> Self {
        Self {
            declared_type,
            default_value: None,
            name: name.into(),
            value,
        }
    }

    /// The value to send. `None` means the variable is defined but no value
    /// was supplied, so the remote side falls back to its default.
    pub fn value(&self) -> Option<&JsonValue> {
        self.value.as_ref()
    }

    pub fn with_default_value(mut self, default_value: Option<ast::query::Value>) -> Self {
        self.default_value = default_value;
        self
    }
}

/// Name-keyed [`VariableValue`]s in first-insertion order. Inserting a name
/// that is already present replaces the earlier entry in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariableSet {
    variables: IndexMap<String, VariableValue>,
}
impl VariableSet {
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&VariableValue> {
        self.variables.get(name)
    }

    pub fn insert(&mut self, variable: VariableValue) -> Option<VariableValue> {
        self.variables.insert(variable.name.to_owned(), variable)
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableValue> {
        self.variables.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut VariableValue> {
        self.variables.values_mut()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&VariableValue) -> bool) {
        self.variables.retain(|_, variable| keep(variable));
    }

    /// The JSON variables payload: every variable that has a value, in
    /// definition order.
    pub fn to_json_values(&self) -> IndexMap<String, JsonValue> {
        self.variables
            .values()
            .filter_map(|variable| {
                variable.value.as_ref().map(|v| (variable.name.to_owned(), v.clone()))
            })
            .collect()
    }
}
