use crate::ast;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

/// Convert a GraphQL input value into its JSON representation.
///
/// Variable references are substituted from `variables`; a variable missing
/// from `variables` becomes `null`. Enum values become JSON strings.
pub fn ast_value_to_json(
    value: &ast::query::Value,
    variables: &JsonMap<String, JsonValue>,
) -> JsonValue {
    use ast::query::Value;
    match value {
        Value::Variable(name) =>
            variables.get(name).cloned().unwrap_or(JsonValue::Null),

        Value::Int(num) =>
            num.as_i64().map(JsonValue::from).unwrap_or(JsonValue::Null),

        Value::Float(num) =>
            serde_json::Number::from_f64(*num)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),

        Value::String(s) => JsonValue::String(s.clone()),
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Null => JsonValue::Null,
        Value::Enum(name) => JsonValue::String(name.clone()),

        Value::List(items) =>
            JsonValue::Array(
                items.iter()
                    .map(|item| ast_value_to_json(item, variables))
                    .collect(),
            ),

        Value::Object(entries) =>
            JsonValue::Object(
                entries.iter()
                    .map(|(key, item)| (key.clone(), ast_value_to_json(item, variables)))
                    .collect(),
            ),
    }
}

/// Indicates whether a variable reference appears anywhere inside `value`.
pub fn contains_variable(value: &ast::query::Value) -> bool {
    use ast::query::Value;
    match value {
        Value::Variable(_) => true,
        Value::List(items) => items.iter().any(contains_variable),
        Value::Object(entries) => entries.values().any(contains_variable),
        _ => false,
    }
}

/// Append the name of every variable referenced inside `value` to `out`.
pub(crate) fn collect_variable_names(
    value: &ast::query::Value,
    out: &mut Vec<String>,
) {
    use ast::query::Value;
    match value {
        Value::Variable(name) => out.push(name.clone()),
        Value::List(items) =>
            items.iter().for_each(|item| collect_variable_names(item, out)),
        Value::Object(entries) =>
            entries.values().for_each(|item| collect_variable_names(item, out)),
        _ => (),
    }
}
