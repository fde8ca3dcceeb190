use crate::ast;
use crate::path::PathComponent;
use crate::scope::ScopedExpr;
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

type Result<T> = std::result::Result<T, SelectionPathParseError>;

/// The fields to descend through inside a remote schema, root-first, before
/// reaching the point that corresponds to the delegated field.
///
/// The textual form is a `.`-separated list of fields, each optionally
/// followed by a GraphQL argument list:
///
/// ```text
/// organization(slug: "acme").member(id: $memberId)
/// ```
///
/// Argument values are GraphQL literals, except that a bare `$name` refers to
/// a value bound in the caller's execution scope (see
/// [`ScopedExpr::ContextRef`]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionPath {
    components: Vec<PathComponent>,
}
impl SelectionPath {
    /// Names of every scope binding referenced by any component, in
    /// first-reference order.
    pub fn context_bindings(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.components
            .iter()
            .flat_map(|component| component.arguments().iter())
            .filter_map(|(_, expr)| expr.binding())
            .filter(|binding| seen.insert(*binding))
            .collect()
    }

    pub fn components(&self) -> &[PathComponent] {
        self.components.as_slice()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_components(components: Vec<PathComponent>) -> Self {
        Self { components }
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Parse the textual form of a path. Blank text is the empty path.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::empty());
        }

        let components =
            split_components(text)?
                .into_iter()
                .enumerate()
                .map(|(index, component_text)| parse_component(index, component_text))
                .collect::<Result<Vec<_>>>()?;

        Ok(Self { components })
    }

    /// Parse a path that may be absent; an absent path is the empty path.
    pub fn parse_optional(text: Option<&str>) -> Result<Self> {
        text.map_or_else(|| Ok(Self::empty()), Self::parse)
    }
}
impl FromStr for SelectionPath {
    type Err = SelectionPathParseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum StringState {
    Block,
    Outside,
    Quoted,
}

/// Split on every `.` that sits outside of string literals (including
/// `"""` block strings) and delimiters.
///
/// Every byte the scan acts on is ASCII, so scanning bytes never splits a
/// multi-byte character.
fn split_components(text: &str) -> Result<Vec<&str>> {
    const BLOCK_QUOTE: &[u8] = br#"""""#;
    const ESCAPED_BLOCK_QUOTE: &[u8] = br#"\""""#;

    let bytes = text.as_bytes();
    let mut components = vec![];
    let mut depth: usize = 0;
    let mut state = StringState::Outside;
    let mut start = 0;
    let mut offset = 0;

    while offset < bytes.len() {
        let rest = &bytes[offset..];
        match state {
            StringState::Block => {
                if rest.starts_with(ESCAPED_BLOCK_QUOTE) {
                    offset += ESCAPED_BLOCK_QUOTE.len();
                } else if rest.starts_with(BLOCK_QUOTE) {
                    state = StringState::Outside;
                    offset += BLOCK_QUOTE.len();
                } else {
                    offset += 1;
                }
                continue
            },

            StringState::Quoted => {
                match bytes[offset] {
                    b'\\' => offset += 1,
                    b'"' => state = StringState::Outside,
                    _ => (),
                }
                offset += 1;
                continue
            },

            StringState::Outside => (),
        }

        match bytes[offset] {
            b'"' if rest.starts_with(BLOCK_QUOTE) => {
                state = StringState::Block;
                offset += BLOCK_QUOTE.len();
                continue
            },
            b'"' => state = StringState::Quoted,
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                depth = depth.checked_sub(1).ok_or(
                    SelectionPathParseError::UnbalancedDelimiter { offset },
                )?;
            },
            b'.' if depth == 0 => {
                components.push(&text[start..offset]);
                start = offset + 1;
            },
            _ => (),
        }
        offset += 1;
    }

    if state != StringState::Outside {
        return Err(SelectionPathParseError::UnterminatedString);
    }
    if depth > 0 {
        return Err(SelectionPathParseError::UnbalancedDelimiter {
            offset: text.len(),
        });
    }

    components.push(&text[start..]);
    Ok(components)
}

fn parse_component(index: usize, text: &str) -> Result<PathComponent> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SelectionPathParseError::EmptyComponent { index });
    }

    let invalid = |reason: String| SelectionPathParseError::InvalidComponent {
        component: text.to_string(),
        reason,
    };

    let ast_doc = ast::query::parse(format!("{{ {text} }}").as_str())
        .map_err(|err| invalid(err.to_string()))?;

    use ast::query::Definition;
    use ast::query::OperationDefinition;
    use ast::query::Selection;
    let field = match ast_doc.definitions.as_slice() {
        [Definition::Operation(OperationDefinition::SelectionSet(selection_set))] =>
            match selection_set.items.as_slice() {
                [Selection::Field(field)] => field,
                _ => return Err(invalid("expected exactly one field".to_string())),
            },
        _ => return Err(invalid("expected exactly one field".to_string())),
    };

    if field.alias.is_some() {
        return Err(invalid("aliases are not allowed".to_string()));
    }
    if !field.directives.is_empty() {
        return Err(invalid("directives are not allowed".to_string()));
    }
    if !field.selection_set.items.is_empty() {
        return Err(invalid(
            "sub-selections are not allowed; separate fields with `.`".to_string(),
        ));
    }

    let mut component = PathComponent::new(field.name.as_str());
    for (arg_name, arg_value) in &field.arguments {
        if component.arguments.iter().any(|(name, _)| name == arg_name) {
            return Err(invalid(format!("argument `{arg_name}` is given more than once")));
        }

        let expr = match arg_value {
            ast::query::Value::Variable(binding) => ScopedExpr::ContextRef(binding.to_owned()),
            value if crate::contains_variable(value) => return Err(invalid(format!(
                "argument `{arg_name}` nests a `$` reference; references must be the \
                whole argument value",
            ))),
            value => ScopedExpr::Literal(value.clone()),
        };
        component.arguments.push((arg_name.to_owned(), expr));
    }

    Ok(component)
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SelectionPathParseError {
    #[error("Path component #{index} is empty")]
    EmptyComponent {
        index: usize,
    },

    #[error("Invalid path component `{component}`: {reason}")]
    InvalidComponent {
        component: String,
        reason: String,
    },

    #[error("Unbalanced delimiter at byte offset {offset}")]
    UnbalancedDelimiter {
        offset: usize,
    },

    #[error("Unterminated string literal")]
    UnterminatedString,
}
