use crate::ast;
use crate::delegate::ResponsePath;
use crate::schema::SchemaCatalog;
use crate::scope::ExecutionScope;
use crate::scope::ScopeFrame;
use crate::ast_value_to_json;
use crate::OperationKind;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::collections::HashSet;
use thiserror::Error;

type Result<T> = std::result::Result<T, LocateFieldError>;

/// A field found inside a caller's operation, with the state a host would
/// have built up while resolving down to it.
///
/// When the operation selects the same response key more than once, `field`
/// is the first of those selections with all of their sub-selections merged
/// into it.
#[derive(Clone, Debug, PartialEq)]
pub struct LocatedField<'doc> {
    pub field: Cow<'doc, ast::query::Field>,
    pub parent_type: String,
    pub response_path: ResponsePath,
    pub scope: ExecutionScope,
}

/// Pick the operation to run from `document`.
///
/// Without an `operation_name` the document must contain exactly one
/// operation.
pub fn select_operation<'doc>(
    document: &'doc ast::query::Document,
    operation_name: Option<&str>,
) -> Result<&'doc ast::query::OperationDefinition> {
    let mut operations = document.definitions.iter().filter_map(|def| match def {
        ast::query::Definition::Operation(op) => Some(op),
        ast::query::Definition::Fragment(_) => None,
    });

    match operation_name {
        Some(name) => operations
            .find(|op| operation_name_of(op) == Some(name))
            .ok_or_else(|| LocateFieldError::OperationNotFound {
                operation_name: name.to_string(),
            }),

        None => match (operations.next(), operations.next()) {
            (Some(op), None) => Ok(op),
            (None, _) => Err(LocateFieldError::NoOperations),
            (Some(_), Some(_)) => Err(LocateFieldError::AmbiguousOperation),
        },
    }
}

/// Walk `operation` along `field_path` (response keys separated by `.`,
/// with numeric segments standing for list indices) and return the field
/// it ends at.
///
/// Field lookups descend into inline fragments and fragment spreads, and
/// follow every selection that shares a response key the way GraphQL field
/// merging does. Each field on the way contributes one [`ScopeFrame`]
/// holding its argument values, with `variables` substituted and the
/// gateway schema's argument defaults filled in.
pub fn locate_field<'doc>(
    gateway_schema: &SchemaCatalog,
    document: &'doc ast::query::Document,
    operation: &'doc ast::query::OperationDefinition,
    field_path: &str,
    variables: &JsonMap<String, JsonValue>,
) -> Result<LocatedField<'doc>> {
    let operation_kind = OperationKind::of(operation);
    let mut current_type =
        gateway_schema
            .root_type_name(operation_kind)
            .ok_or(LocateFieldError::UndefinedRootType { operation_kind })?
            .to_string();
    let mut selection_sets = vec![operation_selection_set(operation)];
    let mut response_path = ResponsePath::root();
    let mut scope = ExecutionScope::new();
    let mut located: Option<(&'doc ast::query::Field, Vec<&'doc ast::query::Field>, String)> = None;

    for segment in field_path.split('.').map(str::trim) {
        if segment.is_empty() {
            return Err(LocateFieldError::EmptyPathSegment {
                field_path: field_path.to_string(),
            });
        }
        if let Ok(index) = segment.parse::<usize>() {
            if located.is_none() {
                return Err(LocateFieldError::EmptyPathSegment {
                    field_path: field_path.to_string(),
                });
            }
            response_path.push_index(index);
            continue
        }

        let mut visited = HashSet::new();
        let mut matches = vec![];
        for &selection_set in &selection_sets {
            collect_fields(
                document,
                selection_set,
                &current_type,
                segment,
                &mut visited,
                &mut matches,
            )?;
        }
        let Some((field, parent_type)) = matches.first().cloned() else {
            return Err(LocateFieldError::FieldNotSelected {
                response_key: segment.to_string(),
                response_path: response_path.to_string(),
            });
        };

        let field_def =
            gateway_schema
                .composite_type(&parent_type)
                .and_then(|composite| composite.field(&field.name))
                .ok_or_else(|| LocateFieldError::FieldNotDefined {
                    field_name: field.name.to_owned(),
                    type_name: parent_type.to_owned(),
                })?;

        let mut frame = ScopeFrame::new(field.name.as_str());
        for (arg_name, arg_value) in &field.arguments {
            frame = frame.with_argument(arg_name.as_str(), ast_value_to_json(arg_value, variables));
        }
        for (arg_name, arg_def) in field_def.arguments() {
            let provided = field.arguments.iter().any(|(name, _)| name == arg_name);
            if let (false, Some(default_value)) = (provided, arg_def.default_value()) {
                frame = frame.with_argument(
                    arg_name.as_str(),
                    ast_value_to_json(default_value, variables),
                );
            }
        }
        log::trace!(
            "Entered `{parent_type}.{}` at `{segment}` ({} selection(s)).",
            field.name,
            matches.len(),
        );
        scope.push_frame(frame);

        response_path.push_key(segment);
        current_type = field_def.named_type().to_string();
        selection_sets = matches.iter().map(|&(field, _)| &field.selection_set).collect();
        let merged = matches.iter().skip(1).map(|&(field, _)| field).collect();
        located = Some((field, merged, parent_type));
    }

    let Some((field, merged, parent_type)) = located else {
        return Err(LocateFieldError::EmptyPathSegment {
            field_path: field_path.to_string(),
        });
    };

    Ok(LocatedField {
        field: merge_fields(field, &merged),
        parent_type,
        response_path,
        scope,
    })
}

/// Collect every field selected under `response_key`, each with the type it
/// is selected on, in document order.
fn collect_fields<'doc>(
    document: &'doc ast::query::Document,
    selection_set: &'doc ast::query::SelectionSet,
    type_name: &str,
    response_key: &str,
    visited_fragments: &mut HashSet<&'doc str>,
    out: &mut Vec<(&'doc ast::query::Field, String)>,
) -> Result<()> {
    use ast::query::Selection;
    use ast::query::TypeCondition;

    for selection in &selection_set.items {
        match selection {
            Selection::Field(field) => {
                let key = field.alias.as_ref().unwrap_or(&field.name);
                if key == response_key {
                    out.push((field, type_name.to_string()));
                }
            },

            Selection::InlineFragment(inline) => {
                let inline_type = match &inline.type_condition {
                    Some(TypeCondition::On(name)) => name.as_str(),
                    None => type_name,
                };
                collect_fields(
                    document,
                    &inline.selection_set,
                    inline_type,
                    response_key,
                    visited_fragments,
                    out,
                )?;
            },

            Selection::FragmentSpread(spread) => {
                if !visited_fragments.insert(spread.fragment_name.as_str()) {
                    continue
                }
                let fragment =
                    document.definitions
                        .iter()
                        .find_map(|def| match def {
                            ast::query::Definition::Fragment(frag)
                                if frag.name == spread.fragment_name => Some(frag),
                            _ => None,
                        })
                        .ok_or_else(|| LocateFieldError::UndefinedFragment {
                            fragment_name: spread.fragment_name.to_owned(),
                        })?;
                let TypeCondition::On(fragment_type) = &fragment.type_condition;
                collect_fields(
                    document,
                    &fragment.selection_set,
                    fragment_type.as_str(),
                    response_key,
                    visited_fragments,
                    out,
                )?;
            },
        }
    }

    Ok(())
}

/// Append the sub-selections of `rest` to a copy of `first`. The arguments
/// and directives of `first` are kept.
fn merge_fields<'doc>(
    first: &'doc ast::query::Field,
    rest: &[&'doc ast::query::Field],
) -> Cow<'doc, ast::query::Field> {
    if rest.is_empty() {
        return Cow::Borrowed(first);
    }
    let mut merged = first.clone();
    for field in rest {
        merged.selection_set.items.extend(field.selection_set.items.iter().cloned());
    }
    Cow::Owned(merged)
}

fn operation_name_of(operation: &ast::query::OperationDefinition) -> Option<&str> {
    use ast::query::OperationDefinition as Op;
    match operation {
        Op::SelectionSet(_) => None,
        Op::Query(query) => query.name.as_deref(),
        Op::Mutation(mutation) => mutation.name.as_deref(),
        Op::Subscription(subscription) => subscription.name.as_deref(),
    }
}

fn operation_selection_set(
    operation: &ast::query::OperationDefinition,
) -> &ast::query::SelectionSet {
    use ast::query::OperationDefinition as Op;
    match operation {
        Op::SelectionSet(selection_set) => selection_set,
        Op::Query(query) => &query.selection_set,
        Op::Mutation(mutation) => &mutation.selection_set,
        Op::Subscription(subscription) => &subscription.selection_set,
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum LocateFieldError {
    #[error("The document has more than one operation; an operation name is required")]
    AmbiguousOperation,

    #[error("Field path `{field_path}` must start with a field and contain no empty segments")]
    EmptyPathSegment {
        field_path: String,
    },

    #[error("Field `{field_name}` is not defined on gateway type `{type_name}`")]
    FieldNotDefined {
        field_name: String,
        type_name: String,
    },

    #[error("No field is selected as `{response_key}` under `{response_path}`")]
    FieldNotSelected {
        response_key: String,
        response_path: String,
    },

    #[error("The document has no operations")]
    NoOperations,

    #[error("No operation named `{operation_name}` in the document")]
    OperationNotFound {
        operation_name: String,
    },

    #[error("Fragment `{fragment_name}` is spread but not defined in the document")]
    UndefinedFragment {
        fragment_name: String,
    },

    #[error("The gateway schema has no {operation_kind} root type")]
    UndefinedRootType {
        operation_kind: OperationKind,
    },
}
