use crate::ast;
use crate::extract::ExtractedField;
use crate::extract::rewrite_hook::prune_selections;
use crate::extract::SelectionRewriteHook;
use crate::schema::SchemaCatalog;
use crate::value::collect_variable_names;
use crate::OperationKind;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

type Result<T> = std::result::Result<T, ExtractionError>;

/// Extracts the part of a caller's document that a delegated field needs,
/// applying the registered [`SelectionRewriteHook`]s along the way.
///
/// The hook list is fixed once the extractor is built, so one extractor can
/// be shared by any number of concurrent delegations.
#[derive(Clone, Debug, Default)]
pub struct FieldExtractor {
    hooks: Vec<Arc<dyn SelectionRewriteHook>>,
}
impl FieldExtractor {
    /// Produce the [`ExtractedField`] for `field`, a selection inside
    /// `operation` of `document`.
    ///
    /// Hooks are applied first, so variables and fragments used only by
    /// selections that a hook removed are not carried over.
    pub fn extract_field(
        &self,
        document: &ast::query::Document,
        operation: &ast::query::OperationDefinition,
        field: &ast::query::Field,
    ) -> Result<ExtractedField> {
        let mut selection =
            self.hooks
                .iter()
                .fold(field.clone(), |field, hook| hook.rewrite_field(field));

        let mut fragments = IndexMap::new();
        self.collect_fragments(document, &selection.selection_set, &mut fragments)?;

        drop_emptied_fragments(&mut selection, &mut fragments);
        if !field.selection_set.items.is_empty() && selection.selection_set.items.is_empty() {
            return Err(ExtractionError::EmptySelection {
                field_name: field.name.to_owned(),
            });
        }

        let mut used_variable_names = vec![];
        collect_field_variables(&selection, &mut used_variable_names);
        for fragment in fragments.values() {
            collect_directive_variables(&fragment.directives, &mut used_variable_names);
            collect_selection_set_variables(&fragment.selection_set, &mut used_variable_names);
        }

        let declared_variables = operation_variable_definitions(operation);
        let declared_names: HashSet<&str> =
            declared_variables.iter().map(|var_def| var_def.name.as_str()).collect();
        if let Some(undeclared) = used_variable_names.iter().find(
            |name| !declared_names.contains(name.as_str()),
        ) {
            return Err(ExtractionError::UndeclaredVariable {
                variable_name: undeclared.to_owned(),
            });
        }

        let used_variable_names: HashSet<&str> =
            used_variable_names.iter().map(String::as_str).collect();
        let referenced_variables =
            declared_variables
                .iter()
                .filter(|var_def| used_variable_names.contains(var_def.name.as_str()))
                .cloned()
                .collect();

        Ok(ExtractedField {
            fragments: fragments.into_values().collect(),
            referenced_variables,
            selection,
        })
    }

    pub fn hooks(&self) -> &[Arc<dyn SelectionRewriteHook>] {
        self.hooks.as_slice()
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook to run after every previously registered hook.
    pub fn with_hook(mut self, hook: impl SelectionRewriteHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    fn collect_fragments(
        &self,
        document: &ast::query::Document,
        selection_set: &ast::query::SelectionSet,
        fragments: &mut IndexMap<String, ast::query::FragmentDefinition>,
    ) -> Result<()> {
        let mut spread_names = vec![];
        collect_spread_names(selection_set, &mut spread_names);

        for fragment_name in spread_names {
            if fragments.contains_key(&fragment_name) {
                continue
            }

            let fragment =
                find_fragment(document, &fragment_name)
                    .ok_or_else(|| ExtractionError::UndefinedFragment {
                        fragment_name: fragment_name.to_owned(),
                    })?;
            let fragment =
                self.hooks
                    .iter()
                    .fold(fragment.clone(), |frag, hook| hook.rewrite_fragment(frag));

            // Registered before descending so that cyclic spreads terminate.
            let nested_selection_set = fragment.selection_set.clone();
            fragments.insert(fragment_name, fragment);
            self.collect_fragments(document, &nested_selection_set, fragments)?;
        }

        Ok(())
    }
}

/// The operation kind to use for a remote operation delegated from a field
/// of `parent_type`.
///
/// Fields of a root operation type keep the caller's operation kind. Any
/// nested field delegates as a query: a nested field cannot delegate a
/// mutation.
pub fn remote_operation_kind(
    gateway_schema: &SchemaCatalog,
    parent_type: &str,
    caller_kind: OperationKind,
) -> OperationKind {
    if gateway_schema.root_operation_kind(parent_type).is_some() {
        caller_kind
    } else {
        OperationKind::Query
    }
}

/// Remove fragment definitions that hooks left without selections, along
/// with every spread of them, until no emptied fragment remains. Fragments
/// that are no longer spread anywhere are removed as well.
fn drop_emptied_fragments(
    selection: &mut ast::query::Field,
    fragments: &mut IndexMap<String, ast::query::FragmentDefinition>,
) {
    use ast::query::Selection;
    loop {
        let emptied: HashSet<String> =
            fragments.iter()
                .filter(|(_, fragment)| fragment.selection_set.items.is_empty())
                .map(|(name, _)| name.to_owned())
                .collect();
        if emptied.is_empty() {
            break
        }
        log::debug!("Dropping fragments emptied by rewrite hooks: {emptied:?}.");

        fragments.retain(|name, _| !emptied.contains(name));
        let keep = |selection: &Selection| match selection {
            Selection::FragmentSpread(spread) => !emptied.contains(&spread.fragment_name),
            _ => true,
        };
        prune_selections(&mut selection.selection_set, &keep);
        for fragment in fragments.values_mut() {
            prune_selections(&mut fragment.selection_set, &keep);
        }
    }

    let mut reachable = HashSet::new();
    let mut pending = vec![];
    collect_spread_names(&selection.selection_set, &mut pending);
    while let Some(fragment_name) = pending.pop() {
        if let Some(fragment) = fragments.get(&fragment_name)
            && reachable.insert(fragment_name) {
            collect_spread_names(&fragment.selection_set, &mut pending);
        }
    }
    fragments.retain(|name, _| reachable.contains(name));
}

fn find_fragment<'doc>(
    document: &'doc ast::query::Document,
    fragment_name: &str,
) -> Option<&'doc ast::query::FragmentDefinition> {
    document.definitions.iter().find_map(|def| match def {
        ast::query::Definition::Fragment(frag) if frag.name == fragment_name => Some(frag),
        _ => None,
    })
}

pub(crate) fn operation_variable_definitions(
    operation: &ast::query::OperationDefinition,
) -> &[ast::query::VariableDefinition] {
    use ast::query::OperationDefinition as Op;
    match operation {
        Op::SelectionSet(_) => &[],
        Op::Query(query) => query.variable_definitions.as_slice(),
        Op::Mutation(mutation) => mutation.variable_definitions.as_slice(),
        Op::Subscription(subscription) => subscription.variable_definitions.as_slice(),
    }
}

fn collect_spread_names(selection_set: &ast::query::SelectionSet, out: &mut Vec<String>) {
    use ast::query::Selection;
    for selection in &selection_set.items {
        match selection {
            Selection::Field(field) =>
                collect_spread_names(&field.selection_set, out),
            Selection::FragmentSpread(spread) =>
                out.push(spread.fragment_name.to_owned()),
            Selection::InlineFragment(inline) =>
                collect_spread_names(&inline.selection_set, out),
        }
    }
}

fn collect_directive_variables(directives: &[ast::query::Directive], out: &mut Vec<String>) {
    for directive in directives {
        for (_, value) in &directive.arguments {
            collect_variable_names(value, out);
        }
    }
}

fn collect_field_variables(field: &ast::query::Field, out: &mut Vec<String>) {
    for (_, value) in &field.arguments {
        collect_variable_names(value, out);
    }
    collect_directive_variables(&field.directives, out);
    collect_selection_set_variables(&field.selection_set, out);
}

fn collect_selection_set_variables(
    selection_set: &ast::query::SelectionSet,
    out: &mut Vec<String>,
) {
    use ast::query::Selection;
    for selection in &selection_set.items {
        match selection {
            Selection::Field(field) => collect_field_variables(field, out),
            Selection::FragmentSpread(spread) =>
                collect_directive_variables(&spread.directives, out),
            Selection::InlineFragment(inline) => {
                collect_directive_variables(&inline.directives, out);
                collect_selection_set_variables(&inline.selection_set, out);
            },
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ExtractionError {
    #[error("Every sub-selection of the delegated field `{field_name}` was removed by rewrite hooks")]
    EmptySelection {
        field_name: String,
    },

    #[error("Variable `${variable_name}` is used by the delegated field but not declared by the operation")]
    UndeclaredVariable {
        variable_name: String,
    },

    #[error("Fragment `{fragment_name}` is spread by the delegated field but not defined in the document")]
    UndefinedFragment {
        fragment_name: String,
    },
}
