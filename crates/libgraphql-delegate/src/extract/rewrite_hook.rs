use crate::ast;

/// A transformation applied to an extracted selection before it is embedded
/// into a remote operation.
///
/// Hooks run in registration order; each receives the output of the previous
/// one.
pub trait SelectionRewriteHook: std::fmt::Debug + Send + Sync {
    fn rewrite_field(&self, field: ast::query::Field) -> ast::query::Field;

    fn rewrite_fragment(
        &self,
        fragment: ast::query::FragmentDefinition,
    ) -> ast::query::FragmentDefinition {
        fragment
    }
}

/// Removes every selection marked with a client-only directive (`@client` by
/// default) so it is never sent to a remote schema.
#[derive(Clone, Debug)]
pub struct StripClientFields {
    directive_name: String,
}
impl StripClientFields {
    pub fn new() -> Self {
        Self::with_directive_name("client")
    }

    pub fn with_directive_name(directive_name: impl Into<String>) -> Self {
        Self {
            directive_name: directive_name.into(),
        }
    }

    fn is_client_only(&self, selection: &ast::query::Selection) -> bool {
        use ast::query::Selection;
        let directives = match selection {
            Selection::Field(field) => &field.directives,
            Selection::FragmentSpread(spread) => &spread.directives,
            Selection::InlineFragment(inline) => &inline.directives,
        };
        directives.iter().any(|d| d.name == self.directive_name)
    }

    fn strip(&self, selection_set: &mut ast::query::SelectionSet) {
        prune_selections(
            selection_set,
            &|selection: &ast::query::Selection| !self.is_client_only(selection),
        );
    }
}
impl Default for StripClientFields {
    fn default() -> Self {
        Self::new()
    }
}
impl SelectionRewriteHook for StripClientFields {
    fn rewrite_field(&self, mut field: ast::query::Field) -> ast::query::Field {
        self.strip(&mut field.selection_set);
        field
    }

    fn rewrite_fragment(
        &self,
        mut fragment: ast::query::FragmentDefinition,
    ) -> ast::query::FragmentDefinition {
        self.strip(&mut fragment.selection_set);
        fragment
    }
}

/// Remove every selection in `selection_set` (recursively) that `keep`
/// rejects.
///
/// A field or inline fragment that had sub-selections and is left with none
/// is removed too, since an empty selection set is not valid GraphQL. Leaf
/// fields are untouched.
pub(crate) fn prune_selections(
    selection_set: &mut ast::query::SelectionSet,
    keep: &dyn Fn(&ast::query::Selection) -> bool,
) {
    use ast::query::Selection;
    selection_set.items.retain(|selection| keep(selection));
    selection_set.items.retain_mut(|selection| {
        let nested = match selection {
            Selection::Field(field) => &mut field.selection_set,
            Selection::InlineFragment(inline) => &mut inline.selection_set,
            Selection::FragmentSpread(_) => return true,
        };
        if nested.items.is_empty() {
            return true;
        }
        prune_selections(nested, keep);
        !nested.items.is_empty()
    });
}
