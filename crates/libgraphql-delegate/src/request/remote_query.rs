use crate::ast;
use crate::extract::ExtractedField;
use crate::path::SelectionPath;
use crate::scope::VariableSet;
use crate::OperationKind;
use indexmap::IndexSet;

/// Everything needed to assemble the document of a remote request.
///
/// Building is a pure function of these inputs: the same inputs always
/// produce structurally identical documents.
#[derive(Clone, Copy, Debug)]
pub struct RemoteQuery<'a> {
    pub extracted: &'a ExtractedField,
    pub operation_kind: OperationKind,
    pub selection_path: &'a SelectionPath,
    pub variables: &'a VariableSet,
}
impl RemoteQuery<'_> {
    /// Assemble the operation document.
    ///
    /// The extracted selection is wrapped in one synthetic field per path
    /// component: the last component sits directly around the selection and
    /// the first component becomes the operation's top-level field. One
    /// variable definition is emitted per entry in `variables`, followed by
    /// the carried-over fragment definitions.
    pub fn build_document(&self) -> ast::query::Document {
        let pos = ast::synthetic_pos();

        let mut selection = ast::query::Selection::Field(self.extracted.selection().clone());
        for component in self.selection_path.components().iter().rev() {
            selection = ast::query::Selection::Field(ast::query::Field {
                position: pos,
                alias: None,
                name: component.name().to_string(),
                arguments: component.arguments()
                    .iter()
                    .map(|(arg_name, expr)| (arg_name.to_owned(), expr.to_ast_value()))
                    .collect(),
                directives: vec![],
                selection_set: ast::query::SelectionSet {
                    span: (pos, pos),
                    items: vec![selection],
                },
            });
        }

        let selection_set = ast::query::SelectionSet {
            span: (pos, pos),
            items: vec![selection],
        };

        let variable_definitions: Vec<ast::query::VariableDefinition> =
            self.variables
                .iter()
                .map(|variable| ast::query::VariableDefinition {
                    position: pos,
                    name: variable.name().to_string(),
                    var_type: variable.declared_type().clone(),
                    default_value: variable.default_value().cloned(),
                })
                .collect();

        let operation = match self.operation_kind {
            OperationKind::Mutation =>
                ast::query::OperationDefinition::Mutation(ast::query::Mutation {
                    position: pos,
                    name: None,
                    variable_definitions,
                    directives: vec![],
                    selection_set,
                }),

            OperationKind::Query =>
                ast::query::OperationDefinition::Query(ast::query::Query {
                    position: pos,
                    name: None,
                    variable_definitions,
                    directives: vec![],
                    selection_set,
                }),

            OperationKind::Subscription =>
                ast::query::OperationDefinition::Subscription(ast::query::Subscription {
                    position: pos,
                    name: None,
                    variable_definitions,
                    directives: vec![],
                    selection_set,
                }),
        };

        let mut definitions = vec![ast::query::Definition::Operation(operation)];
        definitions.extend(
            self.extracted
                .fragments()
                .iter()
                .cloned()
                .map(ast::query::Definition::Fragment),
        );

        ast::query::Document { definitions }
    }
}

/// Names of every variable the built document will reference: the scope
/// bindings used by the path followed by the caller variables used by the
/// extracted selection.
pub fn referenced_variable_names(
    selection_path: &SelectionPath,
    extracted: &ExtractedField,
) -> IndexSet<String> {
    selection_path
        .context_bindings()
        .into_iter()
        .map(str::to_string)
        .chain(
            extracted.referenced_variables()
                .iter()
                .map(|var_def| var_def.name.to_owned()),
        )
        .collect()
}
