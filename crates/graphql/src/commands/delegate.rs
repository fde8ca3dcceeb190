use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use anyhow::Context;
use libgraphql_delegate::annotation::DelegationConfigBuilder;
use libgraphql_delegate::ast;
use libgraphql_delegate::delegate::locate_field;
use libgraphql_delegate::delegate::select_operation;
use libgraphql_delegate::delegate::RemoteExecutionError;
use libgraphql_delegate::delegate::RemoteExecutionOutcome;
use libgraphql_delegate::extract::FieldExtractor;
use libgraphql_delegate::extract::StripClientFields;
use libgraphql_delegate::file_reader;
use libgraphql_delegate::request::RemoteQueryRequest;
use libgraphql_delegate::schema::RemoteSchemaRegistry;
use libgraphql_delegate::schema::SchemaCatalogBuilder;
use libgraphql_delegate::Delegator;
use libgraphql_delegate::FieldContext;
use libgraphql_delegate::RemoteExecutor;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, clap::Args)]
pub(crate) struct DelegateCmd {
    #[arg(
        help="Path to the caller's GraphQL document.",
        long,
    )]
    document: PathBuf,

    #[arg(
        help="Response path of the delegated field inside the operation, e.g. \
             `user.reviews` (aliases are matched; numeric segments are list \
             indices).",
        long,
        value_name="FIELD_PATH",
    )]
    field: String,

    #[arg(
        help="Path to the gateway schema SDL carrying the delegation \
             directives.",
        long,
    )]
    gateway_schema: PathBuf,

    #[arg(
        help="Name of the operation to use when the document has several.",
        long,
    )]
    operation_name: Option<String>,

    #[arg(
        help="A remote schema the gateway delegates to, as NAME=SDL_PATH. May \
             be given more than once.",
        long="remote-schema",
        required=true,
        value_name="NAME=SDL_PATH",
        value_parser=parse_remote_schema_arg,
    )]
    remote_schemas: Vec<(String, PathBuf)>,

    #[arg(
        help="Drop selections marked `@client` before planning.",
        long,
    )]
    strip_client_fields: bool,

    #[arg(
        help="Path to a JSON file holding the caller's request variables.",
        long,
    )]
    variables: Option<PathBuf>,
}
impl DelegateCmd {
    fn plan(&self) -> anyhow::Result<(String, RemoteQueryRequest)> {
        let config = Arc::new(
            DelegationConfigBuilder::from_file(&self.gateway_schema)
                .and_then(|builder| builder.build())
                .with_context(|| format!(
                    "Failed to load the gateway schema at {:#?}",
                    self.gateway_schema,
                ))?,
        );

        let mut remote_schemas = RemoteSchemaRegistry::new();
        for (schema_name, sdl_path) in &self.remote_schemas {
            let catalog =
                SchemaCatalogBuilder::from_file(sdl_path)
                    .and_then(|builder| builder.build())
                    .with_context(|| format!(
                        "Failed to load remote schema `{schema_name}` from {sdl_path:#?}",
                    ))?;
            log::debug!("Loaded remote schema `{schema_name}` from {sdl_path:#?}.");
            remote_schemas.insert(schema_name.as_str(), catalog);
        }

        let document_source = file_reader::read_content(&self.document)?;
        let document = ast::query::parse(document_source.as_str())
            .with_context(|| format!("Failed to parse {:#?}", self.document))?;

        let variables: JsonMap<String, JsonValue> = match &self.variables {
            Some(path) => serde_json::from_str(file_reader::read_content(path)?.as_str())
                .with_context(|| format!("Failed to parse variables JSON in {path:#?}"))?,
            None => JsonMap::new(),
        };

        let operation = select_operation(&document, self.operation_name.as_deref())?;
        let located = locate_field(
            config.gateway_schema(),
            &document,
            operation,
            self.field.as_str(),
            &variables,
        )?;
        let delegation =
            config.lookup_annotation(&located.parent_type, &located.field.name)
                .with_context(|| format!(
                    "`{}.{}` is not a delegated field",
                    located.parent_type,
                    located.field.name,
                ))?;

        let extractor =
            if self.strip_client_fields {
                FieldExtractor::new().with_hook(StripClientFields::new())
            } else {
                FieldExtractor::new()
            };
        let delegator =
            Delegator::new(Arc::clone(&config), Arc::new(remote_schemas), Arc::new(PlanOnly))
                .with_extractor(extractor);

        let ctx = FieldContext::new(
            &document,
            operation,
            located.parent_type.as_str(),
            located.field,
            &variables,
        )
            .with_response_path(located.response_path.clone())
            .with_scope(located.scope.clone());
        let request = delegator.plan_request(&ctx, delegation)?;

        Ok((delegation.target_schema().to_string(), request))
    }
}

#[inherent::inherent]
impl RunnableCommand for DelegateCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        match self.plan() {
            Ok((schema_name, request)) => match serde_json::to_string_pretty(request.variables()) {
                Ok(variables_json) => CommandResult::stdout(format_args!(
                    "{} Planned request for `{}` against `{schema_name}`:\n\n{}\nvariables: {variables_json}",
                    output_utils::GREEN_CHECK,
                    self.field,
                    request.document_source(),
                )),
                Err(err) => CommandResult::stderr(format_args!(
                    "{} Failed to render variables: {err}",
                    output_utils::RED_X,
                )),
            },

            Err(err) => CommandResult::stderr(format_args!(
                "{} {err:#}",
                output_utils::RED_X,
            )),
        }
    }
}

/// Delegator collaborator for a command that only plans requests.
struct PlanOnly;
#[async_trait::async_trait]
impl RemoteExecutor for PlanOnly {
    async fn execute(
        &self,
        schema_name: &str,
        _request: RemoteQueryRequest,
    ) -> Result<RemoteExecutionOutcome, RemoteExecutionError> {
        Err(RemoteExecutionError::UnknownSchema {
            schema_name: schema_name.to_string(),
        })
    }
}

fn parse_remote_schema_arg(arg: &str) -> Result<(String, PathBuf), String> {
    let Some((schema_name, sdl_path)) = arg.split_once('=') else {
        return Err(format!("expected NAME=SDL_PATH, found `{arg}`"));
    };
    let schema_name = schema_name.trim();
    if schema_name.is_empty() || sdl_path.trim().is_empty() {
        return Err(format!("expected NAME=SDL_PATH, found `{arg}`"));
    }
    Ok((schema_name.to_string(), PathBuf::from(sdl_path.trim())))
}
