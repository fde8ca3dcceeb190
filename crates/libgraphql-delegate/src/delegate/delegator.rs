use crate::annotation::DelegationConfig;
use crate::annotation::FieldDelegation;
use crate::delegate::unwrap_result;
use crate::delegate::DelegationError;
use crate::delegate::FieldContext;
use crate::delegate::GraphQLError;
use crate::delegate::NextStage;
use crate::delegate::RemoteExecutionOutcome;
use crate::delegate::RemoteExecutor;
use crate::extract::remote_operation_kind;
use crate::extract::FieldExtractor;
use crate::materialize::IdentityInputRewriter;
use crate::materialize::InputObjectRewriter;
use crate::materialize::VariableMaterializer;
use crate::request::RemoteQuery;
use crate::request::RemoteQueryRequest;
use crate::request::AUTO_GENERATED_PROPERTY;
use crate::schema::RemoteSchemaRegistry;
use crate::OperationKind;
use serde_json::Value as JsonValue;
use std::sync::Arc;

type Result<T> = std::result::Result<T, DelegationError>;

/// What [`Delegator::process_field()`] did with a field.
#[derive(Clone, Debug, PartialEq)]
pub enum DelegationOutcome {
    /// The field has no delegation; the context was left untouched.
    NotDelegated,

    /// The field's value was fetched from its remote schema. `remote_errors`
    /// errors reported by the remote schema were re-reported on the field.
    Delegated {
        remote_errors: usize,
    },

    /// Delegation failed. The field's value was set to `null` and the error
    /// was reported at the field's response path.
    Failed(DelegationError),
}

/// Answers delegated gateway fields by querying their remote schemas.
///
/// Every collaborator is read-only once the delegator is built, so one
/// delegator serves any number of concurrent fields.
#[derive(Clone)]
pub struct Delegator {
    config: Arc<DelegationConfig>,
    executor: Arc<dyn RemoteExecutor>,
    extractor: FieldExtractor,
    input_rewriter: Arc<dyn InputObjectRewriter>,
    remote_schemas: Arc<RemoteSchemaRegistry>,
}
impl Delegator {
    pub fn config(&self) -> &DelegationConfig {
        &self.config
    }

    pub fn new(
        config: Arc<DelegationConfig>,
        remote_schemas: Arc<RemoteSchemaRegistry>,
        executor: Arc<dyn RemoteExecutor>,
    ) -> Self {
        Self {
            config,
            executor,
            extractor: FieldExtractor::new(),
            input_rewriter: Arc::new(IdentityInputRewriter),
            remote_schemas,
        }
    }

    /// Build the remote request for a delegated field without executing it.
    pub fn plan_request(
        &self,
        ctx: &FieldContext<'_>,
        delegation: &FieldDelegation,
    ) -> Result<RemoteQueryRequest> {
        let schema_name = delegation.target_schema();
        let remote_schema =
            self.remote_schemas
                .get(schema_name)
                .ok_or_else(|| DelegationError::UnknownRemoteSchema {
                    schema_name: schema_name.to_string(),
                })?;

        let operation_kind = remote_operation_kind(
            self.config.gateway_schema(),
            ctx.parent_type(),
            OperationKind::of(ctx.operation()),
        );

        let extracted =
            self.extractor.extract_field(ctx.document(), ctx.operation(), ctx.field())?;

        let variables =
            VariableMaterializer::new(schema_name, remote_schema, self.input_rewriter.as_ref())
                .materialize(
                    operation_kind,
                    delegation.selection_path(),
                    ctx.scope(),
                    &extracted,
                    ctx.request_variables(),
                )?;

        let document = RemoteQuery {
            extracted: &extracted,
            operation_kind,
            selection_path: delegation.selection_path(),
            variables: &variables,
        }.build_document();

        Ok(
            RemoteQueryRequest::new(document, variables.to_json_values())
                .with_property(AUTO_GENERATED_PROPERTY, JsonValue::Bool(true)),
        )
    }

    /// Resolve `ctx`'s field through its remote schema if it is delegated,
    /// then run `next`.
    ///
    /// `next` runs exactly once whatever the outcome. Failures never
    /// propagate out of this call: they are recorded on `ctx` as described
    /// by [`DelegationOutcome::Failed`].
    pub async fn process_field(
        &self,
        ctx: &mut FieldContext<'_>,
        next: &dyn NextStage,
    ) -> DelegationOutcome {
        let outcome = self.delegate_field(ctx).await;
        next.run(ctx).await;
        outcome
    }

    pub fn remote_schemas(&self) -> &RemoteSchemaRegistry {
        &self.remote_schemas
    }

    pub fn with_extractor(mut self, extractor: FieldExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_input_rewriter(
        mut self,
        input_rewriter: impl InputObjectRewriter + 'static,
    ) -> Self {
        self.input_rewriter = Arc::new(input_rewriter);
        self
    }

    async fn delegate_field(&self, ctx: &mut FieldContext<'_>) -> DelegationOutcome {
        let field_name = ctx.field().name.as_str();
        let Some(delegation) = self.config.lookup_annotation(ctx.parent_type(), field_name) else {
            log::debug!("[NoAnnotation] `{}.{field_name}` is not delegated.", ctx.parent_type());
            return DelegationOutcome::NotDelegated;
        };

        let outcome = match self.run_delegation(ctx, delegation).await {
            Ok(remote_errors) => DelegationOutcome::Delegated { remote_errors },
            Err(err) => {
                log::warn!(
                    "Delegating `{}` to `{}` failed: {err}",
                    ctx.response_path(),
                    delegation.target_schema(),
                );
                let path = ctx.response_path().clone();
                ctx.set_result(JsonValue::Null);
                ctx.report_error(GraphQLError::at_path(err.to_string(), path));
                DelegationOutcome::Failed(err)
            },
        };
        log::debug!("[Completed] `{}`.", ctx.response_path());
        outcome
    }

    async fn run_delegation(
        &self,
        ctx: &mut FieldContext<'_>,
        delegation: &FieldDelegation,
    ) -> Result<usize> {
        let schema_name = delegation.target_schema();

        log::debug!("[BuildingRequest] `{}` -> `{schema_name}`.", ctx.response_path());
        let request = self.plan_request(ctx, delegation)?;

        log::debug!("[Executing] `{schema_name}`:\n{}", request.document_source());
        let outcome =
            self.executor
                .execute(schema_name, request)
                .await
                .map_err(|source| DelegationError::Execution {
                    schema_name: schema_name.to_string(),
                    source,
                })?;
        let result = match outcome {
            RemoteExecutionOutcome::Response(result) => result,
            RemoteExecutionOutcome::Stream(_) =>
                return Err(DelegationError::UnsupportedResultShape {
                    schema_name: schema_name.to_string(),
                }),
        };
        ctx.scope_mut().set_serving_schema(schema_name);

        log::debug!("[ExtractingResult] `{}`.", ctx.response_path());
        let value = unwrap_result(result.data.as_ref(), delegation.selection_path().len());

        // Remote errors are reported even when the data could not be used.
        log::debug!(
            "[ReportingErrors] {} remote error(s) for `{}`.",
            result.errors.len(),
            ctx.response_path(),
        );
        let caller_path = ctx.response_path().clone();
        let remote_errors = result.errors.len();
        for remote_error in result.errors {
            ctx.report_error(GraphQLError::from_remote(remote_error, &caller_path));
        }

        ctx.set_result(value?);
        Ok(remote_errors)
    }
}
impl std::fmt::Debug for Delegator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delegator")
            .field("config", &self.config)
            .field("extractor", &self.extractor)
            .field("input_rewriter", &self.input_rewriter)
            .field("remote_schemas", &self.remote_schemas)
            .finish_non_exhaustive()
    }
}
