use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::gateway::backend::{BackendError, ProvisionBackend, ResourceId};
use crate::gateway::operation::{Operation, OperationId, OperationKind};
use crate::gateway::plan::GatewayPlan;

/// The activation label baked into returned invocation URLs.
pub const INVOKE_STAGE: &str = "prod";

/// Opaque per-run token attached to the deployment so the platform treats
/// every orchestration run as a fresh activation, even when no declared
/// input changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActivationToken(String);

impl ActivationToken {
    pub fn fresh() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("operation {operation} failed; deployment was not attempted: {source}")]
    DependencyFailed {
        operation: OperationId,
        #[source]
        source: BackendError,
    },
    #[error("publish failed: {0}")]
    Backend(#[from] BackendError),
}

/// Everything a caller needs after a successful publish: the public
/// invocation URL plus the identifiers of every created resource, for
/// inspection and reconciliation by a future run.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub invoke_url: String,
    pub api_id: ResourceId,
    pub routes: Vec<OperationId>,
    pub bindings: Vec<OperationId>,
    pub grants: Vec<OperationId>,
    pub deployment: OperationId,
    pub activation_token: String,
}

/// Submits a built plan to the provisioning backend and requests one
/// atomic activation gated on the entire operation set.
pub struct PublishOrchestrator<B> {
    backend: B,
    region: String,
}

impl<B: ProvisionBackend> PublishOrchestrator<B> {
    pub fn new(backend: B, region: impl Into<String>) -> Self {
        Self {
            backend,
            region: region.into(),
        }
    }

    /// Publish with a freshly generated activation token.
    pub async fn publish(&self, plan: &GatewayPlan) -> Result<PublishOutcome, PublishError> {
        self.publish_with_token(plan, ActivationToken::fresh()).await
    }

    /// Submit every creation operation, then a deployment depending on all
    /// of them, then the stage. The first creation failure aborts the run
    /// before the deployment is issued; a partial routing configuration is
    /// never activated.
    pub async fn publish_with_token(
        &self,
        plan: &GatewayPlan,
        token: ActivationToken,
    ) -> Result<PublishOutcome, PublishError> {
        tracing::info!("publishing gateway {} to {}", plan.api_name, self.region);

        let api_operation = plan.api_operation();
        let api_id = self.apply_creation(&api_operation).await?;

        let mut completed = vec![api_operation.id];
        for operation in plan.operations() {
            self.apply_creation(&operation).await?;
            completed.push(operation.id);
        }

        // Deployment depends on the full creation closure; anything that
        // failed above already aborted the run.
        let deployment_id = OperationId::new(format!("{}-deployment", plan.api_name));
        let deployment = Operation {
            id: deployment_id.clone(),
            kind: OperationKind::Deployment {
                activation_token: token.to_string(),
            },
            depends_on: completed,
        };
        self.backend.apply(&deployment).await?;

        let stage = Operation {
            id: OperationId::new(format!("{}-stage", plan.api_name)),
            kind: OperationKind::Stage {
                stage_name: plan.stage_name.clone(),
                deployment: deployment_id.clone(),
            },
            depends_on: vec![deployment_id.clone()],
        };
        self.backend.apply(&stage).await?;

        let invoke_url = invoke_url(&api_id, &self.region);
        tracing::info!("gateway {} published at {}", plan.api_name, invoke_url);

        Ok(PublishOutcome {
            invoke_url,
            api_id,
            routes: plan.route_ids(),
            bindings: plan.binding_ids(),
            grants: plan.grant_ids(),
            deployment: deployment_id,
            activation_token: token.to_string(),
        })
    }

    async fn apply_creation(&self, operation: &Operation) -> Result<ResourceId, PublishError> {
        tracing::debug!("submitting {} {}", operation.kind.label(), operation.id);
        self.backend
            .apply(operation)
            .await
            .map_err(|source| PublishError::DependencyFailed {
                operation: operation.id.clone(),
                source,
            })
    }
}

/// Public invocation address: routing-system identifier + region + the
/// fixed activation label.
pub fn invoke_url(api_id: &ResourceId, region: &str) -> String {
    format!(
        "https://{}.execute-api.{}.amazonaws.com/{}",
        api_id.as_str(),
        region,
        INVOKE_STAGE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_tokens_are_distinct_across_runs() {
        assert_ne!(ActivationToken::fresh(), ActivationToken::fresh());
    }

    #[test]
    fn invoke_url_combines_id_region_and_label() {
        let url = invoke_url(&ResourceId::new("abc123"), "eu-west-1");
        assert_eq!(url, "https://abc123.execute-api.eu-west-1.amazonaws.com/prod");
    }
}
