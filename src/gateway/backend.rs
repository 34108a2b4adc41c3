use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::gateway::operation::Operation;

/// Physical identifier assigned by the provisioning platform once an
/// operation has been accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("invalid provisioning backend url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("provisioning request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provisioning backend rejected {operation}: {status} {message}")]
    Rejected {
        operation: String,
        status: u16,
        message: String,
    },
    #[error("provisioning backend returned an invalid response for {operation}: {message}")]
    InvalidResponse { operation: String, message: String },
}

/// External provisioning engine. Implementations must honor the
/// `depends_on` edges declared on each operation; the orchestrator only
/// declares them, it never schedules execution itself.
#[async_trait]
pub trait ProvisionBackend: Send + Sync {
    /// Submit one creation operation. Returns the physical resource id
    /// assigned by the platform.
    async fn apply(&self, operation: &Operation) -> Result<ResourceId, BackendError>;
}

#[async_trait]
impl<B: ProvisionBackend + ?Sized> ProvisionBackend for &B {
    async fn apply(&self, operation: &Operation) -> Result<ResourceId, BackendError> {
        (**self).apply(operation).await
    }
}

/// Hosted provisioning engine client: operations are submitted as JSON to
/// `POST {base}/operations` and executed remotely.
#[derive(Debug)]
pub struct RemoteBackend {
    client: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApplyResponse {
    resource_id: String,
}

impl RemoteBackend {
    pub fn new(base_url: &str, access_token: Option<String>) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url).map_err(|source| BackendError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            access_token,
        })
    }

    fn operations_endpoint(&self) -> String {
        format!(
            "{}/operations",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ProvisionBackend for RemoteBackend {
    async fn apply(&self, operation: &Operation) -> Result<ResourceId, BackendError> {
        let mut request = self.client.post(self.operations_endpoint()).json(operation);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Rejected {
                operation: operation.id.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body: ApplyResponse =
            response
                .json()
                .await
                .map_err(|e| BackendError::InvalidResponse {
                    operation: operation.id.to_string(),
                    message: e.to_string(),
                })?;

        tracing::debug!(
            "operation {} accepted as resource {}",
            operation.id,
            body.resource_id
        );
        Ok(ResourceId::new(body.resource_id))
    }
}
