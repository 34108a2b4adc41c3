pub mod file_store;
pub mod http_store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document stored per environment in the side-channel configuration
/// store. The backend-creation run writes it; gateway provisioning runs
/// read it to discover where request traffic should be proxied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentDocument {
    pub backend_address: Option<String>,
    pub region: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("environment store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("environment store returned invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid environment store url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("environment store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("environment store rejected request for {environment}: status {status}")]
    Status { environment: String, status: u16 },
}

/// External key-value configuration store, injected into every consumer.
/// Implementations must treat `read` as an opaque lookup by environment
/// name; absence is not an error.
#[async_trait]
pub trait EnvironmentStore: Send + Sync {
    async fn read(&self, environment: &str) -> Result<Option<EnvironmentDocument>, StoreError>;
    async fn write(
        &self,
        environment: &str,
        document: &EnvironmentDocument,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("backend unavailable for environment {environment:?}: missing {missing}")]
    BackendUnavailable {
        environment: String,
        missing: &'static str,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Where the discovered backend lives: its invocation address and the
/// region the gateway should be published into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTarget {
    pub address: String,
    pub region: String,
}

/// Look up the backend handler for `environment`. Fails fast when the
/// document, the address or the region is absent; the caller decides
/// whether to re-run once the backend-creation side has caught up.
pub async fn discover_backend(
    store: &dyn EnvironmentStore,
    environment: &str,
) -> Result<BackendTarget, DiscoveryError> {
    tracing::info!("fetching backend address and region for environment {}", environment);

    let document = store.read(environment).await?.ok_or_else(|| {
        DiscoveryError::BackendUnavailable {
            environment: environment.to_string(),
            missing: "environment document",
        }
    })?;

    let address = document
        .backend_address
        .filter(|a| !a.is_empty())
        .ok_or_else(|| DiscoveryError::BackendUnavailable {
            environment: environment.to_string(),
            missing: "backend address",
        })?;

    let region = document
        .region
        .filter(|r| !r.is_empty())
        .ok_or_else(|| DiscoveryError::BackendUnavailable {
            environment: environment.to_string(),
            missing: "region",
        })?;

    tracing::debug!("environment {} resolves to {} in {}", environment, address, region);
    Ok(BackendTarget { address, region })
}

/// Record the backend's invocation address for `environment`, writing only
/// when the stored value is missing or different. Returns whether a write
/// happened. Other document fields are preserved on rewrite.
pub async fn sync_backend_address(
    store: &dyn EnvironmentStore,
    environment: &str,
    address: &str,
) -> Result<bool, DiscoveryError> {
    let current = store.read(environment).await?;

    if current.as_ref().and_then(|d| d.backend_address.as_deref()) == Some(address) {
        tracing::info!(
            "backend address for environment {} is up to date, no update required",
            environment
        );
        return Ok(false);
    }

    let mut document = current.unwrap_or_default();
    document.backend_address = Some(address.to_string());
    document.updated_at = Some(Utc::now());
    store.write(environment, &document).await?;

    tracing::info!(
        "backend address ({}) stored for environment {}",
        address,
        environment
    );
    Ok(true)
}
