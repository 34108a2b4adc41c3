use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub api: ApiConfig,
    pub store: StoreConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Human-readable name of the routing system.
    pub name: String,
    /// Stage label for the published configuration.
    pub stage: String,
    /// Environment-store entry that holds the backend address.
    pub environment: String,
    /// Deployment region override; when unset the discovered region wins.
    pub region: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    File,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub mode: StoreMode,
    /// Directory for the file store; defaults to ~/.config/towngate/environments.
    pub directory: Option<String>,
    pub base_url: Option<String>,
    pub organization: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn defaults() -> Self {
        Self {
            api: ApiConfig {
                name: "town-api".to_string(),
                stage: "staging".to_string(),
                environment: "town-dev".to_string(),
                region: None,
            },
            store: StoreConfig {
                mode: StoreMode::File,
                directory: None,
                base_url: None,
                organization: None,
                access_token: None,
            },
            backend: BackendConfig {
                base_url: None,
                access_token: None,
            },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("TOWNGATE_API_NAME") {
            self.api.name = v;
        }
        if let Ok(v) = env::var("TOWNGATE_STAGE") {
            self.api.stage = v;
        }
        if let Ok(v) = env::var("TOWNGATE_ENVIRONMENT") {
            self.api.environment = v;
        }
        if let Ok(v) = env::var("TOWNGATE_REGION") {
            self.api.region = Some(v);
        }

        // Store overrides
        if let Ok(v) = env::var("TOWNGATE_STORE_MODE") {
            self.store.mode = StoreMode::parse(&v).unwrap_or(self.store.mode);
        }
        if let Ok(v) = env::var("TOWNGATE_STORE_DIR") {
            self.store.directory = Some(v);
        }
        if let Ok(v) = env::var("TOWNGATE_STORE_URL") {
            self.store.base_url = Some(v);
        }
        if let Ok(v) = env::var("TOWNGATE_STORE_ORG") {
            self.store.organization = Some(v);
        }
        if let Ok(v) = env::var("TOWNGATE_STORE_TOKEN") {
            self.store.access_token = Some(v);
        }

        // Provisioning backend overrides
        if let Ok(v) = env::var("TOWNGATE_BACKEND_URL") {
            self.backend.base_url = Some(v);
        }
        if let Ok(v) = env::var("TOWNGATE_BACKEND_TOKEN") {
            self.backend.access_token = Some(v);
        }

        self
    }
}

impl StoreMode {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "file" => Some(StoreMode::File),
            "http" => Some(StoreMode::Http),
            _ => None,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<GatewayConfig> = Lazy::new(GatewayConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static GatewayConfig {
    &CONFIG
}
