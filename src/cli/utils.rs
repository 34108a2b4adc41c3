use std::path::{Path, PathBuf};

use crate::config::{GatewayConfig, StoreMode};
use crate::discovery::file_store::FileEnvironmentStore;
use crate::discovery::http_store::HttpEnvironmentStore;
use crate::discovery::EnvironmentStore;
use crate::gateway::EndpointTable;

/// Open the configured environment store.
pub fn open_store(config: &GatewayConfig) -> anyhow::Result<Box<dyn EnvironmentStore>> {
    match config.store.mode {
        StoreMode::File => {
            let directory = match &config.store.directory {
                Some(directory) => PathBuf::from(directory),
                None => default_store_dir()?,
            };
            Ok(Box::new(FileEnvironmentStore::new(directory)))
        }
        StoreMode::Http => {
            let base_url = config.store.base_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("TOWNGATE_STORE_URL must be set when TOWNGATE_STORE_MODE=http")
            })?;
            let organization = config.store.organization.clone().ok_or_else(|| {
                anyhow::anyhow!("TOWNGATE_STORE_ORG must be set when TOWNGATE_STORE_MODE=http")
            })?;
            Ok(Box::new(HttpEnvironmentStore::new(
                base_url,
                organization,
                config.store.access_token.clone(),
            )?))
        }
    }
}

/// Load the endpoint declaration, falling back to the built-in town set.
pub fn load_endpoints(
    declaration: Option<&Path>,
    backend_address: &str,
) -> anyhow::Result<EndpointTable> {
    match declaration {
        Some(path) => Ok(EndpointTable::load(path, backend_address)?),
        None => Ok(EndpointTable::town_defaults(backend_address)),
    }
}

fn default_store_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("towngate")
        .join("environments"))
}
