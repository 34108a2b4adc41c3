use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;

use crate::discovery::{EnvironmentDocument, EnvironmentStore, StoreError};

/// Local environment store: one pretty-printed JSON document per
/// environment under a directory. The default for development and the
/// CLI when no remote store is configured.
pub struct FileEnvironmentStore {
    directory: PathBuf,
}

impl FileEnvironmentStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn document_path(&self, environment: &str) -> PathBuf {
        self.directory.join(format!("{}.json", environment))
    }
}

#[async_trait]
impl EnvironmentStore for FileEnvironmentStore {
    async fn read(&self, environment: &str) -> Result<Option<EnvironmentDocument>, StoreError> {
        let path = self.document_path(environment);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let document: EnvironmentDocument = serde_json::from_str(&content)?;
        Ok(Some(document))
    }

    async fn write(
        &self,
        environment: &str,
        document: &EnvironmentDocument,
    ) -> Result<(), StoreError> {
        if !self.directory.exists() {
            fs::create_dir_all(&self.directory)?;
        }

        let content = serde_json::to_string_pretty(document)?;
        fs::write(self.document_path(environment), content)?;
        Ok(())
    }
}
