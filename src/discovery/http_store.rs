use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::discovery::{EnvironmentDocument, EnvironmentStore, StoreError};

/// Remote environment store client. Documents live at
/// `{base}/environments/{organization}/{environment}`; reads are GET,
/// writes are PUT, authorization is a bearer token.
#[derive(Debug)]
pub struct HttpEnvironmentStore {
    client: reqwest::Client,
    base_url: Url,
    organization: String,
    access_token: Option<String>,
}

impl HttpEnvironmentStore {
    pub fn new(
        base_url: &str,
        organization: impl Into<String>,
        access_token: Option<String>,
    ) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url).map_err(|source| StoreError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            organization: organization.into(),
            access_token,
        })
    }

    fn document_endpoint(&self, environment: &str) -> String {
        format!(
            "{}/environments/{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.organization,
            environment
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl EnvironmentStore for HttpEnvironmentStore {
    async fn read(&self, environment: &str) -> Result<Option<EnvironmentDocument>, StoreError> {
        let request = self.client.get(self.document_endpoint(environment));
        let response = self.authorize(request).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StoreError::Status {
                environment: environment.to_string(),
                status: response.status().as_u16(),
            });
        }

        let document: EnvironmentDocument = response.json().await?;
        Ok(Some(document))
    }

    async fn write(
        &self,
        environment: &str,
        document: &EnvironmentDocument,
    ) -> Result<(), StoreError> {
        let request = self
            .client
            .put(self.document_endpoint(environment))
            .json(document);
        let response = self.authorize(request).send().await?;

        if !response.status().is_success() {
            return Err(StoreError::Status {
                environment: environment.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}
