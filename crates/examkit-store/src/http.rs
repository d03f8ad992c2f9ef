//! HTTP content-service store.
//!
//! Talks to the remote test-content and result-storage service:
//! `GET {base}/tests/{id}` for definitions, `POST {base}/results` for
//! computed results.

use async_trait::async_trait;
use tracing::instrument;

use examkit_core::error::StoreError;
use examkit_core::model::TestDefinition;
use examkit_core::scoring::TestResult;
use examkit_core::traits::ContentStore;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Store backed by the remote content service.
pub struct HttpStore {
    base_url: String,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: &str, api_token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
            client,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn transport_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Timeout(DEFAULT_TIMEOUT_SECS)
    } else {
        StoreError::Network(e.to_string())
    }
}

#[async_trait]
impl ContentStore for HttpStore {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self))]
    async fn load_test(&self, test_id: &str) -> Result<TestDefinition, StoreError> {
        let url = format!("{}/tests/{test_id}", self.base_url);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(StoreError::NotFound(test_id.to_string()));
        }
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status, message });
        }

        response
            .json::<TestDefinition>()
            .await
            .map_err(|e| StoreError::Network(format!("invalid test payload: {e}")))
    }

    #[instrument(skip(self, result), fields(attempt_id = %result.attempt_id))]
    async fn save_result(&self, result: &TestResult) -> Result<(), StoreError> {
        let url = format!("{}/results", self.base_url);
        let response = self
            .authorize(self.client.post(&url))
            .json(result)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status, message });
        }
        Ok(())
    }
}
