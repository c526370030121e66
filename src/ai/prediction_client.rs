// External dependencies
use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use url::Url;

// Internal dependencies
use super::{PredictError, PredictionRequest, PredictionResponse};
use crate::config::ServiceConfig;

/// HTTP client for the prediction service.
///
/// Cloning is cheap and clones share one connection pool, so a single
/// client can serve any number of concurrent tasks.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: Client,
    base_url: Url,
    predict_url: Url,
    health_url: Url,
    timeout: Duration,
}

// ============================================================================
// Client Implementation
// ============================================================================

impl PredictionClient {
    /// Creates a client for the service at `base_url` with default paths and timeout
    pub fn new(base_url: &str) -> Result<Self, PredictError> {
        let config = ServiceConfig {
            base_url: base_url.to_string(),
            ..ServiceConfig::default()
        };
        Self::from_settings(&config)
    }

    /// Creates a client from the `[service]` configuration section
    pub fn from_settings(config: &ServiceConfig) -> Result<Self, PredictError> {
        if config.timeout_secs == 0 {
            return Err(PredictError::InvalidConfig(
                "timeout_secs must be at least 1".to_string(),
            ));
        }

        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PredictError::ClientBuild)?;

        let base_url = Url::parse(&config.base_url)?;
        let predict_url = endpoint(&base_url, &config.predict_path)?;
        let health_url = endpoint(&base_url, &config.health_path)?;

        Ok(Self {
            client,
            base_url,
            predict_url,
            health_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }

    pub fn health_url(&self) -> &Url {
        &self.health_url
    }

    // ========================================================================
    // Prediction
    // ========================================================================

    /// Sends `{"text": input}` to the prediction endpoint and returns the decoded body
    pub async fn predict<T>(&self, input: &T) -> Result<PredictionResponse, PredictError>
    where
        T: Serialize + ?Sized,
    {
        let body = PredictionRequest::new(input).to_body()?;

        debug!(
            "Sending prediction request to {}, body length: {}",
            self.predict_url,
            body.len()
        );

        let response = self
            .client
            .post(self.predict_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| PredictError::from_reqwest(e, self.timeout))?;

        let value = self.read_json(response).await?;

        info!("Prediction received from {}", self.predict_url);
        Ok(PredictionResponse::new(value))
    }

    /// Like [`predict`](Self::predict), failing with `Timeout` once `timeout` elapses
    pub async fn predict_with_timeout<T>(
        &self,
        input: &T,
        timeout: Duration,
    ) -> Result<PredictionResponse, PredictError>
    where
        T: Serialize + ?Sized,
    {
        tokio::time::timeout(timeout, self.predict(input))
            .await
            .map_err(|_| PredictError::Timeout(timeout))?
    }

    /// Like [`predict`](Self::predict), abandoning the request once `cancel` resolves
    pub async fn predict_with_cancel<T, F>(
        &self,
        input: &T,
        cancel: F,
    ) -> Result<PredictionResponse, PredictError>
    where
        T: Serialize + ?Sized,
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                debug!("Prediction request to {} cancelled", self.predict_url);
                Err(PredictError::Cancelled)
            }
            result = self.predict(input) => result,
        }
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Probes the health endpoint and returns its decoded body
    pub async fn health(&self) -> Result<Value, PredictError> {
        debug!("Checking service health at {}", self.health_url);

        let response = self
            .client
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(|e| PredictError::from_reqwest(e, self.timeout))?;

        self.read_json(response).await
    }

    async fn read_json(&self, response: Response) -> Result<Value, PredictError> {
        let status = response.status();

        if !status.is_success() {
            // Error bodies are optional, may be plain text, or may not arrive at all
            let body = match response.bytes().await {
                Ok(bytes) => serde_json::from_slice(&bytes).ok(),
                Err(e) => {
                    debug!("Failed to read {status} response body: {e}");
                    None
                }
            };
            return Err(PredictError::Service { status, body });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PredictError::from_reqwest(e, self.timeout))?;

        debug!("Response status: {status}, body length: {}", bytes.len());

        serde_json::from_slice(&bytes).map_err(|source| PredictError::Decode {
            source,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Resolves `path` under the base URL's path, so `http://host/ml` + `/predict`
/// is `http://host/ml/predict`.
fn endpoint(base_url: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path.trim_start_matches('/'))
}
