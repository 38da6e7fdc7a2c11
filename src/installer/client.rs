//! Bearer-authenticated JSON client for the persona service.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Thin wrapper over `reqwest` that posts JSON and maps failures to [`Error`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: &str, token: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        info!(base_url = %base_url, timeout_secs = timeout.as_secs(), "Persona service client created");

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Absolute URL for an endpoint path such as `personas`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST a JSON body and decode the JSON reply. No retries.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.endpoint(path);
        debug!(url = %url, "POST");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::RemoteUnreachable {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RemoteStatus {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::remote_malformed(&url, format!("failed to read body: {}", e)))?;

        serde_json::from_str(&text)
            .map_err(|e| Error::remote_malformed(&url, format!("body is not JSON: {}", e)))
    }
}
