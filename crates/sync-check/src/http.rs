//! HTTP capability used by the consensus and explorer adapters.

use crate::error::{
    Result,
    SyncCheckError,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Default per-request timeout for the reqwest client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` and parse the body as JSON. Non-2xx statuses are upstream
    /// errors.
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value>;

    /// HEAD `url` and return its status code, whatever it is.
    async fn get_status_code(&self, url: &Url) -> Result<u16>;
}

#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value> {
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(SyncCheckError::Upstream(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_status_code(&self, url: &Url) -> Result<u16> {
        let response = self.client.head(url.clone()).send().await?;
        Ok(response.status().as_u16())
    }
}

/// Append `path` to an endpoint, tolerating trailing slashes on the endpoint.
pub(crate) fn endpoint_url(endpoint: &str, path: &str) -> Result<Url> {
    let base = endpoint.trim_end_matches('/');
    Ok(Url::parse(&format!("{base}{path}"))?)
}
