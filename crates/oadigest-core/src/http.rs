//! Blocking JSON-over-HTTP transport.
//!
//! Uses async reqwest internally on a shared tokio runtime, but presents a
//! sync interface: callers issue one request and get the parsed body back.
//! Calling it from inside a tokio runtime panics, since `block_on` cannot nest.

use std::sync::LazyLock;
use std::time::Duration;

use serde_json::Value;

use crate::error::ClientError;
use crate::retry::retry_with_backoff;

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// HTTP settings, fixed at client construction
#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    /// Whole-request timeout (connect + headers + body)
    pub request_timeout: Duration,
    /// Retries for 429/5xx/network failures; 0 disables retry
    pub max_retries: u32,
    /// First retry waits `2 * retry_base_delay`, doubling after that
    pub retry_base_delay: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            user_agent: concat!("oadigest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Pooled HTTP client that fetches JSON documents
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: HttpConfig,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(8)
            .build()
            .map_err(ClientError::from_reqwest)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// GET `url?params` and parse the body as JSON, retrying transient failures
    pub fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value, ClientError> {
        retry_with_backoff(
            url,
            self.config.max_retries,
            self.config.retry_base_delay,
            || self.get_json_once(url, params),
        )
    }

    fn get_json_once(&self, url: &str, params: &[(&str, String)]) -> Result<Value, ClientError> {
        log::trace!("GET {url} ({} params)", params.len());
        SHARED_RUNTIME.handle().block_on(async {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .query(params)
                .send()
                .await
                .map_err(ClientError::from_reqwest)?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ClientError::from_status(status.as_u16(), &body));
            }
            let body = response.bytes().await.map_err(ClientError::from_reqwest)?;
            serde_json::from_slice(&body)
                .map_err(|e| ClientError::Decode(format!("invalid JSON body: {e}")))
        })
    }
}
