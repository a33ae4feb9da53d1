//! Async HTTP client wrapping reqwest.
//!
//! One GET, fixed headers, a timeout and status validation. No retries and
//! no caching: a failed request is reported once and the caller decides.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{ConfigError, FetchError, FetchOutcome};

/// Anything that can turn a URL into a page body.
///
/// The harvester and enricher fetch only through this trait.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Perform a single GET and return the body or a classified failure.
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// HTTP client for the acquisition engine.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Build a client carrying the configured headers and timeout.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConfigError::HeaderName(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ConfigError::HeaderValue(name.as_str().to_string()))?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    /// Perform a single GET. Only 2xx responses yield a body.
    pub async fn get(&self, url: &str) -> FetchOutcome {
        let started = Instant::now();

        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        debug!(
            url,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched"
        );
        Ok(body)
    }
}

#[async_trait]
impl PageSource for HttpClient {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        self.get(url).await
    }
}

fn classify(url: &str, e: reqwest::Error) -> FetchError {
    let url = url.to_string();
    if e.is_timeout() {
        FetchError::Timeout { url }
    } else if e.is_connect() {
        FetchError::Connect { url, source: e }
    } else {
        FetchError::Request {
            url,
            reason: e.to_string(),
        }
    }
}
