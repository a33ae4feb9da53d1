//! Engine configuration.
//!
//! Passed by value into [`crate::Engine`]; workers only ever see it behind
//! an `Arc`, so it is effectively read-only once the engine is built.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::ConfigError;

/// Default chart page to harvest.
pub const DEFAULT_BASE_URL: &str = "https://www.imdb.com/chart/top/";

/// Host that relative detail references are resolved against.
pub const DEFAULT_HOST: &str = "https://www.imdb.com";

/// Browser identity sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/131.0.0.0 Safari/537.36";

pub const DEFAULT_CONCURRENCY: usize = 15;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Randomized per-request politeness delay, drawn uniformly from `[min, max)`.
///
/// This is a per-worker sleep, not a shared rate limit: N workers may still
/// issue N requests at once after their delays elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    /// Shortest delay, inclusive.
    pub min: Duration,
    /// Longest delay, exclusive unless equal to `min`.
    pub max: Duration,
}

impl Throttle {
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// No delay at all.
    pub const fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Draw one delay. A degenerate range (`min >= max`) yields exactly `min`.
    pub fn sample(&self) -> Duration {
        use rand::Rng;

        if self.min >= self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..self.max)
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(3))
    }
}

/// Everything the engine needs to know about the remote source.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Index page holding the ranked list.
    pub base_url: String,
    /// Scheme + host used to strip and resolve detail references.
    pub host: String,
    /// Fixed headers sent with every request.
    pub headers: BTreeMap<String, String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum detail fetches in flight.
    pub concurrency: usize,
    /// Delay each worker sleeps before every detail request.
    pub throttle: Throttle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string());
        headers.insert("Accept-Language".to_string(), "en-US,en;q=0.5".to_string());

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            headers,
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            throttle: Throttle::default(),
        }
    }
}

impl EngineConfig {
    /// Check the fields that cannot be validated by the type system.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        url::Url::parse(&self.host).map_err(|e| ConfigError::Host {
            url: self.host.clone(),
            reason: e.to_string(),
        })?;
        for (name, value) in &self.headers {
            reqwest::header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConfigError::HeaderName(name.clone()))?;
            reqwest::header::HeaderValue::from_str(value)
                .map_err(|_| ConfigError::HeaderValue(name.clone()))?;
        }
        Ok(())
    }

    /// Strip the configured host from an absolute URL, leaving a relative reference.
    ///
    /// URLs on other hosts are returned unchanged.
    pub fn relative_ref(&self, absolute: &str) -> String {
        let host = self.host.trim_end_matches('/');
        absolute
            .strip_prefix(host)
            .unwrap_or(absolute)
            .to_string()
    }

    /// Resolve a detail reference (relative or absolute) against the host.
    pub fn resolve(&self, detail_ref: &str) -> Result<String, url::ParseError> {
        let base = url::Url::parse(&self.host)?;
        Ok(base.join(detail_ref)?.to_string())
    }
}
