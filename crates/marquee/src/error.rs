//! Error taxonomy for the acquisition engine.
//!
//! Transport failures, payload failures and per-item enrichment failures
//! are kept as distinct types so callers can tell them apart in logs.

/// A single GET that did not produce a usable body.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Connection failed for {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request timed out: {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request failed for {url}: {reason}")]
    Request { url: String, reason: String },

    #[error("Failed to read body from {url}: {reason}")]
    Body { url: String, reason: String },
}

impl FetchError {
    /// URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Connect { url, .. }
            | FetchError::Timeout { url }
            | FetchError::Status { url, .. }
            | FetchError::Request { url, .. }
            | FetchError::Body { url, .. } => url,
        }
    }

    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Connect { .. } => "connect",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Status { .. } => "status",
            FetchError::Request { .. } => "request",
            FetchError::Body { .. } => "body",
        }
    }
}

/// Result of one GET: the raw body or a classified failure.
pub type FetchOutcome = std::result::Result<String, FetchError>;

/// Failures that abort a list harvest. Nothing can be enriched without a list.
#[derive(thiserror::Error, Debug)]
pub enum HarvestError {
    #[error("Transport error: {0}")]
    Transport(#[from] FetchError),

    #[error("No structured data block found on {url}")]
    PayloadAbsent { url: String },

    #[error("Malformed structured data payload: {reason}")]
    PayloadMalformed { reason: String },
}

/// Why a single stub's enrichment degraded to an all-absent record.
///
/// Never escapes the enricher; it is logged and then discarded.
#[derive(thiserror::Error, Debug)]
pub enum EnrichmentFailure {
    #[error("Transport error: {0}")]
    Transport(#[from] FetchError),

    #[error("Malformed detail payload: {0}")]
    PayloadMalformed(#[from] serde_json::Error),

    #[error("Stub has no detail reference")]
    MissingDetailRef,

    #[error("Cannot resolve detail reference {detail_ref:?}: {reason}")]
    InvalidDetailUrl { detail_ref: String, reason: String },
}

/// Invalid engine configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid header name: {0}")]
    HeaderName(String),

    #[error("Invalid value for header {0}")]
    HeaderValue(String),

    #[error("Invalid host URL {url:?}: {reason}")]
    Host { url: String, reason: String },

    #[error("Concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Umbrella error for the public engine API.
#[derive(thiserror::Error, Debug)]
pub enum MarqueeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Harvest(#[from] HarvestError),
}

/// Convenience result type.
pub type MarqueeResult<T> = std::result::Result<T, MarqueeError>;
