//! Error types.
//!
//! [`ClientError`] is what a provider call can fail with; [`CiteError`] is
//! what the resolver, tools and HTTP API report.

use std::time::Duration;

/// Errors from the HTTP client and engine layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Connection, DNS or TLS failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure inside the retry middleware.
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Provider answered 429.
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Provider answered 404, or had no record for the identifier.
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Provider rejected the query (400).
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Payload did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// XML parsing error (arXiv Atom feed)
    #[error("Failed to parse XML: {0}")]
    Xml(String),

    /// Provider answered 5xx.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// The provider answered but had nothing usable.
    #[error("No results from {engine} for {query}")]
    NoResults { engine: &'static str, query: String },
}

impl ClientError {
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    #[must_use]
    pub fn no_results(engine: &'static str, query: impl Into<String>) -> Self {
        Self::NoResults { engine, query: query.into() }
    }

    /// Returns true if the provider could not be reached or failed on its side.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Middleware(_)
                | Self::RateLimited { .. }
                | Self::Timeout(_)
                | Self::Server { .. }
        )
    }

    /// Wait suggested by a 429.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

/// Errors surfaced to callers of the resolver, tools and HTTP API.
#[derive(thiserror::Error, Debug)]
pub enum CiteError {
    /// A provider call failed and nothing fell back.
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    /// Request input rejected before any lookup.
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
    },

    /// Nothing in the input could be matched to a source
    #[error("No match: {0}")]
    NoMatch(String),

    /// Every applicable engine failed
    #[error("Could not retrieve citation for {0}")]
    Unavailable(String),

    /// Metadata came back without the fields a citation needs
    #[error("Incomplete metadata: {0}")]
    Incomplete(String),

    /// Tool arguments or output could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CiteError {
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Every engine failed for `source`.
    #[must_use]
    pub fn unavailable(source: impl Into<String>) -> Self {
        Self::Unavailable(source.into())
    }

    /// HTTP status code this error maps to in the JSON API.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } | Self::Serialization(_) => 400,
            Self::NoMatch(_) => 404,
            Self::Incomplete(_) => 422,
            Self::Client(_) | Self::Unavailable(_) => 502,
            Self::Internal(_) => 500,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

pub type CiteResult<T> = Result<T, CiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::rate_limited(60);
        assert!(err.to_string().contains("Rate limited"));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_unreachable_classification() {
        assert!(ClientError::server(503, "down").is_unreachable());
        assert!(ClientError::Timeout(Duration::from_secs(5)).is_unreachable());
        assert!(!ClientError::not_found("10.1/x").is_unreachable());
        assert!(!ClientError::no_results("crossref", "q").is_unreachable());
    }

    #[test]
    fn test_cite_error_from_client() {
        let err: CiteError = ClientError::not_found("paper").into();
        assert!(matches!(err, CiteError::Client(_)));
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn test_unavailable_message() {
        let err = CiteError::unavailable("https://example.com/a");
        assert_eq!(err.to_string(), "Could not retrieve citation for https://example.com/a");
        assert_eq!(CiteError::validation("style", "bad").status_code(), 400);
    }
}
