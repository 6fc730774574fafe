//! Error types for postgrade operations.
//!
//! [`PostgradeError`] covers fetching, selector parsing and file I/O. Fetch
//! failures carry a fixed, user-facing message in their `Display` output;
//! transport detail stays in fields for logging and is never rendered.
//!
//! # Example
//!
//! ```rust
//! use postgrade_core::PostgradeError;
//!
//! let err = PostgradeError::NotFound;
//! assert_eq!(err.code(), "not_found");
//! assert!(err.to_string().contains("404"));
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the postgrade library.
#[derive(Error, Debug)]
pub enum PostgradeError {
    /// The site answered 403, usually because it blocks automated clients.
    #[error(
        "This website is blocking automated access. Try a different blog URL or check if the site requires authentication."
    )]
    Forbidden,

    /// The site answered 401.
    #[error("This blog requires authentication to access.")]
    Unauthorized,

    /// The site answered 404.
    #[error("Blog post not found (404). Please check the URL and try again.")]
    NotFound,

    /// Any other status of 400 or above.
    #[error("Unable to fetch blog (HTTP {status}). Please try a different URL.")]
    HttpStatus { status: u16 },

    /// The request exceeded the configured timeout (seconds).
    #[error("Request timeout. The website took too long to respond.")]
    Timeout { timeout: u64 },

    /// The host name did not resolve.
    #[error("Website not found. Please check the URL.")]
    DnsNotFound,

    #[error("Connection refused. The website may be down.")]
    ConnectionRefused,

    /// Any other transport failure. `detail` is for logs only.
    #[error("Network error while fetching the blog. Please check your internet connection.")]
    Network { detail: String },

    /// Missing, malformed, or non-http(s) URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid CSS selector or unparseable markup.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The readability pass found no candidate elements.
    #[error("No content could be extracted from the document")]
    NoContent,

    /// The best readability candidate scored under the threshold.
    #[error("Content is not readable (score {score} below threshold {threshold})")]
    NotReadable { score: f64, threshold: f64 },

    /// The AI collaborator failed (quota, malformed output, transport).
    #[error("Content optimizer failed: {0}")]
    Optimizer(String),

    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PostgradeError {
    /// Stable snake_case code for API payloads and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Forbidden => "forbidden",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::HttpStatus { .. } => "http_error",
            Self::Timeout { .. } => "timeout",
            Self::DnsNotFound => "dns_not_found",
            Self::ConnectionRefused => "connection_refused",
            Self::Network { .. } => "network_error",
            Self::InvalidUrl(_) | Self::FileNotFound(_) => "validation_error",
            Self::HtmlParseError(_) | Self::NoContent | Self::NotReadable { .. } => "extraction_failure",
            Self::Optimizer(_) | Self::Serialization(_) => "unexpected_error",
            Self::Io(_) => "io_error",
        }
    }

    /// Whether the caller can fix this by changing their input.
    ///
    /// Validation errors map to 4xx responses; everything else is a runtime
    /// failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidUrl(_) | Self::FileNotFound(_))
    }

    /// Whether this error came from the fetch taxonomy.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Forbidden
                | Self::Unauthorized
                | Self::NotFound
                | Self::HttpStatus { .. }
                | Self::Timeout { .. }
                | Self::DnsNotFound
                | Self::ConnectionRefused
                | Self::Network { .. }
        )
    }
}

/// Result type alias for [`PostgradeError`].
pub type Result<T> = std::result::Result<T, PostgradeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_message() {
        let err = PostgradeError::Forbidden;
        assert!(err.to_string().contains("blocking automated access"));
        assert_eq!(err.code(), "forbidden");
    }

    #[test]
    fn test_http_status_message_includes_status() {
        let err = PostgradeError::HttpStatus { status: 418 };
        assert!(err.to_string().contains("HTTP 418"));
        assert_eq!(err.code(), "http_error");
    }

    #[test]
    fn test_network_detail_is_not_rendered() {
        let err = PostgradeError::Network { detail: "tcp reset by peer at 10.0.0.1".to_string() };
        assert!(!err.to_string().contains("10.0.0.1"));
        assert_eq!(err.code(), "network_error");
    }

    #[test]
    fn test_timeout_message() {
        let err = PostgradeError::Timeout { timeout: 15 };
        assert!(err.to_string().contains("took too long"));
        assert!(err.is_fetch_error());
    }

    #[test]
    fn test_validation_classification() {
        assert!(PostgradeError::InvalidUrl("ftp://x".into()).is_validation());
        assert!(!PostgradeError::NotFound.is_validation());
        assert!(!PostgradeError::InvalidUrl("x".into()).is_fetch_error());
    }

    #[test]
    fn test_not_readable_error() {
        let err = PostgradeError::NotReadable { score: 15.0, threshold: 20.0 };
        assert!(err.to_string().contains("15"));
        assert!(err.to_string().contains("20"));
        assert_eq!(err.code(), "extraction_failure");
    }
}
