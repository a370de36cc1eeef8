//! Error types for the movie extractor
//!
//! Every failure in the pipeline is a value of [`ExtractError`]. The
//! orchestrator decides per variant whether it ends the run, degrades a single
//! record, or skips a single listing item.

use std::fmt;

use thiserror::Error;

/// Which request a transport failure belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestContext {
    /// A paginated listing page (1-based)
    ListingPage(u32),
    /// A detail page, by absolute URL
    Detail(String),
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestContext::ListingPage(page) => write!(f, "list page {}", page),
            RequestContext::Detail(url) => write!(f, "details {}", url),
        }
    }
}

/// Error type for movie extraction operations
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A listing or detail request failed (network error, timeout, non-2xx)
    #[error("Failed to fetch {context}: {message}")]
    Transport {
        context: RequestContext,
        message: String,
    },

    /// Markup or URL could not be turned into a queryable tree
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// The embedded structured-data block is malformed
    #[error("Invalid structured data at {url}: {message}")]
    StructuredData { url: String, message: String },

    /// A single listing item has an unexpected shape
    #[error("Failed to extract listing item: {0}")]
    ItemExtraction(String),

    /// Requested output format is not supported
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Records could not be rendered as JSON
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Output could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Caller supplied an invalid genre or target count
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ExtractError {
    /// Build a transport failure from any displayable cause.
    pub fn transport(context: RequestContext, cause: impl fmt::Display) -> Self {
        ExtractError::Transport {
            context,
            message: cause.to_string(),
        }
    }
}

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_context_display() {
        assert_eq!(RequestContext::ListingPage(3).to_string(), "list page 3");
        assert_eq!(
            RequestContext::Detail("https://www.imdb.com/title/tt1/".to_string()).to_string(),
            "details https://www.imdb.com/title/tt1/"
        );
    }

    #[test]
    fn test_transport_display_carries_context() {
        let error = ExtractError::transport(RequestContext::ListingPage(1), "connection refused");
        assert_eq!(
            error.to_string(),
            "Failed to fetch list page 1: connection refused"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let error = ExtractError::ParseError("bad selector".to_string());
        assert_eq!(error.to_string(), "Failed to parse HTML: bad selector");
    }

    #[test]
    fn test_structured_data_display() {
        let error = ExtractError::StructuredData {
            url: "https://www.imdb.com/title/tt1/".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid structured data at https://www.imdb.com/title/tt1/: expected value"
        );
    }

    #[test]
    fn test_item_extraction_display() {
        let error = ExtractError::ItemExtraction("relative URL without a base".to_string());
        assert!(error.to_string().contains("relative URL without a base"));
    }

    #[test]
    fn test_unsupported_format_display() {
        let error = ExtractError::UnsupportedFormat("xml".to_string());
        assert_eq!(error.to_string(), "Unsupported output format: xml");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let error: ExtractError = io.into();
        assert!(matches!(error, ExtractError::Io(_)));
        assert_eq!(error.to_string(), "I/O error: read-only");
    }

    #[test]
    fn test_invalid_argument_display() {
        let error = ExtractError::InvalidArgument("target count must be positive".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid argument: target count must be positive"
        );
    }
}
