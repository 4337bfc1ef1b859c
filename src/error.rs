use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while scanning or extracting recipes
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Transport failure: DNS, connection, timeout, TLS
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The server answered with a non-2xx status after redirects
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// The fetched markup could not be turned into a document
    #[error("Failed to parse document: {0}")]
    ParseError(String),

    /// Neither extraction strategy located a recipe
    #[error("No structured data (JSON-LD) found.")]
    NoStructuredData,

    /// One JSON-LD block failed to decode; callers skip it
    #[error("Malformed JSON-LD block: {0}")]
    MalformedBlock(#[from] serde_json::Error),

    /// A page URL or href could not be resolved
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Header name error: {0}")]
    HeaderName(#[from] reqwest::header::InvalidHeaderName),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Persistence layer failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ScrapeError {
    /// Whether this is the normal "nothing found" outcome rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, ScrapeError::NoStructuredData)
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
        }
    }
}

/// Error shape handed to API callers: `{"error": "<message>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_serialization() {
        let body = ScrapeError::NoStructuredData.to_body();
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"No structured data (JSON-LD) found."}"#);
    }

    #[test]
    fn test_http_status_message() {
        let err = ScrapeError::HttpStatus {
            status: 404,
            url: "https://www.kilometre0.cat/missing".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 for https://www.kilometre0.cat/missing");
        assert!(!err.is_not_found());
        assert!(ScrapeError::NoStructuredData.is_not_found());
    }
}
