//! Transport request and error types.

use thiserror::Error;

/// One HTTP exchange against a VO service.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// GET with query parameters.
    Get {
        url: String,
        params: Vec<(String, String)>,
    },

    /// POST with a form-encoded body.
    PostForm {
        url: String,
        form: Vec<(String, String)>,
    },

    /// POST with a multipart body carrying form fields plus one file part
    /// (TAP table uploads).
    PostMultipart {
        url: String,
        form: Vec<(String, String)>,
        file_field: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

impl Request {
    /// The target URL of this request.
    pub fn url(&self) -> &str {
        match self {
            Request::Get { url, .. }
            | Request::PostForm { url, .. }
            | Request::PostMultipart { url, .. } => url,
        }
    }
}

/// A single attempt's transport-level failure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The attempt did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Any other request failure (malformed URL, body read error, client
    /// construction).
    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// Whether another attempt with the same parameters could succeed.
    ///
    /// Server-side errors (5xx), connection failures, and timeouts are
    /// transient; 4xx statuses and client-side failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Http { status, .. } => *status >= 500,
            TransportError::Connect(_) | TransportError::Timeout(_) => true,
            TransportError::Request(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retryable() {
        let e = TransportError::Http {
            status: 503,
            url: "https://example.org".to_string(),
        };
        assert!(e.is_retryable());
    }

    #[test]
    fn test_client_errors_are_fatal() {
        let e = TransportError::Http {
            status: 404,
            url: "https://example.org".to_string(),
        };
        assert!(!e.is_retryable());
    }

    #[test]
    fn test_timeouts_and_connect_failures_are_retryable() {
        assert!(TransportError::Timeout("no response within 60s".to_string()).is_retryable());
        assert!(TransportError::Connect("refused".to_string()).is_retryable());
    }

    #[test]
    fn test_request_failures_are_fatal() {
        assert!(!TransportError::Request("bad URL".to_string()).is_retryable());
    }

    #[test]
    fn test_request_url_accessor() {
        let req = Request::PostForm {
            url: "https://example.org/sync".to_string(),
            form: vec![],
        };
        assert_eq!(req.url(), "https://example.org/sync");
    }
}
