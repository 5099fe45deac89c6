//! HTTP client abstraction for testability.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::types::{Request, TransportError};
use crate::config::DEFAULT_TIMEOUT_SECS;

/// Trait for asynchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing by
/// enabling mock HTTP clients in tests. Implementations map non-success
/// HTTP statuses to [`TransportError::Http`] so that callers see a uniform
/// error surface.
pub trait HttpClient: Send + Sync {
    /// Executes one HTTP exchange and returns the response body.
    fn execute(
        &self,
        request: &Request,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}

/// Shared references delegate, so a client can borrow an HTTP client the
/// caller keeps inspecting (useful with recording mocks).
impl<T: HttpClient> HttpClient for &T {
    fn execute(
        &self,
        request: &Request,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send {
        (**self).execute(request)
    }
}

/// Default User-Agent string for VO service requests.
const DEFAULT_USER_AGENT: &str = concat!("voquery/", env!("CARGO_PKG_VERSION"));

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new ReqwestClient with a custom whole-request timeout.
    ///
    /// The retry layer applies its own per-attempt timeout on top; this one
    /// is a safety net inside the HTTP stack itself.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| TransportError::Request(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    async fn execute(&self, request: &Request) -> Result<Vec<u8>, TransportError> {
        trace!(url = request.url(), "HTTP request starting");

        let builder = match request {
            Request::Get { url, params } => {
                let mut builder = self.client.get(url);
                if !params.is_empty() {
                    builder = builder.query(params);
                }
                builder
            }
            Request::PostForm { url, form } => self.client.post(url).form(form),
            Request::PostMultipart {
                url,
                form,
                file_field,
                file_name,
                bytes,
            } => {
                let mut multipart = reqwest::multipart::Form::new();
                for (key, value) in form {
                    multipart = multipart.text(key.clone(), value.clone());
                }
                let part =
                    reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());
                multipart = multipart.part(file_field.clone(), part);
                self.client.post(url).multipart(multipart)
            }
        };

        let response = match builder.send().await {
            Ok(resp) => {
                debug!(
                    url = request.url(),
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(url = request.url(), error = %e, "HTTP request failed");
                return Err(classify(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(
                url = request.url(),
                status = status.as_u16(),
                "HTTP error status"
            );
            return Err(TransportError::Http {
                status: status.as_u16(),
                url: request.url().to_string(),
            });
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| TransportError::Request(format!("failed to read response body: {e}")))
    }
}

/// Maps a reqwest error onto the transport error taxonomy.
fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Mock HTTP client returning one canned response for every request.
    #[derive(Clone)]
    pub struct MockHttpClient {
        pub response: Result<Vec<u8>, TransportError>,
    }

    impl HttpClient for MockHttpClient {
        async fn execute(&self, _request: &Request) -> Result<Vec<u8>, TransportError> {
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn test_mock_client_success() {
        let mock = MockHttpClient {
            response: Ok(b"<VOTABLE/>".to_vec()),
        };
        let request = Request::Get {
            url: "https://example.org".to_string(),
            params: vec![],
        };

        let result = mock.execute(&request).await;
        assert_eq!(result.unwrap(), b"<VOTABLE/>".to_vec());
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let mock = MockHttpClient {
            response: Err(TransportError::Connect("refused".to_string())),
        };
        let request = Request::Get {
            url: "https://example.org".to_string(),
            params: vec![],
        };

        let result = mock.execute(&request).await;
        assert!(result.is_err());
    }
}
