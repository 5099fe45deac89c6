//! Retrying request invoker.
//!
//! Wraps one [`Request`] in per-attempt timeout enforcement, bounded
//! retries, and exponential backoff. Non-retryable failures (4xx statuses,
//! client-side errors) abort immediately; transient ones (timeouts,
//! connection failures, 5xx) are retried until the attempt budget runs out.

use std::time::Duration;

use tracing::{debug, trace, warn};

use super::http::HttpClient;
use super::types::{Request, TransportError};
use crate::config::QueryConfig;
use crate::error::Error;

/// Executes a request with retries and returns the raw response body.
///
/// Each attempt is bounded by `config.timeout`; at most `config.max_attempts`
/// attempts are made in total. On exhaustion the last attempt's failure is
/// reported together with the attempt count.
pub async fn invoke<C: HttpClient>(
    http: &C,
    request: &Request,
    config: &QueryConfig,
) -> Result<Vec<u8>, Error> {
    let max_attempts = config.max_attempts.max(1);
    let mut last_error = TransportError::Request("no attempt was made".to_string());

    for attempt in 1..=max_attempts {
        debug!(
            url = request.url(),
            attempt, max_attempts, "service request attempt"
        );

        match tokio::time::timeout(config.timeout, http.execute(request)).await {
            Ok(Ok(body)) => {
                debug!(
                    url = request.url(),
                    attempt,
                    bytes = body.len(),
                    "service request succeeded"
                );
                return Ok(body);
            }
            Ok(Err(e)) => {
                warn!(
                    url = request.url(),
                    attempt,
                    error = %e,
                    retryable = e.is_retryable(),
                    "service request failed"
                );
                let retryable = e.is_retryable();
                last_error = e;
                if !retryable {
                    return Err(Error::Transport {
                        attempts: attempt,
                        source: last_error,
                    });
                }
            }
            Err(_) => {
                warn!(
                    url = request.url(),
                    attempt,
                    timeout_secs = config.timeout.as_secs(),
                    "service request timed out"
                );
                last_error = TransportError::Timeout(format!(
                    "no response within {:?}",
                    config.timeout
                ));
            }
        }

        // Exponential backoff before retry; the exponent is capped so large
        // attempt budgets neither overflow the shift nor sleep unboundedly.
        if attempt < max_attempts {
            let backoff = Duration::from_millis(100 * (1u64 << attempt.min(10)));
            trace!(backoff_ms = backoff.as_millis() as u64, "backoff before retry");
            tokio::time::sleep(backoff).await;
        }
    }

    Err(Error::Transport {
        attempts: max_attempts,
        source: last_error,
    })
}
