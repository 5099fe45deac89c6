//! Query configuration.
//!
//! Each protocol client holds an explicit [`QueryConfig`] value instead of
//! process-wide state, so several differently-tuned clients can coexist.

use std::time::Duration;

/// Default per-attempt timeout for service requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default total number of attempts for search queries (cone, image, spectra).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default total number of attempts for TAP queries.
///
/// TAP queries can be expensive on the service side, so they are retried
/// less aggressively than positional searches.
pub const DEFAULT_TAP_MAX_ATTEMPTS: u32 = 2;

/// Timeout and retry settings for one protocol client.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryConfig {
    /// Timeout applied to each individual request attempt.
    pub timeout: Duration,

    /// Total number of attempts per request, including the first.
    pub max_attempts: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl QueryConfig {
    /// Creates a configuration with custom settings.
    pub fn new(timeout: Duration, max_attempts: u32) -> Self {
        Self {
            timeout,
            max_attempts,
        }
    }

    /// Default configuration for TAP clients (fewer attempts).
    pub fn tap_default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_TAP_MAX_ATTEMPTS,
        }
    }

    /// Sets a custom per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a custom total attempt count.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QueryConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_attempts, 3);
    }

    #[test]
    fn test_tap_default_retries_less() {
        let config = QueryConfig::tap_default();
        assert_eq!(config.max_attempts, 2);
    }

    #[test]
    fn test_builder_pattern() {
        let config = QueryConfig::default()
            .with_timeout(Duration::from_secs(30))
            .with_max_attempts(5);

        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_attempts, 5);
    }
}
