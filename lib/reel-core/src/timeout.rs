//! Request and response timeouts.

use std::time::Duration;

/// Default time to wait for a response head.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default time for the whole exchange, body included.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(60);

/// A `(request, response)` timeout pair.
///
/// The response timeout is never shorter than the request timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeoutPolicy {
    request: Duration,
    response: Duration,
}

impl TimeoutPolicy {
    /// Create a policy from independently chosen timeouts.
    ///
    /// A response timeout shorter than the request timeout is raised to it.
    #[must_use]
    pub fn new(request: Duration, response: Duration) -> Self {
        if response < request {
            tracing::warn!(
                ?request,
                ?response,
                "response timeout shorter than request timeout, raising it"
            );
        }
        Self {
            request,
            response: response.max(request),
        }
    }

    /// Derive a policy from a single per-call override.
    ///
    /// The response timeout is twice the override.
    #[must_use]
    pub fn from_override(timeout: Duration) -> Self {
        Self {
            request: timeout,
            response: timeout.saturating_mul(2),
        }
    }

    /// Time allowed until the response head arrives.
    #[must_use]
    pub const fn request(&self) -> Duration {
        self.request
    }

    /// Time allowed for the complete exchange.
    #[must_use]
    pub const fn response(&self) -> Duration {
        self.response
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            request: DEFAULT_REQUEST_TIMEOUT,
            response: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}
