//! HTTP transport trait.
//!
//! [`HttpClient`] is the seam between the pipeline and the network. The
//! runtime crate provides a hyper-based implementation; tests plug in
//! scripted doubles.

use std::future::Future;

use bytes::Bytes;

use crate::{Request, Response, TransportError};

/// Core HTTP transport trait.
///
/// Implementations return any response that arrived, whatever its status;
/// status validation belongs to the caller. Failures before a response
/// exists are reported as [`TransportError`]s.
///
/// A request carrying [`TimeoutPolicy`](crate::TimeoutPolicy) must be
/// executed with those timeouts; otherwise the transport's own default
/// applies.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails:
    /// - Connection failures
    /// - Timeouts
    /// - Connection dropped while reading the body
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>, TransportError>> + Send;
}
