//! Network observation middleware.
//!
//! Observers see every request before it is sent and every outcome once the
//! exchange ends. They cannot alter either; the layer returns the inner
//! service's result untouched.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use bytes::Bytes;
use reel_core::pretty_json;
use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, span, warn};
use url::Url;

use crate::{Request, Response, TransportError};

/// Hooks invoked around each HTTP exchange.
///
/// All methods default to doing nothing.
pub trait NetworkObserver: Send + Sync + 'static {
    /// Called before the request is handed to the transport.
    fn on_request(&self, _request: &Request<Bytes>) {}

    /// Called when a response was received, whatever its status.
    fn on_response(&self, _url: &Url, _response: &Response<Bytes>, _elapsed: Duration) {}

    /// Called when the transport failed.
    fn on_error(&self, _url: &Url, _error: &TransportError, _elapsed: Duration) {}
}

/// Observer writing requests and responses to `tracing` at debug level.
///
/// JSON bodies are pretty-printed; anything else is replaced by a
/// placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl NetworkObserver for TracingObserver {
    fn on_request(&self, request: &Request<Bytes>) {
        let body = request
            .body()
            .map_or_else(|| String::from("<no body>"), render_body);

        debug!(
            method = %request.method(),
            url = %request.url(),
            headers = ?request.headers(),
            body = %body,
            "sending request"
        );
    }

    fn on_response(&self, url: &Url, response: &Response<Bytes>, elapsed: Duration) {
        debug!(
            url = %url,
            status = response.status(),
            elapsed_ms = millis(elapsed),
            body = %render_body(response.body()),
            "received response"
        );
    }

    fn on_error(&self, url: &Url, error: &TransportError, elapsed: Duration) {
        warn!(url = %url, error = %error, elapsed_ms = millis(elapsed), "request failed");
    }
}

fn render_body(body: &Bytes) -> String {
    if body.is_empty() {
        return String::from("<empty>");
    }
    pretty_json(body).unwrap_or_else(|| String::from("<unparsable body>"))
}

// Saturating conversion to u64 (truncates after ~584 million years)
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Layer that reports every exchange to a [`NetworkObserver`].
///
/// # Example
///
/// ```ignore
/// use reel::middleware::{ObserverLayer, TracingObserver};
///
/// let client = HyperClient::builder()
///     .layer(ObserverLayer::new(TracingObserver))
///     .build();
/// ```
#[derive(Clone)]
pub struct ObserverLayer {
    observer: Arc<dyn NetworkObserver>,
}

impl std::fmt::Debug for ObserverLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverLayer").finish_non_exhaustive()
    }
}

impl ObserverLayer {
    /// Create a layer for the given observer.
    #[must_use]
    pub fn new(observer: impl NetworkObserver) -> Self {
        Self {
            observer: Arc::new(observer),
        }
    }

    /// Create a layer for an observer that is shared elsewhere.
    #[must_use]
    pub fn shared(observer: Arc<dyn NetworkObserver>) -> Self {
        Self { observer }
    }

    /// Create a layer logging through `tracing`.
    #[must_use]
    pub fn tracing() -> Self {
        Self::new(TracingObserver)
    }
}

impl<S> Layer<S> for ObserverLayer {
    type Service = Observed<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Observed {
            inner,
            observer: Arc::clone(&self.observer),
        }
    }
}

/// Service that notifies an observer around each call.
#[derive(Clone)]
pub struct Observed<S> {
    inner: S,
    observer: Arc<dyn NetworkObserver>,
}

impl<S> Service<Request<Bytes>> for Observed<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let method = request.method();
        let url = request.url().clone();
        let span = span!(Level::INFO, "http_request", %method, %url);

        let observer = Arc::clone(&self.observer);
        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();
                observer.on_request(&request);

                let result = inner.call(request).await;
                let elapsed = start.elapsed();

                match &result {
                    Ok(response) => observer.on_response(&url, response, elapsed),
                    Err(err) => observer.on_error(&url, err, elapsed),
                }

                result
            }
            .instrument(span),
        )
    }
}
