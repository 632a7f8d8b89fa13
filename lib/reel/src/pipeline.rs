//! Typed request pipeline.
//!
//! A [`Pipeline`] turns a [`Route`] into a decoded value or a classified
//! [`ApiError`]: it builds the request, dispatches it through an
//! [`HttpClient`], validates the status code and decodes the body.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::{
    ApiError, DecryptError, HttpClient, HyperClient, HyperClientBuilder,
    KeyMaterial, Response, Result, RetryPolicy, Route, TimeoutPolicy, build_request, from_json,
    middleware::NetworkObserver,
};

/// Request pipeline over an [`HttpClient`].
///
/// Configuration is fixed at construction. Clones share the transport and
/// key material, so one pipeline can serve any number of concurrent calls.
///
/// # Example
///
/// ```ignore
/// use reel::{Pipeline, movie::{MovieList, MovieRoute}};
///
/// let pipeline = Pipeline::builder()
///     .base_url("https://api.themoviedb.org/3".parse()?)
///     .build();
///
/// let movies: MovieList = pipeline.send(&MovieRoute::Popular { page: 1 }, None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline<C = HyperClient> {
    client: C,
    base_url: Option<Url>,
    timeouts: TimeoutPolicy,
    keys: Option<Arc<KeyMaterial>>,
}

impl Pipeline {
    /// Create a pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }
}

impl<C: HttpClient> Pipeline<C> {
    /// Wrap an existing transport with default timeouts, no base URL and no key.
    #[must_use]
    pub fn with_client(client: C) -> Self {
        Self {
            client,
            base_url: None,
            timeouts: TimeoutPolicy::default(),
            keys: None,
        }
    }

    /// Set the base URL used by routes that have none.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set the default timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: TimeoutPolicy) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the key material used by [`send_encrypted`](Self::send_encrypted).
    #[must_use]
    pub fn with_key_material(mut self, keys: KeyMaterial) -> Self {
        self.keys = Some(Arc::new(keys));
        self
    }

    /// Get the underlying transport.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Get the base URL.
    #[must_use]
    pub const fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Get the default timeouts.
    #[must_use]
    pub const fn timeouts(&self) -> TimeoutPolicy {
        self.timeouts
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Call `route` and decode the JSON body into `T`.
    ///
    /// `timeout` overrides the request timeout for this call only; the
    /// response timeout becomes twice the override.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] classifying the transport failure, the
    /// status code or the decoding failure.
    pub async fn send<T, R>(&self, route: &R, timeout: Option<Duration>) -> Result<T>
    where
        T: DeserializeOwned,
        R: Route + ?Sized,
    {
        let body = self.fetch(route, timeout).await?;
        from_json(&body)
    }

    /// Call `route` and decode a base64, AES-CBC encrypted JSON body into `T`.
    ///
    /// # Errors
    ///
    /// On top of the errors of [`send`](Self::send): [`ApiError::NoContent`]
    /// when the body is not base64 and [`ApiError::Encryption`] when it
    /// cannot be decrypted into UTF-8 text.
    pub async fn send_encrypted<T, R>(&self, route: &R, timeout: Option<Duration>) -> Result<T>
    where
        T: DeserializeOwned,
        R: Route + ?Sized,
    {
        let body = self.fetch(route, timeout).await?;

        let keys = self
            .keys
            .as_deref()
            .ok_or_else(|| ApiError::encryption(DecryptError::MissingKey))?;
        let ciphertext = decode_base64(&body).ok_or(ApiError::NoContent)?;
        let plaintext = keys.decrypt_utf8(&ciphertext).map_err(ApiError::encryption)?;

        from_json(plaintext.as_bytes())
    }

    /// Like [`send`](Self::send), retrying timed out attempts with exponential
    /// backoff, up to `max_retries` times.
    ///
    /// # Errors
    ///
    /// Returns the first error that is not a timeout, or the last timeout
    /// once every attempt timed out.
    pub async fn send_with_retry<T, R>(
        &self,
        route: &R,
        max_retries: u32,
        timeout: Option<Duration>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        R: Route + ?Sized,
    {
        self.send_with_policy(route, &RetryPolicy::new(max_retries), timeout)
            .await
    }

    /// Like [`send_with_retry`](Self::send_with_retry) with an explicit policy.
    ///
    /// Dropping the returned future cancels the current attempt or backoff
    /// and every remaining retry.
    ///
    /// # Errors
    ///
    /// Same as [`send_with_retry`](Self::send_with_retry).
    pub async fn send_with_policy<T, R>(
        &self,
        route: &R,
        policy: &RetryPolicy,
        timeout: Option<Duration>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        R: Route + ?Sized,
    {
        let mut last_error = None;

        for attempt in 0..policy.max_attempts() {
            if attempt > 0 {
                let delay = policy.delay_before(attempt);
                debug!(
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retrying after timeout"
                );
                tokio::time::sleep(delay).await;
            }

            match self.send(route, timeout).await {
                Ok(value) => return Ok(value),
                Err(err) if policy.should_retry(&err) => {
                    warn!(attempt, error = %err, "attempt timed out");
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error.unwrap_or(ApiError::Timeout))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn effective_timeouts(&self, timeout: Option<Duration>) -> TimeoutPolicy {
        timeout.map_or(self.timeouts, TimeoutPolicy::from_override)
    }

    /// Dispatch the route and return the body of a successful response.
    async fn fetch<R: Route + ?Sized>(&self, route: &R, timeout: Option<Duration>) -> Result<Bytes> {
        let request = build_request(route, self.base_url.as_ref())?
            .with_timeouts(self.effective_timeouts(timeout));

        let response = self
            .client
            .execute(request)
            .await
            .map_err(ApiError::from_transport)?;

        validate(response)
    }
}

/// 2xx other than 204 is success; everything else goes through the status table.
fn validate(response: Response<Bytes>) -> Result<Bytes> {
    let status = response.status();
    if response.is_success() && status != 204 {
        Ok(response.into_body())
    } else {
        Err(ApiError::from_status(status))
    }
}

fn decode_base64(body: &[u8]) -> Option<Vec<u8>> {
    STANDARD.decode(body.trim_ascii()).ok()
}

/// Builder for a [`Pipeline`] over a [`HyperClient`].
///
/// Logging through `tracing` is installed unless
/// [`without_logging`](Self::without_logging) is called.
#[derive(Debug)]
pub struct PipelineBuilder {
    client: HyperClientBuilder,
    base_url: Option<Url>,
    keys: Option<KeyMaterial>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            client: HyperClient::builder().with_defaults(),
            base_url: None,
            keys: None,
        }
    }
}

impl PipelineBuilder {
    /// Set the base URL used by routes that have none.
    #[must_use]
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set the default request timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.request_timeout(timeout);
        self
    }

    /// Set the default response timeout.
    #[must_use]
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.response_timeout(timeout);
        self
    }

    /// Set both default timeouts.
    #[must_use]
    pub fn timeouts(mut self, timeouts: TimeoutPolicy) -> Self {
        self.client = self.client.timeouts(timeouts);
        self
    }

    /// Set the key material used to decrypt encrypted bodies.
    #[must_use]
    pub fn key_material(mut self, keys: KeyMaterial) -> Self {
        self.keys = Some(keys);
        self
    }

    /// Add an observer notified of every exchange.
    #[must_use]
    pub fn observer(mut self, observer: impl NetworkObserver) -> Self {
        self.client = self.client.with_observer(observer);
        self
    }

    /// Do not log requests and responses through `tracing`.
    #[must_use]
    pub fn without_logging(mut self) -> Self {
        self.client = self.client.without_defaults();
        self
    }

    /// Build the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        let client = self.client.build();
        let timeouts = client.config().timeouts;
        Pipeline {
            client,
            base_url: self.base_url,
            timeouts,
            keys: self.keys.map(Arc::new),
        }
    }
}
