//! Tower middleware layers for the reel HTTP transport.
//!
//! Layers are applied to [`HyperClient`](crate::HyperClient) through its
//! builder. The last layer added is the first to process requests.
//!
//! # Available Layers
//!
//! - [`ObserverLayer`] - Reports each exchange to a [`NetworkObserver`]
//! - [`TracingObserver`] - Observer logging requests/responses using `tracing`
//!
//! Any other Tower layer whose service speaks
//! `Request<Bytes>`/`Response<Bytes>`/[`TransportError`](crate::TransportError)
//! can be added with `.layer()`.
//!
//! # Example
//!
//! ```ignore
//! use reel::HyperClient;
//! use reel::middleware::ObserverLayer;
//!
//! let client = HyperClient::builder()
//!     .with_logging()
//!     .layer(ObserverLayer::new(MyObserver))
//!     .build();
//! ```

mod observer;

pub use observer::{NetworkObserver, ObserverLayer, Observed, TracingObserver};
