//! Typed HTTP request pipeline for Rust.
//!
//! Describe endpoints as [`Route`]s, send them through a [`Pipeline`] and get
//! back either a decoded value or a classified [`ApiError`].
//!
//! - [`Pipeline::send`] decodes a JSON body.
//! - [`Pipeline::send_encrypted`] decodes a base64, AES-CBC encrypted JSON body.
//! - [`Pipeline::send_with_retry`] retries timed out calls with exponential backoff.
//!
//! # Example
//!
//! ```ignore
//! use reel::prelude::*;
//! use reel::movie::{MovieList, MovieRoute};
//!
//! let pipeline = Pipeline::builder()
//!     .base_url("https://api.themoviedb.org/3".parse()?)
//!     .build();
//!
//! let movies: MovieList = pipeline
//!     .send_with_retry(&MovieRoute::Popular { page: 1 }, DEFAULT_MAX_RETRIES, None)
//!     .await?;
//! ```

mod client;
mod config;
mod connector;
pub mod middleware;
pub mod movie;
mod pipeline;
pub mod prelude;
mod retry;

// Re-export transport and pipeline types
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use retry::{DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES, RetryPolicy};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use reel_core::{
    ApiError, BoxError, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RESPONSE_TIMEOUT, DecryptError,
    HttpClient, IV_LEN, JSON_CONTENT_TYPE, KeyMaterial, Method, ParamEncoding, Parameters,
    Request, RequestBuilder, Response, Result, Route, TimeoutPolicy, TransportError,
    build_request, from_json, pretty_json, resolve_url, to_json,
};

// Re-export http types for status codes and headers
pub use reel_core::{StatusCode, header};

pub use url;
