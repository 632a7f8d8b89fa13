//! Core types for the reel typed HTTP request pipeline.
//!
//! This crate provides the transport-independent building blocks:
//! - [`Route`] and [`build_request`] - Declarative endpoint descriptions
//! - [`Parameters`] and [`ParamEncoding`] - Route parameters on the wire
//! - [`Method`], [`Request`] and [`Response`] - HTTP values
//! - [`TimeoutPolicy`] - Request/response timeout pair
//! - [`ApiError`], [`TransportError`] and [`Result`] - Error taxonomy
//! - [`KeyMaterial`] - AES-CBC decryption of encrypted bodies
//! - [`HttpClient`] - Transport trait

mod body;
mod client;
mod crypto;
mod error;
mod method;
mod params;
pub mod prelude;
mod request;
mod response;
mod route;
mod timeout;

pub use body::{JSON_CONTENT_TYPE, from_json, pretty_json, to_json};
pub use client::HttpClient;
pub use crypto::{DecryptError, IV_LEN, KeyMaterial};
pub use error::{ApiError, BoxError, Result, TransportError};
pub use method::Method;
pub use params::{ParamEncoding, Parameters};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use route::{Route, build_request, resolve_url};
pub use timeout::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_RESPONSE_TIMEOUT, TimeoutPolicy};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
