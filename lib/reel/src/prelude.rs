//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types for easy glob
//! importing:
//!
//! ```ignore
//! use reel::prelude::*;
//! ```

pub use crate::{
    ApiError, DEFAULT_MAX_RETRIES, HttpClient, HyperClient, KeyMaterial, Method, Parameters,
    Pipeline, Request, Response, Result, RetryPolicy, Route, StatusCode, TimeoutPolicy,
    middleware::NetworkObserver,
};
pub use serde::{Deserialize, Serialize};
