//! Prelude module for convenient imports.
//!
//! ```ignore
//! use reel_core::prelude::*;
//! ```

pub use crate::{
    ApiError, HttpClient, KeyMaterial, Method, ParamEncoding, Parameters, Request, Response,
    Result, Route, TimeoutPolicy, TransportError,
};
