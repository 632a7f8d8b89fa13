//! Declarative endpoint descriptions.
//!
//! A [`Route`] says everything needed to call one endpoint; [`build_request`]
//! turns it into a [`Request`].
//!
//! # Example
//!
//! ```
//! use std::borrow::Cow;
//!
//! use reel_core::{Method, Parameters, Route, build_request};
//!
//! struct Search<'a> {
//!     query: &'a str,
//! }
//!
//! impl Route for Search<'_> {
//!     fn path(&self) -> Cow<'_, str> {
//!         Cow::Borrowed("/search/movie")
//!     }
//!
//!     fn method(&self) -> Method {
//!         Method::Get
//!     }
//!
//!     fn parameters(&self) -> Option<Parameters> {
//!         Some(Parameters::new().with("query", self.query))
//!     }
//! }
//!
//! let base = "https://api.example.com/3".parse().expect("url");
//! let request = build_request(&Search { query: "dune" }, Some(&base)).expect("request");
//! assert_eq!(
//!     request.url().as_str(),
//!     "https://api.example.com/3/search/movie?query=dune"
//! );
//! ```

use std::borrow::Cow;
use std::collections::HashMap;

use bytes::Bytes;
use url::Url;

use crate::{ApiError, Method, ParamEncoding, Parameters, Request, Result};

/// Description of one endpoint call.
pub trait Route: Send + Sync {
    /// Base URL of this route; `None` uses the pipeline's base URL.
    fn base_url(&self) -> Option<&Url> {
        None
    }

    /// Path appended to the base URL.
    fn path(&self) -> Cow<'_, str>;

    /// HTTP method.
    fn method(&self) -> Method;

    /// Query or body parameters.
    fn parameters(&self) -> Option<Parameters> {
        None
    }

    /// Request headers.
    fn headers(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    /// Parameter encoding, chosen from the method unless overridden.
    fn encoding(&self) -> ParamEncoding {
        self.method().default_encoding()
    }
}

/// Append the segments of `path` to the path of `base`.
///
/// Slashes at the junction collapse to exactly one. The query and fragment
/// of `base` are kept, and each segment of `path` is percent-encoded.
pub fn resolve_url(base: &Url, path: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ApiError::network(format!("base URL {base} cannot carry a path")))?
        .pop_if_empty()
        .extend(path.split('/').filter(|segment| !segment.is_empty()));
    Ok(url)
}

/// Build the request for `route`, falling back to `base_url` when the route
/// has no base of its own.
pub fn build_request<R: Route + ?Sized>(
    route: &R,
    base_url: Option<&Url>,
) -> Result<Request<Bytes>> {
    let base = route
        .base_url()
        .or(base_url)
        .ok_or_else(|| ApiError::network("no base URL configured for route"))?;
    let url = resolve_url(base, &route.path())?;

    let mut builder = Request::builder(route.method(), url).headers(route.headers());
    if let Some(params) = route.parameters() {
        builder = match route.encoding() {
            ParamEncoding::Query => builder.query_pairs(params.query_pairs()),
            ParamEncoding::Json => builder.json_body(params.to_json_body()?),
        };
    }
    Ok(builder.build())
}
