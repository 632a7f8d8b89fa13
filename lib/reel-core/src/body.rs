//! Body serialization utilities.

use bytes::Bytes;

use crate::{ApiError, Result};

/// MIME type of every body the pipeline sends or decodes.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Serialize a value to JSON bytes.
///
/// A failure here means the request could not be built, which the taxonomy
/// reports as a network error.
///
/// # Example
///
/// ```
/// use reel_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Rating { value: f64 }
///
/// let bytes = to_json(&Rating { value: 8.5 }).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"value":8.5}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(ApiError::network)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// The error message includes the path of the offending field
/// (e.g. `results[0].title`).
///
/// # Example
///
/// ```
/// use reel_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Movie { id: u64 }
///
/// let movie: Movie = from_json(br#"{"id":42}"#).expect("deserialize");
/// assert_eq!(movie, Movie { id: 42 });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(ApiError::decoding)
}

/// Pretty-print a JSON body, or `None` if it is not JSON.
#[must_use]
pub fn pretty_json(bytes: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn to_json_serialize() {
        #[derive(serde::Serialize)]
        struct Page {
            page: u32,
        }

        let bytes = to_json(&Page { page: 2 }).expect("serialize");
        assert_eq!(bytes.as_ref(), br#"{"page":2}"#);
    }

    #[test]
    fn from_json_syntax_error_is_decoding() {
        #[derive(Debug, serde::Deserialize)]
        struct Movie {
            #[allow(dead_code)]
            id: u64,
        }

        let result: Result<Movie> = from_json(b"not json");
        let_assert!(Err(ApiError::Decoding(_)) = result);
    }

    #[test]
    fn from_json_error_has_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Movie {
            #[allow(dead_code)]
            title: String,
        }

        #[derive(Debug, serde::Deserialize)]
        struct Page {
            #[allow(dead_code)]
            results: Vec<Movie>,
        }

        let result: Result<Page> = from_json(br#"{"results":[{"title":1}]}"#);
        let_assert!(Err(err) = result);
        let msg = err.to_string();
        check!(msg.contains("results[0].title"), "missing path in: {msg}");
    }

    #[test]
    fn pretty_json_formats_objects() {
        let_assert!(Some(pretty) = pretty_json(br#"{"a":1}"#));
        check!(pretty == "{\n  \"a\": 1\n}");
        check!(pretty_json(b"<html>").is_none());
    }
}
