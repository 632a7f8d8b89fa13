//! Route parameters and how they are put on the wire.

use bytes::Bytes;
use serde_json::Value;

use crate::{ApiError, Result};

/// Where a route's parameters go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamEncoding {
    /// Appended to the URL query string.
    Query,
    /// Sent as a JSON object body.
    Json,
}

/// Ordered key-value parameters of a route.
///
/// # Example
///
/// ```
/// use reel_core::Parameters;
///
/// let params = Parameters::new().with("page", 2).with("region", "FR");
/// assert_eq!(
///     params.query_pairs(),
///     vec![
///         ("page".to_string(), "2".to_string()),
///         ("region".to_string(), "FR".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(Vec<(String, Value)>);

impl Parameters {
    /// Creates empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, keeping declaration order.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a parameter in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.push((key.into(), value.into()));
    }

    /// Builds parameters from any value serializing to a JSON object.
    pub fn from_serialize<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self> {
        match serde_json::to_value(value).map_err(ApiError::network)? {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(ApiError::network(format!(
                "parameters must serialize to an object, got {other}"
            ))),
        }
    }

    /// Number of top-level parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Flattens the parameters into query-string pairs.
    ///
    /// Booleans become `1`/`0`, arrays repeat `key[]`, nested objects use
    /// `key[field]`, nulls are dropped.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.0.len());
        for (key, value) in &self.0 {
            flatten(key, value, &mut pairs);
        }
        pairs
    }

    /// Serializes the parameters as one JSON object.
    pub fn to_json_body(&self) -> Result<Bytes> {
        let object: serde_json::Map<String, Value> = self.0.iter().cloned().collect();
        crate::to_json(&object)
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

fn flatten(key: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => out.push((key.to_owned(), if *flag { "1" } else { "0" }.to_owned())),
        Value::Number(number) => out.push((key.to_owned(), number.to_string())),
        Value::String(text) => out.push((key.to_owned(), text.clone())),
        Value::Array(items) => {
            let nested = format!("{key}[]");
            for item in items {
                flatten(&nested, item, out);
            }
        }
        Value::Object(fields) => {
            for (field, item) in fields {
                flatten(&format!("{key}[{field}]"), item, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn scalars_keep_order() {
        let params = Parameters::new()
            .with("page", 1)
            .with("query", "star wars")
            .with("adult", false)
            .with("min_vote", 7.5);

        assert_eq!(
            params.query_pairs(),
            vec![
                pair("page", "1"),
                pair("query", "star wars"),
                pair("adult", "0"),
                pair("min_vote", "7.5"),
            ]
        );
    }

    #[test]
    fn nested_values_flatten_with_brackets() {
        let params = Parameters::new()
            .with("ids", serde_json::json!([1, 2]))
            .with("filter", serde_json::json!({"year": 2024}))
            .with("missing", Value::Null);

        assert_eq!(
            params.query_pairs(),
            vec![
                pair("ids[]", "1"),
                pair("ids[]", "2"),
                pair("filter[year]", "2024"),
            ]
        );
    }

    #[test]
    fn json_body_is_an_object() {
        let params = Parameters::new().with("value", 8.5);
        let body = params.to_json_body().expect("body");
        assert_eq!(body.as_ref(), br#"{"value":8.5}"#);
    }

    #[test]
    fn from_serialize_requires_object() {
        #[derive(serde::Serialize)]
        struct Search {
            query: String,
        }

        let params = Parameters::from_serialize(&Search {
            query: "dune".to_string(),
        })
        .expect("object");
        assert_eq!(params.query_pairs(), vec![pair("query", "dune")]);

        let result = Parameters::from_serialize(&[1, 2, 3]);
        assert!(matches!(result, Err(ApiError::Network(_))));
    }

    #[test]
    fn collects_from_pairs() {
        let params: Parameters = [("page", 3)].into_iter().collect();
        assert_eq!(params.len(), 1);
        assert!(!params.is_empty());
        assert_eq!(params.iter().next().map(|(k, _)| k), Some("page"));
    }
}
