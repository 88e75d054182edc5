//! Request parameter maps.
//!
//! [`Params`] is the string-keyed map that resources serialize to and that
//! callers pass to collection queries. It keeps JSON values so batch bodies
//! can carry them unchanged, and converts to query strings with
//! [`Params::to_query`].

use std::collections::HashMap;

use serde_json::{Map, Value};

/// An ordered map of request parameters.
///
/// # Example
///
/// ```rust
/// use twitter_ads::rest::Params;
///
/// let params = Params::new()
///     .with("count", 200)
///     .with("with_deleted", true)
///     .with_list("line_item_ids", ["a1", "b2"]);
///
/// let query = params.to_query();
/// assert_eq!(query["count"], "200");
/// assert_eq!(query["with_deleted"], "true");
/// assert_eq!(query["line_item_ids"], "a1,b2");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    /// Creates an empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a list parameter flattened to a comma-separated string.
    ///
    /// An empty list is omitted.
    #[must_use]
    pub fn with_list<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let joined = values
            .into_iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(",");
        if !joined.is_empty() {
            self.0.insert(key.into(), Value::String(joined));
        }
        self
    }

    /// Inserts a parameter. A `null` value removes the key instead.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        match value.into() {
            Value::Null => {
                self.0.remove(&key);
            }
            value => {
                self.0.insert(key, value);
            }
        }
    }

    /// Inserts every parameter of `other`, replacing existing keys.
    pub fn extend(&mut self, other: Self) {
        for (key, value) in other.0 {
            self.insert(key, value);
        }
    }

    /// Removes a parameter.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Returns a parameter value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the parameter names in order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Converts the parameters to query string values.
    ///
    /// Strings are used as-is, numbers and booleans are stringified, arrays
    /// are comma-joined (empty arrays and `null`s are skipped) and objects are
    /// sent as JSON.
    #[must_use]
    pub fn to_query(&self) -> HashMap<String, String> {
        let mut query = HashMap::new();

        for (key, value) in &self.0 {
            match value {
                Value::Null => {}
                Value::String(s) => {
                    query.insert(key.clone(), s.clone());
                }
                Value::Number(n) => {
                    query.insert(key.clone(), n.to_string());
                }
                Value::Bool(b) => {
                    query.insert(key.clone(), b.to_string());
                }
                Value::Array(arr) => {
                    let values: Vec<String> = arr
                        .iter()
                        .filter(|v| !v.is_null())
                        .map(value_to_string)
                        .collect();
                    if !values.is_empty() {
                        query.insert(key.clone(), values.join(","));
                    }
                }
                Value::Object(_) => {
                    query.insert(key.clone(), value.to_string());
                }
            }
        }

        query
    }
}

/// The string form of a scalar JSON value: strings unquoted, others as JSON.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        let mut params = Self::new();
        for (key, value) in map {
            params.insert(key, value);
        }
        params
    }
}

impl From<Params> for Value {
    fn from(params: Params) -> Self {
        Self::Object(params.0)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
