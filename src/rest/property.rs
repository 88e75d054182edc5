//! Declarative property schemas for resources.
//!
//! Each resource kind declares a `const` table of [`Property`] descriptors.
//! [`Properties`] holds the values of one instance and maps them to and from
//! the API's JSON representation:
//!
//! - [`Properties::from_response`] reads every declared property from a JSON
//!   object, applying the property's [`Transform`].
//! - [`Properties::to_params`] produces the request parameters for the
//!   writable properties that are set.
//!
//! # Example
//!
//! ```rust
//! use twitter_ads::rest::{Properties, Property, PropertyValue, Transform};
//! use serde_json::json;
//!
//! const SCHEMA: &[Property] = &[
//!     Property::readonly("id"),
//!     Property::writable("name"),
//!     Property::writable("paused").transform(Transform::Bool),
//! ];
//!
//! let mut props = Properties::new("Example", SCHEMA);
//! props.from_response(&json!({"id": "abc", "name": "launch"}));
//! props.set("paused", true).unwrap();
//!
//! let params = props.to_params();
//! assert_eq!(params.get("name"), Some(&json!("launch")));
//! assert_eq!(params.get("paused"), Some(&json!("true")));
//! assert!(params.get("id").is_none());
//! assert_eq!(props.get("id"), Some(&PropertyValue::String("abc".into())));
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::rest::errors::ResourceError;
use crate::rest::params::{value_to_string, Params};

/// Format used when sending timestamps to the API.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Coercion applied to a property when it is read from a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transform {
    /// ISO-8601 timestamp, parsed to [`DateTime<Utc>`].
    Time,
    /// Boolean; `"true"`/`"false"` strings are accepted.
    Bool,
    /// Integer; numeric strings are accepted.
    Int,
    /// List of values.
    List,
    /// Nested JSON object, kept as-is.
    Object,
}

/// A declared default for a property, applied when an instance is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyDefault {
    /// A boolean default.
    Bool(bool),
    /// An integer default.
    Int(i64),
    /// A string default.
    Str(&'static str),
}

impl From<PropertyDefault> for PropertyValue {
    fn from(default: PropertyDefault) -> Self {
        match default {
            PropertyDefault::Bool(b) => Self::Bool(b),
            PropertyDefault::Int(i) => Self::Int(i),
            PropertyDefault::Str(s) => Self::String(s.to_string()),
        }
    }
}

/// Descriptor of one property of a resource kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Property {
    /// The JSON key and parameter name.
    pub name: &'static str,
    /// Read-only properties are never sent and cannot be set by callers.
    pub readonly: bool,
    /// Coercion applied when reading a response.
    pub transform: Option<Transform>,
    /// Value applied when an instance is created.
    pub default: Option<PropertyDefault>,
}

impl Property {
    /// A property callers may set.
    #[must_use]
    pub const fn writable(name: &'static str) -> Self {
        Self {
            name,
            readonly: false,
            transform: None,
            default: None,
        }
    }

    /// A property only the API sets.
    #[must_use]
    pub const fn readonly(name: &'static str) -> Self {
        Self {
            name,
            readonly: true,
            transform: None,
            default: None,
        }
    }

    /// Sets the transform.
    #[must_use]
    pub const fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Sets the default value.
    #[must_use]
    pub const fn default_value(mut self, default: PropertyDefault) -> Self {
        self.default = Some(default);
        self
    }
}

/// The value of a property.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string, including ids and enum values.
    String(String),
    /// A timestamp.
    Time(DateTime<Utc>),
    /// A list of JSON values.
    List(Vec<Value>),
    /// A JSON object.
    Object(Map<String, Value>),
}

impl PropertyValue {
    /// Converts a response value, applying `transform`.
    ///
    /// Returns `None` for `null`.
    #[must_use]
    pub fn from_json(value: &Value, transform: Option<Transform>) -> Option<Self> {
        match (transform, value) {
            (_, Value::Null) => None,
            (Some(Transform::Time), Value::String(s)) => {
                Some(parse_time(s).map_or_else(|| Self::String(s.clone()), Self::Time))
            }
            (Some(Transform::Bool), Value::String(s)) if s == "true" || s == "false" => {
                Some(Self::Bool(s == "true"))
            }
            (Some(Transform::Int), Value::String(s)) => Some(
                s.trim()
                    .parse::<i64>()
                    .map_or_else(|_| Self::String(s.clone()), Self::Int),
            ),
            (Some(Transform::List), value) if !value.is_array() && !value.is_object() => {
                Some(Self::List(vec![value.clone()]))
            }
            (_, value) => Some(Self::from(value.clone())),
        }
    }

    /// Returns the JSON form of this value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::String(s) => Value::String(s.clone()),
            Self::Time(t) => Value::String(t.format(TIME_FORMAT).to_string()),
            Self::List(items) => Value::Array(items.clone()),
            Self::Object(map) => Value::Object(map.clone()),
        }
    }

    /// Returns the string if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer value.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the timestamp if this is a time value.
    #[must_use]
    pub const fn as_time(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Time(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the items if this is a list value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or_default()), Self::Int),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items),
            Value::Object(map) => Self::Object(map),
            Value::Null => Self::String(String::new()),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Time(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for PropertyValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<Map<String, Value>> for PropertyValue {
    fn from(value: Map<String, Value>) -> Self {
        Self::Object(value)
    }
}

/// Parses an API timestamp. Offsets are normalized to UTC; timestamps
/// without an offset are taken as UTC.
fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
}

/// The property values of one resource instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Properties {
    resource: &'static str,
    schema: &'static [Property],
    values: BTreeMap<&'static str, PropertyValue>,
}

impl Properties {
    /// Creates a value set for `schema` with the declared defaults applied.
    #[must_use]
    pub fn new(resource: &'static str, schema: &'static [Property]) -> Self {
        let values = schema
            .iter()
            .filter_map(|p| p.default.map(|d| (p.name, PropertyValue::from(d))))
            .collect();
        Self {
            resource,
            schema,
            values,
        }
    }

    /// Returns the resource type name.
    #[must_use]
    pub const fn resource(&self) -> &'static str {
        self.resource
    }

    /// Returns the declared schema.
    #[must_use]
    pub const fn schema(&self) -> &'static [Property] {
        self.schema
    }

    /// Returns the descriptor for `name`.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&'static Property> {
        self.schema.iter().find(|p| p.name == name)
    }

    /// Returns the value of `name`, or `None` when it is unset or undeclared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    /// Returns `true` if `name` has a value.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Sets a writable property.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownProperty`] for undeclared names and
    /// [`ResourceError::ReadOnlyProperty`] for read-only ones.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<(), ResourceError> {
        let property = self.writable(name)?;
        self.values.insert(property.name, value.into());
        Ok(())
    }

    /// Unsets a writable property.
    ///
    /// # Errors
    ///
    /// Same as [`set`](Self::set).
    pub fn clear(&mut self, name: &str) -> Result<Option<PropertyValue>, ResourceError> {
        let property = self.writable(name)?;
        Ok(self.values.remove(property.name))
    }

    fn writable(&self, name: &str) -> Result<&'static Property, ResourceError> {
        let property = self
            .property(name)
            .ok_or_else(|| ResourceError::UnknownProperty {
                resource: self.resource,
                property: name.to_string(),
            })?;
        if property.readonly {
            return Err(ResourceError::ReadOnlyProperty {
                resource: self.resource,
                property: name.to_string(),
            });
        }
        Ok(property)
    }

    /// Sets any declared property, read-only ones included. Undeclared names
    /// are ignored.
    pub(crate) fn set_unchecked(&mut self, name: &str, value: Option<PropertyValue>) {
        let Some(property) = self.property(name) else {
            return;
        };
        match value {
            Some(value) => {
                self.values.insert(property.name, value);
            }
            None => {
                self.values.remove(property.name);
            }
        }
    }

    /// Returns the `id` property as a string.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.values.get("id")? {
            PropertyValue::String(s) if !s.is_empty() => Some(s.clone()),
            PropertyValue::Int(i) => Some(i.to_string()),
            _ => None,
        }
    }

    /// Populates the values from a JSON object.
    ///
    /// Every declared property is read from the same-named key:
    /// - a JSON integer `0` is skipped and the current value kept
    /// - `null` or an absent key unsets the property
    /// - other values are converted with the property's transform
    ///
    /// Keys the schema does not declare are ignored. A non-object `data`
    /// leaves the values untouched.
    #[allow(clippy::wrong_self_convention)]
    pub fn from_response(&mut self, data: &Value) -> &mut Self {
        let Some(object) = data.as_object() else {
            return self;
        };

        for property in self.schema {
            let value = object.get(property.name).unwrap_or(&Value::Null);
            if is_integer_zero(value) {
                continue;
            }
            match PropertyValue::from_json(value, property.transform) {
                Some(value) => {
                    self.values.insert(property.name, value);
                }
                None => {
                    self.values.remove(property.name);
                }
            }
        }

        self
    }

    /// Serializes the writable properties that are set.
    ///
    /// Timestamps are formatted as `%Y-%m-%dT%H:%M:%SZ`, lists are
    /// comma-joined (empty lists omitted) and booleans become `"true"` or
    /// `"false"`. Other values pass through unchanged.
    #[must_use]
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();

        for property in self.schema.iter().filter(|p| !p.readonly) {
            let Some(value) = self.values.get(property.name) else {
                continue;
            };
            match value {
                PropertyValue::Time(t) => {
                    params.insert(property.name, t.format(TIME_FORMAT).to_string());
                }
                PropertyValue::List(items) => {
                    if !items.is_empty() {
                        let joined = items
                            .iter()
                            .map(value_to_string)
                            .collect::<Vec<_>>()
                            .join(",");
                        params.insert(property.name, joined);
                    }
                }
                PropertyValue::Bool(b) => {
                    params.insert(property.name, b.to_string());
                }
                other => params.insert(property.name, other.to_json()),
            }
        }

        params
    }

    /// Iterates over the set values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PropertyValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }
}

/// `true` for a JSON integer zero; `0.0` and `false` do not count.
fn is_integer_zero(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_i64() == Some(0) || n.as_u64() == Some(0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const SCHEMA: &[Property] = &[
        Property::readonly("id"),
        Property::readonly("created_at").transform(Transform::Time),
        Property::readonly("deleted").transform(Transform::Bool),
        Property::writable("name"),
        Property::writable("count").transform(Transform::Int),
        Property::writable("paused").transform(Transform::Bool),
        Property::writable("start_time").transform(Transform::Time),
        Property::writable("placements").transform(Transform::List),
        Property::writable("bid"),
        Property::writable("entity_status").default_value(PropertyDefault::Str("PAUSED")),
    ];

    fn props() -> Properties {
        Properties::new("Example", SCHEMA)
    }

    #[test]
    fn test_defaults_are_applied() {
        let props = props();
        assert_eq!(
            props.get("entity_status").and_then(PropertyValue::as_str),
            Some("PAUSED")
        );
        assert!(!props.is_set("name"));
    }

    #[test]
    fn test_integer_zero_is_skipped() {
        let mut props = props();
        props.set("count", 5).unwrap();

        props.from_response(&json!({"count": 0}));
        assert_eq!(props.get("count"), Some(&PropertyValue::Int(5)));

        let mut fresh = Properties::new("Example", SCHEMA);
        fresh.from_response(&json!({"count": 0}));
        assert!(!fresh.is_set("count"));
    }

    #[test]
    fn test_float_zero_and_false_are_kept() {
        let mut props = props();
        props.from_response(&json!({"bid": 0.0, "paused": false}));

        assert_eq!(props.get("bid"), Some(&PropertyValue::Float(0.0)));
        assert_eq!(props.get("paused"), Some(&PropertyValue::Bool(false)));
    }

    #[test]
    fn test_null_and_absent_keys_unset() {
        let mut props = props();
        props.set("name", "old").unwrap();
        props.from_response(&json!({"name": null, "id": "abc"}));

        assert!(!props.is_set("name"));
        assert!(!props.is_set("entity_status"));
        assert_eq!(props.id(), Some("abc".to_string()));
    }

    #[test]
    fn test_unknown_response_keys_are_ignored() {
        let mut props = props();
        props.from_response(&json!({"id": "1", "surprise": true}));

        assert!(props.get("surprise").is_none());
        assert_eq!(props.iter().count(), 1);
    }

    #[test]
    fn test_time_transform_parses_iso8601() {
        let mut props = props();
        props.from_response(&json!({
            "created_at": "2016-03-01T12:30:00Z",
            "start_time": "2006-03-21T15:47:33",
        }));

        assert_eq!(
            props.get("created_at").and_then(PropertyValue::as_time),
            Some(&Utc.with_ymd_and_hms(2016, 3, 1, 12, 30, 0).unwrap())
        );
        assert_eq!(
            props.get("start_time").and_then(PropertyValue::as_time),
            Some(&Utc.with_ymd_and_hms(2006, 3, 21, 15, 47, 33).unwrap())
        );
    }

    #[test]
    fn test_unparseable_time_is_kept_as_string() {
        let mut props = props();
        props.from_response(&json!({"created_at": "yesterday"}));
        assert_eq!(
            props.get("created_at"),
            Some(&PropertyValue::String("yesterday".to_string()))
        );
    }

    #[test]
    fn test_bool_and_int_transforms_coerce_strings() {
        let mut props = props();
        props.from_response(&json!({"deleted": "true", "count": "42"}));

        assert_eq!(props.get("deleted"), Some(&PropertyValue::Bool(true)));
        assert_eq!(props.get("count"), Some(&PropertyValue::Int(42)));
    }

    #[test]
    fn test_to_params_excludes_readonly_and_unset() {
        let mut props = props();
        props.from_response(&json!({
            "id": "abc",
            "deleted": true,
            "name": "launch",
        }));

        let params = props.to_params();
        let mut keys: Vec<_> = params.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["name"]);
    }

    #[test]
    fn test_to_params_formats_values() {
        let mut props = Properties::new("Example", SCHEMA);
        props
            .set(
                "start_time",
                Utc.with_ymd_and_hms(2017, 1, 2, 3, 4, 5).unwrap(),
            )
            .unwrap();
        props.set("placements", vec![1, 2, 3]).unwrap();
        props.set("paused", true).unwrap();
        props.set("count", 7).unwrap();

        let params = props.to_params();
        assert_eq!(params.get("start_time"), Some(&json!("2017-01-02T03:04:05Z")));
        assert_eq!(params.get("placements"), Some(&json!("1,2,3")));
        assert_eq!(params.get("paused"), Some(&json!("true")));
        assert_eq!(params.get("count"), Some(&json!(7)));
    }

    #[test]
    fn test_empty_list_is_omitted() {
        let mut props = props();
        props.set("placements", Vec::<Value>::new()).unwrap();
        assert!(!props.to_params().contains_key("placements"));
    }

    #[test]
    fn test_set_rejects_readonly_and_unknown() {
        let mut props = props();

        assert!(matches!(
            props.set("id", "x"),
            Err(ResourceError::ReadOnlyProperty { property, .. }) if property == "id"
        ));
        assert!(matches!(
            props.set("nope", "x"),
            Err(ResourceError::UnknownProperty { property, .. }) if property == "nope"
        ));
    }

    #[test]
    fn test_clear_unsets_writable_property() {
        let mut props = props();
        props.set("name", "x").unwrap();

        assert_eq!(
            props.clear("name").unwrap(),
            Some(PropertyValue::String("x".to_string()))
        );
        assert!(!props.is_set("name"));
    }

    #[test]
    fn test_set_unchecked_reaches_readonly() {
        let mut props = props();
        props.set_unchecked("id", Some(PropertyValue::Int(12)));
        props.set_unchecked("undeclared", Some(PropertyValue::Bool(true)));

        assert_eq!(props.id(), Some("12".to_string()));
        assert!(props.get("undeclared").is_none());
    }

    #[test]
    fn test_list_transform_wraps_scalars() {
        let mut props = props();
        props.from_response(&json!({"placements": "ALL_ON_TWITTER"}));
        assert_eq!(
            props.get("placements").and_then(PropertyValue::as_list),
            Some(&[json!("ALL_ON_TWITTER")][..])
        );
    }
}
