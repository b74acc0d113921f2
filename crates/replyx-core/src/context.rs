//! JSON-safe log context
//!
//! Context handed to the reporter is normalized into a JSON object before
//! it reaches a sink. Normalization never fails: values that cannot be
//! represented as JSON are coerced rather than raised.

use replyx_core_types::schema::CONTEXT_DATA;
use serde::Serialize;
use serde_json::{Map, Value};

/// Structured context attached to a [`crate::LogRecord`]
///
/// Always a JSON object:
/// - objects pass through unchanged
/// - `null` and serialization failures become `{}`
/// - any other value is wrapped as `{"data": value}`
///
/// # Example
///
/// ```
/// use replyx_core::LogContext;
/// use serde_json::json;
///
/// let ctx = LogContext::new()
///     .with("user_id", &42)
///     .with("tags", &vec!["a", "b"]);
///
/// assert_eq!(ctx.get("user_id"), Some(&json!(42)));
/// assert_eq!(LogContext::from_value(json!("plain")).get("data"), Some(&json!("plain")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LogContext(Map<String, Value>);

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize any serializable value
    pub fn from_serialize<T: Serialize + ?Sized>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self::from_value(value),
            Err(err) => {
                tracing::debug!(
                    target: replyx_core_types::schema::INTERNAL_TARGET,
                    error = %err,
                    "log context not representable as JSON, dropped"
                );
                Self::default()
            }
        }
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            Value::Null => Self::default(),
            other => {
                let mut map = Map::new();
                map.insert(CONTEXT_DATA.to_string(), other);
                Self(map)
            }
        }
    }

    /// Add one entry; a value that cannot be represented as JSON is stored
    /// as `null` without affecting the other entries
    pub fn with<T: Serialize + ?Sized>(mut self, key: impl Into<String>, value: &T) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<T: Serialize + ?Sized>(&mut self, key: impl Into<String>, value: &T) {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Value> for LogContext {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<Map<String, Value>> for LogContext {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<()> for LogContext {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde_json::json;
    use std::collections::HashMap;

    /// Stands in for a resource handle: serialization always fails
    struct Handle;

    impl Serialize for Handle {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("resource handles are not serializable"))
        }
    }

    #[test]
    fn test_object_passes_through() {
        let ctx = LogContext::from_value(json!({"a": 1, "b": [true]}));
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.get("b"), Some(&json!([true])));
    }

    #[test]
    fn test_null_becomes_empty() {
        assert!(LogContext::from_value(Value::Null).is_empty());
    }

    #[test]
    fn test_scalars_and_arrays_are_wrapped() {
        assert_eq!(
            LogContext::from_value(json!([1, 2])).get("data"),
            Some(&json!([1, 2]))
        );
        assert_eq!(LogContext::from_value(json!(false)).get("data"), Some(&json!(false)));
    }

    #[test]
    fn test_unserializable_value_never_panics() {
        let ctx = LogContext::from_serialize(&Handle);
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_non_string_keys_are_dropped() {
        let mut map = HashMap::new();
        map.insert(vec![1u8], "x");
        assert!(LogContext::from_serialize(&map).is_empty());
    }

    #[test]
    fn test_bad_entry_does_not_poison_others() {
        let ctx = LogContext::new().with("handle", &Handle).with("id", &7);
        assert_eq!(ctx.get("handle"), Some(&Value::Null));
        assert_eq!(ctx.get("id"), Some(&json!(7)));
    }

    #[test]
    fn test_non_finite_floats_become_null() {
        let ctx = LogContext::new().with("ratio", &f64::NAN);
        assert_eq!(ctx.get("ratio"), Some(&Value::Null));
    }
}
