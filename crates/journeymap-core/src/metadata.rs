use serde_json::{Map, Value};

/// Untyped metadata bag for one photo, as produced by an EXIF-style
/// extractor. Fields are optional and loosely typed; every accessor is
/// total and reads a missing or mistyped field as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetadataRecord(Map<String, Value>);

impl RawMetadataRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value; anything but an object is an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self(Map::new()),
        }
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric field; numeric strings are tolerated.
    pub fn number(&self, key: &str) -> Option<f64> {
        number_of(self.0.get(key)?)
    }

    /// String field.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.as_str()
    }

    /// Nested object field.
    pub fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.0.get(key)?.as_object()
    }
}

/// Read a JSON value as a float, accepting numbers and numeric strings.
pub fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
