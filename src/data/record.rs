use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// A single field value in a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "JsonValue", into = "JsonValue")]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<FieldValue>),
    Record(Record),
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value, used for cross Integer/Float comparison
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Name of the variant, for debug output
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "string",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::List(_) => "list",
            FieldValue::Record(_) => "record",
            FieldValue::Null => "null",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            FieldValue::Record(record) => {
                write!(f, "{}", JsonValue::Object(record.clone().into()))
            }
            FieldValue::Null => write!(f, ""),
        }
    }
}

impl From<JsonValue> for FieldValue {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => FieldValue::Null,
            JsonValue::Bool(b) => FieldValue::Boolean(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    FieldValue::Float(f)
                } else {
                    FieldValue::String(n.to_string())
                }
            }
            JsonValue::String(s) => FieldValue::String(s),
            JsonValue::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            JsonValue::Object(map) => FieldValue::Record(Record::from(map)),
        }
    }
}

impl From<FieldValue> for JsonValue {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::String(s) => JsonValue::String(s),
            FieldValue::Integer(i) => JsonValue::from(i),
            // NaN and infinities have no JSON form
            FieldValue::Float(f) => serde_json::Number::from_f64(f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            FieldValue::Boolean(b) => JsonValue::Bool(b),
            FieldValue::List(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
            FieldValue::Record(record) => JsonValue::Object(record.into()),
            FieldValue::Null => JsonValue::Null,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Integer(i64::from(i))
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Integer(i64::from(i))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<Record> for FieldValue {
    fn from(record: Record) -> Self {
        FieldValue::Record(record)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// One row of domain data: field names mapped to values, in insertion order.
///
/// Field order matters for export, where the first record seen decides the
/// CSV column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, JsonValue>", into = "Map<String, JsonValue>")]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field. Replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Look up a nested value with a dotted path, e.g. `baselineData.chronicConditions`
    pub fn get_path(&self, path: &str) -> Option<&FieldValue> {
        let mut parts = path.split('.');
        let mut current = self.get(parts.next()?)?;
        for part in parts {
            match current {
                FieldValue::Record(inner) => current = inner.get(part)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Display text of a field; missing and null fields are empty
    pub fn display_value(&self, name: &str) -> String {
        self.get(name).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, JsonValue>> for Record {
    fn from(map: Map<String, JsonValue>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, FieldValue::from(v)))
                .collect(),
        }
    }
}

impl From<Record> for Map<String, JsonValue> {
    fn from(record: Record) -> Self {
        record
            .fields
            .into_iter()
            .map(|(k, v)| (k, JsonValue::from(v)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_displays_as_empty() {
        assert_eq!(FieldValue::Null.to_string(), "");
        let record = Record::new().with("a", FieldValue::Null);
        assert_eq!(record.display_value("a"), "");
        assert_eq!(record.display_value("missing"), "");
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut record = Record::new().with("b", 1).with("a", 2);
        record.insert("b", 3);
        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(record.get("b"), Some(&FieldValue::Integer(3)));
    }

    #[test]
    fn test_from_json_preserves_key_order() {
        let record: Record = serde_json::from_value(json!({
            "zeta": "z",
            "alpha": 1,
            "mid": 2.5,
            "flag": true,
            "none": null
        }))
        .unwrap();

        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid", "flag", "none"]);
        assert_eq!(record.get("alpha"), Some(&FieldValue::Integer(1)));
        assert_eq!(record.get("mid"), Some(&FieldValue::Float(2.5)));
        assert_eq!(record.get("flag"), Some(&FieldValue::Boolean(true)));
        assert!(record.get("none").unwrap().is_null());
    }

    #[test]
    fn test_nested_path_lookup() {
        let record: Record = serde_json::from_value(json!({
            "id": "U001",
            "baselineData": {
                "chronicConditions": ["Diabetes", "Hypertension"]
            }
        }))
        .unwrap();

        let conditions = record.get_path("baselineData.chronicConditions").unwrap();
        assert_eq!(conditions.to_string(), "Diabetes, Hypertension");
        assert!(record.get_path("baselineData.missing").is_none());
        assert!(record.get_path("id.deeper").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let record = Record::new()
            .with("name", "Amy")
            .with("score", 87)
            .with("tags", vec!["a", "b"]);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, json!({"name": "Amy", "score": 87, "tags": ["a", "b"]}));
    }
}
