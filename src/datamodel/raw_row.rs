use serde_json::Value;

/// A value as produced by a fetcher, before flattening.
///
/// JSON documents may nest mappings and sequences arbitrarily, while CSV and
/// PC-Axis rows only ever contain scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Scalar(String),
    Mapping(RawRow),
    Sequence(Vec<RawValue>),
}

impl RawValue {
    pub fn is_scalar(&self) -> bool {
        matches!(self, RawValue::Null | RawValue::Scalar(_))
    }

    /// Text rendering of a scalar. Nested values render as an empty string.
    pub fn scalar_text(&self) -> &str {
        match self {
            RawValue::Scalar(text) => text,
            _ => "",
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Scalar(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Scalar(value)
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Scalar(b.to_string()),
            Value::Number(n) => RawValue::Scalar(n.to_string()),
            Value::String(s) => RawValue::Scalar(s.trim().to_string()),
            Value::Array(items) => {
                RawValue::Sequence(items.into_iter().map(RawValue::from).collect())
            }
            Value::Object(map) => RawValue::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, RawValue::from(value)))
                    .collect(),
            ),
        }
    }
}

/// An ordered mapping from source column key to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: Vec<(String, RawValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field. A repeated key replaces the earlier value in place.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (K, RawValue)>>(iter: T) -> Self {
        let mut row = RawRow::new();
        for (key, value) in iter {
            row.push(key, value);
        }
        row
    }
}

impl From<Value> for RawRow {
    /// Objects keep their fields, anything else becomes a single `value` field.
    fn from(value: Value) -> Self {
        match RawValue::from(value) {
            RawValue::Mapping(row) => row,
            other => {
                let mut row = RawRow::new();
                row.push("value", other);
                row
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_insertion_order() {
        let row = RawRow::from(json!({"zeta": 1, "alpha": "a", "mid": null}));
        let keys: Vec<&str> = row.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(row.get("zeta"), Some(&RawValue::Scalar("1".to_string())));
        assert_eq!(row.get("mid"), Some(&RawValue::Null));
    }

    #[test]
    fn test_non_object_becomes_value_field() {
        let row = RawRow::from(json!(" 42 "));
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("value"), Some(&RawValue::Scalar("42".to_string())));
    }

    #[test]
    fn test_nested_structures() {
        let value = RawValue::from(json!({"a": [1, {"b": true}]}));
        let RawValue::Mapping(row) = value else {
            panic!("expected a mapping");
        };
        let Some(RawValue::Sequence(items)) = row.get("a") else {
            panic!("expected a sequence");
        };
        assert!(items[0].is_scalar());
        assert!(!items[1].is_scalar());
    }

    #[test]
    fn test_push_replaces_existing_key() {
        let mut row = RawRow::new();
        row.push("a", "1");
        row.push("b", "2");
        row.push("a", "3");
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("a").map(RawValue::scalar_text), Some("3"));
    }
}
