use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Record identifier. Servers hand out strings (UUIDs) or numbers; anything
/// else is kept verbatim so a record never fails to load because of its id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MolluskId {
    Text(String),
    Number(Number),
    Other(Value),
}

impl fmt::Display for MolluskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MolluskId::Text(s) => f.write_str(s),
            MolluskId::Number(n) => write!(f, "{}", n),
            MolluskId::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for MolluskId {
    fn from(s: &str) -> Self {
        MolluskId::Text(s.to_string())
    }
}

impl From<String> for MolluskId {
    fn from(s: String) -> Self {
        MolluskId::Text(s)
    }
}

impl From<i64> for MolluskId {
    fn from(n: i64) -> Self {
        MolluskId::Number(n.into())
    }
}

impl From<Value> for MolluskId {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => MolluskId::Text(s),
            Value::Number(n) => MolluskId::Number(n),
            other => MolluskId::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for MolluskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(MolluskId::from)
    }
}

/// A mollusk record. Only `id` is named; everything else rides along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mollusk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MolluskId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Mollusk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a field. Setting `id` updates the identifier instead of the opaque map.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if key == "id" {
            self.id = match value {
                Value::Null => None,
                other => Some(MolluskId::from(other)),
            };
        } else {
            self.fields.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Looks up a field by name for template parameter binding (`@field`).
    pub fn lookup(&self, key: &str) -> Option<String> {
        if key == "id" {
            return self.id.as_ref().map(ToString::to_string);
        }
        match self.fields.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_id_and_opaque_fields_pass_through() {
        let raw = json!({"id": 1, "name": "Clam", "shell": {"spiral": false}});
        let mollusk: Mollusk = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(mollusk.id, Some(MolluskId::from(1)));
        assert_eq!(mollusk.get("name"), Some(&json!("Clam")));
        assert_eq!(serde_json::to_value(&mollusk).unwrap(), raw);
    }

    #[test]
    fn test_missing_id_is_not_serialized() {
        let mollusk = Mollusk::new().with_field("name", "Whelk");
        assert_eq!(
            serde_json::to_value(&mollusk).unwrap(),
            json!({"name": "Whelk"})
        );
    }

    #[test]
    fn test_set_id_goes_to_identifier() {
        let mut mollusk = Mollusk::new();
        mollusk.set("id", "abc-123");
        assert_eq!(mollusk.id, Some(MolluskId::from("abc-123")));
        assert!(mollusk.fields.is_empty());
        assert_eq!(mollusk.lookup("id").as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_lookup_renders_non_strings() {
        let mollusk = Mollusk::new().with_field("arms", 8).with_field("note", Value::Null);
        assert_eq!(mollusk.lookup("arms").as_deref(), Some("8"));
        assert_eq!(mollusk.lookup("note"), None);
        assert_eq!(mollusk.lookup("missing"), None);
    }

    #[test]
    fn test_unusual_ids_load_and_round_trip() {
        let raw = json!([
            {"id": 1, "name": "Clam"},
            {"id": 2.5, "name": "Odd"},
            {"id": 18446744073709551615u64, "name": "Huge"},
            {"id": true, "name": "Flag"},
            {"id": [1, 2], "name": "Pair"}
        ]);
        let mollusks: Vec<Mollusk> = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(mollusks.len(), 5);
        assert_eq!(mollusks[1].lookup("id").as_deref(), Some("2.5"));
        assert_eq!(
            mollusks[2].lookup("id").as_deref(),
            Some("18446744073709551615")
        );
        assert_eq!(mollusks[3].id, Some(MolluskId::Other(json!(true))));
        assert_eq!(mollusks[4].lookup("id").as_deref(), Some("[1,2]"));
        assert_eq!(serde_json::to_value(&mollusks).unwrap(), raw);
    }

    #[test]
    fn test_set_keeps_any_id_value() {
        let float = Mollusk::new().with_field("id", 2.5).with_field("name", "Odd");
        assert_eq!(
            serde_json::to_value(&float).unwrap(),
            json!({"id": 2.5, "name": "Odd"})
        );

        let huge = Mollusk::new().with_field("id", u64::MAX);
        assert_eq!(huge.lookup("id").as_deref(), Some("18446744073709551615"));

        let pair = Mollusk::new().with_field("id", json!([1, 2]));
        assert_eq!(serde_json::to_value(&pair).unwrap(), json!({"id": [1, 2]}));

        let mut cleared = Mollusk::new().with_field("id", 3);
        cleared.set("id", Value::Null);
        assert_eq!(cleared.id, None);
    }
}
