//! Schema entries come in two shapes: a bare key (`"title"`) or a descriptor object
//! (`{"field": "bookTitle", "baseField": "publicationTitle"}`,
//! `{"creatorType": "author", "primary": true}`). Both are folded into tagged unions
//! here so nothing downstream has to inspect JSON.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum FieldEntry {
    Key(String),
    Descriptor {
        field: Option<String>,
        base_field: Option<String>,
        raw: Value,
    },
    /// Not a string nor an object. Kept so the row still shows up.
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum CreatorEntry {
    Key(String),
    Descriptor {
        creator_type: Option<String>,
        primary: bool,
        raw: Value,
    },
    Other(Value),
}

impl From<Value> for FieldEntry {
    fn from(value: Value) -> Self {
        match value {
            Value::String(key) => FieldEntry::Key(key),
            Value::Object(map) => {
                let field = key_text(map.get("field"));
                let base_field = key_text(map.get("baseField"));
                FieldEntry::Descriptor {
                    field,
                    base_field,
                    raw: Value::Object(map),
                }
            }
            other => FieldEntry::Other(other),
        }
    }
}

impl From<Value> for CreatorEntry {
    fn from(value: Value) -> Self {
        match value {
            Value::String(key) => CreatorEntry::Key(key),
            Value::Object(map) => {
                let creator_type = key_text(map.get("creatorType"))
                    .or_else(|| key_text(map.get("type")));
                let primary = map.get("primary").is_some_and(truthy);
                CreatorEntry::Descriptor {
                    creator_type,
                    primary,
                    raw: Value::Object(map),
                }
            }
            other => CreatorEntry::Other(other),
        }
    }
}

impl FieldEntry {
    /// The canonical field key: the descriptor's `field`, then its `baseField`, then
    /// the JSON text of whatever we were given.
    pub fn key(&self) -> String {
        match self {
            FieldEntry::Key(key) => key.clone(),
            FieldEntry::Descriptor {
                field,
                base_field,
                raw,
            } => field
                .clone()
                .or_else(|| base_field.clone())
                .unwrap_or_else(|| raw.to_string()),
            FieldEntry::Other(raw) => raw.to_string(),
        }
    }

    /// The base field this entry specialises, if the schema names one.
    pub fn base_key(&self) -> Option<&str> {
        match self {
            FieldEntry::Descriptor { base_field, .. } => base_field.as_deref(),
            _ => None,
        }
    }
}

impl CreatorEntry {
    /// Returns `(role, primary)`.
    pub fn normalize(&self) -> (String, bool) {
        match self {
            CreatorEntry::Key(key) => (key.clone(), false),
            CreatorEntry::Descriptor {
                creator_type,
                primary,
                raw,
            } => (
                creator_type.clone().unwrap_or_else(|| raw.to_string()),
                *primary,
            ),
            CreatorEntry::Other(raw) => (raw.to_string(), false),
        }
    }
}

/// A descriptor attribute usable as a key: any truthy value, as text.
fn key_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(other) if truthy(other) => Some(other.to_string()),
        _ => None,
    }
}

/// Loose truthiness for flags that may not be real booleans.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(list) => !list.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(value: Value) -> FieldEntry {
        serde_json::from_value(value).expect("field entry")
    }

    fn creator(value: Value) -> CreatorEntry {
        serde_json::from_value(value).expect("creator entry")
    }

    #[test]
    fn bare_field_key_is_returned_unchanged() {
        proptest::proptest!(|(s in "\\PC*")| {
            proptest::prop_assert_eq!(field(json!(s.clone())).key(), s);
        })
    }

    #[test]
    fn bare_creator_key_is_never_primary() {
        proptest::proptest!(|(s in "\\PC*")| {
            proptest::prop_assert_eq!(creator(json!(s.clone())).normalize(), (s, false));
        })
    }

    #[test]
    fn descriptor_prefers_field_over_base_field() {
        let entry = field(json!({"field": "bookTitle", "baseField": "publicationTitle"}));
        assert_eq!(entry.key(), "bookTitle");
        assert_eq!(entry.base_key(), Some("publicationTitle"));
    }

    #[test]
    fn descriptor_falls_back_to_base_field() {
        let entry = field(json!({"baseField": "publicationTitle"}));
        assert_eq!(entry.key(), "publicationTitle");
    }

    #[test]
    fn empty_field_name_counts_as_absent() {
        let entry = field(json!({"field": "", "baseField": "date"}));
        assert_eq!(entry.key(), "date");
    }

    #[test]
    fn non_string_field_name_is_used_as_text() {
        assert_eq!(field(json!({"field": 5, "baseField": "date"})).key(), "5");
        assert_eq!(field(json!({"field": true})).key(), "true");
        assert_eq!(
            creator(json!({"creatorType": 9, "primary": true})).normalize(),
            ("9".to_string(), true)
        );
    }

    #[test]
    fn falsy_field_name_counts_as_absent() {
        assert_eq!(field(json!({"field": 0, "baseField": "date"})).key(), "date");
        assert_eq!(field(json!({"field": null, "baseField": "date"})).key(), "date");
        assert_eq!(field(json!({"field": [], "baseField": "date"})).key(), "date");
    }

    #[test]
    fn descriptor_without_keys_degrades_to_json_text() {
        let entry = field(json!({"label": "x"}));
        assert_eq!(entry.key(), r#"{"label":"x"}"#);
        assert_eq!(entry.base_key(), None);
    }

    #[test]
    fn unrecognised_field_shape_degrades_to_json_text() {
        assert_eq!(field(json!(42)).key(), "42");
        assert_eq!(field(json!(null)).key(), "null");
        assert_eq!(field(json!(["a"])).key(), r#"["a"]"#);
    }

    #[test]
    fn creator_descriptor_reads_primary_flag() {
        let entry = creator(json!({"creatorType": "author", "primary": true}));
        assert_eq!(entry.normalize(), ("author".to_string(), true));
        let entry = creator(json!({"creatorType": "editor"}));
        assert_eq!(entry.normalize(), ("editor".to_string(), false));
    }

    #[test]
    fn creator_descriptor_accepts_type_alias() {
        let entry = creator(json!({"type": "translator", "primary": 1}));
        assert_eq!(entry.normalize(), ("translator".to_string(), true));
    }

    #[test]
    fn creator_without_role_degrades_to_json_text() {
        let entry = creator(json!({"primary": false}));
        assert_eq!(entry.normalize(), (r#"{"primary":false}"#.to_string(), false));
        assert_eq!(creator(json!(7)).normalize(), ("7".to_string(), false));
    }

    #[test]
    fn entries_deserialize_inside_lists() {
        let fields: Vec<FieldEntry> =
            serde_json::from_str(r#"["title", {"field": "date"}, 3]"#).expect("list");
        let keys: Vec<_> = fields.iter().map(FieldEntry::key).collect();
        assert_eq!(keys, vec!["title", "date", "3"]);
    }
}
