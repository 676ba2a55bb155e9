use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::SchemaError;

pub mod entry;

pub use entry::{CreatorEntry, FieldEntry};

/// The parts of the Zotero schema we care about. Every section is optional in the
/// document and defaults to empty. Labels, keys and CSL members of the wrong type are
/// dropped rather than failing the whole document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Schema {
    #[serde(deserialize_with = "lenient_version")]
    pub version: Option<u64>,
    pub item_types: Vec<ItemType>,
    pub locales: IndexMap<String, Locale>,
    pub csl: Csl,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemType {
    #[serde(deserialize_with = "lenient_key")]
    pub item_type: Option<String>,
    pub fields: Vec<FieldEntry>,
    pub creator_types: Vec<CreatorEntry>,
}

/// Human readable labels for one locale.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Locale {
    #[serde(deserialize_with = "string_map")]
    pub item_types: IndexMap<String, String>,
    #[serde(deserialize_with = "string_map")]
    pub fields: IndexMap<String, String>,
    #[serde(deserialize_with = "string_map")]
    pub creator_types: IndexMap<String, String>,
}

impl Locale {
    pub fn item_type_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.item_types.get(key).map_or(key, String::as_str)
    }

    pub fn field_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.fields.get(key).map_or(key, String::as_str)
    }

    pub fn creator_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.creator_types.get(key).map_or(key, String::as_str)
    }
}

/// The CSL mapping table.
///
/// `types` maps a CSL type to the Zotero item types it covers, `fields` holds
/// categories that are either nested (CSL variable -> Zotero fields) or flat (a list
/// of Zotero fields that map to the category name itself), and `names` maps a Zotero
/// creator type straight to a CSL name variable.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Csl {
    #[serde(deserialize_with = "string_list_map")]
    pub types: IndexMap<String, Vec<String>>,
    pub fields: IndexMap<String, Category>,
    #[serde(deserialize_with = "string_map")]
    pub names: IndexMap<String, String>,
}

/// Subfields and members are kept as raw JSON; the vocabulary index skips the ones
/// that are not lists of strings without losing the rest of the category.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Nested(IndexMap<String, Value>),
    Flat(Vec<Value>),
    /// Anything else never matches.
    Unknown(Value),
}

/// String members of a CSL membership list.
pub fn members(list: &[Value]) -> impl Iterator<Item = &str> {
    list.iter().filter_map(Value::as_str)
}

fn lenient_version<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    Ok(Value::deserialize(d)?.as_u64())
}

fn lenient_key<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn string_map<'de, D: Deserializer<'de>>(d: D) -> Result<IndexMap<String, String>, D::Error> {
    let Value::Object(map) = Value::deserialize(d)? else {
        return Ok(IndexMap::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::String(s) => Some((k, s)),
            _ => None,
        })
        .collect())
}

fn string_list_map<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<IndexMap<String, Vec<String>>, D::Error> {
    let Value::Object(map) = Value::deserialize(d)? else {
        return Ok(IndexMap::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::Array(list) => Some((k, members(&list).map(str::to_string).collect())),
            _ => None,
        })
        .collect())
}

impl Schema {
    /// Parse a schema document. An empty document (`{}`, `null`, `[]`, `""`) is
    /// rejected since it means the source handed back nothing useful.
    pub fn from_json(body: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(body)?;
        let empty = match &value {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(list) => list.is_empty(),
            Value::String(s) => s.is_empty(),
            _ => false,
        };
        if empty {
            return Err(SchemaError::Empty);
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn locale(&self, id: &str) -> Result<&Locale, SchemaError> {
        self.locales
            .get(id)
            .ok_or_else(|| SchemaError::MissingLocale(id.to_string()))
    }
}
