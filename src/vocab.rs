use std::{collections::HashMap, fmt};

use indexmap::IndexMap;
use serde_json::Value;

use crate::schema::{Category, Csl, FieldEntry, members};

/// The result of a CSL lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapping {
    Variable(String),
    Unmapped,
}

impl Mapping {
    pub fn is_mapped(&self) -> bool {
        matches!(self, Mapping::Variable(_))
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mapping::Variable(v) => f.write_str(v),
            Mapping::Unmapped => f.write_str("no mapping"),
        }
    }
}

impl From<Option<&String>> for Mapping {
    fn from(value: Option<&String>) -> Self {
        value.map_or(Mapping::Unmapped, |v| Mapping::Variable(v.clone()))
    }
}

/// Inverse lookup tables over the CSL section of a schema, built once per run.
///
/// Scanning the CSL table in document order and keeping the first hit is the same as
/// inserting every membership into a map and never overwriting an existing key, so
/// that is what the indices are.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    fields: HashMap<String, String>,
    types: HashMap<String, String>,
    names: IndexMap<String, String>,
    redirects: IndexMap<String, String>,
}

impl Vocabulary {
    pub fn new(csl: &Csl) -> Self {
        let mut fields = HashMap::new();
        for (category, value) in &csl.fields {
            match value {
                Category::Nested(subfields) => {
                    for (variable, list) in subfields {
                        let Value::Array(list) = list else {
                            log::warn!("ignoring CSL field '{category}.{variable}': not a list");
                            continue;
                        };
                        for member in members(list) {
                            fields
                                .entry(member.to_string())
                                .or_insert_with(|| variable.clone());
                        }
                    }
                }
                Category::Flat(list) => {
                    for member in members(list) {
                        fields
                            .entry(member.to_string())
                            .or_insert_with(|| category.clone());
                    }
                }
                Category::Unknown(_) => {
                    log::warn!("ignoring CSL field category '{category}' of unknown shape");
                }
            }
        }

        let mut types = HashMap::new();
        for (csl_type, item_types) in &csl.types {
            for item_type in item_types {
                types
                    .entry(item_type.clone())
                    .or_insert_with(|| csl_type.clone());
            }
        }

        log::debug!(
            "indexed {} CSL field memberships, {} item types, {} names",
            fields.len(),
            types.len(),
            csl.names.len()
        );

        Vocabulary {
            fields,
            types,
            names: csl.names.clone(),
            redirects: IndexMap::new(),
        }
    }

    /// Field keys whose lookup should go through another key instead.
    pub fn with_redirects<I>(mut self, redirects: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.redirects.extend(redirects);
        self
    }

    /// Look a raw key up in the field index, without any redirection.
    pub fn lookup_field(&self, key: &str) -> Mapping {
        self.fields.get(key).into()
    }

    /// Resolve a field entry. A redirect for the canonical key wins; otherwise the key
    /// itself is tried, then the base field the entry specialises.
    pub fn resolve_field(&self, entry: &FieldEntry) -> Mapping {
        let key = entry.key();
        if let Some(target) = self.redirects.get(&key) {
            return self.lookup_field(target);
        }
        match self.lookup_field(&key) {
            Mapping::Unmapped => entry
                .base_key()
                .map_or(Mapping::Unmapped, |base| self.lookup_field(base)),
            found => found,
        }
    }

    /// Resolve a creator role. Primary roles borrow the "author" mapping when one
    /// exists, whatever the role is called.
    pub fn resolve_creator(&self, role: &str, primary: bool) -> Mapping {
        if primary && let Some(author) = self.names.get("author") {
            return Mapping::Variable(author.clone());
        }
        self.names.get(role).into()
    }

    pub fn resolve_item_type(&self, item_type: &str) -> Mapping {
        self.types.get(item_type).into()
    }
}
