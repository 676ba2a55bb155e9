use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::SchemaError,
    merge::{self, Row},
    schema::Schema,
    vocab::{Mapping, Vocabulary},
};

pub mod html;
pub mod text;

/// Everything a renderer needs, already merged and resolved.
#[derive(Debug, Clone)]
pub struct Report {
    pub version: Option<u64>,
    pub locale: String,
    pub source: String,
    pub sections: Vec<Section>,
}

/// One item type.
#[derive(Debug, Clone)]
pub struct Section {
    pub key: String,
    pub label: String,
    pub csl_type: Mapping,
    pub rows: Vec<Row>,
}

impl Report {
    pub fn build(
        schema: &Schema,
        locale_id: &str,
        vocab: &Vocabulary,
        source: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        let locale = schema.locale(locale_id)?;

        let mut sections = Vec::with_capacity(schema.item_types.len());
        for (idx, item_type) in schema.item_types.iter().enumerate() {
            let Some(key) = item_type.item_type.as_deref().filter(|k| !k.is_empty()) else {
                log::warn!("skipping item type #{idx}: no itemType key");
                continue;
            };
            let rows = merge::merge(item_type, locale, vocab);
            log::debug!("{key}: {} rows", rows.len());
            sections.push(Section {
                key: key.to_string(),
                label: locale.item_type_label(key).to_string(),
                csl_type: vocab.resolve_item_type(key),
                rows,
            });
        }

        Ok(Report {
            version: schema.version,
            locale: locale_id.to_string(),
            source: source.into(),
            sections,
        })
    }

    /// Number of rows across all sections without a CSL mapping.
    pub fn unmapped(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.rows)
            .filter(|r| !r.mapping.is_mapped())
            .count()
    }
}

impl Section {
    /// Fragment identifier for this section. Item type keys are plain identifiers in
    /// practice; anything else is squashed to dashes.
    pub fn anchor(&self) -> String {
        static UNSAFE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]+").unwrap());
        format!("type-{}", UNSAFE_RE.replace_all(&self.key, "-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) const SCHEMA: &str = r#"{
        "version": 7,
        "itemTypes": [
            {
                "itemType": "book",
                "fields": ["title", "date", {"field": "publisher"}],
                "creatorTypes": [{"creatorType": "author", "primary": true}, "editor"]
            },
            {"fields": ["title"]},
            {
                "itemType": "note",
                "fields": [],
                "creatorTypes": []
            }
        ],
        "locales": {
            "en-US": {
                "itemTypes": {"book": "Book"},
                "fields": {"title": "Title", "date": "Date"},
                "creatorTypes": {"author": "Author", "editor": "Editor"}
            }
        },
        "csl": {
            "types": {"book": ["book"]},
            "fields": {"text": {"title": ["title"], "publisher": ["publisher"]}, "date": {"issued": ["date"]}},
            "names": {"author": "author", "editor": "editor"}
        }
    }"#;

    pub(crate) fn sample() -> Report {
        let schema = Schema::from_json(SCHEMA).expect("schema");
        let vocab = Vocabulary::new(&schema.csl);
        Report::build(&schema, "en-US", &vocab, "fixture").expect("report")
    }

    #[test]
    fn item_types_without_key_are_skipped() {
        let report = sample();
        let keys: Vec<_> = report.sections.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["book", "note"]);
    }

    #[test]
    fn non_string_item_type_key_is_skipped() {
        let schema = Schema::from_json(
            r#"{
                "itemTypes": [{"itemType": 5, "fields": ["title"]}, {"itemType": "book"}],
                "locales": {"en-US": {"fields": {"title": null}}}
            }"#,
        )
        .expect("schema");
        let vocab = Vocabulary::new(&schema.csl);
        let report = Report::build(&schema, "en-US", &vocab, "fixture").expect("report");
        let keys: Vec<_> = report.sections.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["book"]);
    }

    #[test]
    fn sections_carry_labels_and_csl_type() {
        let report = sample();
        let book = &report.sections[0];
        assert_eq!(book.label, "Book");
        assert_eq!(book.csl_type, Mapping::Variable("book".into()));
        let note = &report.sections[1];
        assert_eq!(note.label, "note");
        assert_eq!(note.csl_type, Mapping::Unmapped);
        assert!(note.rows.is_empty());
    }

    #[test]
    fn unmapped_rows_are_counted() {
        assert_eq!(sample().unmapped(), 0);
    }

    #[test]
    fn missing_locale_fails_the_build() {
        let schema = Schema::from_json(SCHEMA).expect("schema");
        let vocab = Vocabulary::new(&schema.csl);
        let err = Report::build(&schema, "fr-FR", &vocab, "fixture").unwrap_err();
        assert!(matches!(err, SchemaError::MissingLocale(_)));
    }

    #[test]
    fn anchors_are_fragment_safe() {
        let section = Section {
            key: "journal Article/x".into(),
            label: String::new(),
            csl_type: Mapping::Unmapped,
            rows: Vec::new(),
        };
        assert_eq!(section.anchor(), "type-journal-Article-x");
    }
}
