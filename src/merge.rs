use crate::{
    schema::{ItemType, Locale},
    vocab::{Mapping, Vocabulary},
};

/// Creators are spliced in right after the field with this key.
pub const ANCHOR_FIELD: &str = "title";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Field,
    Creator,
}

impl RowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RowKind::Field => "field",
            RowKind::Creator => "creator",
        }
    }
}

/// One line of an item type's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: RowKind,
    pub key: String,
    pub label: String,
    pub mapping: Mapping,
    /// Only ever set on creator rows.
    pub primary: bool,
}

impl Row {
    /// The key as shown in reports. Primary creator roles are marked as the
    /// author-equivalent role.
    pub fn display_key(&self) -> String {
        if self.primary {
            format!("{} (author)", self.key)
        } else {
            self.key.clone()
        }
    }
}

/// Merge an item type's fields and creator roles into display order.
///
/// Fields keep their schema order. The whole creator list follows the "title" row;
/// when there is no such row it goes at the end. Duplicates in either list are kept.
pub fn merge(item_type: &ItemType, locale: &Locale, vocab: &Vocabulary) -> Vec<Row> {
    let mut rows = Vec::with_capacity(item_type.fields.len() + item_type.creator_types.len());
    let mut title_seen = false;

    for entry in &item_type.fields {
        let key = entry.key();
        let is_anchor = key == ANCHOR_FIELD;
        rows.push(Row {
            kind: RowKind::Field,
            label: locale.field_label(&key).to_string(),
            mapping: vocab.resolve_field(entry),
            key,
            primary: false,
        });

        if is_anchor {
            title_seen = true;
            push_creators(&mut rows, item_type, locale, vocab);
        }
    }

    if !title_seen {
        push_creators(&mut rows, item_type, locale, vocab);
    }

    rows
}

fn push_creators(rows: &mut Vec<Row>, item_type: &ItemType, locale: &Locale, vocab: &Vocabulary) {
    rows.extend(item_type.creator_types.iter().map(|entry| {
        let (role, primary) = entry.normalize();
        Row {
            kind: RowKind::Creator,
            label: locale.creator_label(&role).to_string(),
            mapping: vocab.resolve_creator(&role, primary),
            key: role,
            primary,
        }
    }));
}
