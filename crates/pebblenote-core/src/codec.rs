//! Note blob codec.
//!
//! Notes persist as a JSON array of flat records. Decoding is tolerant:
//! a blob that does not parse yields no notes, entries that are not objects
//! are skipped, and each field falls back to its default when missing or
//! of the wrong shape. Records written by the first mobile release used
//! `pdfUri`/`previewImageUris`; those names are still read.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{Note, NoteId, DEFAULT_CATEGORY};

/// Title shown for records that lost theirs.
pub const UNTITLED: &str = "Untitled";

/// Wire form of a single note record
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord<'a> {
    pub id: u64,
    pub title: &'a str,
    pub price: f64,
    /// Empty string means no document
    pub document_ref: &'a str,
    pub preview_refs: &'a [String],
    pub category: &'a str,
    pub description: &'a str,
    pub enabled: bool,
}

impl<'a> From<&'a Note> for NoteRecord<'a> {
    fn from(note: &'a Note) -> Self {
        Self {
            id: note.id.get(),
            title: &note.title,
            price: note.price,
            document_ref: note.document_ref.as_deref().unwrap_or(""),
            preview_refs: &note.preview_refs,
            category: &note.category,
            description: &note.description,
            enabled: note.enabled,
        }
    }
}

/// Serialize the full note list into a blob.
pub fn encode_notes(notes: &[Note]) -> serde_json::Result<String> {
    let records = notes.iter().map(NoteRecord::from).collect::<Vec<_>>();
    serde_json::to_string(&records)
}

/// Serialize a single note as a JSON value, as sent to a remote tree.
pub fn note_to_value(note: &Note) -> serde_json::Result<Value> {
    serde_json::to_value(NoteRecord::from(note))
}

/// Decode a persisted blob, in storage order.
///
/// Never fails: unparseable input yields an empty list. Entries repeating
/// an earlier id are dropped so ids stay unique.
pub fn decode_notes(blob: &str) -> Vec<Note> {
    let value = match serde_json::from_str::<Value>(blob) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!("Discarding unparseable note blob: {error}");
            return Vec::new();
        }
    };

    let Value::Array(entries) = value else {
        tracing::warn!("Discarding note blob: expected a JSON array");
        return Vec::new();
    };

    let decoded = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let note = decode_record(None, entry);
            if note.is_none() {
                tracing::warn!("Skipping malformed note entry at index {index}");
            }
            note
        })
        .collect();

    dedupe_by_id(decoded)
}

/// Decode a remote tree snapshot.
///
/// Trees come back either as an object keyed by id or, when the keys are
/// dense integers, as an array indexed by id with `null` holes.
pub fn decode_remote_tree(snapshot: &Value) -> Vec<Note> {
    let decoded = match snapshot {
        Value::Object(children) => children
            .iter()
            .filter_map(|(key, child)| decode_record(Some(key), child))
            .collect(),
        Value::Array(children) => children
            .iter()
            .enumerate()
            .filter(|(_, child)| !child.is_null())
            .filter_map(|(index, child)| decode_record(Some(&index.to_string()), child))
            .collect(),
        _ => Vec::new(),
    };

    dedupe_by_id(decoded)
}

/// Decode one record, falling back field by field.
///
/// The id is read from the record, then from the storage `key`, then `0`.
/// Returns `None` only when the entry is not a JSON object.
pub fn decode_record(key: Option<&str>, entry: &Value) -> Option<Note> {
    let fields = entry.as_object()?;

    let id = read_id(fields)
        .or_else(|| key.and_then(|key| key.parse::<NoteId>().ok()))
        .unwrap_or_default();

    let title = fields
        .get("title")
        .and_then(Value::as_str)
        .filter(|title| !title.trim().is_empty())
        .unwrap_or(UNTITLED)
        .to_string();

    let price = fields
        .get("price")
        .and_then(Value::as_f64)
        .filter(|price| price.is_finite() && *price >= 0.0)
        .unwrap_or(0.0);

    let document_ref = field_with_legacy(fields, "documentRef", "pdfUri")
        .and_then(Value::as_str)
        .filter(|reference| !reference.trim().is_empty())
        .map(ToString::to_string);

    let preview_refs = field_with_legacy(fields, "previewRefs", "previewImageUris")
        .and_then(Value::as_array)
        .map(|refs| {
            refs.iter()
                .filter_map(Value::as_str)
                .filter(|reference| !reference.trim().is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();

    let category = fields
        .get("category")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string();

    let description = fields
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let enabled = fields
        .get("enabled")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    Some(Note {
        id,
        title,
        price,
        document_ref,
        preview_refs,
        category,
        description,
        enabled,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn read_id(fields: &Map<String, Value>) -> Option<NoteId> {
    let value = fields.get("id")?;
    if let Some(id) = value.as_u64() {
        return Some(NoteId::new(id));
    }

    // Some trees hand integers back as `3.0`
    value
        .as_f64()
        .filter(|id| id.is_finite() && *id >= 0.0 && id.fract() == 0.0)
        .map(|id| NoteId::new(id as u64))
}

fn field_with_legacy<'a>(
    fields: &'a Map<String, Value>,
    name: &str,
    legacy: &str,
) -> Option<&'a Value> {
    fields.get(name).or_else(|| fields.get(legacy))
}

fn dedupe_by_id(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    notes
        .into_iter()
        .filter(|note| {
            let first = seen.insert(note.id);
            if !first {
                tracing::warn!("Dropping duplicate note id {}", note.id);
            }
            first
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteDraft;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_notes() -> Vec<Note> {
        vec![
            Note::from_draft(
                NoteId::new(1),
                NoteDraft::new("Math Notes", 5.5)
                    .with_document_ref("content://docs/math.pdf")
                    .with_preview_refs(vec!["content://img/1".into(), "content://img/2".into()])
                    .with_category("Science")
                    .with_description("Algebra and calculus"),
            ),
            Note::from_draft(NoteId::new(4), NoteDraft::new("History", 0.1).disabled()),
        ]
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let notes = sample_notes();
        let blob = encode_notes(&notes).unwrap();
        assert_eq!(decode_notes(&blob), notes);
    }

    #[test]
    fn round_trip_preserves_awkward_prices() {
        let mut notes = sample_notes();
        notes[0].price = 0.1 + 0.2;
        notes[1].price = 1e-7;
        let blob = encode_notes(&notes).unwrap();
        assert_eq!(decode_notes(&blob), notes);
    }

    #[test]
    fn encode_writes_empty_document_ref() {
        let notes = vec![Note::from_draft(NoteId::new(2), NoteDraft::new("fun", 33.0))];
        let value: Value = serde_json::from_str(&encode_notes(&notes).unwrap()).unwrap();
        assert_eq!(
            value,
            json!([{
                "id": 2,
                "title": "fun",
                "price": 33.0,
                "documentRef": "",
                "previewRefs": [],
                "category": "General",
                "description": "",
                "enabled": true
            }])
        );
    }

    #[test]
    fn unparseable_blob_decodes_to_empty() {
        assert!(decode_notes("not json at all").is_empty());
        assert!(decode_notes("[{\"id\": 1,").is_empty());
        assert!(decode_notes("").is_empty());
    }

    #[test]
    fn non_array_blob_decodes_to_empty() {
        assert!(decode_notes("{\"id\": 1}").is_empty());
        assert!(decode_notes("42").is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let notes = decode_notes(r#"[{"id": 1, "title": "A"}, 7, "x", null, {"id": 2, "title": "B"}]"#);
        let ids = notes.iter().map(|note| note.id.get()).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let notes = decode_notes(r#"[{"id": 3, "title": "photo", "price": 2}]"#);
        assert_eq!(notes.len(), 1);
        let note = &notes[0];
        assert_eq!(note.category, "General");
        assert!(note.enabled);
        assert_eq!(note.description, "");
        assert_eq!(note.document_ref, None);
        assert!(note.preview_refs.is_empty());
        assert!((note.price - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn wrong_shapes_fall_back_to_defaults() {
        let notes = decode_notes(
            r#"[{"id": "x", "title": 5, "price": -3, "documentRef": 9,
                 "previewRefs": "nope", "category": false, "enabled": "yes"}]"#,
        );
        let note = &notes[0];
        assert_eq!(note.id, NoteId::new(0));
        assert_eq!(note.title, UNTITLED);
        assert!(note.price.abs() < f64::EPSILON);
        assert_eq!(note.document_ref, None);
        assert!(note.preview_refs.is_empty());
        assert_eq!(note.category, "General");
        assert!(note.enabled);
    }

    #[test]
    fn blank_refs_are_dropped() {
        let notes = decode_notes(
            r#"[{"id": 1, "title": "A", "documentRef": "  ",
                 "previewRefs": ["content://a", "", 4, "content://b"]}]"#,
        );
        assert_eq!(notes[0].document_ref, None);
        assert_eq!(notes[0].preview_refs, vec!["content://a", "content://b"]);
    }

    #[test]
    fn legacy_field_names_are_read() {
        let notes = decode_notes(
            r#"[{"id": 1, "title": "A", "pdfUri": "content://a.pdf",
                 "previewImageUris": ["content://p"]}]"#,
        );
        assert_eq!(notes[0].document_ref.as_deref(), Some("content://a.pdf"));
        assert_eq!(notes[0].preview_refs, vec!["content://p"]);
    }

    #[test]
    fn duplicate_ids_keep_first_entry() {
        let notes = decode_notes(
            r#"[{"id": 1, "title": "first"}, {"id": 1, "title": "second"}, {"id": 2, "title": "B"}]"#,
        );
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].title, "first");
    }

    #[test]
    fn storage_order_is_preserved() {
        let notes = decode_notes(r#"[{"id": 5}, {"id": 2}, {"id": 9}]"#);
        let ids = notes.iter().map(|note| note.id.get()).collect::<Vec<_>>();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn integral_float_ids_are_accepted() {
        let note = decode_record(None, &json!({"id": 3.0})).unwrap();
        assert_eq!(note.id, NoteId::new(3));
        let note = decode_record(None, &json!({"id": 3.5})).unwrap();
        assert_eq!(note.id, NoteId::new(0));
    }

    #[test]
    fn remote_object_tree_uses_key_as_id_fallback() {
        let snapshot = json!({
            "7": {"title": "keyed only"},
            "8": {"id": 8, "title": "explicit", "enabled": false},
            "junk": {"title": "no id"}
        });
        let mut notes = decode_remote_tree(&snapshot);
        notes.sort_by_key(|note| note.id);
        let ids = notes.iter().map(|note| note.id.get()).collect::<Vec<_>>();
        assert_eq!(ids, vec![0, 7, 8]);
        assert!(!notes[2].enabled);
    }

    #[test]
    fn remote_array_tree_skips_holes() {
        let snapshot = json!([null, {"title": "one"}, null, {"title": "three"}]);
        let notes = decode_remote_tree(&snapshot);
        let ids = notes.iter().map(|note| note.id.get()).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn remote_null_tree_is_empty() {
        assert!(decode_remote_tree(&Value::Null).is_empty());
    }
}
