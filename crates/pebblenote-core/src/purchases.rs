//! Purchase ledger.
//!
//! Purchases are appended to a JSON array kept in its own slot of the same
//! key-value storage the notes use. Reading is tolerant in the same way as
//! the note blob: unreadable entries are skipped.

use serde_json::Value;

use crate::config::DEFAULT_PURCHASES_SLOT;
use crate::error::{Error, Result};
use crate::models::{Note, PaymentMethod, Purchase, PurchaseStatus};
use crate::storage::KeyValueStore;

pub struct PurchaseLedger<S> {
    storage: S,
    slot: String,
}

impl<S: KeyValueStore> PurchaseLedger<S> {
    pub fn new(storage: S) -> Self {
        Self::with_slot(storage, DEFAULT_PURCHASES_SLOT)
    }

    pub fn with_slot(storage: S, slot: impl Into<String>) -> Self {
        Self {
            storage,
            slot: slot.into(),
        }
    }

    /// All recorded purchases, oldest first
    pub fn list(&self) -> Result<Vec<Purchase>> {
        let Some(blob) = self.storage.get_string(&self.slot)? else {
            return Ok(Vec::new());
        };
        Ok(decode_purchases(&blob))
    }

    /// Record a successful purchase of `note`.
    ///
    /// Disabled notes are not for sale.
    pub fn record(&self, note: &Note, method: PaymentMethod) -> Result<Purchase> {
        self.record_at(note, method, chrono::Utc::now().timestamp_millis())
    }

    pub fn record_at(&self, note: &Note, method: PaymentMethod, timestamp: i64) -> Result<Purchase> {
        if !note.enabled {
            return Err(Error::InvalidInput(format!(
                "note {} is not available for purchase",
                note.id
            )));
        }

        let purchase = Purchase {
            note_id: note.id,
            title: note.title.clone(),
            price: note.price,
            method,
            status: PurchaseStatus::Success,
            timestamp,
        };

        let mut purchases = self.list()?;
        purchases.push(purchase.clone());
        let blob = serde_json::to_string(&purchases)?;
        self.storage.set_string(&self.slot, &blob)?;

        tracing::info!(
            "Recorded {} purchase of note {} via {}",
            crate::catalog::format_price(purchase.price),
            purchase.note_id,
            purchase.method
        );
        Ok(purchase)
    }
}

fn decode_purchases(blob: &str) -> Vec<Purchase> {
    let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(blob) else {
        tracing::warn!("Discarding unreadable purchase blob");
        return Vec::new();
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Purchase>(entry) {
            Ok(purchase) => Some(purchase),
            Err(error) => {
                tracing::warn!("Skipping malformed purchase entry: {error}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoteDraft, NoteId};
    use crate::storage::MemoryKeyValueStore;
    use pretty_assertions::assert_eq;

    fn note(enabled: bool) -> Note {
        let draft = NoteDraft::new("Math Notes", 5.5);
        Note::from_draft(
            NoteId::new(1),
            if enabled { draft } else { draft.disabled() },
        )
    }

    #[test]
    fn record_appends_in_order() {
        let ledger = PurchaseLedger::new(MemoryKeyValueStore::new());
        ledger.record_at(&note(true), PaymentMethod::Khalti, 10).unwrap();
        ledger.record_at(&note(true), PaymentMethod::ESewa, 20).unwrap();

        let purchases = ledger.list().unwrap();
        assert_eq!(purchases.len(), 2);
        assert_eq!(purchases[0].method, PaymentMethod::Khalti);
        assert_eq!(purchases[1].timestamp, 20);
        assert_eq!(purchases[1].title, "Math Notes");
        assert_eq!(purchases[1].status, PurchaseStatus::Success);
    }

    #[test]
    fn disabled_notes_cannot_be_bought() {
        let ledger = PurchaseLedger::new(MemoryKeyValueStore::new());
        assert!(matches!(
            ledger.record(&note(false), PaymentMethod::Khalti),
            Err(Error::InvalidInput(_))
        ));
        assert!(ledger.list().unwrap().is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let storage = MemoryKeyValueStore::new().with_slot(
            DEFAULT_PURCHASES_SLOT,
            r#"[{"noteId": 1, "title": "a", "price": 1.0, "method": "eSewa", "timestamp": 5},
                {"noteId": "bad"}]"#,
        );
        let ledger = PurchaseLedger::new(storage);
        let purchases = ledger.list().unwrap();
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].method, PaymentMethod::ESewa);
    }

    #[test]
    fn unreadable_blob_lists_empty() {
        let storage = MemoryKeyValueStore::new().with_slot(DEFAULT_PURCHASES_SLOT, "garbage");
        assert!(PurchaseLedger::new(storage).list().unwrap().is_empty());
    }
}
