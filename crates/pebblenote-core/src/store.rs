//! Local note store.
//!
//! `NoteStore` owns the canonical note list. Every mutation builds the next
//! list, persists it as a whole under one slot, and only then swaps it in,
//! so the in-memory list and the persisted blob never disagree. Notes are
//! passed through [`Note::normalized`] on the way in so that a reload gives
//! back exactly what was stored. Mirror
//! writes are queued after the local write succeeded and never affect it.
//!
//! The store is single-writer; wrap it in [`crate::services::NoteService`]
//! when several callers share it.

use crate::codec::{decode_notes, encode_notes};
use crate::config::DEFAULT_NOTES_SLOT;
use crate::error::{Error, Result};
use crate::merge::{merge, MergeReport};
use crate::mirror::MirrorDispatcher;
use crate::models::{Note, NoteDraft, NoteId};
use crate::storage::KeyValueStore;

pub struct NoteStore<S> {
    storage: S,
    slot: String,
    notes: Vec<Note>,
    mirror: Option<MirrorDispatcher>,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Open the store on the default slot and load its notes
    pub fn open(storage: S) -> Result<Self> {
        Self::open_with_slot(storage, DEFAULT_NOTES_SLOT)
    }

    /// Open the store on `slot` and load its notes
    pub fn open_with_slot(storage: S, slot: impl Into<String>) -> Result<Self> {
        let mut store = Self {
            storage,
            slot: slot.into(),
            notes: Vec::new(),
            mirror: None,
        };
        store.notes = store.load()?;
        tracing::debug!(
            "Loaded {} note(s) from slot `{}`",
            store.notes.len(),
            store.slot
        );
        Ok(store)
    }

    /// Mirror every successful mutation through `mirror`
    #[must_use]
    pub fn with_mirror(mut self, mirror: MirrorDispatcher) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub const fn mirror(&self) -> Option<&MirrorDispatcher> {
        self.mirror.as_ref()
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Read notes from storage in storage order.
    ///
    /// An absent slot or a malformed blob yields an empty list; only a
    /// failing storage read is an error.
    pub fn load(&self) -> Result<Vec<Note>> {
        Ok(self
            .storage
            .get_string(&self.slot)?
            .map(|blob| decode_notes(&blob))
            .unwrap_or_default())
    }

    /// Overwrite the slot with the full list.
    pub fn save(&self, notes: &[Note]) -> Result<()> {
        let blob = encode_notes(notes)?;
        self.storage.set_string(&self.slot, &blob)
    }

    /// Replace the in-memory list with what storage currently holds
    pub fn reload(&mut self) -> Result<&[Note]> {
        self.notes = self.load()?;
        Ok(&self.notes)
    }

    /// Notes in storage order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Notes sorted by id ascending
    pub fn sorted_notes(&self) -> Vec<Note> {
        let mut notes = self.notes.clone();
        notes.sort_by_key(|note| note.id);
        notes
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Id the next created note will receive
    pub fn next_id(&self) -> NoteId {
        self.notes
            .iter()
            .map(|note| note.id)
            .max()
            .map_or(NoteId::new(1), NoteId::next)
    }

    /// Validate and append a new note, then mirror it.
    pub fn create(&mut self, draft: NoteDraft) -> Result<Note> {
        draft.validate()?;

        let note = Note::from_draft(self.next_id(), draft);
        let mut next = self.notes.clone();
        next.push(note.clone());
        self.commit(next)?;

        tracing::info!("Created note {} ({})", note.id, note.title);
        if let Some(mirror) = &self.mirror {
            mirror.upsert(&note);
        }
        Ok(note)
    }

    /// Replace the note with the same id. Returns `false` when none matches,
    /// in which case nothing is written.
    pub fn update(&mut self, note: Note) -> Result<bool> {
        let note = note.normalized();
        note.validate()?;

        let Some(index) = self.position(note.id) else {
            return Ok(false);
        };

        let mut next = self.notes.clone();
        next[index] = note;
        self.commit(next)?;

        let updated = &self.notes[index];
        tracing::info!("Updated note {}", updated.id);
        if let Some(mirror) = &self.mirror {
            mirror.upsert(updated);
        }
        Ok(true)
    }

    /// Remove every note with `id`. Returns `false` when none matched.
    pub fn delete(&mut self, id: NoteId) -> Result<bool> {
        let next = self
            .notes
            .iter()
            .filter(|note| note.id != id)
            .cloned()
            .collect::<Vec<_>>();
        if next.len() == self.notes.len() {
            return Ok(false);
        }
        self.commit(next)?;

        tracing::info!("Deleted note {id}");
        if let Some(mirror) = &self.mirror {
            mirror.remove(id);
        }
        Ok(true)
    }

    /// Flip the visibility flag. Returns the new value, `None` when absent.
    pub fn toggle_enabled(&mut self, id: NoteId) -> Result<Option<bool>> {
        let Some(mut note) = self.get(id).cloned() else {
            return Ok(None);
        };
        note.enabled = !note.enabled;
        let enabled = note.enabled;
        self.update(note)?;
        Ok(Some(enabled))
    }

    /// Merge a remote snapshot into the local list (remote wins) and persist.
    pub fn reconcile(&mut self, remote: Vec<Note>) -> Result<MergeReport> {
        let merged = merge(self.notes.clone(), remote);
        let report = MergeReport::between(&self.notes, &merged);
        self.commit(merged)?;
        tracing::info!(
            "Reconciled notes: {} added, {} replaced, {} unchanged, {} local only",
            report.added,
            report.replaced,
            report.unchanged,
            report.local_only
        );
        Ok(report)
    }

    /// Look up a note or fail with `NotFound`
    pub fn require(&self, id: NoteId) -> Result<&Note> {
        self.get(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn position(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    fn commit(&mut self, next: Vec<Note>) -> Result<()> {
        self.save(&next)?;
        self.notes = next;
        Ok(())
    }
}
