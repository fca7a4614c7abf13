//! Shared note service wrapper used across clients.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::catalog::{demo_drafts, visible_listings, Insights, Listing};
use crate::config::AppConfig;
use crate::merge::MergeReport;
use crate::mirror::MirrorDispatcher;
use crate::models::{Note, NoteDraft, NoteId, PaymentMethod, Purchase};
use crate::purchases::PurchaseLedger;
use crate::storage::KeyValueStore;
use crate::store::NoteStore;
use crate::{Error, Result};

struct State<S> {
    store: NoteStore<Arc<S>>,
    ledger: PurchaseLedger<Arc<S>>,
}

/// Thread-safe service around one note store and its purchase ledger.
///
/// Every load-modify-save runs under a single async mutex.
pub struct NoteService<S> {
    state: Arc<Mutex<State<S>>>,
}

impl<S> Clone for NoteService<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: KeyValueStore> NoteService<S> {
    /// Open notes and purchases on the slots named by `config`.
    pub fn open(storage: S, config: &AppConfig, mirror: Option<MirrorDispatcher>) -> Result<Self> {
        let storage = Arc::new(storage);
        let mut store = NoteStore::open_with_slot(Arc::clone(&storage), config.notes_slot.as_str())?;
        if let Some(mirror) = mirror {
            store = store.with_mirror(mirror);
        } else {
            tracing::info!("Running in local-only mode (no mirror config)");
        }
        let ledger = PurchaseLedger::with_slot(storage, config.purchases_slot.as_str());

        Ok(Self {
            state: Arc::new(Mutex::new(State { store, ledger })),
        })
    }

    /// Returns whether mutations are mirrored remotely.
    pub async fn is_mirror_enabled(&self) -> bool {
        let state = self.state.lock().await;
        state.store.mirror().is_some()
    }

    /// List every note, sorted by id.
    pub async fn list_notes(&self) -> Vec<Note> {
        let state = self.state.lock().await;
        state.store.sorted_notes()
    }

    /// Listings visible to buyers.
    pub async fn list_listings(&self) -> Vec<Listing> {
        let state = self.state.lock().await;
        visible_listings(state.store.notes())
    }

    /// Fetch a note by id.
    pub async fn get_note(&self, id: NoteId) -> Option<Note> {
        let state = self.state.lock().await;
        state.store.get(id).cloned()
    }

    /// Create a new note.
    pub async fn create_note(&self, draft: NoteDraft) -> Result<Note> {
        let mut state = self.state.lock().await;
        state.store.create(draft)
    }

    /// Replace an existing note, failing with `NotFound` when absent.
    pub async fn update_note(&self, note: Note) -> Result<Note> {
        let mut state = self.state.lock().await;
        let id = note.id;
        if !state.store.update(note)? {
            return Err(Error::NotFound(id.to_string()));
        }
        state.store.require(id).cloned()
    }

    /// Edit a note in place through `edit`.
    pub async fn edit_note(&self, id: NoteId, edit: impl FnOnce(&mut Note)) -> Result<Note> {
        let mut state = self.state.lock().await;
        let mut note = state.store.require(id)?.clone();
        edit(&mut note);
        note.id = id;
        state.store.update(note)?;
        state.store.require(id).cloned()
    }

    /// Delete a note. Returns whether anything was removed.
    pub async fn delete_note(&self, id: NoteId) -> Result<bool> {
        let mut state = self.state.lock().await;
        state.store.delete(id)
    }

    /// Flip a note's visibility, returning the new value.
    pub async fn toggle_note(&self, id: NoteId) -> Result<bool> {
        let mut state = self.state.lock().await;
        state
            .store
            .toggle_enabled(id)?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Create the demo listings when the store is empty.
    ///
    /// Returns the notes that were created; an existing catalog is left alone.
    pub async fn seed_demo_notes(&self) -> Result<Vec<Note>> {
        let mut state = self.state.lock().await;
        if !state.store.is_empty() {
            tracing::debug!("Skipping demo seed, store already has notes");
            return Ok(Vec::new());
        }

        demo_drafts()
            .into_iter()
            .map(|draft| state.store.create(draft))
            .collect()
    }

    /// Fetch the remote snapshot and merge it into the local list.
    ///
    /// The remote fetch runs without holding the lock.
    pub async fn pull_from_mirror(&self) -> Result<MergeReport> {
        let mirror = {
            let state = self.state.lock().await;
            state.store.mirror().cloned()
        }
        .ok_or_else(|| Error::Config("no remote mirror configured".to_string()))?;

        let remote = mirror.fetch_all().await?;
        tracing::debug!("Fetched {} note(s) from mirror", remote.len());

        let mut state = self.state.lock().await;
        state.store.reconcile(remote)
    }

    /// Buy a note.
    pub async fn purchase(&self, id: NoteId, method: PaymentMethod) -> Result<Purchase> {
        let state = self.state.lock().await;
        let note = state.store.require(id)?;
        state.ledger.record(note, method)
    }

    /// All recorded purchases, oldest first.
    pub async fn list_purchases(&self) -> Result<Vec<Purchase>> {
        let state = self.state.lock().await;
        state.ledger.list()
    }

    /// Dashboard numbers.
    pub async fn insights(&self) -> Result<Insights> {
        let state = self.state.lock().await;
        let purchases = state.ledger.list()?;
        Ok(Insights::collect(state.store.notes(), &purchases))
    }

    /// Give in-flight mirror writes up to `timeout` to finish.
    ///
    /// Returns `true` when nothing is pending anymore.
    pub async fn drain_mirror(&self, timeout: Duration) -> bool {
        let mirror = {
            let state = self.state.lock().await;
            state.store.mirror().cloned()
        };
        match mirror {
            Some(mirror) => mirror.drain(timeout).await,
            None => true,
        }
    }
}
