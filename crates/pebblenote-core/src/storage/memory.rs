//! In-process key-value store

use std::collections::HashMap;
use std::sync::Mutex;

use super::KeyValueStore;
use crate::error::{Error, Result};

/// Process-local `KeyValueStore`, mainly for tests and demos
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot, bypassing any store logic.
    #[must_use]
    pub fn with_slot(self, slot: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(slot.into(), value.into());
        }
        self
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_string(&self, slot: &str) -> Result<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".into()))?;
        Ok(slots.get(slot).cloned())
    }

    fn set_string(&self, slot: &str, value: &str) -> Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".into()))?;
        slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }
}
