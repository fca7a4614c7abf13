//! Key-value persistence backends.
//!
//! Every persisted list lives as one serialized string under a named slot,
//! so a backend only needs get-string/set-string semantics.

mod memory;
mod sqlite;

use std::sync::Arc;

use crate::error::Result;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

/// Trait for slot-based string persistence
pub trait KeyValueStore {
    /// Read the value stored under `slot`, `None` when the slot was never written
    fn get_string(&self, slot: &str) -> Result<Option<String>>;

    /// Replace the value stored under `slot`
    fn set_string(&self, slot: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_string(&self, slot: &str) -> Result<Option<String>> {
        (**self).get_string(slot)
    }

    fn set_string(&self, slot: &str, value: &str) -> Result<()> {
        (**self).set_string(slot, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get_string(&self, slot: &str) -> Result<Option<String>> {
        (**self).get_string(slot)
    }

    fn set_string(&self, slot: &str, value: &str) -> Result<()> {
        (**self).set_string(slot, value)
    }
}
