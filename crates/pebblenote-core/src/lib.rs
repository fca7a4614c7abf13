//! pebblenote-core - Core library for PebbleNote
//!
//! This crate contains the note model, the local note store with its
//! key-value persistence, the best-effort remote mirror, and the catalog,
//! purchase and export logic used by every PebbleNote interface.

pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod export;
pub mod merge;
pub mod mirror;
pub mod models;
pub mod purchases;
pub mod services;
pub mod storage;
pub mod store;
pub mod util;

pub use error::{Error, Result};
pub use merge::{merge, MergeReport};
pub use models::{Note, NoteDraft, NoteId, PaymentMethod, Purchase};
pub use services::NoteService;
pub use store::NoteStore;
