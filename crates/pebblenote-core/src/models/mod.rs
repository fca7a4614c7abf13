//! Data models for PebbleNote

mod note;
mod purchase;

pub use note::{Note, NoteDraft, NoteId, DEFAULT_CATEGORY};
pub use purchase::{PaymentMethod, Purchase, PurchaseStatus};
