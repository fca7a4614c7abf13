//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Category applied when a record does not carry one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Store-assigned note identifier.
///
/// Ids are small positive integers handed out as `max + 1`; `0` only shows
/// up for records whose id could not be recovered from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(u64);

impl NoteId {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Key used for this note in a remote tree.
    #[must_use]
    pub fn as_key(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<u64> for NoteId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A sellable note listing
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Store-assigned unique identifier
    pub id: NoteId,
    /// Display title, never blank once stored
    pub title: String,
    /// Price, never negative
    pub price: f64,
    /// Opaque reference to the externally owned PDF
    pub document_ref: Option<String>,
    /// Opaque references to preview images, in display order
    pub preview_refs: Vec<String>,
    pub category: String,
    pub description: String,
    /// Visible to non-admin consumers
    pub enabled: bool,
}

impl Note {
    /// Build a stored note from a draft and the id the store picked for it.
    #[must_use]
    pub fn from_draft(id: NoteId, draft: NoteDraft) -> Self {
        Self {
            id,
            title: draft.title,
            price: draft.price,
            document_ref: draft.document_ref,
            preview_refs: draft.preview_refs,
            category: draft.category,
            description: draft.description,
            enabled: draft.enabled,
        }
        .normalized()
    }

    /// Bring the note into the shape storage reproduces on load.
    ///
    /// Trims the title, turns a blank document reference into `None` and
    /// drops blank preview references. Non-blank references are opaque and
    /// kept byte for byte.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.document_ref = self
            .document_ref
            .filter(|reference| !reference.trim().is_empty());
        self.preview_refs
            .retain(|reference| !reference.trim().is_empty());
        self
    }

    /// Check the fields an update is allowed to carry.
    pub fn validate(&self) -> Result<()> {
        validate_listing(&self.title, self.price)
    }

    /// First preview reference, used as the listing thumbnail.
    #[must_use]
    pub fn cover_preview(&self) -> Option<&str> {
        self.preview_refs.first().map(String::as_str)
    }
}

/// Note fields without an id, as submitted by an upload form
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub price: f64,
    pub document_ref: Option<String>,
    pub preview_refs: Vec<String>,
    pub category: String,
    pub description: String,
    pub enabled: bool,
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            price: 0.0,
            document_ref: None,
            preview_refs: Vec::new(),
            category: DEFAULT_CATEGORY.to_string(),
            description: String::new(),
            enabled: true,
        }
    }
}

impl NoteDraft {
    /// Create a draft with the required fields and defaults for the rest
    #[must_use]
    pub fn new(title: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            price,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_document_ref(mut self, document_ref: impl Into<String>) -> Self {
        self.document_ref = Some(document_ref.into());
        self
    }

    #[must_use]
    pub fn with_preview_refs(mut self, preview_refs: Vec<String>) -> Self {
        self.preview_refs = preview_refs;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Reject blank titles and negative or non-finite prices.
    pub fn validate(&self) -> Result<()> {
        validate_listing(&self.title, self.price)
    }
}

fn validate_listing(title: &str, price: f64) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidInput("title must not be blank".into()));
    }
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidInput(format!(
            "price must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}
