use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] pebblenote_core::Error),
    #[error(transparent)]
    Mirror(#[from] pebblenote_core::mirror::MirrorError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Note title cannot be empty")]
    EmptyTitle,
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Invalid note ID: {0}")]
    InvalidNoteId(String),
    #[error("Note not found for id: {0}")]
    NoteNotFound(String),
    #[error("Nothing to edit; pass at least one field flag")]
    NothingToEdit,
    #[error("Failed to resolve the {0} directory")]
    MissingDirectory(&'static str),
}
