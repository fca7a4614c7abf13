//! Shared services used by all clients.

mod note_service;

pub use note_service::NoteService;
