use pebblenote_core::{Error, Note};

use crate::cli::EditArgs;
use crate::commands::common::{normalize_content, normalize_refs, parse_note_id, CliService};
use crate::error::CliError;

pub async fn run_edit(id: &str, changes: EditArgs, service: &CliService) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    if !has_changes(&changes) {
        return Err(CliError::NothingToEdit);
    }
    if changes
        .title
        .as_deref()
        .is_some_and(|title| normalize_content(title).is_none())
    {
        return Err(CliError::EmptyTitle);
    }

    let updated = match service
        .edit_note(note_id, |note| apply_changes(note, changes))
        .await
    {
        Ok(updated) => updated,
        Err(Error::NotFound(_)) => return Err(CliError::NoteNotFound(note_id.to_string())),
        Err(error) => return Err(error.into()),
    };
    println!("{}", updated.id);
    Ok(())
}

pub fn has_changes(changes: &EditArgs) -> bool {
    changes.title.is_some()
        || changes.price.is_some()
        || changes.document.is_some()
        || changes.clear_document
        || !changes.previews.is_empty()
        || changes.clear_previews
        || changes.category.is_some()
        || changes.description.is_some()
}

/// Apply flag values to `note`; absent flags and a blank title leave fields
/// untouched.
pub fn apply_changes(note: &mut Note, changes: EditArgs) {
    if let Some(title) = changes.title.as_deref().and_then(normalize_content) {
        note.title = title;
    }
    if let Some(price) = changes.price {
        note.price = price;
    }
    if changes.clear_document {
        note.document_ref = None;
    } else if let Some(document) = changes.document {
        note.document_ref = normalize_content(&document);
    }
    if changes.clear_previews {
        note.preview_refs.clear();
    } else if !changes.previews.is_empty() {
        note.preview_refs = normalize_refs(changes.previews);
    }
    if let Some(category) = changes.category {
        note.category = category.trim().to_string();
    }
    if let Some(description) = changes.description {
        note.description = description.trim().to_string();
    }
}
