use pebblenote_core::Error;

use crate::commands::common::{parse_note_id, CliService};
use crate::error::CliError;

pub async fn run_toggle(id: &str, service: &CliService) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    let enabled = match service.toggle_note(note_id).await {
        Ok(enabled) => enabled,
        Err(Error::NotFound(_)) => return Err(CliError::NoteNotFound(note_id.to_string())),
        Err(error) => return Err(error.into()),
    };

    let state = if enabled { "enabled" } else { "disabled" };
    println!("{note_id} {state}");
    Ok(())
}
