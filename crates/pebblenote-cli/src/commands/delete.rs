use crate::commands::common::{parse_note_id, CliService};
use crate::error::CliError;

pub async fn run_delete(id: &str, service: &CliService) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    if !service.delete_note(note_id).await? {
        return Err(CliError::NoteNotFound(note_id.to_string()));
    }

    println!("{note_id}");
    Ok(())
}
