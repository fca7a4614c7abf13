use crate::commands::common::{
    format_listing_lines, format_note_lines, note_to_list_item, CliService, NoteListItem,
};
use crate::error::CliError;

pub async fn run_list(all: bool, as_json: bool, service: &CliService) -> Result<(), CliError> {
    if all {
        let notes = service.list_notes().await;
        if as_json {
            let json_items = notes
                .iter()
                .map(note_to_list_item)
                .collect::<Vec<NoteListItem>>();
            println!("{}", serde_json::to_string_pretty(&json_items)?);
        } else if notes.is_empty() {
            println!("No notes yet.");
        } else {
            for line in format_note_lines(&notes) {
                println!("{line}");
            }
        }
        return Ok(());
    }

    let listings = service.list_listings().await;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
    } else if listings.is_empty() {
        println!("No notes available.");
    } else {
        for line in format_listing_lines(&listings) {
            println!("{line}");
        }
    }

    Ok(())
}
