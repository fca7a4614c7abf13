use crate::commands::common::{
    format_note_details, note_to_list_item, parse_note_id, require_note, CliService,
};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool, service: &CliService) -> Result<(), CliError> {
    let note = require_note(service, parse_note_id(id)?).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&note_to_list_item(&note))?);
    } else {
        for line in format_note_details(&note) {
            println!("{line}");
        }
    }
    Ok(())
}
