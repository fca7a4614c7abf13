use pebblenote_core::NoteDraft;

use crate::cli::AddArgs;
use crate::commands::common::{normalize_content, normalize_refs, normalize_title, CliService};
use crate::error::CliError;

pub async fn run_add(args: AddArgs, service: &CliService) -> Result<(), CliError> {
    let draft = draft_from_args(args)?;
    let note = service.create_note(draft).await?;

    println!("{}", note.id);
    Ok(())
}

pub fn draft_from_args(args: AddArgs) -> Result<NoteDraft, CliError> {
    let mut draft = NoteDraft::new(normalize_title(&args.title)?, args.price)
        .with_preview_refs(normalize_refs(args.previews));
    if let Some(document) = args.document.as_deref().and_then(normalize_content) {
        draft = draft.with_document_ref(document);
    }
    if let Some(category) = args.category.as_deref().and_then(normalize_content) {
        draft = draft.with_category(category);
    }
    if let Some(description) = args.description {
        draft = draft.with_description(description.trim());
    }
    if args.disabled {
        draft = draft.disabled();
    }
    Ok(draft)
}
