//! Note export helpers shared by all clients.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::codec::NoteRecord;
use crate::Note;

/// Export output format shared by all clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Render notes as pretty-printed JSON, using the persisted record layout.
pub fn render_json_export(notes: &[Note]) -> serde_json::Result<String> {
    let records = notes.iter().map(NoteRecord::from).collect::<Vec<_>>();
    serde_json::to_string_pretty(&records)
}

/// Render notes in Markdown with frontmatter blocks.
#[must_use]
pub fn render_markdown_export(notes: &[Note]) -> String {
    let mut output = String::new();

    for (index, note) in notes.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }

        let _ = writeln!(output, "---");
        let _ = writeln!(output, "id: {}", note.id);
        let _ = writeln!(output, "title: {}", note.title);
        let _ = writeln!(output, "price: {:.2}", note.price);
        let _ = writeln!(output, "category: {}", note.category);
        let _ = writeln!(output, "enabled: {}", note.enabled);
        if let Some(document_ref) = &note.document_ref {
            let _ = writeln!(output, "document: {document_ref}");
        }
        let _ = writeln!(output, "previews:");
        for preview in &note.preview_refs {
            let _ = writeln!(output, "  - {preview}");
        }
        let _ = writeln!(output, "---");
        let _ = writeln!(output);
        let _ = writeln!(output, "# {}", note.title);
        if !note.description.is_empty() {
            let _ = writeln!(output);
            output.push_str(&note.description);
            output.push('\n');
        }
    }

    output
}

/// Render notes based on selected export format.
pub fn render_notes_export(notes: &[Note], format: ExportFormat) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(notes),
        ExportFormat::Markdown => Ok(render_markdown_export(notes)),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("pebblenote-export-{timestamp_ms}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_notes;
    use crate::models::{NoteDraft, NoteId};

    fn sample() -> Note {
        Note::from_draft(
            NoteId::new(7),
            NoteDraft::new("Math Notes", 5.5)
                .with_document_ref("content://docs/math.pdf")
                .with_preview_refs(vec!["content://img/1".into()])
                .with_category("Science")
                .with_description("Algebra and calculus"),
        )
    }

    #[test]
    fn json_export_is_readable_as_blob() {
        let rendered = render_json_export(&[sample()]).unwrap();
        assert_eq!(decode_notes(&rendered), vec![sample()]);
    }

    #[test]
    fn render_markdown_export_includes_frontmatter_and_content() {
        let rendered = render_markdown_export(&[sample()]);
        assert!(rendered.contains("id: 7"));
        assert!(rendered.contains("price: 5.50"));
        assert!(rendered.contains("category: Science"));
        assert!(rendered.contains("document: content://docs/math.pdf"));
        assert!(rendered.contains("previews:\n  - content://img/1"));
        assert!(rendered.contains("# Math Notes\n\nAlgebra and calculus"));
    }

    #[test]
    fn markdown_omits_missing_document() {
        let note = Note::from_draft(NoteId::new(1), NoteDraft::new("fun", 33.0));
        let rendered = render_notes_export(&[note], ExportFormat::Markdown).unwrap();
        assert!(!rendered.contains("document:"));
        assert!(rendered.contains("enabled: true"));
    }

    #[test]
    fn suggested_export_file_name_uses_format_extension() {
        assert_eq!(
            suggested_export_file_name(ExportFormat::Json, 123),
            "pebblenote-export-123.json"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::Markdown, 456),
            "pebblenote-export-456.md"
        );
    }
}
