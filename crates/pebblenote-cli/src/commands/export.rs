use std::path::{Path, PathBuf};

use pebblenote_core::export::{self, render_notes_export, suggested_export_file_name};

use crate::cli::ExportFormat;
use crate::commands::common::{write_output, CliService};
use crate::error::CliError;

impl From<ExportFormat> for export::ExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}

pub async fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    service: &CliService,
) -> Result<(), CliError> {
    let format = export::ExportFormat::from(format);
    let notes = service.list_notes().await;
    let rendered = render_notes_export(&notes, format)?;

    let timestamp_ms = chrono::Utc::now().timestamp_millis();
    let target = output_path.map(|path| export_target(path, format, timestamp_ms));
    write_output(target.as_deref(), rendered.as_bytes())
}

/// Resolve `-o`: an existing directory receives a timestamped file.
pub fn export_target(path: &Path, format: export::ExportFormat, timestamp_ms: i64) -> PathBuf {
    if path.is_dir() {
        path.join(suggested_export_file_name(format, timestamp_ms))
    } else {
        path.to_path_buf()
    }
}
