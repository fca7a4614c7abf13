use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pebblenote_core::catalog::{format_price, Listing};
use pebblenote_core::config::AppConfig;
use pebblenote_core::mirror::{HttpMirror, MirrorDispatcher};
use pebblenote_core::storage::SqliteKeyValueStore;
use pebblenote_core::{Note, NoteId, NoteService, Purchase};
use serde::Serialize;

use crate::error::CliError;

/// Service type every command runs against.
pub type CliService = NoteService<SqliteKeyValueStore>;

pub const DB_PATH_ENV: &str = "PEBBLE_DB_PATH";

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub price_label: String,
    pub category: String,
    pub description: String,
    pub enabled: bool,
    pub document_ref: Option<String>,
    pub preview_refs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseItem {
    pub note_id: u64,
    pub title: String,
    pub price: f64,
    pub method: String,
    pub status: String,
    pub timestamp: i64,
    pub timestamp_iso: String,
}

pub fn note_to_list_item(note: &Note) -> NoteListItem {
    NoteListItem {
        id: note.id.get(),
        title: note.title.clone(),
        price: note.price,
        price_label: format_price(note.price),
        category: note.category.clone(),
        description: note.description.clone(),
        enabled: note.enabled,
        document_ref: note.document_ref.clone(),
        preview_refs: note.preview_refs.clone(),
    }
}

pub fn purchase_to_item(purchase: &Purchase) -> PurchaseItem {
    PurchaseItem {
        note_id: purchase.note_id.get(),
        title: purchase.title.clone(),
        price: purchase.price,
        method: purchase.method.label().to_string(),
        status: purchase.status.label().to_string(),
        timestamp: purchase.timestamp,
        timestamp_iso: format_timestamp(purchase.timestamp),
    }
}

/// Admin view: every note with its visibility.
pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    notes
        .iter()
        .map(|note| {
            let status = if note.enabled { "enabled" } else { "disabled" };
            let title = truncate_chars(&note.title, 30);
            let price = format_price(note.price);
            format!(
                "{:<5}  {status:<8}  {title:<30}  {price:>12}  {}",
                note.id, note.category
            )
        })
        .collect()
}

/// Buyer view: enabled listings only.
pub fn format_listing_lines(listings: &[Listing]) -> Vec<String> {
    listings
        .iter()
        .map(|listing| {
            let title = truncate_chars(&listing.title, 30);
            format!(
                "{:<5}  {title:<30}  {:>12}  {}",
                listing.id, listing.price_label, listing.category
            )
        })
        .collect()
}

pub fn format_note_details(note: &Note) -> Vec<String> {
    let mut lines = vec![
        format!("id:          {}", note.id),
        format!("title:       {}", note.title),
        format!("price:       {}", format_price(note.price)),
        format!("category:    {}", note.category),
        format!("enabled:     {}", note.enabled),
        format!(
            "document:    {}",
            note.document_ref.as_deref().unwrap_or("-")
        ),
    ];
    if note.preview_refs.is_empty() {
        lines.push("previews:    -".to_string());
    } else {
        lines.push("previews:".to_string());
        lines.extend(note.preview_refs.iter().map(|preview| format!("  - {preview}")));
    }
    if !note.description.is_empty() {
        lines.push(String::new());
        lines.push(note.description.clone());
    }
    lines
}

pub fn format_purchase_lines(purchases: &[Purchase]) -> Vec<String> {
    purchases
        .iter()
        .map(|purchase| {
            format!(
                "{}  {:<6}  note={}  {}  {}",
                format_timestamp(purchase.timestamp),
                purchase.method.label(),
                purchase.note_id,
                format_price(purchase.price),
                truncate_chars(&purchase.title, 40)
            )
        })
        .collect()
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn normalize_title(title_parts: &[String]) -> Result<String, CliError> {
    normalize_content(&title_parts.join(" ")).ok_or(CliError::EmptyTitle)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trim references and drop blank ones.
pub fn normalize_refs(refs: Vec<String>) -> Vec<String> {
    refs.iter()
        .filter_map(|reference| normalize_content(reference))
        .collect()
}

pub fn parse_note_id(id: &str) -> Result<NoteId, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyNoteId);
    }
    trimmed
        .parse::<NoteId>()
        .map_err(|_| CliError::InvalidNoteId(trimmed.to_string()))
}

pub async fn require_note(service: &CliService, id: NoteId) -> Result<Note, CliError> {
    service
        .get_note(id)
        .await
        .ok_or_else(|| CliError::NoteNotFound(id.to_string()))
}

/// Write rendered command output to `output_path`, or to stdout when absent.
///
/// A file target gets its path echoed so scripts can pick it up.
pub fn write_output(output_path: Option<&Path>, contents: &[u8]) -> Result<(), CliError> {
    let Some(path) = output_path else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(contents)?;
        if !contents.ends_with(b"\n") {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()?;
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    println!("{}", path.display());
    Ok(())
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_db_path.or_else(|| env::var_os(DB_PATH_ENV).map(PathBuf::from)) {
        return Ok(path);
    }
    default_db_path()
}

pub fn default_db_path() -> Result<PathBuf, CliError> {
    Ok(dirs::data_dir()
        .ok_or(CliError::MissingDirectory("data"))?
        .join("pebblenote")
        .join("pebblenote.db"))
}

pub fn resolve_config_path(cli_config_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_config_path {
        return Ok(path);
    }
    Ok(dirs::config_dir()
        .ok_or(CliError::MissingDirectory("config"))?
        .join("pebblenote")
        .join("config.json"))
}

pub fn load_config(path: &Path) -> Result<AppConfig, CliError> {
    Ok(AppConfig::load_from_path(path)?.with_env_overrides()?)
}

/// Open the note service on the SQLite file at `path`.
///
/// Must run inside a tokio runtime when `config` names a mirror.
pub fn open_service(path: &Path, config: &AppConfig) -> Result<CliService, CliError> {
    let storage = SqliteKeyValueStore::open(path)?;

    let mirror = match &config.mirror {
        Some(mirror_config) => {
            tracing::info!("Mirroring notes to {}", mirror_config.base_url);
            let mirror = HttpMirror::new(mirror_config)?;
            Some(MirrorDispatcher::on_current_runtime(Arc::new(mirror))?)
        }
        None => None,
    };

    Ok(NoteService::open(storage, config, mirror)?)
}
