use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use pebblenote_core::PaymentMethod;

#[derive(Parser)]
#[command(name = "pebble")]
#[command(about = "Browse, buy and administer PDF note listings")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the JSON config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note listing
    #[command(alias = "new")]
    Add {
        #[command(flatten)]
        note: AddArgs,
    },
    /// List notes (buyer catalog unless --all)
    List {
        /// Include disabled notes, as the admin dashboard does
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one note
    Show {
        /// Note ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing note
    Edit {
        /// Note ID
        id: String,
        #[command(flatten)]
        changes: EditArgs,
    },
    /// Delete an existing note
    Delete {
        /// Note ID
        id: String,
    },
    /// Enable or disable a note for buyers
    Toggle {
        /// Note ID
        id: String,
    },
    /// Show dashboard numbers
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Buy a note
    Buy {
        /// Note ID
        id: String,
        /// Payment method (khalti or esewa)
        #[arg(long, value_name = "METHOD", value_parser = parse_payment_method)]
        method: PaymentMethod,
    },
    /// List recorded purchases
    Purchases {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Merge the remote mirror snapshot into local notes
    Pull,
    /// Create the demo listings when no notes exist
    Seed,
    /// Export notes
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Output file, or a directory to get a timestamped file name
        /// (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
pub struct AddArgs {
    /// Note title
    #[arg(required = true)]
    pub title: Vec<String>,
    /// Price in rupees
    #[arg(long)]
    pub price: f64,
    /// Reference to the note document
    #[arg(long, alias = "pdf", value_name = "URI")]
    pub document: Option<String>,
    /// Preview image reference (repeatable)
    #[arg(long = "preview", value_name = "URI")]
    pub previews: Vec<String>,
    /// Listing category
    #[arg(long)]
    pub category: Option<String>,
    /// Listing description
    #[arg(long)]
    pub description: Option<String>,
    /// Create the note hidden from buyers
    #[arg(long)]
    pub disabled: bool,
}

#[derive(Debug, Default, clap::Args)]
pub struct EditArgs {
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New price in rupees
    #[arg(long)]
    pub price: Option<f64>,
    /// New document reference
    #[arg(long, alias = "pdf", value_name = "URI", conflicts_with = "clear_document")]
    pub document: Option<String>,
    /// Drop the document reference
    #[arg(long, alias = "clear-pdf")]
    pub clear_document: bool,
    /// Replace preview references (repeatable)
    #[arg(long = "preview", value_name = "URI", conflicts_with = "clear_previews")]
    pub previews: Vec<String>,
    /// Drop all preview references
    #[arg(long)]
    pub clear_previews: bool,
    /// New category
    #[arg(long)]
    pub category: Option<String>,
    /// New description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

fn parse_payment_method(value: &str) -> Result<PaymentMethod, String> {
    value.parse()
}
