//! CLI argument definitions for SecureVault.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SecureVault -- a demo password vault.
#[derive(Parser)]
#[command(
    name = "securevault",
    version,
    about = "SecureVault -- demo password vault",
    long_about = "A demo vault for passwords, notes, cards and documents. Authentication \
                  is simulated and secrets are only base64-encoded; do not store real data."
)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config/securevault.toml")]
    pub config: PathBuf,

    /// Default log level when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List items, optionally for a single category.
    List {
        /// passwords, notes, cards or documents.
        category: Option<String>,
    },

    /// Add an item to the vault.
    Add {
        #[command(subcommand)]
        item: AddItem,
    },

    /// Delete an item by category and id.
    Delete {
        category: String,
        id: i64,
    },

    /// Case-insensitive search across all categories.
    Search {
        query: String,
    },

    /// Show the security score.
    Score {
        /// Print the score display as JSON instead of animating it.
        #[arg(long)]
        json: bool,
    },

    /// Run a security audit and print the recommendations.
    Audit,

    /// Show item counts per category.
    Stats,

    /// Sign in with a PIN or face authentication.
    Login {
        /// PIN to sign in with.
        #[arg(long, conflicts_with = "face")]
        pin: Option<String>,

        /// Use (simulated) face authentication.
        #[arg(long)]
        face: bool,
    },

    /// Sign in and print the decoded password of a stored item.
    Reveal {
        id: i64,

        /// PIN to sign in with.
        #[arg(long)]
        pin: String,
    },

    /// Encode a JSON value as a base64 blob.
    Encode {
        json: String,
    },

    /// Decode a base64 blob back into JSON.
    Decode {
        blob: String,
    },

    /// Run a dashboard quick action (add-item, security-scan, backup, ...).
    Action {
        name: String,
    },

    /// Open a category's detail view.
    Open {
        category: String,
    },
}

#[derive(Subcommand)]
pub enum AddItem {
    /// Add a login; the password is encoded before it is stored.
    Password {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        url: String,
    },

    /// Add a secure note.
    Note {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Comma-separated tags.
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Add a payment card.
    Card {
        #[arg(long)]
        name: String,
        #[arg(long)]
        number: String,
        /// MM/YY.
        #[arg(long)]
        expiry: String,
        #[arg(long)]
        cvv: String,
    },

    /// Add a document reference.
    Document {
        #[arg(long)]
        name: String,
        /// File type, e.g. pdf.
        #[arg(long = "type", default_value = "pdf")]
        doc_type: String,
    },
}
