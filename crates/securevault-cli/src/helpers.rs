//! Shared helpers for the CLI binary.
//!
//! Tracing setup, context construction, and the small formatting routines
//! used by more than one subcommand.

use std::path::Path;

use anyhow::{Context, Result};
use securevault_vault::{Category, VaultConfig, VaultContext, VaultItem};
use tracing::warn;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with an env-filter.
///
/// Respects `RUST_LOG` when set, otherwise uses `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Load configuration from `config_path` with environment overrides applied.
pub fn load_config(config_path: &Path) -> Result<VaultConfig> {
    Ok(VaultConfig::load(config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?
        .with_env_overrides())
}

/// Load configuration and open the vault.
///
/// Prints the load warning, if any, before handing the context back.
pub fn open_vault(config_path: &Path) -> Result<VaultContext> {
    let config = load_config(config_path)?;

    let vault = VaultContext::open(&config)
        .with_context(|| format!("failed to open vault at {}", config.data_path.display()))?;

    if let Some(message) = vault.load_warning() {
        warn!(%message, "vault data replaced by demo data");
        eprintln!("  warning: {message}");
    }
    Ok(vault)
}

pub fn parse_category(name: &str) -> Result<Category> {
    name.parse::<Category>()
        .with_context(|| format!("expected one of passwords, notes, cards, documents; got `{name}`"))
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// One line describing an item, without its secrets.
pub fn describe_item(item: &VaultItem) -> String {
    use securevault_vault::ItemKind;

    let detail = match &item.kind {
        ItemKind::Password(p) if p.url.is_empty() => p.username.clone(),
        ItemKind::Password(p) => format!("{} @ {}", p.username, p.url),
        ItemKind::Note(n) if n.tags.is_empty() => String::new(),
        ItemKind::Note(n) => format!("[{}]", n.tags.join(", ")),
        ItemKind::Card(c) => format!("expires {}", c.expiry),
        ItemKind::Document(d) => d.doc_type.clone(),
    };
    format!("{:>15}  {:<24} {}", item.id.to_string(), item.label(), detail)
}

pub fn print_category(category: Category, items: &[VaultItem]) {
    println!("  {category} ({})", items.len());
    for item in items {
        println!("  {}", describe_item(item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use securevault_vault::{DocumentEntry, ItemId, ItemKind, NoteEntry, PasswordEntry};

    fn item(id: i64, kind: ItemKind) -> VaultItem {
        VaultItem {
            id: ItemId(id),
            created_at: None,
            last_used: 0,
            kind,
        }
    }

    #[test]
    fn parse_category_accepts_lowercase_names() {
        assert_eq!(parse_category("cards").unwrap(), Category::Cards);
        assert_eq!(parse_category("documents").unwrap(), Category::Documents);
    }

    #[test]
    fn parse_category_rejects_unknown_names() {
        let err = parse_category("Vehicles").unwrap_err();
        assert!(err.to_string().contains("got `Vehicles`"));
    }

    #[test]
    fn describe_password_shows_login_not_secret() {
        let line = describe_item(&item(
            3,
            ItemKind::Password(PasswordEntry {
                title: "Netflix".into(),
                username: "moviefan".into(),
                password: "hunter2".into(),
                url: "https://netflix.com".into(),
            }),
        ));
        assert!(line.starts_with(&format!("{:>15}", "3")));
        assert!(line.contains("Netflix"));
        assert!(line.ends_with("moviefan @ https://netflix.com"));
        assert!(!line.contains("hunter2"));
    }

    #[test]
    fn describe_note_and_document() {
        let note = describe_item(&item(
            1,
            ItemKind::Note(NoteEntry {
                title: "WiFi".into(),
                content: "secret".into(),
                tags: vec!["wifi".into(), "home".into()],
            }),
        ));
        assert!(note.ends_with("[wifi, home]"));
        assert!(!note.contains("secret"));

        let doc = describe_item(&item(
            2,
            ItemKind::Document(DocumentEntry {
                name: "Passport Scan".into(),
                doc_type: "pdf".into(),
                encrypted: true,
            }),
        ));
        assert!(doc.ends_with("pdf"));
    }
}
