//! CLI entry point for SecureVault.
//!
//! This binary provides the `securevault` command: listing, adding, deleting
//! and searching vault items, scoring and auditing the vault, and the
//! simulated sign-in.

mod cli;
mod helpers;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use securevault_vault::codec::decode_now;
use securevault_vault::present::{CountAnimation, SAVED_MESSAGE};
use securevault_vault::{
    ActionOutcome, CardEntry, Category, Codec, Credentials, DocumentEntry, ItemId, ItemKind,
    NoteEntry, Notice, PasswordEntry, SearchOutcome,
};
use tracing::info;

use cli::{AddItem, Cli, Commands};
use helpers::{init_tracing, load_config, open_vault, parse_category, print_category};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; it only supplies overrides.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config_path = cli.config.as_path();
    match cli.command {
        Commands::List { category } => cmd_list(config_path, category.as_deref()),
        Commands::Add { item } => cmd_add(config_path, item).await,
        Commands::Delete { category, id } => cmd_delete(config_path, &category, id),
        Commands::Search { query } => cmd_search(config_path, &query),
        Commands::Score { json } => cmd_score(config_path, json).await,
        Commands::Audit => cmd_audit(config_path),
        Commands::Stats => cmd_stats(config_path),
        Commands::Login { pin, face } => cmd_login(config_path, pin, face).await,
        Commands::Reveal { id, pin } => cmd_reveal(config_path, id, pin).await,
        Commands::Encode { json } => cmd_encode(config_path, &json).await,
        Commands::Decode { blob } => cmd_decode(&blob),
        Commands::Action { name } => cmd_action(config_path, &name),
        Commands::Open { category } => cmd_open(config_path, &category),
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

fn cmd_list(config_path: &Path, category: Option<&str>) -> Result<()> {
    let vault = open_vault(config_path)?;

    let categories = match category {
        Some(name) => vec![parse_category(name)?],
        None => Category::ALL.to_vec(),
    };
    println!();
    for category in categories {
        print_category(category, vault.store().items(category));
        println!();
    }
    Ok(())
}

async fn cmd_add(config_path: &Path, item: AddItem) -> Result<()> {
    let mut vault = open_vault(config_path)?;

    let (category, kind) = match item {
        AddItem::Password {
            title,
            username,
            password,
            url,
        } => {
            let sealed = vault
                .seal_secret(&password)
                .await
                .context("failed to encode password")?;
            (
                Category::Passwords,
                ItemKind::Password(PasswordEntry {
                    title,
                    username,
                    password: sealed,
                    url,
                }),
            )
        }
        AddItem::Note {
            title,
            content,
            tags,
        } => (
            Category::Notes,
            ItemKind::Note(NoteEntry {
                title,
                content,
                tags: tags
                    .into_iter()
                    .map(|tag| tag.trim().to_string())
                    .filter(|tag| !tag.is_empty())
                    .collect(),
            }),
        ),
        AddItem::Card {
            name,
            number,
            expiry,
            cvv,
        } => (
            Category::Cards,
            ItemKind::Card(CardEntry {
                name,
                number,
                expiry,
                cvv,
            }),
        ),
        AddItem::Document { name, doc_type } => (
            Category::Documents,
            ItemKind::Document(DocumentEntry {
                name,
                doc_type,
                encrypted: true,
            }),
        ),
    };

    let item = vault
        .add_item(category, kind)
        .context("failed to add item")?;
    info!(%category, id = %item.id, "item added from cli");

    println!("  {}", Notice::success(SAVED_MESSAGE));
    println!("  {category}/{} {}", item.id, item.label());
    Ok(())
}

fn cmd_delete(config_path: &Path, category: &str, id: i64) -> Result<()> {
    let category = parse_category(category)?;
    let mut vault = open_vault(config_path)?;

    match vault
        .delete_item(category, ItemId(id))
        .context("failed to delete item")?
    {
        Some(item) => println!("  Deleted {category}/{id} {}", item.label()),
        None => println!("  No item {category}/{id}; nothing deleted"),
    }
    Ok(())
}

fn cmd_search(config_path: &Path, query: &str) -> Result<()> {
    let vault = open_vault(config_path)?;

    match vault.search(query) {
        SearchOutcome::Cleared => println!("  Enter a search term."),
        SearchOutcome::Results(results) if results.is_empty() => {
            println!("  No results for \"{}\".", query.trim());
        }
        SearchOutcome::Results(results) => {
            println!();
            for (category, items) in results.iter().filter(|(_, items)| !items.is_empty()) {
                print_category(category, items);
                println!();
            }
        }
    }
    Ok(())
}

fn cmd_stats(config_path: &Path) -> Result<()> {
    let vault = open_vault(config_path)?;
    let stats = vault.stats();

    println!();
    println!("  Total items: {}", stats.total);
    for category in Category::ALL {
        println!("  {:<10} {}", category.as_str(), stats.count(category));
    }
    println!();
    Ok(())
}

fn cmd_open(config_path: &Path, category: &str) -> Result<()> {
    let category = parse_category(category)?;
    let mut vault = open_vault(config_path)?;

    let intent = vault
        .open_category(category)
        .context("failed to record selected category")?;
    println!("  -> {intent}");
    print_category(category, vault.store().items(category));
    Ok(())
}

// ---------------------------------------------------------------------------
// Security
// ---------------------------------------------------------------------------

async fn cmd_score(config_path: &Path, json: bool) -> Result<()> {
    let vault = open_vault(config_path)?;
    let display = vault.score_display();

    if json {
        let rendered =
            serde_json::to_string_pretty(&display).context("failed to serialize score")?;
        println!("{rendered}");
        return Ok(());
    }

    let animation = CountAnimation::new(0, i64::from(display.score));
    let interval = animation.interval();
    let mut stdout = std::io::stdout();
    for frame in animation {
        print!("\r  Security score: {frame:>3}/100");
        stdout.flush().context("failed to write to stdout")?;
        tokio::time::sleep(interval).await;
    }
    println!("  ({:?}, {})", display.tier, display.color);
    Ok(())
}

fn cmd_audit(config_path: &Path) -> Result<()> {
    let vault = open_vault(config_path)?;
    let breakdown = vault.score_breakdown();
    let report = vault.audit();

    println!();
    println!("  Security score:  {}/100", report.score);
    println!("  Weak passwords:  {}", breakdown.weak_passwords);
    println!("  Stale items:     {}", breakdown.stale_items);
    println!(
        "  Two-factor:      {}",
        if breakdown.two_factor { "enabled" } else { "disabled" }
    );
    println!();
    if report.recommendations.is_empty() {
        println!("  No recommendations.");
    } else {
        println!("  Recommendations:");
        for recommendation in &report.recommendations {
            println!("    - {recommendation}");
        }
    }
    println!();
    Ok(())
}

fn cmd_action(config_path: &Path, name: &str) -> Result<()> {
    let vault = open_vault(config_path)?;

    match vault.quick_action(name) {
        ActionOutcome::Navigate(intent) => println!("  -> {intent}"),
        ActionOutcome::Notify(notice) => println!("  {notice}"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

async fn cmd_login(config_path: &Path, pin: Option<String>, face: bool) -> Result<()> {
    let mut vault = open_vault(config_path)?;

    let (method, credentials) = if face {
        ("face", Credentials::default())
    } else {
        let pin = pin.context("pass --pin <PIN> or --face")?;
        ("pin", Credentials::pin(pin))
    };

    println!("  Authenticating...");
    let user = vault
        .authenticate(method, &credentials)
        .await
        .context("sign-in failed")?;
    println!("  Signed in as {} (id {})", user.name, user.id);
    Ok(())
}

async fn cmd_reveal(config_path: &Path, id: i64, pin: String) -> Result<()> {
    let mut vault = open_vault(config_path)?;

    vault
        .authenticate("pin", &Credentials::pin(pin))
        .await
        .context("sign-in failed")?;
    let secret = vault
        .reveal_secret(ItemId(id))
        .with_context(|| format!("cannot reveal password {id}"))?;
    println!("{secret}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

async fn cmd_encode(config_path: &Path, json: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let value: serde_json::Value = serde_json::from_str(json).context("input is not JSON")?;

    let blob = Codec::new(config.encode_delay())
        .encode(&value)
        .await
        .context("failed to encode")?;
    println!("{blob}");
    Ok(())
}

fn cmd_decode(blob: &str) -> Result<()> {
    let value: serde_json::Value = decode_now(blob.trim()).context("failed to decode")?;
    let rendered = serde_json::to_string_pretty(&value).context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}
