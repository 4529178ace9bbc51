//! Integration tests for the securevault-vault crate.
//!
//! These exercise the full vault lifecycle through `VaultContext` and
//! `RecordStore`: seed loading, add/delete/search, persistence round trips,
//! scoring and the authentication stub.

use std::sync::Arc;

use securevault_vault::clock::DAY_MS;
use securevault_vault::slot::VAULT_DATA_KEY;
use securevault_vault::{
    CardEntry, Category, Credentials, DocumentEntry, FixedClock, ItemKind, KvSlot, LoadOrigin,
    MemorySlot, NoteEntry, PasswordEntry, RecordStore, SqliteSlot, VaultConfig, VaultContext,
    VaultError,
};

const NOW: i64 = 1_700_000_000_000;

/// Create a context over a fresh in-memory slot with no artificial delays.
fn test_vault() -> VaultContext {
    VaultContext::with_parts(
        &VaultConfig::instant(),
        Box::new(MemorySlot::new()),
        Arc::new(FixedClock::new(NOW)),
    )
    .unwrap()
}

fn sample_items() -> Vec<(Category, ItemKind)> {
    vec![
        (
            Category::Passwords,
            ItemKind::Password(PasswordEntry {
                title: "GitHub".into(),
                username: "octo-dev".into(),
                password: "encrypted".into(),
                url: "https://github.com/login".into(),
            }),
        ),
        (
            Category::Notes,
            ItemKind::Note(NoteEntry {
                title: "Recovery Codes".into(),
                content: "encrypted".into(),
                tags: vec!["Backup".into(), "2fa".into()],
            }),
        ),
        (
            Category::Cards,
            ItemKind::Card(CardEntry {
                name: "Amex Gold".into(),
                number: "encrypted".into(),
                expiry: "04/28".into(),
                cvv: "encrypted".into(),
            }),
        ),
        (
            Category::Documents,
            ItemKind::Document(DocumentEntry {
                name: "Tax Return 2025".into(),
                doc_type: "pdf".into(),
                encrypted: true,
            }),
        ),
    ]
}

/// The searchable fields of an item.
fn searchable_fields(kind: &ItemKind) -> Vec<String> {
    match kind {
        ItemKind::Password(p) => vec![p.title.clone(), p.username.clone(), p.url.clone()],
        ItemKind::Note(n) => {
            let mut fields = vec![n.title.clone()];
            fields.extend(n.tags.iter().cloned());
            fields
        }
        ItemKind::Card(c) => vec![c.name.clone()],
        ItemKind::Document(d) => vec![d.name.clone()],
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Seed scenario
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn seed_scenario_search_delete_search() {
    let mut vault = test_vault();
    assert_eq!(vault.load_origin(), &LoadOrigin::Seeded);
    assert_eq!(vault.stats().total, 7);

    let outcome = vault.search("netflix");
    let results = outcome.results().expect("non-blank query gives results");
    assert_eq!(results.in_category(Category::Passwords).len(), 1);
    assert_eq!(results.in_category(Category::Notes).len(), 0);
    assert_eq!(results.in_category(Category::Cards).len(), 0);
    assert_eq!(results.in_category(Category::Documents).len(), 0);
    let netflix_id = results.in_category(Category::Passwords)[0].id;

    assert!(vault.search("").is_cleared());

    let removed = vault
        .delete_item(Category::Passwords, netflix_id)
        .unwrap()
        .expect("netflix exists");
    assert_eq!(removed.label(), "Netflix");

    let outcome = vault.search("netflix");
    assert_eq!(outcome.results().unwrap().total(), 0);
    assert_eq!(vault.stats().total, 6);
}

// ═══════════════════════════════════════════════════════════════════════
//  Add / search / delete
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn added_items_are_found_by_any_substring_of_matched_fields() {
    let mut vault = test_vault();

    for (category, kind) in sample_items() {
        let item = vault.add_item(category, kind.clone()).unwrap();

        for field in searchable_fields(&kind) {
            let chars: Vec<char> = field.chars().collect();
            // Every prefix, suffix and a middle slice, in original and upper case.
            let mut needles = Vec::new();
            for i in 1..=chars.len() {
                needles.push(chars[..i].iter().collect::<String>());
                needles.push(chars[chars.len() - i..].iter().collect::<String>());
            }
            if chars.len() > 2 {
                needles.push(chars[1..chars.len() - 1].iter().collect::<String>());
            }

            for needle in needles {
                for query in [needle.clone(), needle.to_uppercase()] {
                    if query.trim().is_empty() {
                        continue;
                    }
                    let outcome = vault.search(&query);
                    let hits = outcome.results().unwrap().in_category(category);
                    assert!(
                        hits.iter().any(|hit| hit.id == item.id),
                        "query {query:?} should find {} in {category}",
                        item.label()
                    );
                }
            }
        }
    }
}

#[test]
fn deleted_item_no_longer_matches_its_title() {
    let mut vault = test_vault();

    for (category, kind) in sample_items() {
        let item = vault.add_item(category, kind).unwrap();
        let title = item.label().to_string();

        vault.delete_item(category, item.id).unwrap();

        let outcome = vault.search(&title);
        let hits = outcome.results().unwrap().in_category(category);
        assert!(hits.iter().all(|hit| hit.id != item.id));
    }
}

#[test]
fn delete_unknown_is_silent() {
    let mut vault = test_vault();
    let missing = vault
        .delete_item(Category::Documents, securevault_vault::ItemId(12345))
        .unwrap();
    assert!(missing.is_none());
    assert_eq!(vault.stats().total, 7);
}

#[test]
fn category_mismatch_is_rejected() {
    let mut vault = test_vault();
    let (_, note) = sample_items().remove(1);
    let err = vault.add_item(Category::Cards, note).unwrap_err();
    assert!(matches!(err, VaultError::CategoryMismatch { .. }));
}

// ═══════════════════════════════════════════════════════════════════════
//  Persistence
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn save_then_load_yields_equal_store() {
    let slot = Arc::new(MemorySlot::new());
    let clock = Arc::new(FixedClock::new(NOW));

    let mut store = RecordStore::load(Box::new(Arc::clone(&slot)), clock.clone()).unwrap();
    for (category, kind) in sample_items() {
        store.add_item(category, kind).unwrap();
    }
    store.save().unwrap();

    let reloaded = RecordStore::load(Box::new(Arc::clone(&slot)), clock).unwrap();
    assert_eq!(reloaded.origin(), &LoadOrigin::Persisted);
    assert_eq!(reloaded.snapshot(), store.snapshot());
}

#[test]
fn sqlite_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = VaultConfig {
        data_path: dir.path().join("nested").join("vault.db"),
        ..VaultConfig::instant()
    };

    let added = {
        let mut vault = VaultContext::open(&config).unwrap();
        let (category, kind) = sample_items().remove(0);
        vault.add_item(category, kind).unwrap()
    };

    let vault = VaultContext::open(&config).unwrap();
    assert_eq!(vault.load_origin(), &LoadOrigin::Persisted);
    assert_eq!(vault.stats().total, 8);
    assert_eq!(
        vault
            .store()
            .get(Category::Passwords, added.id)
            .map(|item| item.label()),
        Some("GitHub")
    );
}

#[test]
fn deletion_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = VaultConfig {
        data_path: dir.path().join("vault.db"),
        ..VaultConfig::instant()
    };

    let added = {
        let mut vault = VaultContext::open(&config).unwrap();
        let (category, kind) = sample_items().remove(3);
        let added = vault.add_item(category, kind).unwrap();
        let removed = vault.delete_item(Category::Documents, added.id).unwrap();
        assert_eq!(removed.as_ref().map(|item| item.id), Some(added.id));
        vault
            .delete_item(Category::Passwords, securevault_vault::ItemId(3))
            .unwrap()
            .expect("seed netflix exists");
        added
    };

    let vault = VaultContext::open(&config).unwrap();
    assert_eq!(vault.load_origin(), &LoadOrigin::Persisted);
    assert!(vault.store().get(Category::Documents, added.id).is_none());
    assert!(vault
        .store()
        .get(Category::Passwords, securevault_vault::ItemId(3))
        .is_none());
    assert_eq!(vault.stats().total, 6);
    assert_eq!(vault.search("netflix").results().unwrap().total(), 0);
}

/// A slot whose reads always fail.
struct UnreadableSlot;

impl KvSlot for UnreadableSlot {
    fn read(&self, _key: &str) -> securevault_vault::Result<Option<String>> {
        Err(VaultError::Io(std::io::Error::other("slot offline")))
    }

    fn write(&self, _key: &str, _value: &str) -> securevault_vault::Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> securevault_vault::Result<()> {
        Ok(())
    }
}

#[test]
fn unreadable_slot_fails_to_open_instead_of_seeding() {
    let err = VaultContext::with_parts(
        &VaultConfig::instant(),
        Box::new(UnreadableSlot),
        Arc::new(FixedClock::new(NOW)),
    )
    .unwrap_err();
    assert!(matches!(err, VaultError::Io(_)));
}

#[test]
fn corrupt_blob_falls_back_to_seed_with_warning() {
    let slot = SqliteSlot::open_in_memory().unwrap();
    slot.write(VAULT_DATA_KEY, "[1, 2, 3]").unwrap();

    let vault = VaultContext::with_parts(
        &VaultConfig::instant(),
        Box::new(slot),
        Arc::new(FixedClock::new(NOW)),
    )
    .unwrap();

    assert!(matches!(vault.load_origin(), LoadOrigin::Recovered { .. }));
    assert!(vault.load_warning().is_some());
    assert_eq!(vault.stats().total, 7);
}

// ═══════════════════════════════════════════════════════════════════════
//  Scoring
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn score_drops_as_items_go_stale() {
    let clock = Arc::new(FixedClock::new(NOW));
    let vault = VaultContext::with_parts(
        &VaultConfig::instant(),
        Box::new(MemorySlot::new()),
        clock.clone(),
    )
    .unwrap();

    let fresh = vault.security_score();
    assert_eq!(fresh, 85);

    // Seed items are at most a week old, so 95 days later all of them are stale.
    clock.advance(95 * DAY_MS);
    let breakdown = vault.score_breakdown();
    assert_eq!(breakdown.stale_items, 7);
    assert_eq!(breakdown.score, 50);

    let report = vault.audit();
    assert_eq!(report.timestamp, NOW + 95 * DAY_MS);
    assert_eq!(report.recommendations.len(), 3);
    assert_eq!(vault.score_display().tier, securevault_vault::ScoreTier::Poor);
}

#[test]
fn score_never_leaves_bounds() {
    let clock = Arc::new(FixedClock::new(NOW));
    let mut vault = VaultContext::with_parts(
        &VaultConfig::instant(),
        Box::new(MemorySlot::new()),
        clock.clone(),
    )
    .unwrap();

    for i in 0..30 {
        vault
            .add_item(
                Category::Passwords,
                ItemKind::Password(PasswordEntry {
                    title: format!("site {i}"),
                    username: "u".into(),
                    password: "123".into(),
                    url: String::new(),
                }),
            )
            .unwrap();
    }
    clock.advance(365 * DAY_MS);
    assert_eq!(vault.security_score(), 0);
}

// ═══════════════════════════════════════════════════════════════════════
//  Authentication
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn authentication_matrix() {
    let mut vault = test_vault();

    vault
        .authenticate("pin", &Credentials::pin("1234"))
        .await
        .unwrap();
    assert!(vault.session().is_authenticated());
    vault.logout();

    let err = vault
        .authenticate("pin", &Credentials::pin("0000"))
        .await
        .unwrap_err();
    assert!(err.is_auth_failure());
    assert!(!vault.session().is_authenticated());

    vault
        .authenticate("face", &Credentials::default())
        .await
        .unwrap();
    assert_eq!(vault.session().current_user().unwrap().name, "User");
    vault.logout();

    let err = vault
        .authenticate("retina", &Credentials::default())
        .await
        .unwrap_err();
    assert!(err.is_auth_failure());
    assert!(vault.session().current_user().is_none());
}
