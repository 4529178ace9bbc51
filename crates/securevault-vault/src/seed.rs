//! Demo seed data for first-time users.

use crate::clock::DAY_MS;
use crate::model::{
    CardEntry, Category, DocumentEntry, ItemId, ItemKind, NoteEntry, PasswordEntry, VaultItem,
    VaultStore,
};

const HOUR_MS: i64 = 60 * 60 * 1000;

/// Placeholder the demo stores in place of real secrets.
pub const PLACEHOLDER_SECRET: &str = "encrypted";

/// Build the fixed demo store: three passwords, two notes, one card and one
/// document, with `lastUsed` offsets relative to `now_ms`.
pub fn seed_store(now_ms: i64) -> VaultStore {
    let mut store = VaultStore::new();

    let passwords = [
        (1, "Gmail Account", "user@gmail.com", "https://gmail.com", 2 * HOUR_MS),
        (2, "Banking", "customer123", "https://chase.com", DAY_MS),
        (3, "Netflix", "moviefan@email.com", "https://netflix.com", 2 * DAY_MS),
    ];
    for (id, title, username, url, age) in passwords {
        store.items_mut(Category::Passwords).push(item(
            id,
            now_ms - age,
            ItemKind::Password(PasswordEntry {
                title: title.into(),
                username: username.into(),
                password: PLACEHOLDER_SECRET.into(),
                url: url.into(),
            }),
        ));
    }

    let notes = [
        (1, "Banking PIN", ["banking", "pin"], DAY_MS),
        (2, "WiFi Passwords", ["wifi", "home"], 3 * DAY_MS),
    ];
    for (id, title, tags, age) in notes {
        store.items_mut(Category::Notes).push(item(
            id,
            now_ms - age,
            ItemKind::Note(NoteEntry {
                title: title.into(),
                content: PLACEHOLDER_SECRET.into(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            }),
        ));
    }

    store.items_mut(Category::Cards).push(item(
        1,
        now_ms - 5 * DAY_MS,
        ItemKind::Card(CardEntry {
            name: "Chase Visa".into(),
            number: PLACEHOLDER_SECRET.into(),
            expiry: "12/25".into(),
            cvv: PLACEHOLDER_SECRET.into(),
        }),
    ));

    store.items_mut(Category::Documents).push(item(
        1,
        now_ms - 7 * DAY_MS,
        ItemKind::Document(DocumentEntry {
            name: "Passport Scan".into(),
            doc_type: "pdf".into(),
            encrypted: true,
        }),
    ));

    store
}

fn item(id: i64, last_used: i64, kind: ItemKind) -> VaultItem {
    VaultItem {
        id: ItemId(id),
        created_at: None,
        last_used,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_expected_shape() {
        let store = seed_store(1_700_000_000_000);
        assert_eq!(store.items(Category::Passwords).len(), 3);
        assert_eq!(store.items(Category::Notes).len(), 2);
        assert_eq!(store.items(Category::Cards).len(), 1);
        assert_eq!(store.items(Category::Documents).len(), 1);
        assert_eq!(store.total_items(), 7);
        store.validate().unwrap();
    }

    #[test]
    fn seed_items_are_recent() {
        let now = 1_700_000_000_000;
        let store = seed_store(now);
        assert!(store.all_items().all(|item| now - item.last_used <= 7 * DAY_MS));
    }
}
