//! Vault domain model.
//!
//! A [`VaultStore`] maps each [`Category`] to an ordered list of
//! [`VaultItem`]s. Items share `id`/`createdAt`/`lastUsed` and carry a
//! category-specific [`ItemKind`] payload. The serialized form is the flat
//! camelCase JSON object persisted in the `secureVaultData` slot:
//!
//! ```json
//! { "passwords": [ { "id": 1, "title": "Gmail Account", "username": "user@gmail.com",
//!                    "password": "encrypted", "url": "https://gmail.com",
//!                    "lastUsed": 1700000000000 } ],
//!   "notes": [], "cards": [], "documents": [] }
//! ```

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VaultError;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// One of the four item kinds a vault holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Passwords,
    Notes,
    Cards,
    Documents,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::Passwords,
        Category::Notes,
        Category::Cards,
        Category::Documents,
    ];

    /// The name used as the JSON key and in the session slot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passwords => "passwords",
            Self::Notes => "notes",
            Self::Cards => "cards",
            Self::Documents => "documents",
        }
    }

    /// Parse a category name. Only the exact lowercase names are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "passwords" => Some(Self::Passwords),
            "notes" => Some(Self::Notes),
            "cards" => Some(Self::Cards),
            "documents" => Some(Self::Documents),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| VaultError::UnknownCategory(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Item identifier. Unique within a category only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ItemId)
    }
}

/// A stored website/app login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordEntry {
    pub title: String,
    pub username: String,
    /// Opaque secret: either the literal demo placeholder or a codec blob.
    pub password: String,
    pub url: String,
}

/// A free-form secure note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A payment card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntry {
    pub name: String,
    pub number: String,
    /// `MM/YY`.
    pub expiry: String,
    pub cvv: String,
}

/// A stored document reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub name: String,
    /// Short file type, e.g. `pdf`.
    #[serde(rename = "type")]
    pub doc_type: String,
    pub encrypted: bool,
}

/// Category-specific payload of a [`VaultItem`].
///
/// Serialized untagged: the variant is recognised by its field set, and the
/// owning category is known from the enclosing map key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemKind {
    Password(PasswordEntry),
    Note(NoteEntry),
    Card(CardEntry),
    Document(DocumentEntry),
}

impl ItemKind {
    /// The category this payload belongs to.
    pub fn category(&self) -> Category {
        match self {
            Self::Password(_) => Category::Passwords,
            Self::Note(_) => Category::Notes,
            Self::Card(_) => Category::Cards,
            Self::Document(_) => Category::Documents,
        }
    }

    /// Short kind name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Password(_) => "password",
            Self::Note(_) => "note",
            Self::Card(_) => "card",
            Self::Document(_) => "document",
        }
    }

    /// Human-facing label: the title for passwords/notes, the name otherwise.
    pub fn label(&self) -> &str {
        match self {
            Self::Password(p) => &p.title,
            Self::Note(n) => &n.title,
            Self::Card(c) => &c.name,
            Self::Document(d) => &d.name,
        }
    }
}

/// A single vault record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultItem {
    pub id: ItemId,
    /// Epoch milliseconds. Absent on seed records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Epoch milliseconds of the last use.
    pub last_used: i64,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl VaultItem {
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn label(&self) -> &str {
        self.kind.label()
    }

    /// The password payload, if this is a password item.
    pub fn as_password(&self) -> Option<&PasswordEntry> {
        match &self.kind {
            ItemKind::Password(p) => Some(p),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Category-keyed collection of vault items, insertion order preserved per
/// category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaultStore {
    categories: BTreeMap<Category, Vec<VaultItem>>,
}

impl VaultStore {
    /// An empty store with all four categories present.
    pub fn new() -> Self {
        let categories = Category::ALL
            .iter()
            .map(|category| (*category, Vec::new()))
            .collect();
        Self { categories }
    }

    /// Items of one category; empty when the category is absent.
    pub fn items(&self, category: Category) -> &[VaultItem] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mutable list for a category, created when absent.
    pub(crate) fn items_mut(&mut self, category: Category) -> &mut Vec<VaultItem> {
        self.categories.entry(category).or_default()
    }

    /// Mutable list for a category only if it already exists.
    pub(crate) fn existing_mut(&mut self, category: Category) -> Option<&mut Vec<VaultItem>> {
        self.categories.get_mut(&category)
    }

    pub(crate) fn remove_category(&mut self, category: Category) {
        self.categories.remove(&category);
    }

    /// Whether the category key exists (even with no items).
    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains_key(&category)
    }

    /// Iterate `(category, items)` pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[VaultItem])> {
        self.categories
            .iter()
            .map(|(category, items)| (*category, items.as_slice()))
    }

    /// Every item across all categories.
    pub fn all_items(&self) -> impl Iterator<Item = &VaultItem> {
        self.categories.values().flatten()
    }

    /// Total number of items across all categories.
    pub fn total_items(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Find an item by id within a category.
    pub fn get(&self, category: Category, id: ItemId) -> Option<&VaultItem> {
        self.items(category).iter().find(|item| item.id == id)
    }

    /// Largest id in use anywhere in the store.
    pub fn max_id(&self) -> Option<ItemId> {
        self.all_items().map(|item| item.id).max()
    }

    /// Check structural invariants of a loaded store.
    ///
    /// Every item must carry its category's kind, and ids must be unique
    /// within a category.
    pub fn validate(&self) -> Result<(), String> {
        for (category, items) in self.iter() {
            let mut seen = HashSet::with_capacity(items.len());
            for item in items {
                if item.category() != category {
                    return Err(format!(
                        "item {} in `{category}` is a {}",
                        item.id,
                        item.kind.name()
                    ));
                }
                if !seen.insert(item.id) {
                    return Err(format!("duplicate id {} in `{category}`", item.id));
                }
            }
        }
        Ok(())
    }

    /// Serialize to the persisted JSON blob.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a persisted JSON blob and validate it.
    pub fn from_json(blob: &str) -> Result<Self, String> {
        let store: Self = serde_json::from_str(blob).map_err(|e| e.to_string())?;
        store.validate()?;
        Ok(store)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
