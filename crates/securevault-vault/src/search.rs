//! Substring search over the vault.
//!
//! Matching is case-insensitive containment over a fixed field set per
//! category:
//!
//! - passwords: title, username, url
//! - notes: title, any tag
//! - cards: name
//! - documents: name
//!
//! There is no ranking: hits keep store order. A blank query is not a search
//! at all and yields [`SearchOutcome::Cleared`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Category, ItemKind, VaultItem, VaultStore};

/// Result of running a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was blank; the caller should clear any shown results.
    Cleared,
    /// Matches per category.
    Results(SearchResults),
}

impl SearchOutcome {
    pub fn results(&self) -> Option<&SearchResults> {
        match self {
            Self::Cleared => None,
            Self::Results(results) => Some(results),
        }
    }

    pub fn is_cleared(&self) -> bool {
        matches!(self, Self::Cleared)
    }
}

/// Matching items for every category (empty lists included).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchResults {
    by_category: BTreeMap<Category, Vec<VaultItem>>,
}

impl SearchResults {
    /// Hits in one category.
    pub fn in_category(&self, category: Category) -> &[VaultItem] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total hits across categories.
    pub fn total(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[VaultItem])> {
        self.by_category
            .iter()
            .map(|(category, items)| (*category, items.as_slice()))
    }
}

/// Run `query` against `store`.
pub fn search(store: &VaultStore, query: &str) -> SearchOutcome {
    if query.trim().is_empty() {
        tracing::debug!("blank query, clearing results");
        return SearchOutcome::Cleared;
    }

    let needle = query.to_lowercase();
    let mut by_category: BTreeMap<Category, Vec<VaultItem>> = Category::ALL
        .iter()
        .map(|category| (*category, Vec::new()))
        .collect();

    for (category, items) in store.iter() {
        let hits = by_category.entry(category).or_default();
        hits.extend(items.iter().filter(|item| matches(item, &needle)).cloned());
    }

    let results = SearchResults { by_category };
    tracing::debug!(hits = results.total(), "search complete");
    SearchOutcome::Results(results)
}

/// Whether `item` matches an already lower-cased `needle`.
pub fn matches(item: &VaultItem, needle: &str) -> bool {
    match &item.kind {
        ItemKind::Password(p) => {
            contains(&p.title, needle) || contains(&p.username, needle) || contains(&p.url, needle)
        }
        ItemKind::Note(n) => {
            contains(&n.title, needle) || n.tags.iter().any(|tag| contains(tag, needle))
        }
        ItemKind::Card(c) => contains(&c.name, needle),
        ItemKind::Document(d) => contains(&d.name, needle),
    }
}

fn contains(field: &str, needle: &str) -> bool {
    field.to_lowercase().contains(needle)
}
