//! Record store: the in-memory vault backed by one persisted slot.
//!
//! The store is loaded once per session from [`VAULT_DATA_KEY`] and written
//! back wholesale after every mutation. A missing blob yields the demo seed
//! data; an unreadable blob also yields the seed data, but the failure is
//! logged and reported through [`LoadOrigin::Recovered`] instead of being
//! swallowed.
//!
//! Mutations are all-or-nothing from the caller's view: when the write fails
//! the in-memory change is rolled back and the error is returned.

use std::sync::Arc;

use crate::clock::Clock;
use crate::error::{Result, VaultError};
use crate::ids::IdGenerator;
use crate::model::{Category, ItemId, ItemKind, VaultItem, VaultStore};
use crate::seed::seed_store;
use crate::slot::{KvSlot, VAULT_DATA_KEY};

/// Where the data of a freshly loaded store came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Parsed from the persisted blob.
    Persisted,
    /// No blob existed; seed data was used.
    Seeded,
    /// A blob existed but could not be parsed; seed data was used.
    Recovered { reason: String },
}

impl LoadOrigin {
    /// Warning text for the caller to surface, if any.
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Recovered { reason } => Some(format!(
                "stored vault data was unreadable ({reason}); demo data loaded instead"
            )),
            _ => None,
        }
    }
}

/// The vault's record store.
pub struct RecordStore {
    slot: Box<dyn KvSlot>,
    data: VaultStore,
    ids: IdGenerator,
    clock: Arc<dyn Clock>,
    origin: LoadOrigin,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("items", &self.data.total_items())
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Load the store from `slot`, falling back to seed data.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Persistence`] (or another slot error) only when
    /// the slot itself cannot be read. Parse failures are recovered.
    pub fn load(slot: Box<dyn KvSlot>, clock: Arc<dyn Clock>) -> Result<Self> {
        let (data, origin) = match slot.read(VAULT_DATA_KEY)? {
            None => {
                tracing::info!("no stored vault data, using seed data");
                (seed_store(clock.now_ms()), LoadOrigin::Seeded)
            }
            Some(blob) => match VaultStore::from_json(&blob) {
                Ok(store) => {
                    tracing::info!(items = store.total_items(), "loaded vault data");
                    (store, LoadOrigin::Persisted)
                }
                Err(reason) => {
                    tracing::warn!(%reason, "stored vault data unreadable, using seed data");
                    (seed_store(clock.now_ms()), LoadOrigin::Recovered { reason })
                }
            },
        };

        Ok(Self {
            ids: IdGenerator::starting_after(data.max_id()),
            slot,
            data,
            clock,
            origin,
        })
    }

    /// Where the current data came from at load time.
    pub fn origin(&self) -> &LoadOrigin {
        &self.origin
    }

    /// Read access to the whole store.
    pub fn snapshot(&self) -> &VaultStore {
        &self.data
    }

    /// Items of one category in insertion order.
    pub fn items(&self, category: Category) -> &[VaultItem] {
        self.data.items(category)
    }

    /// Look up an item by category and id.
    pub fn get(&self, category: Category, id: ItemId) -> Option<&VaultItem> {
        self.data.get(category, id)
    }

    pub fn total_items(&self) -> usize {
        self.data.total_items()
    }

    /// Current time from the store's clock.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Serialize the store and overwrite the persisted slot.
    pub fn save(&self) -> Result<()> {
        let blob = self.data.to_json()?;
        self.slot.write(VAULT_DATA_KEY, &blob)?;
        tracing::debug!(bytes = blob.len(), "saved vault data");
        Ok(())
    }

    /// Append a new item to `category` and persist.
    ///
    /// The item gets a fresh id and `createdAt`/`lastUsed` set to now. The
    /// stored item is returned.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::CategoryMismatch`] if `kind` does not belong to
    /// `category`, [`VaultError::IdsExhausted`] when no fresh id is left, or
    /// the slot error if persisting fails (the append is
    /// undone in that case).
    pub fn add_item(&mut self, category: Category, kind: ItemKind) -> Result<VaultItem> {
        if kind.category() != category {
            return Err(VaultError::CategoryMismatch {
                category,
                kind: kind.name(),
            });
        }

        let now = self.clock.now_ms();
        let id = self.ids.next(now).inspect_err(|err| {
            tracing::error!(%category, error = %err, "cannot allocate item id");
        })?;
        let item = VaultItem {
            id,
            created_at: Some(now),
            last_used: now,
            kind,
        };

        let had_category = self.data.has_category(category);
        self.data.items_mut(category).push(item.clone());

        if let Err(err) = self.save() {
            self.data.items_mut(category).pop();
            if !had_category {
                self.data.remove_category(category);
            }
            tracing::error!(%category, error = %err, "failed to persist new item");
            return Err(err);
        }

        tracing::info!(%category, id = %item.id, "added item");
        Ok(item)
    }

    /// Remove the first item with `id` from `category` and persist.
    ///
    /// Returns the removed item, or `None` (without writing) when the
    /// category or id does not exist.
    pub fn delete_item(&mut self, category: Category, id: ItemId) -> Result<Option<VaultItem>> {
        let Some(items) = self.data.existing_mut(category) else {
            return Ok(None);
        };
        let Some(position) = items.iter().position(|item| item.id == id) else {
            return Ok(None);
        };
        let removed = items.remove(position);

        if let Err(err) = self.save() {
            self.data.items_mut(category).insert(position, removed);
            tracing::error!(%category, %id, error = %err, "failed to persist deletion");
            return Err(err);
        }

        tracing::info!(%category, %id, "deleted item");
        Ok(Some(removed))
    }

    /// Mark an item as used now and persist. Returns `false` if not found.
    pub fn touch(&mut self, category: Category, id: ItemId) -> Result<bool> {
        let now = self.clock.now_ms();
        let Some(item) = self
            .data
            .existing_mut(category)
            .and_then(|items| items.iter_mut().find(|item| item.id == id))
        else {
            return Ok(false);
        };
        let previous = std::mem::replace(&mut item.last_used, now);

        if let Err(err) = self.save() {
            if let Some(item) = self
                .data
                .existing_mut(category)
                .and_then(|items| items.iter_mut().find(|item| item.id == id))
            {
                item.last_used = previous;
            }
            return Err(err);
        }

        tracing::debug!(%category, %id, "touched item");
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
