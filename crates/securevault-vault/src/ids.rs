//! Item id generation.
//!
//! Ids stay timestamp-shaped integers so they sort with the seed data and
//! with blobs written by older clients, but are strictly increasing:
//! `next = max(now_ms, last + 1)`. Two inserts in the same millisecond get
//! distinct ids.

use crate::error::{Result, VaultError};
use crate::model::ItemId;

/// Monotonic id source for one record store.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Start above `floor` (usually the largest id already in the store).
    pub fn starting_after(floor: Option<ItemId>) -> Self {
        Self {
            last: floor.map(|id| id.0).unwrap_or(0),
        }
    }

    /// Next id for an insert at `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::IdsExhausted`] once the last id handed out (or
    /// loaded) is `i64::MAX`. The generator is left unchanged.
    pub fn next(&mut self, now_ms: i64) -> Result<ItemId> {
        let after_last = self
            .last
            .checked_add(1)
            .ok_or(VaultError::IdsExhausted {
                last: ItemId(self.last),
            })?;
        let candidate = now_ms.max(after_last);
        self.last = candidate;
        Ok(ItemId(candidate))
    }
}
