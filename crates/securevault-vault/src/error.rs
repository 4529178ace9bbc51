//! Vault error types.
//!
//! Every public API in this crate returns [`VaultError`] through the
//! [`Result`] alias. Variants carry enough context for callers to decide how
//! to react (retry a PIN, show a warning, abort) without parsing strings.

use crate::model::{Category, ItemId};

/// Unified error type for the SecureVault core.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    // -- Authentication -----------------------------------------------------
    /// Invalid credentials or an unsupported authentication method.
    #[error("authentication failed: {reason}")]
    AuthFailure { reason: String },

    // -- Record store -------------------------------------------------------
    /// An item of one kind was offered to a category holding another kind.
    #[error("item kind `{kind}` does not belong to category `{category}`")]
    CategoryMismatch {
        category: Category,
        kind: &'static str,
    },

    /// No item with this id exists in the category.
    #[error("item not found: {category}/{id}")]
    ItemNotFound { category: Category, id: ItemId },

    /// The id space is used up; no id above the largest stored one exists.
    #[error("no item ids left after {last}")]
    IdsExhausted { last: ItemId },

    /// A category name outside `passwords|notes|cards|documents`.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    // -- Codec --------------------------------------------------------------
    /// An encoded blob could not be decoded back into a value.
    #[error("decode failed: {reason}")]
    Decode { reason: String },

    // -- Configuration ------------------------------------------------------
    /// The configuration file is malformed.
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    // -- Underlying errors --------------------------------------------------
    /// Key-value slot backend failure from `rusqlite`.
    #[error("persistence error: {0}")]
    Persistence(#[from] rusqlite::Error),

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the filesystem (config file, data directory).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A slot lock was poisoned by a panicking writer.
    #[error("internal vault error: {0}")]
    Internal(String),
}

impl VaultError {
    /// Shorthand for an [`VaultError::AuthFailure`] with the given reason.
    pub fn auth(reason: impl Into<String>) -> Self {
        Self::AuthFailure {
            reason: reason.into(),
        }
    }

    /// Whether this error is an authentication failure the user can retry.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailure { .. })
    }
}

/// Convenience alias used throughout the vault crate.
pub type Result<T> = std::result::Result<T, VaultError>;
