//! Demo vault core for SecureVault.
//!
//! This crate holds the record store, search, security scoring and the
//! authentication stub behind the SecureVault demo. Nothing in it is real
//! security: authentication is simulated and "encryption" is base64 over
//! JSON.
//!
//! # Modules
//!
//! - [`model`]: categories, items and the category-keyed store.
//! - [`store`]: the record store persisted to a key-value slot.
//! - [`slot`]: key-value slots (SQLite and in-memory).
//! - [`search`]: case-insensitive substring search.
//! - [`score`] / [`policy`]: security score, audit and the policy behind them.
//! - [`session`]: the authentication stub.
//! - [`codec`]: base64 encoding of secrets and form data.
//! - [`present`]: score display, count animation, notices, navigation.
//! - [`context`]: [`VaultContext`], which ties the above together.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use securevault_vault::{Credentials, VaultConfig, VaultContext};
//!
//! # async fn example() -> securevault_vault::Result<()> {
//! let config = VaultConfig::load("config/securevault.toml")?;
//! let mut vault = VaultContext::open(&config)?;
//!
//! vault.authenticate("pin", &Credentials::pin("1234")).await?;
//! if let Some(results) = vault.search("netflix").results() {
//!     println!("{} matches", results.total());
//! }
//! println!("score: {}", vault.score_display().label);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod ids;
pub mod model;
pub mod policy;
pub mod present;
pub mod score;
pub mod search;
pub mod seed;
pub mod session;
pub mod slot;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::Codec;
pub use config::VaultConfig;
pub use context::VaultContext;
pub use error::{Result, VaultError};
pub use model::{
    CardEntry, Category, DocumentEntry, ItemId, ItemKind, NoteEntry, PasswordEntry, VaultItem,
    VaultStore,
};
pub use policy::{SecurityPolicy, StandardPolicy};
pub use present::{ActionOutcome, NavIntent, Notice, ScoreDisplay, ScoreTier, VaultStats};
pub use score::{AuditReport, Scorer};
pub use search::{SearchOutcome, SearchResults};
pub use session::{AuthMethod, Credentials, Session, User};
pub use slot::{KvSlot, MemorySlot, SqliteSlot};
pub use store::{LoadOrigin, RecordStore};
