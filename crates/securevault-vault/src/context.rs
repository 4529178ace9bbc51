//! The vault context.
//!
//! [`VaultContext`] is built once at process start and passed to whatever
//! dispatches user commands. It owns the record store, the session, the
//! ephemeral session slot and the cache of decoded secrets, and wires the
//! scorer, policy and codec to them.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::codec::Codec;
use crate::config::VaultConfig;
use crate::error::{Result, VaultError};
use crate::model::{Category, ItemId, ItemKind, VaultItem};
use crate::policy::{SecurityPolicy, StandardPolicy};
use crate::present::{
    ActionOutcome, BACKUP_MESSAGE, NavIntent, Notice, QuickAction, SAVED_MESSAGE, ScoreDisplay,
    VaultStats, security_scan_message,
};
use crate::score::{AuditReport, ScoreBreakdown, Scorer};
use crate::search::{SearchOutcome, search};
use crate::session::{Credentials, Session, User};
use crate::slot::{KvSlot, MemorySlot, SELECTED_CATEGORY_KEY, SqliteSlot};
use crate::store::{LoadOrigin, RecordStore};

/// Everything one vault session needs, passed explicitly.
pub struct VaultContext {
    store: RecordStore,
    session: Session,
    session_slot: Box<dyn KvSlot>,
    codec: Codec,
    policy: Box<dyn SecurityPolicy>,
    scorer: Scorer,
    clock: Arc<dyn Clock>,
    /// Decoded password secrets, dropped on logout.
    revealed: HashMap<ItemId, String>,
}

impl std::fmt::Debug for VaultContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultContext")
            .field("store", &self.store)
            .field("session", &self.session)
            .field("revealed", &self.revealed.len())
            .finish_non_exhaustive()
    }
}

impl VaultContext {
    /// Open the vault described by `config` on disk.
    ///
    /// Creates the data directory if needed and loads the store from the
    /// SQLite slot at `config.data_path`.
    pub fn open(config: &VaultConfig) -> Result<Self> {
        if let Some(parent) = config.data_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let slot = SqliteSlot::open(&config.data_path)?;
        Self::with_parts(config, Box::new(slot), Arc::new(SystemClock))
    }

    /// Build a context over an explicit persistence slot and clock.
    pub fn with_parts(
        config: &VaultConfig,
        slot: Box<dyn KvSlot>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let store = RecordStore::load(slot, Arc::clone(&clock))?;
        let session = Session::new()
            .with_auth_delay(config.auth_delay())
            .with_two_factor(config.two_factor_enabled);

        Ok(Self {
            store,
            session,
            session_slot: Box::new(MemorySlot::new()),
            codec: Codec::new(config.encode_delay()),
            policy: Box::new(StandardPolicy::new(config.min_entropy_bits)),
            scorer: Scorer::new(config.stale_after_days),
            clock,
            revealed: HashMap::new(),
        })
    }

    /// Replace the security policy.
    pub fn with_policy(mut self, policy: impl SecurityPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Warning to show if the stored data had to be replaced at load time.
    pub fn load_warning(&self) -> Option<String> {
        self.store.origin().warning()
    }

    pub fn load_origin(&self) -> &LoadOrigin {
        self.store.origin()
    }

    // -- Auth ---------------------------------------------------------------

    pub async fn authenticate(&mut self, method: &str, credentials: &Credentials) -> Result<User> {
        self.session.authenticate(method, credentials).await
    }

    /// Sign out, drop decoded secrets and return the sign-in intent.
    pub fn logout(&mut self) -> NavIntent {
        self.revealed.clear();
        self.session.logout()
    }

    // -- Records ------------------------------------------------------------

    pub fn add_item(&mut self, category: Category, kind: ItemKind) -> Result<VaultItem> {
        self.store.add_item(category, kind)
    }

    pub fn delete_item(&mut self, category: Category, id: ItemId) -> Result<Option<VaultItem>> {
        let removed = self.store.delete_item(category, id)?;
        if removed.is_some() && category == Category::Passwords {
            self.revealed.remove(&id);
        }
        Ok(removed)
    }

    pub fn search(&self, query: &str) -> SearchOutcome {
        search(self.store.snapshot(), query)
    }

    pub fn stats(&self) -> VaultStats {
        VaultStats::of(self.store.snapshot())
    }

    /// Encode a plaintext password for storage in a password item.
    pub async fn seal_secret(&self, secret: &str) -> Result<String> {
        self.codec.encode(secret).await
    }

    /// Decode a stored password, caching it until logout.
    ///
    /// Requires an authenticated session. Every reveal, cached or not, marks
    /// the item as used.
    ///
    /// # Errors
    ///
    /// [`VaultError::AuthFailure`] when signed out,
    /// [`VaultError::ItemNotFound`] for an unknown id and
    /// [`VaultError::Decode`] when the stored value is not an encoded secret.
    pub fn reveal_secret(&mut self, id: ItemId) -> Result<String> {
        if !self.session.is_authenticated() {
            return Err(VaultError::auth("sign in to reveal secrets"));
        }
        let secret = match self.revealed.get(&id) {
            Some(secret) => secret.clone(),
            None => {
                let entry = self
                    .store
                    .get(Category::Passwords, id)
                    .and_then(VaultItem::as_password)
                    .ok_or(VaultError::ItemNotFound {
                        category: Category::Passwords,
                        id,
                    })?;
                self.codec.decode::<String>(&entry.password)?
            }
        };

        self.store.touch(Category::Passwords, id)?;
        self.revealed.insert(id, secret.clone());
        Ok(secret)
    }

    /// Number of decoded secrets currently cached.
    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    // -- Security -----------------------------------------------------------

    pub fn score_breakdown(&self) -> ScoreBreakdown {
        self.scorer.breakdown(
            self.store.snapshot(),
            &self.session,
            self.policy.as_ref(),
            self.clock.now_ms(),
        )
    }

    pub fn security_score(&self) -> u8 {
        self.score_breakdown().score
    }

    pub fn score_display(&self) -> ScoreDisplay {
        ScoreDisplay::new(self.security_score())
    }

    pub fn audit(&self) -> AuditReport {
        self.scorer.audit(
            self.store.snapshot(),
            &self.session,
            self.policy.as_ref(),
            self.clock.now_ms(),
        )
    }

    // -- Navigation ---------------------------------------------------------

    /// Remember `category` for the detail view and navigate there.
    pub fn open_category(&mut self, category: Category) -> Result<NavIntent> {
        self.session_slot
            .write(SELECTED_CATEGORY_KEY, category.as_str())?;
        tracing::debug!(%category, "opened category");
        Ok(NavIntent::CategoryDetail(category))
    }

    /// The category last passed to [`VaultContext::open_category`].
    pub fn selected_category(&self) -> Result<Option<Category>> {
        Ok(self
            .session_slot
            .read(SELECTED_CATEGORY_KEY)?
            .and_then(|name| Category::parse(&name)))
    }

    /// Go back when there is history, home otherwise.
    pub fn go_back(&self, has_history: bool) -> NavIntent {
        if has_history {
            NavIntent::Back
        } else {
            NavIntent::Home
        }
    }

    /// Run a dashboard quick action.
    pub fn quick_action(&self, name: &str) -> ActionOutcome {
        match QuickAction::parse(name) {
            QuickAction::AddItem => ActionOutcome::Navigate(NavIntent::AddItem),
            QuickAction::SecurityScan => {
                let report = self.audit();
                ActionOutcome::Notify(Notice::success(security_scan_message(
                    report.score,
                    report.recommendations.len(),
                )))
            }
            QuickAction::Backup => ActionOutcome::Notify(Notice::success(BACKUP_MESSAGE)),
            QuickAction::Other(name) => {
                tracing::debug!(action = %name, "unimplemented quick action");
                ActionOutcome::Notify(Notice::ComingSoon)
            }
        }
    }

    /// Encode submitted form fields and return the blob with the success
    /// notice.
    pub async fn seal_form(&self, fields: &BTreeMap<String, String>) -> Result<(String, Notice)> {
        let blob = self.codec.encode(fields).await?;
        tracing::info!(fields = fields.len(), "form data sealed");
        Ok((blob, Notice::success(SAVED_MESSAGE)))
    }
}
