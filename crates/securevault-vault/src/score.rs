//! Security score and audit.
//!
//! The score is advisory. It starts at 100 and loses
//!
//! - 10 points per weak password,
//! - 5 points per stale item (not used within the stale threshold),
//! - 15 points when two-factor authentication is off,
//!
//! floored at 0. Weakness and 2FA come from a [`SecurityPolicy`], so the
//! result is a pure function of store, session, policy and `now`.

use serde::{Deserialize, Serialize};

use crate::clock::DAY_MS;
use crate::model::VaultStore;
use crate::policy::SecurityPolicy;
use crate::session::Session;

/// Default age after which an item counts as stale.
pub const DEFAULT_STALE_AFTER_DAYS: u32 = 90;

const WEAK_PASSWORD_PENALTY: u32 = 10;
const STALE_ITEM_PENALTY: u32 = 5;
const NO_TWO_FACTOR_PENALTY: u32 = 15;

/// Audit recommendation when 2FA is missing and the score is low.
pub const RECOMMEND_TWO_FACTOR: &str = "Enable two-factor authentication";
/// Audit recommendation when the score is low.
pub const RECOMMEND_WEAK_PASSWORDS: &str = "Update weak passwords";
/// Audit recommendation when stale items exist.
pub const RECOMMEND_REVIEW_OLD: &str = "Review and update old vault items";

/// Score below which the audit recommends 2FA and password updates.
pub const AUDIT_THRESHOLD: u8 = 70;

/// The measured inputs that make up a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub weak_passwords: usize,
    pub stale_items: usize,
    pub two_factor: bool,
    pub score: u8,
}

/// Result of a security audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Epoch milliseconds of the audit.
    pub timestamp: i64,
    pub score: u8,
    pub recommendations: Vec<String>,
}

/// Scoring parameters.
#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    stale_after_days: u32,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_AFTER_DAYS)
    }
}

impl Scorer {
    pub fn new(stale_after_days: u32) -> Self {
        Self { stale_after_days }
    }

    /// Number of password items the policy considers weak.
    pub fn count_weak(&self, store: &VaultStore, policy: &dyn SecurityPolicy) -> usize {
        store
            .all_items()
            .filter_map(|item| item.as_password())
            .filter(|entry| policy.is_weak_password(entry))
            .count()
    }

    /// Number of items across all categories last used before the cutoff.
    pub fn count_stale(&self, store: &VaultStore, now_ms: i64) -> usize {
        let cutoff = now_ms - i64::from(self.stale_after_days) * DAY_MS;
        store
            .all_items()
            .filter(|item| item.last_used < cutoff)
            .count()
    }

    /// Compute the score along with its inputs.
    pub fn breakdown(
        &self,
        store: &VaultStore,
        session: &Session,
        policy: &dyn SecurityPolicy,
        now_ms: i64,
    ) -> ScoreBreakdown {
        let weak_passwords = self.count_weak(store, policy);
        let stale_items = self.count_stale(store, now_ms);
        let two_factor = policy.has_two_factor(session);

        let penalty = saturating_penalty(weak_passwords, WEAK_PASSWORD_PENALTY)
            .saturating_add(saturating_penalty(stale_items, STALE_ITEM_PENALTY))
            .saturating_add(if two_factor { 0 } else { NO_TWO_FACTOR_PENALTY });
        let score = 100u32.saturating_sub(penalty) as u8;

        tracing::debug!(weak_passwords, stale_items, two_factor, score, "computed security score");
        ScoreBreakdown {
            weak_passwords,
            stale_items,
            two_factor,
            score,
        }
    }

    /// Compute the score in `[0, 100]`.
    pub fn compute_score(
        &self,
        store: &VaultStore,
        session: &Session,
        policy: &dyn SecurityPolicy,
        now_ms: i64,
    ) -> u8 {
        self.breakdown(store, session, policy, now_ms).score
    }

    /// Score the vault and list recommendations.
    pub fn audit(
        &self,
        store: &VaultStore,
        session: &Session,
        policy: &dyn SecurityPolicy,
        now_ms: i64,
    ) -> AuditReport {
        let breakdown = self.breakdown(store, session, policy, now_ms);
        let mut recommendations = Vec::new();

        if breakdown.score < AUDIT_THRESHOLD {
            recommendations.push(RECOMMEND_TWO_FACTOR.to_string());
            recommendations.push(RECOMMEND_WEAK_PASSWORDS.to_string());
        }
        if breakdown.stale_items > 0 {
            recommendations.push(RECOMMEND_REVIEW_OLD.to_string());
        }

        tracing::info!(
            score = breakdown.score,
            recommendations = recommendations.len(),
            "security audit complete"
        );
        AuditReport {
            timestamp: now_ms,
            score: breakdown.score,
            recommendations,
        }
    }
}

fn saturating_penalty(count: usize, per_item: u32) -> u32 {
    u32::try_from(count)
        .unwrap_or(u32::MAX)
        .saturating_mul(per_item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, ItemId, ItemKind, NoteEntry, PasswordEntry, VaultItem};
    use crate::policy::StandardPolicy;
    use crate::seed::seed_store;

    const NOW: i64 = 1_700_000_000_000;

    /// Policy with fixed answers.
    struct FixedPolicy {
        weak: bool,
        two_factor: bool,
    }

    impl SecurityPolicy for FixedPolicy {
        fn is_weak_password(&self, _entry: &PasswordEntry) -> bool {
            self.weak
        }

        fn has_two_factor(&self, _session: &Session) -> bool {
            self.two_factor
        }
    }

    fn with_stale_notes(count: usize) -> VaultStore {
        let mut store = seed_store(NOW);
        for i in 0..count {
            store.items_mut(Category::Notes).push(VaultItem {
                id: ItemId(100 + i as i64),
                created_at: None,
                last_used: NOW - 91 * DAY_MS,
                kind: ItemKind::Note(NoteEntry {
                    title: format!("old {i}"),
                    content: String::new(),
                    tags: Vec::new(),
                }),
            });
        }
        store
    }

    #[test]
    fn seed_without_two_factor_scores_85() {
        let store = seed_store(NOW);
        let score = Scorer::default().compute_score(
            &store,
            &Session::new(),
            &StandardPolicy::default(),
            NOW,
        );
        assert_eq!(score, 85);
    }

    #[test]
    fn seed_with_two_factor_scores_100() {
        let store = seed_store(NOW);
        let session = Session::new().with_two_factor(true);
        let score =
            Scorer::default().compute_score(&store, &session, &StandardPolicy::default(), NOW);
        assert_eq!(score, 100);
    }

    #[test]
    fn weak_passwords_cost_ten_each() {
        let store = seed_store(NOW);
        let policy = FixedPolicy {
            weak: true,
            two_factor: true,
        };
        let breakdown = Scorer::default().breakdown(&store, &Session::new(), &policy, NOW);
        assert_eq!(breakdown.weak_passwords, 3);
        assert_eq!(breakdown.score, 70);
    }

    #[test]
    fn stale_boundary_is_exclusive() {
        let mut store = seed_store(NOW);
        store.items_mut(Category::Cards)[0].last_used = NOW - 90 * DAY_MS;
        assert_eq!(Scorer::default().count_stale(&store, NOW), 0);
        store.items_mut(Category::Cards)[0].last_used = NOW - 90 * DAY_MS - 1;
        assert_eq!(Scorer::default().count_stale(&store, NOW), 1);
    }

    #[test]
    fn score_is_monotonic_in_stale_count_and_bounded() {
        let policy = FixedPolicy {
            weak: false,
            two_factor: false,
        };
        let scorer = Scorer::default();
        let mut previous = u8::MAX;
        for stale in 0..40 {
            let score =
                scorer.compute_score(&with_stale_notes(stale), &Session::new(), &policy, NOW);
            assert!(score <= 100);
            assert!(score <= previous);
            previous = score;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn audit_recommends_when_low_and_stale() {
        let store = with_stale_notes(4);
        let report =
            Scorer::default().audit(&store, &Session::new(), &StandardPolicy::default(), NOW);
        // 100 - 15 (no 2FA) - 20 (stale)
        assert_eq!(report.score, 65);
        assert_eq!(report.timestamp, NOW);
        assert_eq!(
            report.recommendations,
            [RECOMMEND_TWO_FACTOR, RECOMMEND_WEAK_PASSWORDS, RECOMMEND_REVIEW_OLD]
        );
    }

    #[test]
    fn audit_of_healthy_vault_is_empty() {
        let report = Scorer::default().audit(
            &seed_store(NOW),
            &Session::new().with_two_factor(true),
            &StandardPolicy::default(),
            NOW,
        );
        assert_eq!(report.score, 100);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn custom_stale_threshold() {
        let store = seed_store(NOW);
        // Only the five- and seven-day-old seed items are past three days.
        assert_eq!(Scorer::new(3).count_stale(&store, NOW), 2);
    }
}
