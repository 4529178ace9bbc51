//! Presentation data handed to whatever renders the vault.
//!
//! Nothing here draws anything. The core produces score displays, count
//! animation frames, notices and navigation intents as plain values and the
//! caller owns rendering and routing.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::model::{Category, VaultStore};

// ---------------------------------------------------------------------------
// Score display
// ---------------------------------------------------------------------------

/// Three-tier classification of a security score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    /// 85 and above.
    Good,
    /// 70 to 84.
    Fair,
    /// Below 70.
    Poor,
}

impl ScoreTier {
    pub fn for_score(score: u8) -> Self {
        match score {
            85..=u8::MAX => Self::Good,
            70..=84 => Self::Fair,
            _ => Self::Poor,
        }
    }

    /// Meter color as a hex string.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Good => "#2a9d8f",
            Self::Fair => "#f4a261",
            Self::Poor => "#e76f51",
        }
    }
}

/// Everything needed to draw the score meter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDisplay {
    pub score: u8,
    /// `"N/100"`.
    pub label: String,
    pub tier: ScoreTier,
    pub color: &'static str,
    /// Filled arc of the circular meter, `score * 3.6` degrees.
    pub sweep_degrees: f32,
}

impl ScoreDisplay {
    pub fn new(score: u8) -> Self {
        let tier = ScoreTier::for_score(score);
        Self {
            score,
            label: format!("{score}/100"),
            tier,
            color: tier.color(),
            sweep_degrees: f32::from(score) * 3.6,
        }
    }
}

// ---------------------------------------------------------------------------
// Count animation
// ---------------------------------------------------------------------------

/// Number of frames in a count animation.
pub const COUNT_ANIMATION_STEPS: u32 = 20;

/// Delay between count animation frames.
pub const COUNT_ANIMATION_INTERVAL: Duration = Duration::from_millis(50);

/// Frames for animating a displayed number from one value to another.
///
/// Yields [`COUNT_ANIMATION_STEPS`] values; the last is always exactly `to`.
#[derive(Debug, Clone)]
pub struct CountAnimation {
    from: i64,
    to: i64,
    step: u32,
}

impl CountAnimation {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to, step: 0 }
    }

    pub fn interval(&self) -> Duration {
        COUNT_ANIMATION_INTERVAL
    }
}

impl Iterator for CountAnimation {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.step >= COUNT_ANIMATION_STEPS {
            return None;
        }
        self.step += 1;
        if self.step == COUNT_ANIMATION_STEPS {
            return Some(self.to);
        }
        let increment = (self.to - self.from) as f64 / f64::from(COUNT_ANIMATION_STEPS);
        Some((self.from as f64 + increment * f64::from(self.step)).round() as i64)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (COUNT_ANIMATION_STEPS - self.step) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for CountAnimation {}

// ---------------------------------------------------------------------------
// Notices and navigation
// ---------------------------------------------------------------------------

/// How long a success notice stays up.
pub const SUCCESS_NOTICE_TTL: Duration = Duration::from_secs(3);

/// A transient popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Notice {
    /// Success popup, dismissed automatically after [`SUCCESS_NOTICE_TTL`].
    Success(String),
    /// "Coming soon" popup, dismissed by the user.
    ComingSoon,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success(message.into())
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Success(_) => "Success",
            Self::ComingSoon => "Coming Soon",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) => message,
            Self::ComingSoon => "This feature will be available in a future update.",
        }
    }

    /// Auto-dismiss delay, or `None` for sticky notices.
    pub fn auto_dismiss(&self) -> Option<Duration> {
        match self {
            Self::Success(_) => Some(SUCCESS_NOTICE_TTL),
            Self::ComingSoon => None,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.message())
    }
}

/// Where the presentation layer should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "to", content = "category", rename_all = "snake_case")]
pub enum NavIntent {
    /// The sign-in screen.
    AuthEntry,
    Home,
    AddItem,
    CategoryDetail(Category),
    Back,
}

impl fmt::Display for NavIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthEntry => f.write_str("auth"),
            Self::Home => f.write_str("home"),
            Self::AddItem => f.write_str("add-data"),
            Self::CategoryDetail(category) => write!(f, "category?type={category}"),
            Self::Back => f.write_str("back"),
        }
    }
}

/// Outcome of a dashboard quick action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Navigate(NavIntent),
    Notify(Notice),
}

/// Dashboard quick actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickAction {
    AddItem,
    SecurityScan,
    Backup,
    /// Anything not implemented yet.
    Other(String),
}

impl QuickAction {
    pub fn parse(name: &str) -> Self {
        match name {
            "add-item" => Self::AddItem,
            "security-scan" => Self::SecurityScan,
            "backup" => Self::Backup,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Message shown after a security scan.
pub fn security_scan_message(score: u8, recommendations: usize) -> String {
    format!("Security score: {score}/100. {recommendations} recommendations.")
}

/// Message shown after a backup.
pub const BACKUP_MESSAGE: &str = "Backup completed successfully";

/// Message shown after a form is sealed.
pub const SAVED_MESSAGE: &str = "Data saved securely";

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Item counts for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultStats {
    pub total: usize,
    pub per_category: BTreeMap<Category, usize>,
}

impl VaultStats {
    pub fn of(store: &VaultStore) -> Self {
        let per_category = Category::ALL
            .iter()
            .map(|category| (*category, store.items(*category).len()))
            .collect();
        Self {
            total: store.total_items(),
            per_category,
        }
    }

    pub fn count(&self, category: Category) -> usize {
        self.per_category.get(&category).copied().unwrap_or(0)
    }
}
