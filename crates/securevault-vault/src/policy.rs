//! Security policy used by the scorer.
//!
//! The scorer asks a [`SecurityPolicy`] two questions: is this password weak,
//! and does this session have two-factor authentication. Both answers must
//! be deterministic for the same inputs.
//!
//! [`StandardPolicy`] estimates entropy as `length * log2(pool)`, where the
//! pool is the sum of the character classes present:
//!
//! | class      | pool |
//! |------------|------|
//! | lowercase  | 26   |
//! | uppercase  | 26   |
//! | digits     | 10   |
//! | symbols    | 33   |
//! | non-ASCII  | 100  |

use crate::codec::try_decode_secret;
use crate::model::PasswordEntry;
use crate::session::Session;

/// Default weak-password threshold in bits.
pub const DEFAULT_MIN_ENTROPY_BITS: f64 = 36.0;

/// Deterministic policy inputs for the security score.
pub trait SecurityPolicy: Send + Sync {
    /// Whether the stored password is considered weak.
    fn is_weak_password(&self, entry: &PasswordEntry) -> bool;

    /// Whether two-factor authentication is active for the session.
    fn has_two_factor(&self, session: &Session) -> bool;
}

/// Entropy-threshold policy backed by the session's 2FA flag.
#[derive(Debug, Clone, Copy)]
pub struct StandardPolicy {
    min_entropy_bits: f64,
}

impl Default for StandardPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ENTROPY_BITS)
    }
}

impl StandardPolicy {
    pub fn new(min_entropy_bits: f64) -> Self {
        Self { min_entropy_bits }
    }

    pub fn min_entropy_bits(&self) -> f64 {
        self.min_entropy_bits
    }
}

impl SecurityPolicy for StandardPolicy {
    fn is_weak_password(&self, entry: &PasswordEntry) -> bool {
        // Encoded secrets are measured on their decoded text.
        let secret = try_decode_secret(&entry.password);
        let secret = secret.as_deref().unwrap_or(&entry.password);
        estimate_entropy_bits(secret) < self.min_entropy_bits
    }

    fn has_two_factor(&self, session: &Session) -> bool {
        session.two_factor_enabled()
    }
}

/// Estimate the brute-force entropy of `secret` in bits.
pub fn estimate_entropy_bits(secret: &str) -> f64 {
    let (mut lower, mut upper, mut digit, mut symbol, mut other) = (false, false, false, false, false);
    let mut length = 0usize;

    for c in secret.chars() {
        length += 1;
        match c {
            'a'..='z' => lower = true,
            'A'..='Z' => upper = true,
            '0'..='9' => digit = true,
            c if c.is_ascii_graphic() || c == ' ' => symbol = true,
            _ => other = true,
        }
    }

    let pool: u32 = [(lower, 26u32), (upper, 26), (digit, 10), (symbol, 33), (other, 100)]
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, size)| size)
        .sum();

    if pool == 0 {
        return 0.0;
    }
    length as f64 * f64::from(pool).log2()
}
