//! Demo "encryption": base64 over JSON.
//!
//! This is an encoding, not a cipher. Anyone holding a blob can read it.
//! Encoding waits for a configurable delay first so callers can show a
//! progress state; decoding is immediate.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, VaultError};

/// Default delay before an encode completes.
pub const DEFAULT_ENCODE_DELAY: Duration = Duration::from_millis(500);

/// Delayed encoder / immediate decoder for form data and secrets.
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    delay: Duration,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(DEFAULT_ENCODE_DELAY)
    }
}

impl Codec {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Encode `value` after the configured delay.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        encode_now(value)
    }

    /// Decode a blob produced by [`Codec::encode`].
    pub fn decode<T: DeserializeOwned>(&self, blob: &str) -> Result<T> {
        decode_now(blob)
    }
}

/// Encode without delay.
pub fn encode_now<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_vec(value)?;
    Ok(STANDARD.encode(json))
}

/// Decode a base64-of-JSON blob.
///
/// # Errors
///
/// Returns [`VaultError::Decode`] when the blob is not base64 or the payload
/// is not JSON of the expected shape.
pub fn decode_now<T: DeserializeOwned>(blob: &str) -> Result<T> {
    let bytes = STANDARD
        .decode(blob.trim())
        .map_err(|e| VaultError::Decode {
            reason: format!("invalid base64: {e}"),
        })?;
    serde_json::from_slice(&bytes).map_err(|e| VaultError::Decode {
        reason: format!("invalid payload: {e}"),
    })
}

/// Decode a blob holding a JSON string, e.g. an encoded password.
pub fn try_decode_secret(blob: &str) -> Option<String> {
    decode_now::<String>(blob).ok()
}
