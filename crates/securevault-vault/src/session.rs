//! Session and authentication stub.
//!
//! ```text
//! Unauthenticated --authenticate ok--> Authenticated --logout--> Unauthenticated
//! ```
//!
//! Authentication is simulated: after an artificial delay standing in for a
//! backend round trip, `pin` succeeds only with [`DEMO_PIN`] and `face`
//! always succeeds. Nothing here is real security.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};
use crate::present::NavIntent;

/// The only PIN the stub accepts.
pub const DEMO_PIN: &str = "1234";

/// Default artificial authentication delay.
pub const DEFAULT_AUTH_DELAY: Duration = Duration::from_millis(1000);

/// The signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

impl User {
    /// The fixed identity assigned on every successful sign-in.
    pub fn demo() -> Self {
        Self {
            id: 1,
            name: "User".to_string(),
        }
    }
}

/// Supported sign-in methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Pin,
    Face,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pin => "pin",
            Self::Face => "face",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pin" => Some(Self::Pin),
            "face" => Some(Self::Face),
            _ => None,
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials offered with a sign-in attempt.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub pin: Option<String>,
}

impl Credentials {
    pub fn pin(pin: impl Into<String>) -> Self {
        Self {
            pin: Some(pin.into()),
        }
    }
}

/// Authentication state for one user session.
#[derive(Debug, Clone)]
pub struct Session {
    authenticated: bool,
    current_user: Option<User>,
    two_factor_enabled: bool,
    auth_delay: Duration,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh, unauthenticated session with the default delay.
    pub fn new() -> Self {
        Self {
            authenticated: false,
            current_user: None,
            two_factor_enabled: false,
            auth_delay: DEFAULT_AUTH_DELAY,
        }
    }

    pub fn with_auth_delay(mut self, delay: Duration) -> Self {
        self.auth_delay = delay;
        self
    }

    pub fn with_two_factor(mut self, enabled: bool) -> Self {
        self.two_factor_enabled = enabled;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn two_factor_enabled(&self) -> bool {
        self.two_factor_enabled
    }

    pub fn set_two_factor(&mut self, enabled: bool) {
        self.two_factor_enabled = enabled;
    }

    /// Attempt to sign in with `method`.
    ///
    /// Waits for the configured delay, then checks the credentials. On
    /// success the session becomes authenticated with the demo identity.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::AuthFailure`] for a wrong or missing PIN and for
    /// any method other than `pin` or `face`. The session is left unchanged.
    #[tracing::instrument(skip(self, credentials))]
    pub async fn authenticate(&mut self, method: &str, credentials: &Credentials) -> Result<User> {
        if !self.auth_delay.is_zero() {
            tokio::time::sleep(self.auth_delay).await;
        }

        let accepted = match AuthMethod::parse(method) {
            Some(AuthMethod::Pin) => credentials.pin.as_deref() == Some(DEMO_PIN),
            Some(AuthMethod::Face) => true,
            None => {
                tracing::warn!(method, "unsupported authentication method");
                return Err(VaultError::auth(format!(
                    "unsupported authentication method `{method}`"
                )));
            }
        };

        if !accepted {
            tracing::warn!(method, "authentication rejected");
            return Err(VaultError::auth("Invalid credentials"));
        }

        let user = User::demo();
        self.authenticated = true;
        self.current_user = Some(user.clone());
        tracing::info!(method, user_id = user.id, "authenticated");
        Ok(user)
    }

    /// Sign out and return the navigation target.
    pub fn logout(&mut self) -> NavIntent {
        self.authenticated = false;
        self.current_user = None;
        tracing::info!("logged out");
        NavIntent::AuthEntry
    }
}
