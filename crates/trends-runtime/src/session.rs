//! Login state for the single dashboard screen.
//!
//! The identity provider is external: it either hands over an access token or
//! fails. The dashboard only cares which of the two states it is in.

use trends_core::models::AccessToken;

/// Whether an access token is available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No token; the login prompt is shown and nothing is fetched.
    #[default]
    LoggedOut,
    /// A token was issued; the dashboard fetches once with it.
    LoggedIn(AccessToken),
}

impl SessionState {
    /// Start from an optional token supplied on the command line.
    pub fn from_token(token: Option<AccessToken>) -> Self {
        let mut state = Self::default();
        if let Some(token) = token {
            state.login_succeeded(token);
        }
        state
    }

    /// The provider issued `token`.
    pub fn login_succeeded(&mut self, token: AccessToken) {
        tracing::info!("login succeeded");
        *self = Self::LoggedIn(token);
    }

    /// The provider reported a failure, or the API rejected the token; any
    /// previous token is dropped.
    pub fn login_failed(&mut self, reason: &str) {
        tracing::warn!(reason, "login failed");
        *self = Self::LoggedOut;
    }

    pub fn token(&self) -> Option<&AccessToken> {
        match self {
            Self::LoggedIn(token) => Some(token),
            Self::LoggedOut => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn(_))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
