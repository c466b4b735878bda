//! Shared session token state.

use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, PoisonError, RwLock};

/// Opaque session id issued by the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw session id.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw session id as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Current session token shared by every request issued through one client.
///
/// Clones share the same cell. Writes replace the token wholesale.
#[derive(Clone, Default)]
pub struct SessionState {
    current: Arc<RwLock<Option<SessionToken>>>,
}

impl SessionState {
    /// Empty session state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session state pre-seeded with a known token.
    #[must_use]
    pub fn seeded(token: SessionToken) -> Self {
        Self {
            current: Arc::new(RwLock::new(Some(token))),
        }
    }

    /// Currently known token, if any.
    #[must_use]
    pub fn get(&self) -> Option<SessionToken> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the current token.
    pub fn set(&self, token: SessionToken) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Forget the current token.
    pub fn clear(&self) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Debug for SessionState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionState")
            .field("current", &self.get())
            .finish()
    }
}
