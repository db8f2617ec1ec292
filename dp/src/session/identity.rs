//! User identity

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifier of a signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(CoreError::InvalidProfile("user id must not be empty".to_string()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supplies the identity of the current user, if anyone is signed in
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<UserId>;
}

/// Identity set explicitly by the caller
#[derive(Debug, Default)]
pub struct StaticIdentity {
    current: Mutex<Option<UserId>>,
}

impl StaticIdentity {
    pub fn signed_in(user: UserId) -> Self {
        Self {
            current: Mutex::new(Some(user)),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Switch to another user, or sign out with `None`
    pub fn set(&self, user: Option<UserId>) {
        if let Ok(mut current) = self.current.lock() {
            *current = user;
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserId> {
        self.current.lock().ok().and_then(|c| c.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_rejects_blank() {
        assert!(UserId::new("  ").is_err());
        assert_eq!(UserId::new(" asha ").unwrap().as_str(), "asha");
    }

    #[test]
    fn test_static_identity() {
        let identity = StaticIdentity::signed_out();
        assert!(identity.current_user().is_none());

        identity.set(Some(UserId::new("ravi").unwrap()));
        assert_eq!(identity.current_user().unwrap().as_str(), "ravi");
    }
}
