//! Current-user lookup
//!
//! Authentication itself is out of scope for the editor core. Everything
//! that needs to scope a read or write by user asks an `IdentityProvider`.

/// Source of the signed-in user's id
pub trait IdentityProvider: Send + Sync {
    /// Id of the current user, or `None` when nobody is signed in
    fn current_user_id(&self) -> Option<String>;

    fn is_authenticated(&self) -> bool {
        self.current_user_id().is_some()
    }
}

/// Fixed identity, used by the dev tool and tests
///
/// # Examples
///
/// ```rust
/// use pageblocks_core::db::{IdentityProvider, StaticIdentity};
///
/// assert_eq!(StaticIdentity::user("u1").current_user_id().as_deref(), Some("u1"));
/// assert!(!StaticIdentity::anonymous().is_authenticated());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user_id: Option<String>,
}

impl StaticIdentity {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { user_id: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}
