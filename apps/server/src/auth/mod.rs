//! Caller identity.
//!
//! Handlers never read session state directly; they ask an [`IdentityProvider`]
//! for the current user. The server ships [`FixedIdentity`], which attributes
//! every request to one configured user. Swapping in real session handling
//! means providing another implementation of the trait.

mod extractor;

use std::sync::Arc;

use uuid::Uuid;

use crate::config::IdentitySettings;

pub use extractor::Authenticated;

/// The user a request acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

/// Source of the current caller's identity.
pub trait IdentityProvider: Send + Sync {
    /// The authenticated user, or `None` when nobody is signed in.
    fn current_user(&self) -> Option<CurrentUser>;
}

/// Shared handle registered as actix app data.
pub type SharedIdentity = Arc<dyn IdentityProvider>;

/// Identity provider that always authenticates as the same user.
#[derive(Debug, Clone)]
pub struct FixedIdentity {
    user: CurrentUser,
}

impl FixedIdentity {
    pub fn new(user: CurrentUser) -> Self {
        Self { user }
    }

    pub fn from_settings(settings: &IdentitySettings) -> Self {
        Self::new(CurrentUser {
            id: settings.user_id,
            email: settings.email.clone(),
        })
    }
}

impl IdentityProvider for FixedIdentity {
    fn current_user(&self) -> Option<CurrentUser> {
        Some(self.user.clone())
    }
}
