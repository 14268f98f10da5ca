//! # Identity Module
//!
//! Account creation, sign-in, and sign-out against an identity provider.
//!
//! The [`IdentityService`] trait is the seam the store talks to. A hosted
//! provider lives behind it in production; [`LocalIdentityService`] keeps
//! accounts in-process for development, demos, and tests.
//!
//! ## Auth State Notifications
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    AUTH STATE NOTIFICATIONS                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  create_account / sign_in ──► broadcast Some(UserIdentity)             │
//! │  sign_out                 ──► broadcast None                           │
//! │                                                                         │
//! │  Subscribers (the store's identity watcher) mirror each value into     │
//! │  RootState::current_user.                                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod local;

pub use local::{LocalIdentityService, MIN_PASSWORD_LEN};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::Result;

/// Provider error codes surfaced in [`Error::Authentication`](crate::Error::Authentication)
pub mod codes {
    /// Email address is malformed
    pub const INVALID_EMAIL: &str = "auth/invalid-email";
    /// Password is too short
    pub const WEAK_PASSWORD: &str = "auth/weak-password";
    /// An account already exists for the email
    pub const EMAIL_IN_USE: &str = "auth/email-already-in-use";
    /// Email/password pair not recognised
    pub const INVALID_CREDENTIAL: &str = "auth/invalid-credential";
}

/// A signed-in user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Stable provider-assigned id; favorites documents are keyed by it
    pub uid: String,
    /// Email the account was created with
    pub email: String,
    /// When the account was created (Unix timestamp)
    pub created_at: i64,
}

/// Identity provider contract
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Create an account and sign it in
    async fn create_account(&self, email: &str, password: &str) -> Result<UserIdentity>;

    /// Sign in with email and password
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity>;

    /// Sign the current user out
    async fn sign_out(&self) -> Result<()>;

    /// The user the provider currently considers signed in
    fn current_user(&self) -> Option<UserIdentity>;

    /// Subscribe to auth state changes
    fn subscribe(&self) -> broadcast::Receiver<Option<UserIdentity>>;
}
