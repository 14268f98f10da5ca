//! In-process identity provider.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{codes, IdentityService, UserIdentity};
use crate::error::{Error, Result};

/// Shortest password accepted by [`LocalIdentityService::create_account`]
pub const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    identity: UserIdentity,
    salt: String,
    digest: String,
}

/// Identity provider that keeps accounts in memory
///
/// Passwords are stored as salted SHA-256 digests. Error codes and messages
/// mirror what hosted providers report so UI copy behaves the same.
pub struct LocalIdentityService {
    accounts: RwLock<HashMap<String, Account>>,
    current: RwLock<Option<UserIdentity>>,
    events: broadcast::Sender<Option<UserIdentity>>,
}

impl LocalIdentityService {
    /// Create a provider with no accounts
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            accounts: RwLock::new(HashMap::new()),
            current: RwLock::new(None),
            events,
        }
    }

    /// Number of registered accounts
    pub fn account_count(&self) -> usize {
        self.accounts.read().len()
    }

    fn set_current(&self, user: Option<UserIdentity>) {
        *self.current.write() = user.clone();
        // No subscribers is fine
        let _ = self.events.send(user);
    }
}

impl Default for LocalIdentityService {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl IdentityService for LocalIdentityService {
    async fn create_account(&self, email: &str, password: &str) -> Result<UserIdentity> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(Error::auth(
                codes::INVALID_EMAIL,
                "The email address is badly formatted.",
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::auth(
                codes::WEAK_PASSWORD,
                format!("Password should be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }

        let identity = {
            let mut accounts = self.accounts.write();
            if accounts.contains_key(&email) {
                return Err(Error::auth(
                    codes::EMAIL_IN_USE,
                    "The email address is already in use by another account.",
                ));
            }

            let identity = UserIdentity {
                uid: Uuid::new_v4().simple().to_string(),
                email: email.clone(),
                created_at: chrono::Utc::now().timestamp(),
            };
            let salt = Uuid::new_v4().to_string();
            let digest = password_digest(&salt, password);
            accounts.insert(
                email,
                Account {
                    identity: identity.clone(),
                    salt,
                    digest,
                },
            );
            identity
        };

        tracing::info!("Created account {}", identity.uid);
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity> {
        let email = normalize_email(email);
        let identity = {
            let accounts = self.accounts.read();
            accounts
                .get(&email)
                .filter(|account| password_digest(&account.salt, password) == account.digest)
                .map(|account| account.identity.clone())
        };

        let identity = identity.ok_or_else(|| {
            Error::auth(
                codes::INVALID_CREDENTIAL,
                "The supplied auth credential is incorrect, malformed or has expired.",
            )
        })?;

        tracing::info!("Signed in {}", identity.uid);
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        if let Some(user) = self.current_user() {
            tracing::info!("Signed out {}", user.uid);
        }
        self.set_current(None);
        Ok(())
    }

    fn current_user(&self) -> Option<UserIdentity> {
        self.current.read().clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<Option<UserIdentity>> {
        self.events.subscribe()
    }
}

// ============================================================================
// TESTS
// ============================================================================
