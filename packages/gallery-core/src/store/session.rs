//! Catalog session and user identity operations.

use crate::error::Result;
use crate::state::Mutation;

use super::{Outcome, Store};

impl Store {
    // ========================================================================
    // CATALOG SESSION
    // ========================================================================

    /// Obtain a fresh catalog token.
    ///
    /// On success the token is written to the token store and then to state.
    /// On failure it is removed from both.
    pub async fn renew_session(&self) -> Outcome {
        self.commit(Mutation::BeginAuth);

        let result: Result<String> = async {
            let token = self.services().catalog.renew_token().await?;
            self.services().tokens.set(&token.token)?;
            Ok(token.token)
        }
        .await;

        match result {
            Ok(token) => {
                tracing::info!("Catalog session renewed");
                self.commit(Mutation::AuthSucceeded(token));
                Outcome::Succeeded
            }
            Err(e) => {
                tracing::warn!("Catalog session renewal failed: {}", e);
                if let Err(e) = self.services().tokens.remove() {
                    tracing::warn!("Could not clear stored session token: {}", e);
                }
                self.commit(Mutation::AuthFailed);
                Outcome::Failed
            }
        }
    }

    /// Forget the catalog token everywhere and return to idle
    pub fn end_session(&self) {
        if let Err(e) = self.services().tokens.remove() {
            tracing::warn!("Could not clear stored session token: {}", e);
        }
        self.commit(Mutation::ClearSession);
        tracing::info!("Catalog session ended");
    }

    // ========================================================================
    // USER IDENTITY
    // ========================================================================

    /// Register a new account.
    ///
    /// Success signs the user in. Failure records the provider's message as
    /// the last error. The request status is not touched either way.
    pub async fn sign_up(&self, email: &str, password: &str) -> Outcome {
        match self.services().identity.create_account(email, password).await {
            Ok(user) => {
                tracing::info!("Signed up {}", user.uid);
                self.commit(Mutation::SetUser(Some(user)));
                Outcome::Succeeded
            }
            Err(e) => {
                tracing::warn!("Sign-up failed: {}", e);
                self.commit(Mutation::SetError(Some(e.to_string())));
                Outcome::Failed
            }
        }
    }

    /// Sign in, then load the user's favorites
    pub async fn sign_in(&self, email: &str, password: &str) -> Outcome {
        self.commit(Mutation::BeginRequest);

        match self.services().identity.sign_in(email, password).await {
            Ok(user) => {
                tracing::info!("Signed in {}", user.uid);
                self.commit(Mutation::SetUser(Some(user)));
                self.commit(Mutation::CompleteRequest);
                self.load_favorites().await;
                Outcome::Succeeded
            }
            Err(e) => {
                tracing::warn!("Sign-in failed ({:?}): {}", e.auth_code(), e);
                self.commit(Mutation::FailRequest);
                Outcome::Failed
            }
        }
    }

    /// Sign out and clear the user's favorites from state
    pub async fn sign_out(&self) -> Outcome {
        self.commit(Mutation::BeginRequest);

        let result = self.services().identity.sign_out().await.map(|()| {
            self.commit(Mutation::SetUser(None));
            self.commit(Mutation::ReplaceFavorites(Vec::new()));
        });
        if result.is_ok() {
            tracing::info!("Signed out");
        }
        self.settle("sign_out", result)
    }

    /// Adopt the provider's current user, if any, and load their favorites
    pub async fn restore_session(&self) -> Outcome {
        match self.services().identity.current_user() {
            Some(user) => {
                tracing::info!("Restoring session for {}", user.uid);
                self.commit(Mutation::SetUser(Some(user)));
                self.load_favorites().await
            }
            None => Outcome::Skipped,
        }
    }

    /// Mirror identity provider changes into `current_user`.
    ///
    /// Calling this again while a watcher is running does nothing.
    pub fn watch_identity(&self) -> bool {
        let mut watcher = self.inner.watcher.lock();
        if watcher.as_ref().is_some_and(|h| !h.is_finished()) {
            return false;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!("No async runtime; identity changes will not be observed");
                return false;
            }
        };

        let mut changes = self.services().identity.subscribe();
        let store = self.downgrade();
        *watcher = Some(runtime.spawn(async move {
            use tokio::sync::broadcast::error::RecvError;
            loop {
                let user = match changes.recv().await {
                    Ok(user) => user,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Identity watcher skipped {} changes", skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                let Some(inner) = store.upgrade() else {
                    break;
                };
                tracing::debug!("Identity changed: {:?}", user.as_ref().map(|u| &u.uid));
                Store { inner }.commit(Mutation::SetUser(user));
            }
        }));
        true
    }
}
