//! # Store
//!
//! The application store: one [`RootState`] behind a lock, the collaborators
//! that feed it, and the asynchronous operations that orchestrate them.
//!
//! ## Operation Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         STORE OPERATIONS                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   UI ──► Store::operation(..)                                          │
//! │              │                                                          │
//! │              ├─► commit(BeginRequest)          status = loading        │
//! │              │                                                          │
//! │              ├─► CatalogClient / IdentityService / FavoritesRepository │
//! │              │      (awaited, no lock held)                             │
//! │              │                                                          │
//! │              ├─► commit(payload mutations)                              │
//! │              │                                                          │
//! │              └─► commit(CompleteRequest | FailRequest)                  │
//! │                                         status = success | error        │
//! │                                                                         │
//! │   Every commit is broadcast as a StateChange to subscribers.           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operations never return raw errors. Failures are logged, recorded in
//! the request status, and reported through the returned [`Outcome`].
//!
//! `status` is shared by every operation, so with overlapping operations it
//! reflects whichever settled last. Use the [`Outcome`] of each call when a
//! per-operation answer is needed.

mod artwork;
mod favorites;
mod session;
mod tasks;

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::catalog::{CatalogClient, HttpCatalogClient};
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::identity::{IdentityService, LocalIdentityService, UserIdentity};
use crate::model::{Artwork, CurrentArtwork};
use crate::persistence::{FavoritesRepository, MemoryFavoritesRepository, SqliteFavoritesRepository};
use crate::state::{Mutation, RequestStatus, RootState};
use crate::storage::{FileTokenStore, MemoryTokenStore, TokenStore};

use tasks::BackgroundTasks;

/// File name of the favorites database inside `StoreConfig::data_dir`
pub const FAVORITES_DB_FILE: &str = "favorites.db";

const EVENT_CAPACITY: usize = 256;

/// How an operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation ran and succeeded
    Succeeded,
    /// The operation ran and failed
    Failed,
    /// Nothing to do (for example, no signed-in user)
    Skipped,
}

impl Outcome {
    /// Succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

/// Notification sent after every committed mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// Name of the mutation, see [`Mutation::name`]
    pub mutation: &'static str,
    /// Request status after the mutation
    pub status: RequestStatus,
}

/// The collaborators a store orchestrates
#[derive(Clone)]
pub struct Services {
    /// Art catalog
    pub catalog: Arc<dyn CatalogClient>,
    /// Identity provider
    pub identity: Arc<dyn IdentityService>,
    /// Per-user favorites documents
    pub favorites: Arc<dyn FavoritesRepository>,
    /// Durable slot for the catalog token
    pub tokens: Arc<dyn TokenStore>,
}

impl Services {
    /// Bundled collaborators built from configuration.
    ///
    /// With a `data_dir` the token and favorites survive restarts; without
    /// one everything is kept in memory. Identity is always local.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let (tokens, favorites): (Arc<dyn TokenStore>, Arc<dyn FavoritesRepository>) =
            match &config.data_dir {
                Some(dir) => {
                    std::fs::create_dir_all(dir).map_err(|e| {
                        Error::DatabaseError(format!(
                            "Failed to create data directory {}: {}",
                            dir.display(),
                            e
                        ))
                    })?;
                    let db_path = dir.join(FAVORITES_DB_FILE).to_string_lossy().into_owned();
                    (
                        Arc::new(FileTokenStore::open(dir, &config.token_slot)?),
                        Arc::new(SqliteFavoritesRepository::open(Some(db_path.as_str()))?),
                    )
                }
                None => (
                    Arc::new(MemoryTokenStore::new()),
                    Arc::new(MemoryFavoritesRepository::new()),
                ),
            };

        Ok(Self {
            catalog: Arc::new(HttpCatalogClient::new(config, tokens.clone())),
            identity: Arc::new(LocalIdentityService::new()),
            favorites,
            tokens,
        })
    }
}

struct StoreInner {
    config: StoreConfig,
    state: RwLock<RootState>,
    services: Services,
    events: broadcast::Sender<StateChange>,
    tasks: BackgroundTasks,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.get_mut().take() {
            watcher.abort();
        }
    }
}

/// Handle to the application store
///
/// Cloning is cheap; all clones share one state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Create a store.
    ///
    /// The session token is seeded from the token store. A missing or
    /// unreadable token starts the session empty.
    pub fn new(config: StoreConfig, services: Services) -> Result<Self> {
        config.validate()?;

        let token = match services.tokens.get() {
            Ok(token) => token.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Could not read stored session token: {}", e);
                String::new()
            }
        };
        tracing::info!(
            "Store created (catalog {}, session token {})",
            config.catalog_base_url,
            if token.is_empty() { "absent" } else { "present" }
        );

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            inner: Arc::new(StoreInner {
                config,
                state: RwLock::new(RootState::new(token)),
                services,
                events,
                tasks: BackgroundTasks::default(),
                watcher: Mutex::new(None),
            }),
        })
    }

    /// Create a store with the bundled collaborators for `config`.
    ///
    /// The configuration is checked before anything is written to disk.
    pub fn open(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let services = Services::from_config(&config)?;
        Self::new(config, services)
    }

    /// Configuration the store was built with
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Subscribe to committed mutations
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.inner.events.subscribe()
    }

    /// Apply one mutation and notify subscribers
    pub(crate) fn commit(&self, mutation: Mutation) {
        let name = mutation.name();
        let status = {
            let mut state = self.inner.state.write();
            state.apply(mutation);
            state.status()
        };
        tracing::trace!("commit {} (status {})", name, status);
        // No subscribers is fine
        let _ = self.inner.events.send(StateChange {
            mutation: name,
            status,
        });
    }

    /// Finish a request: CompleteRequest on success, FailRequest on error
    pub(crate) fn settle(&self, operation: &str, result: Result<()>) -> Outcome {
        match result {
            Ok(()) => {
                self.commit(Mutation::CompleteRequest);
                Outcome::Succeeded
            }
            Err(e) => {
                tracing::warn!("{} failed ({:?}): {}", operation, e.kind(), e);
                self.commit(Mutation::FailRequest);
                Outcome::Failed
            }
        }
    }

    fn downgrade(&self) -> Weak<StoreInner> {
        Arc::downgrade(&self.inner)
    }

    fn services(&self) -> &Services {
        &self.inner.services
    }

    // ========================================================================
    // BACKGROUND WORK
    // ========================================================================

    /// Number of background tasks still running
    pub fn pending_background(&self) -> usize {
        self.inner.tasks.pending()
    }

    /// Wait for every background task (favorites persistence) to finish
    pub async fn drain_background(&self) {
        self.inner.tasks.drain().await;
    }

    // ========================================================================
    // PROJECTIONS
    // ========================================================================

    /// A copy of the whole root state
    pub fn snapshot(&self) -> RootState {
        self.inner.state.read().clone()
    }

    /// Outcome of the most recent request
    pub fn status(&self) -> RequestStatus {
        self.inner.state.read().status()
    }

    /// Catalog session token, empty when there is none
    pub fn current_token(&self) -> String {
        self.inner.state.read().current_token().to_string()
    }

    /// A catalog session token is held
    pub fn is_logged_in(&self) -> bool {
        self.inner.state.read().is_logged_in()
    }

    /// A user is signed in
    #[doc(alias = "is_user_auth")]
    pub fn is_user_logged_in(&self) -> bool {
        self.inner.state.read().is_user_logged_in()
    }

    /// The signed-in user
    pub fn current_user(&self) -> Option<UserIdentity> {
        self.inner.state.read().current_user().cloned()
    }

    /// Last identity error message
    pub fn last_error(&self) -> Option<String> {
        self.inner.state.read().last_error().map(str::to_string)
    }

    /// Favorited artworks in display order
    pub fn favorited_artworks(&self) -> Vec<Artwork> {
        self.inner.state.read().favorited_artworks().to_vec()
    }

    /// Whether an artwork with this id is favorited
    pub fn is_favorited(&self, id: &str) -> bool {
        self.inner.state.read().model().is_favorited(id)
    }

    /// The current artwork bundle
    pub fn current_artwork(&self) -> Option<CurrentArtwork> {
        self.inner.state.read().current_artwork().cloned()
    }
}
