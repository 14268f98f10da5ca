//! Scripted collaborators for store tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use crate::catalog::{ArtistPage, ArtistQuery, ArtworkPage, ArtworkQuery, CatalogClient, XappToken};
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::identity::{codes, IdentityService, LocalIdentityService, UserIdentity};
use crate::model::{Artist, Artwork};
use crate::persistence::{FavoritesRepository, MemoryFavoritesRepository};
use crate::storage::{MemoryTokenStore, TokenStore};
use crate::store::{Services, Store};

/// Catalog stage a [`FakeCatalog`] can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Detail,
    Similar,
    Artists,
    ArtistWorks,
}

/// In-memory catalog that records every call
#[derive(Default)]
pub struct FakeCatalog {
    pub artworks: RwLock<HashMap<String, Artwork>>,
    pub similar: RwLock<HashMap<String, Vec<Artwork>>>,
    pub artists: RwLock<HashMap<String, Vec<Artist>>>,
    pub by_artist: RwLock<HashMap<String, Vec<Artwork>>>,
    pub fail_at: RwLock<Option<Stage>>,
    pub token: RwLock<Option<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    /// Catalog holding artwork "ab12" with 3 similar works and artist "art-5"
    /// who has 2 other works
    pub fn ab12() -> Self {
        let catalog = Self::default();
        catalog
            .artworks
            .write()
            .insert("ab12".into(), Artwork::new("ab12", "Study in Blue"));
        catalog.similar.write().insert(
            "ab12".into(),
            vec![
                Artwork::new("s1", "Similar One"),
                Artwork::new("s2", "Similar Two"),
                Artwork::new("s3", "Similar Three"),
            ],
        );
        catalog
            .artists
            .write()
            .insert("ab12".into(), vec![Artist::new("art-5", "Someone")]);
        catalog.by_artist.write().insert(
            "art-5".into(),
            vec![Artwork::new("o1", "Other One"), Artwork::new("o2", "Other Two")],
        );
        *catalog.token.write() = Some("fresh-token".into());
        catalog
    }

    pub fn fail_at(&self, stage: Option<Stage>) {
        *self.fail_at.write() = stage;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn check(&self, stage: Stage) -> Result<()> {
        if *self.fail_at.read() == Some(stage) {
            return Err(Error::FetchFailed(format!("{:?} unavailable", stage)));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn fetch_artwork(&self, id: &str) -> Result<Artwork> {
        self.calls.lock().push(format!("fetch_artwork:{}", id));
        self.check(Stage::Detail)?;
        self.artworks
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::HttpStatus {
                status: 404,
                url: format!("/artworks/{}", id),
            })
    }

    async fn search(&self, query: &ArtworkQuery) -> Result<ArtworkPage> {
        if let Some(id) = &query.similar_to_artwork_id {
            self.calls.lock().push(format!("similar:{}", id));
            self.check(Stage::Similar)?;
            let artworks = self.similar.read().get(id).cloned().unwrap_or_default();
            return Ok(ArtworkPage { artworks });
        }
        let id = query.artist_id.clone().unwrap_or_default();
        self.calls.lock().push(format!("by_artist:{}", id));
        self.check(Stage::ArtistWorks)?;
        let artworks = self.by_artist.read().get(&id).cloned().unwrap_or_default();
        Ok(ArtworkPage { artworks })
    }

    async fn search_artists(&self, query: &ArtistQuery) -> Result<ArtistPage> {
        self.calls
            .lock()
            .push(format!("artists:{}", query.artwork_id));
        self.check(Stage::Artists)?;
        let artists = self
            .artists
            .read()
            .get(&query.artwork_id)
            .cloned()
            .unwrap_or_default();
        Ok(ArtistPage { artists })
    }

    async fn renew_token(&self) -> Result<XappToken> {
        self.calls.lock().push("renew_token".into());
        match self.token.read().clone() {
            Some(token) => Ok(XappToken {
                token,
                expires_at: None,
            }),
            None => Err(Error::HttpStatus {
                status: 401,
                url: "/tokens/xapp_token".into(),
            }),
        }
    }
}

/// Identity provider whose sign-out always fails
#[derive(Default)]
pub struct StuckSignOut {
    pub inner: LocalIdentityService,
}

#[async_trait]
impl IdentityService for StuckSignOut {
    async fn create_account(&self, email: &str, password: &str) -> Result<UserIdentity> {
        self.inner.create_account(email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity> {
        self.inner.sign_in(email, password).await
    }

    async fn sign_out(&self) -> Result<()> {
        Err(Error::auth(codes::INVALID_CREDENTIAL, "network unreachable"))
    }

    fn current_user(&self) -> Option<UserIdentity> {
        self.inner.current_user()
    }

    fn subscribe(&self) -> broadcast::Receiver<Option<UserIdentity>> {
        self.inner.subscribe()
    }
}

/// Token slot that can be read and cleared but refuses writes
#[derive(Default)]
pub struct ReadOnlyTokenStore {
    pub inner: MemoryTokenStore,
}

impl TokenStore for ReadOnlyTokenStore {
    fn get(&self) -> Result<Option<String>> {
        self.inner.get()
    }

    fn set(&self, _token: &str) -> Result<()> {
        Err(Error::TokenStore("slot is read-only".into()))
    }

    fn remove(&self) -> Result<()> {
        self.inner.remove()
    }
}

/// Favorites repository that counts calls and can be told to fail
#[derive(Default)]
pub struct CountingRepository {
    pub inner: MemoryFavoritesRepository,
    pub loads: Mutex<usize>,
    pub saves: Mutex<usize>,
    pub failing: RwLock<bool>,
}

impl CountingRepository {
    pub fn loads(&self) -> usize {
        *self.loads.lock()
    }

    pub fn saves(&self) -> usize {
        *self.saves.lock()
    }
}

#[async_trait]
impl FavoritesRepository for CountingRepository {
    async fn load(&self, user: &UserIdentity) -> Result<Vec<Artwork>> {
        *self.loads.lock() += 1;
        if *self.failing.read() {
            return Err(Error::Persistence("document store offline".into()));
        }
        self.inner.load(user).await
    }

    async fn save(&self, user: &UserIdentity, artworks: &[Artwork]) -> Result<()> {
        *self.saves.lock() += 1;
        if *self.failing.read() {
            return Err(Error::Persistence("document store offline".into()));
        }
        self.inner.save(user, artworks).await
    }
}

/// A store wired to fakes, with handles to each of them
pub struct Harness {
    pub store: Store,
    pub catalog: Arc<FakeCatalog>,
    pub identity: Arc<dyn IdentityService>,
    pub favorites: Arc<CountingRepository>,
    pub tokens: Arc<dyn TokenStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_identity(Arc::new(LocalIdentityService::new()), MemoryTokenStore::new())
    }

    pub fn with_identity(
        identity: Arc<dyn IdentityService>,
        tokens: impl TokenStore + 'static,
    ) -> Self {
        init_tracing();
        let catalog = Arc::new(FakeCatalog::ab12());
        let favorites = Arc::new(CountingRepository::default());
        let tokens: Arc<dyn TokenStore> = Arc::new(tokens);
        let store = Store::new(
            StoreConfig::default(),
            Services {
                catalog: catalog.clone(),
                identity: identity.clone(),
                favorites: favorites.clone(),
                tokens: tokens.clone(),
            },
        )
        .unwrap();

        Self {
            store,
            catalog,
            identity,
            favorites,
            tokens,
        }
    }
}

/// Route log output through the test harness; `RUST_LOG` picks the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Mutation names received so far
pub fn drain_events(rx: &mut broadcast::Receiver<crate::store::StateChange>) -> Vec<&'static str> {
    let mut names = Vec::new();
    while let Ok(change) = rx.try_recv() {
        names.push(change.mutation);
    }
    names
}
