//! # Persistence Module
//!
//! Per-user favorites documents.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     FAVORITES DOCUMENTS                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  key:   UserIdentity::uid                                              │
//! │  value: FavoritesDocument { artworks: [...], updated_at }              │
//! │                                                                         │
//! │  load(user)          → artworks, or [] when no document exists         │
//! │  save(user, items)   → overwrite the whole document                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod sqlite;

pub use sqlite::SqliteFavoritesRepository;

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::identity::UserIdentity;
use crate::model::Artwork;

/// The stored shape of a user's favorites
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FavoritesDocument {
    /// Favorited artworks in display order
    #[serde(default)]
    pub artworks: Vec<Artwork>,
    /// When the document was last written (Unix timestamp)
    #[serde(default)]
    pub updated_at: i64,
}

/// Remote document store holding each user's favorites
#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// Load the user's favorites. A missing document loads as empty.
    async fn load(&self, user: &UserIdentity) -> Result<Vec<Artwork>>;

    /// Overwrite the user's favorites
    async fn save(&self, user: &UserIdentity, artworks: &[Artwork]) -> Result<()>;
}

/// Favorites repository kept in memory
#[derive(Debug, Default)]
pub struct MemoryFavoritesRepository {
    documents: RwLock<HashMap<String, FavoritesDocument>>,
}

impl MemoryFavoritesRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw document for a uid
    pub fn document(&self, uid: &str) -> Option<FavoritesDocument> {
        self.documents.read().get(uid).cloned()
    }
}

#[async_trait]
impl FavoritesRepository for MemoryFavoritesRepository {
    async fn load(&self, user: &UserIdentity) -> Result<Vec<Artwork>> {
        Ok(self
            .documents
            .read()
            .get(&user.uid)
            .map(|doc| doc.artworks.clone())
            .unwrap_or_default())
    }

    async fn save(&self, user: &UserIdentity, artworks: &[Artwork]) -> Result<()> {
        let document = FavoritesDocument {
            artworks: artworks.to_vec(),
            updated_at: chrono::Utc::now().timestamp(),
        };
        self.documents.write().insert(user.uid.clone(), document);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
