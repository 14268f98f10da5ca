//! # Catalog Module
//!
//! Lookups against the art catalog API.
//!
//! ## Request Shapes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CATALOG REQUESTS                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  fetch_artwork(id)           GET  /artworks/{id}                       │
//! │  search(ArtworkQuery)        GET  /artworks?similar_to_artwork_id=     │
//! │                                            &artist_id=&size=           │
//! │  search_artists(ArtistQuery) GET  /artists?artwork_id=                 │
//! │  renew_token()               POST /tokens/xapp_token                   │
//! │                                                                         │
//! │  Search responses are HAL documents; the lists live under              │
//! │  `_embedded.artworks` / `_embedded.artists`.                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod http;

pub use http::HttpCatalogClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Artist, Artwork};

/// Parameters for an artwork search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkQuery {
    /// Only artworks similar to this one
    pub similar_to_artwork_id: Option<String>,
    /// Only artworks by this artist
    pub artist_id: Option<String>,
    /// Maximum number of results
    pub size: Option<u32>,
}

impl ArtworkQuery {
    /// Artworks similar to `artwork_id`
    pub fn similar_to(artwork_id: impl Into<String>, size: u32) -> Self {
        Self {
            similar_to_artwork_id: Some(artwork_id.into()),
            size: Some(size),
            ..Default::default()
        }
    }

    /// Artworks by `artist_id`
    pub fn by_artist(artist_id: impl Into<String>, size: u32) -> Self {
        Self {
            artist_id: Some(artist_id.into()),
            size: Some(size),
            ..Default::default()
        }
    }

    /// Query-string pairs for the set parameters, in a stable order
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = &self.similar_to_artwork_id {
            pairs.push(("similar_to_artwork_id", id.clone()));
        }
        if let Some(id) = &self.artist_id {
            pairs.push(("artist_id", id.clone()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        pairs
    }
}

/// Parameters for an artist search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistQuery {
    /// Artists associated with this artwork
    pub artwork_id: String,
}

impl ArtistQuery {
    /// Artists of `artwork_id`
    pub fn for_artwork(artwork_id: impl Into<String>) -> Self {
        Self {
            artwork_id: artwork_id.into(),
        }
    }
}

/// Result of an artwork search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtworkPage {
    /// Matching artworks in catalog order
    pub artworks: Vec<Artwork>,
}

/// Result of an artist search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistPage {
    /// Matching artists in catalog order
    pub artists: Vec<Artist>,
}

/// A freshly issued application token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XappToken {
    /// Bearer token for subsequent catalog calls
    pub token: String,
    /// Expiry as reported by the catalog
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Art catalog contract
///
/// Every method fails with a catalog error (`FetchFailed`, `HttpStatus`, or
/// `DeserializationError`) when the request cannot be completed.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch a single artwork
    async fn fetch_artwork(&self, id: &str) -> Result<Artwork>;

    /// Search artworks
    async fn search(&self, query: &ArtworkQuery) -> Result<ArtworkPage>;

    /// Search artists
    async fn search_artists(&self, query: &ArtistQuery) -> Result<ArtistPage>;

    /// Obtain a new application token
    async fn renew_token(&self) -> Result<XappToken>;
}
