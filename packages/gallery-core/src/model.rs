//! # Favorites Model
//!
//! In-memory collection of favorited artworks and the detail bundle of the
//! artwork currently being viewed. Pure data: nothing in here performs I/O.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FAVORITES MODEL                                  │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  favorited_artworks: [Artwork, Artwork, ...]   (insertion order)       │
//! │                                                                         │
//! │  current_artwork: Option<CurrentArtwork>                               │
//! │     ├── detail (id, title, category, medium, dimensions, ...)          │
//! │     ├── similar_artworks       ≤ related limit                         │
//! │     ├── related_artists        ≥ 1                                     │
//! │     └── artist_other_artworks  ≤ related limit                         │
//! │                                                                         │
//! │  The bundle is always replaced whole, never patched.                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An artwork as returned by the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    /// Catalog identifier
    pub id: String,
    /// Title (may be empty for untitled works)
    #[serde(default)]
    pub title: String,
    /// Category, e.g. "Painting"
    #[serde(default)]
    pub category: Option<String>,
    /// Medium, e.g. "Oil on canvas"
    #[serde(default)]
    pub medium: Option<String>,
    /// Dimensions in the catalog's own shape (inches / centimetres)
    #[serde(default)]
    pub dimensions: Value,
    /// Institution holding the work
    #[serde(default)]
    pub collecting_institution: Option<String>,
    /// HAL link metadata (thumbnails, permalink, ...)
    #[serde(default, rename = "_links")]
    pub links: Value,
}

impl Artwork {
    /// Create an artwork with just an id and a title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }
}

/// An artist as returned by the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    /// Catalog identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// URL slug
    #[serde(default)]
    pub slug: Option<String>,
    /// Nationality
    #[serde(default)]
    pub nationality: Option<String>,
    /// Birthday as free text
    #[serde(default)]
    pub birthday: Option<String>,
    /// HAL link metadata
    #[serde(default, rename = "_links")]
    pub links: Value,
}

impl Artist {
    /// Create an artist with just an id and a name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// The artwork being viewed together with everything fetched around it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentArtwork {
    /// Requested artwork id
    pub id: String,
    /// Title
    pub title: String,
    /// Category
    pub category: Option<String>,
    /// Medium
    pub medium: Option<String>,
    /// Dimensions
    pub dimensions: Value,
    /// Institution holding the work
    pub collecting_institution: Option<String>,
    /// HAL link metadata
    pub links: Value,
    /// Artworks the catalog considers similar
    pub similar_artworks: Vec<Artwork>,
    /// Artists associated with the artwork
    pub related_artists: Vec<Artist>,
    /// Other artworks by the first related artist
    pub artist_other_artworks: Vec<Artwork>,
}

/// Favorited artworks plus the current artwork bundle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FavoritesModel {
    favorited_artworks: Vec<Artwork>,
    current_artwork: Option<CurrentArtwork>,
}

impl FavoritesModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an artwork. Duplicates are kept; callers decide the policy.
    pub fn add_favorite(&mut self, artwork: Artwork) {
        self.favorited_artworks.push(artwork);
    }

    /// Remove the first favorite with the same id.
    ///
    /// Returns whether anything was removed.
    pub fn remove_favorite(&mut self, artwork: &Artwork) -> bool {
        match self
            .favorited_artworks
            .iter()
            .position(|a| a.id == artwork.id)
        {
            Some(index) => {
                self.favorited_artworks.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the whole favorites list
    pub fn replace_favorites(&mut self, artworks: Vec<Artwork>) {
        self.favorited_artworks = artworks;
    }

    /// Build and install a new current artwork bundle in one step
    pub fn commit_current_artwork(
        &mut self,
        id: String,
        detail: Artwork,
        similar_artworks: Vec<Artwork>,
        related_artists: Vec<Artist>,
        artist_other_artworks: Vec<Artwork>,
    ) {
        self.current_artwork = Some(CurrentArtwork {
            id,
            title: detail.title,
            category: detail.category,
            medium: detail.medium,
            dimensions: detail.dimensions,
            collecting_institution: detail.collecting_institution,
            links: detail.links,
            similar_artworks,
            related_artists,
            artist_other_artworks,
        });
    }

    /// Favorited artworks in display order
    pub fn favorited_artworks(&self) -> &[Artwork] {
        &self.favorited_artworks
    }

    /// The current artwork bundle, if one has been loaded
    pub fn current_artwork(&self) -> Option<&CurrentArtwork> {
        self.current_artwork.as_ref()
    }

    /// Whether an artwork with this id is in the favorites
    pub fn is_favorited(&self, id: &str) -> bool {
        self.favorited_artworks.iter().any(|a| a.id == id)
    }
}

// ============================================================================
// TESTS
// ============================================================================
