//! # Gallery Core
//!
//! Client-side state and orchestration for an art-browsing application:
//! the artwork being viewed with its related works and artists, the
//! signed-in user, their favorites, and the catalog session token.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        GALLERY CORE MODULES                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │                         ┌─────────────────────┐                        │
//! │       UI  ────────────► │        Store        │ ──► StateChange events │
//! │                         │                     │                        │
//! │                         │ - RootState (lock)  │                        │
//! │                         │ - operations        │                        │
//! │                         │ - background tasks  │                        │
//! │                         └──────────┬──────────┘                        │
//! │                                    │                                    │
//! │         ┌───────────────┬────────┴────────┬───────────────┐            │
//! │         ▼               ▼                 ▼               ▼            │
//! │  ┌────────────┐  ┌────────────┐  ┌──────────────┐  ┌────────────┐     │
//! │  │  Catalog   │  │  Identity  │  │ Persistence  │  │  Storage   │     │
//! │  │            │  │            │  │              │  │            │     │
//! │  │ - artwork  │  │ - sign up  │  │ - per-user   │  │ - session  │     │
//! │  │ - search   │  │ - sign in  │  │   favorites  │  │   token    │     │
//! │  │ - artists  │  │ - sign out │  │ - SQLite     │  │ - file     │     │
//! │  │ - token    │  │ - watch    │  │              │  │   slot     │     │
//! │  └────────────┘  └────────────┘  └──────────────┘  └────────────┘     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire library
//! - [`config`] - Store configuration from the environment
//! - [`model`] - Artworks, artists, and the favorites model
//! - [`state`] - Root state and its synchronous transitions
//! - [`catalog`] - Art catalog client (HAL+JSON over HTTP)
//! - [`identity`] - Identity provider contract and a local provider
//! - [`persistence`] - Per-user favorites documents
//! - [`storage`] - Durable session token slot
//! - [`store`] - The store and its asynchronous operations
//!
//! ## Example
//!
//! ```ignore
//! use gallery_core::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::from_env()?)?;
//! store.renew_session().await;
//! store.load_artwork_context("4d8b92eb4eb68a1b2c000968").await;
//! println!("{}", store.status());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod model;
pub mod persistence;
pub mod state;
pub mod storage;
pub mod store;

#[cfg(test)]
mod testing;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use catalog::{CatalogClient, HttpCatalogClient};
pub use config::StoreConfig;
pub use error::{Error, ErrorKind, Result};
pub use identity::{IdentityService, LocalIdentityService, UserIdentity};
pub use model::{Artist, Artwork, CurrentArtwork};
pub use persistence::{FavoritesRepository, MemoryFavoritesRepository, SqliteFavoritesRepository};
pub use state::{RequestStatus, RootState};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use store::{Outcome, Services, StateChange, Store};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of Gallery Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================
