//! Store configuration.
//!
//! Catalog credentials and tuning knobs, loaded from environment variables.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::DEFAULT_TOKEN_SLOT;

/// Default catalog API root
pub const DEFAULT_CATALOG_URL: &str = "https://api.artsy.net/api";

/// Default number of similar / artist-other artworks fetched per context load
pub const DEFAULT_RELATED_LIMIT: u32 = 10;

/// Configuration for a [`Store`](crate::store::Store) and its bundled collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Catalog API root, without a trailing slash
    pub catalog_base_url: String,
    /// Application client id used to obtain catalog tokens
    pub client_id: String,
    /// Application client secret used to obtain catalog tokens
    pub client_secret: String,
    /// Size limit for similar-artwork and artist-artwork searches
    pub related_limit: u32,
    /// Name of the durable token slot
    pub token_slot: String,
    /// Directory for durable client state (token slot, favorites database).
    /// None keeps everything in memory.
    pub data_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: DEFAULT_CATALOG_URL.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            related_limit: DEFAULT_RELATED_LIMIT,
            token_slot: DEFAULT_TOKEN_SLOT.to_string(),
            data_dir: None,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `GALLERY_CATALOG_URL` | `catalog_base_url` |
    /// | `GALLERY_CLIENT_ID` | `client_id` |
    /// | `GALLERY_CLIENT_SECRET` | `client_secret` |
    /// | `GALLERY_RELATED_LIMIT` | `related_limit` |
    /// | `GALLERY_TOKEN_SLOT` | `token_slot` |
    /// | `GALLERY_DATA_DIR` | `data_dir` |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let related_limit = match lookup("GALLERY_RELATED_LIMIT") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                Error::InvalidConfig(format!("GALLERY_RELATED_LIMIT is not a number: {:?}", raw))
            })?,
            None => defaults.related_limit,
        };

        let config = Self {
            catalog_base_url: lookup("GALLERY_CATALOG_URL")
                .unwrap_or(defaults.catalog_base_url)
                .trim_end_matches('/')
                .to_string(),
            client_id: lookup("GALLERY_CLIENT_ID").unwrap_or_default(),
            client_secret: lookup("GALLERY_CLIENT_SECRET").unwrap_or_default(),
            related_limit,
            token_slot: lookup("GALLERY_TOKEN_SLOT").unwrap_or(defaults.token_slot),
            data_dir: lookup("GALLERY_DATA_DIR")
                .filter(|d| !d.is_empty())
                .map(PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the store cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.catalog_base_url.is_empty() {
            return Err(Error::InvalidConfig("catalog_base_url is empty".into()));
        }
        if self.related_limit == 0 {
            return Err(Error::InvalidConfig("related_limit must be at least 1".into()));
        }
        if self.token_slot.is_empty() {
            return Err(Error::InvalidConfig("token_slot is empty".into()));
        }
        Ok(())
    }
}
