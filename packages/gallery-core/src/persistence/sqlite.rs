//! SQLite-backed favorites repository.
//!
//! ```text
//! ┌─────────────────────────────┐
//! │      favorites              │
//! ├─────────────────────────────┤
//! │ uid         TEXT PRIMARY KEY│
//! │ email       TEXT            │
//! │ document    TEXT  (JSON)    │
//! │ updated_at  INTEGER         │
//! └─────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use super::{FavoritesDocument, FavoritesRepository};
use crate::error::{Error, Result};
use crate::identity::UserIdentity;
use crate::model::Artwork;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS favorites (
    uid TEXT PRIMARY KEY NOT NULL,
    email TEXT NOT NULL,
    document TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;

/// Favorites documents stored in a SQLite database
pub struct SqliteFavoritesRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteFavoritesRepository {
    /// Open or create a database
    ///
    /// If path is None, creates an in-memory database (useful for testing).
    pub fn open(path: Option<&str>) -> Result<Self> {
        let conn = match path {
            Some(p) => Connection::open(p)
                .map_err(|e| Error::DatabaseError(format!("Failed to open database: {}", e)))?,
            None => Connection::open_in_memory().map_err(|e| {
                Error::DatabaseError(format!("Failed to create in-memory database: {}", e))
            })?,
        };

        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.init_schema()?;
        Ok(repo)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(CREATE_TABLES)
            .map_err(|e| Error::DatabaseError(format!("Failed to create tables: {}", e)))?;

        let version: Option<i32> = conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        if version.is_none() {
            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?)",
                params![SCHEMA_VERSION],
            )
            .map_err(|e| Error::DatabaseError(format!("Failed to set schema version: {}", e)))?;
            tracing::info!("Favorites schema created (version {})", SCHEMA_VERSION);
        }

        Ok(())
    }

    /// Number of users with a stored document
    pub fn document_count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM favorites", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[async_trait]
impl FavoritesRepository for SqliteFavoritesRepository {
    async fn load(&self, user: &UserIdentity) -> Result<Vec<Artwork>> {
        let raw: Option<String> = {
            let conn = self.conn.lock();
            conn.query_row(
                "SELECT document FROM favorites WHERE uid = ?",
                params![user.uid],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| Error::Persistence(format!("Failed to load favorites: {}", e)))?
        };

        match raw {
            Some(json) => {
                let document: FavoritesDocument = serde_json::from_str(&json).map_err(|e| {
                    Error::Persistence(format!("Corrupt favorites document: {}", e))
                })?;
                Ok(document.artworks)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, user: &UserIdentity, artworks: &[Artwork]) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let document = FavoritesDocument {
            artworks: artworks.to_vec(),
            updated_at: now,
        };
        let json = serde_json::to_string(&document)?;

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO favorites (uid, email, document, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(uid) DO UPDATE SET
                email = excluded.email,
                document = excluded.document,
                updated_at = excluded.updated_at",
            params![user.uid, user.email, json, now],
        )
        .map_err(|e| Error::Persistence(format!("Failed to save favorites: {}", e)))?;

        tracing::debug!("Saved {} favorites for {}", artworks.len(), user.uid);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
