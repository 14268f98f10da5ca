//! # Error Handling
//!
//! Error types for Gallery Core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Core Errors                                                       │
//! │  │   ├── InvalidConfig         - Configuration value rejected          │
//! │  │   └── NoUser                - Operation needs a signed-in user      │
//! │  │                                                                      │
//! │  ├── Authentication Errors                                             │
//! │  │   └── Authentication        - Identity provider refused (code+msg)  │
//! │  │                                                                      │
//! │  ├── Persistence Errors                                                │
//! │  │   ├── Persistence           - Favorites document load/save failed   │
//! │  │   ├── TokenStore            - Session token slot read/write failed  │
//! │  │   └── DatabaseError         - SQLite failure                        │
//! │  │                                                                      │
//! │  ├── Catalog (Network Fetch) Errors                                    │
//! │  │   ├── FetchFailed           - Transport-level failure               │
//! │  │   ├── HttpStatus            - Non-success HTTP response             │
//! │  │   └── ArtistNotFound        - Artwork has no associated artist      │
//! │  │                                                                      │
//! │  └── Internal Errors                                                   │
//! │      ├── SerializationError                                            │
//! │      └── DeserializationError                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Orchestration operations on [`Store`](crate::store::Store) never hand
//! these errors to the caller. They are logged and folded into the
//! `status` / `last_error` projections.

use thiserror::Error;

/// Result type alias for Gallery Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error taxonomy used when translating failures into state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Catalog lookups that failed on the wire or returned bad data
    NetworkFetch,
    /// Identity provider rejections
    Authentication,
    /// Favorites document or session token persistence failures
    Persistence,
    /// Anything else
    Internal,
}

/// Main error type for Gallery Core
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Core Errors (100-199)
    // ========================================================================

    /// A configuration value was rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The operation requires a signed-in user
    #[error("No user is signed in.")]
    NoUser,

    // ========================================================================
    // Authentication Errors (200-299)
    // ========================================================================

    /// The identity provider refused the request
    #[error("{message}")]
    Authentication {
        /// Provider error code, e.g. `auth/invalid-credential`
        code: String,
        /// Human-readable message suitable for display
        message: String,
    },

    // ========================================================================
    // Persistence Errors (400-499)
    // ========================================================================

    /// Loading or saving a favorites document failed
    #[error("Failed to persist favorites: {0}")]
    Persistence(String),

    /// Reading or writing the session token slot failed
    #[error("Token store error: {0}")]
    TokenStore(String),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    // ========================================================================
    // Catalog Errors (500-599)
    // ========================================================================

    /// The request never produced a response
    #[error("Catalog request failed: {0}")]
    FetchFailed(String),

    /// The catalog answered with a non-success status
    #[error("Catalog returned HTTP {status} for {url}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The artwork has no artist in the catalog
    #[error("No artist found for artwork {0}")]
    ArtistNotFound(String),

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl Error {
    /// Build an authentication error from a provider code and message
    pub fn auth(code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Authentication {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Get the numeric error code
    ///
    /// - 100-199: Core
    /// - 200-299: Authentication
    /// - 400-499: Persistence
    /// - 500-599: Catalog
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_) => 100,
            Error::NoUser => 101,

            Error::Authentication { .. } => 200,

            Error::Persistence(_) => 400,
            Error::TokenStore(_) => 401,
            Error::DatabaseError(_) => 402,

            Error::FetchFailed(_) => 500,
            Error::HttpStatus { .. } => 501,
            Error::ArtistNotFound(_) => 502,

            Error::SerializationError(_) => 901,
            Error::DeserializationError(_) => 902,
        }
    }

    /// Map onto the coarse taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FetchFailed(_)
            | Error::HttpStatus { .. }
            | Error::ArtistNotFound(_)
            | Error::DeserializationError(_) => ErrorKind::NetworkFetch,
            Error::Authentication { .. } | Error::NoUser => ErrorKind::Authentication,
            Error::Persistence(_) | Error::TokenStore(_) | Error::DatabaseError(_) => {
                ErrorKind::Persistence
            }
            Error::InvalidConfig(_) | Error::SerializationError(_) => ErrorKind::Internal,
        }
    }

    /// Provider code for authentication errors
    pub fn auth_code(&self) -> Option<&str> {
        match self {
            Error::Authentication { code, .. } => Some(code),
            _ => None,
        }
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::DeserializationError(err.to_string())
        } else {
            Error::FetchFailed(err.to_string())
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            Error::DeserializationError(err.to_string())
        } else {
            Error::SerializationError(err.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::TokenStore(err.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================
