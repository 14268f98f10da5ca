//! # Storage Module
//!
//! Local durable storage owned by the client.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         STORAGE SYSTEM                                  │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Session Token Slot                                                    │
//! │  ──────────────────                                                     │
//! │  Catalog bearer token, read once when the store is built and           │
//! │  rewritten on every session renewal.                                   │
//! │                                                                         │
//! │  Favorites documents live with the persistence service, not here       │
//! │  (see crate::persistence).                                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod token_store;

pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, DEFAULT_TOKEN_SLOT};
