//! # Root State
//!
//! The single mutable root behind a [`Store`](crate::store::Store) and the
//! synchronous transitions that change it.
//!
//! ## Transitions
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         STATE TRANSITIONS                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Request status                                                        │
//! │    BeginRequest     ──► Loading                                        │
//! │    CompleteRequest  ──► Success                                        │
//! │    FailRequest      ──► Error                                          │
//! │                                                                         │
//! │  Session                                                               │
//! │    BeginAuth        ──► Loading                                        │
//! │    AuthSucceeded(t) ──► Success, session_token = t                     │
//! │    AuthFailed       ──► Error, session_token = ""                      │
//! │    ClearSession     ──► Idle, session_token = ""                       │
//! │                                                                         │
//! │  Identity                                                              │
//! │    SetUser(u)       ──► current_user = u                               │
//! │    SetError(m)      ──► last_error = m                                 │
//! │                                                                         │
//! │  Favorites model                                                       │
//! │    AddFavorite / RemoveFavorite / ReplaceFavorites                     │
//! │    CommitCurrentArtwork(bundle)                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each transition is a pure function of the previous state and its payload.

use serde::{Deserialize, Serialize};

use crate::identity::UserIdentity;
use crate::model::{Artist, Artwork, CurrentArtwork, FavoritesModel};

/// Outcome of the most recent request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Nothing has run yet, or the session was cleared
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request succeeded
    Success,
    /// The last request failed
    Error,
}

impl RequestStatus {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Idle => "idle",
            RequestStatus::Loading => "loading",
            RequestStatus::Success => "success",
            RequestStatus::Error => "error",
        }
    }

    /// Success or Error
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Success | RequestStatus::Error)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to install a new current artwork
#[derive(Debug, Clone, PartialEq)]
pub struct ArtworkBundle {
    /// Requested artwork id
    pub id: String,
    /// The artwork itself
    pub detail: Artwork,
    /// Similar artworks
    pub similar_artworks: Vec<Artwork>,
    /// Artists of the artwork
    pub related_artists: Vec<Artist>,
    /// Other works by the first artist
    pub artist_other_artworks: Vec<Artwork>,
}

/// A synchronous state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Status → Loading
    BeginRequest,
    /// Status → Success
    CompleteRequest,
    /// Status → Error
    FailRequest,
    /// Status → Loading (session renewal)
    BeginAuth,
    /// Status → Success and store the token
    AuthSucceeded(String),
    /// Status → Error and drop the token (session renewal)
    AuthFailed,
    /// Status → Idle and drop the token
    ClearSession,
    /// Replace the signed-in user
    SetUser(Option<UserIdentity>),
    /// Replace the last identity error message
    SetError(Option<String>),
    /// Append a favorite
    AddFavorite(Artwork),
    /// Remove the first favorite with the same id
    RemoveFavorite(Artwork),
    /// Replace all favorites
    ReplaceFavorites(Vec<Artwork>),
    /// Install a new current artwork bundle
    CommitCurrentArtwork(Box<ArtworkBundle>),
}

impl Mutation {
    /// Stable name used in logs and events
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::BeginRequest => "begin_request",
            Mutation::CompleteRequest => "complete_request",
            Mutation::FailRequest => "fail_request",
            Mutation::BeginAuth => "begin_auth",
            Mutation::AuthSucceeded(_) => "auth_succeeded",
            Mutation::AuthFailed => "auth_failed",
            Mutation::ClearSession => "clear_session",
            Mutation::SetUser(_) => "set_user",
            Mutation::SetError(_) => "set_error",
            Mutation::AddFavorite(_) => "add_favorite",
            Mutation::RemoveFavorite(_) => "remove_favorite",
            Mutation::ReplaceFavorites(_) => "replace_favorites",
            Mutation::CommitCurrentArtwork(_) => "commit_current_artwork",
        }
    }
}

/// The root state of a store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootState {
    status: RequestStatus,
    session_token: String,
    current_user: Option<UserIdentity>,
    last_error: Option<String>,
    model: FavoritesModel,
}

impl RootState {
    /// Fresh state seeded with a previously stored session token
    pub fn new(session_token: impl Into<String>) -> Self {
        Self {
            session_token: session_token.into(),
            ..Default::default()
        }
    }

    /// Apply one transition
    pub fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::BeginRequest | Mutation::BeginAuth => self.status = RequestStatus::Loading,
            Mutation::CompleteRequest => self.status = RequestStatus::Success,
            Mutation::FailRequest => self.status = RequestStatus::Error,
            Mutation::AuthFailed => {
                self.status = RequestStatus::Error;
                self.session_token.clear();
            }
            Mutation::AuthSucceeded(token) => {
                self.status = RequestStatus::Success;
                self.session_token = token;
            }
            Mutation::ClearSession => {
                self.status = RequestStatus::Idle;
                self.session_token.clear();
            }
            Mutation::SetUser(user) => self.current_user = user,
            Mutation::SetError(message) => self.last_error = message,
            Mutation::AddFavorite(artwork) => self.model.add_favorite(artwork),
            Mutation::RemoveFavorite(artwork) => {
                self.model.remove_favorite(&artwork);
            }
            Mutation::ReplaceFavorites(artworks) => self.model.replace_favorites(artworks),
            Mutation::CommitCurrentArtwork(bundle) => {
                let ArtworkBundle {
                    id,
                    detail,
                    similar_artworks,
                    related_artists,
                    artist_other_artworks,
                } = *bundle;
                self.model.commit_current_artwork(
                    id,
                    detail,
                    similar_artworks,
                    related_artists,
                    artist_other_artworks,
                );
            }
        }
    }

    // ========================================================================
    // PROJECTIONS
    // ========================================================================

    /// Outcome of the most recent request
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Catalog session token, empty when there is none
    pub fn current_token(&self) -> &str {
        &self.session_token
    }

    /// A catalog session token is held
    pub fn is_logged_in(&self) -> bool {
        !self.session_token.is_empty()
    }

    /// A user is signed in
    pub fn is_user_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    /// The signed-in user
    pub fn current_user(&self) -> Option<&UserIdentity> {
        self.current_user.as_ref()
    }

    /// Last identity error message
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The favorites model
    pub fn model(&self) -> &FavoritesModel {
        &self.model
    }

    /// Favorited artworks in display order
    pub fn favorited_artworks(&self) -> &[Artwork] {
        self.model.favorited_artworks()
    }

    /// The current artwork bundle
    pub fn current_artwork(&self) -> Option<&CurrentArtwork> {
        self.model.current_artwork()
    }
}

// ============================================================================
// TESTS
// ============================================================================
