//! Favorites operations.
//!
//! Local edits apply immediately and are written to the favorites repository
//! in the background. Loads and saves are skipped while nobody is signed in.

use crate::error::{Error, Result};
use crate::identity::UserIdentity;
use crate::model::Artwork;
use crate::state::Mutation;

use super::{Outcome, Store};

impl Store {
    /// Favorite an artwork and persist the list in the background
    pub fn add_favorite(&self, artwork: Artwork) {
        tracing::debug!("Favoriting {}", artwork.id);
        self.commit(Mutation::AddFavorite(artwork));
        self.persist_in_background();
    }

    /// Unfavorite the first artwork with the same id and persist the list in
    /// the background. Returns whether anything was removed.
    pub fn remove_favorite(&self, artwork: &Artwork) -> bool {
        let removed = self.is_favorited(&artwork.id);
        if removed {
            tracing::debug!("Unfavoriting {}", artwork.id);
        }
        self.commit(Mutation::RemoveFavorite(artwork.clone()));
        self.persist_in_background();
        removed
    }

    /// Replace the favorites in state with the signed-in user's stored list
    pub async fn load_favorites(&self) -> Outcome {
        let user = match self.signed_in_user() {
            Ok(user) => user,
            Err(_) => return Outcome::Skipped,
        };

        self.commit(Mutation::BeginRequest);
        let result = self
            .services()
            .favorites
            .load(&user)
            .await
            .map(|artworks| {
                tracing::debug!("Loaded {} favorites for {}", artworks.len(), user.uid);
                self.commit(Mutation::ReplaceFavorites(artworks));
            });
        self.settle("load_favorites", result)
    }

    /// Write the favorites in state to the signed-in user's stored list
    pub async fn persist_favorites(&self) -> Outcome {
        let (user, artworks) = {
            let state = self.inner.state.read();
            match state.current_user() {
                Some(user) => (user.clone(), state.favorited_artworks().to_vec()),
                None => return Outcome::Skipped,
            }
        };

        self.commit(Mutation::BeginRequest);
        let result = self.services().favorites.save(&user, &artworks).await;
        self.settle("persist_favorites", result)
    }

    fn signed_in_user(&self) -> Result<UserIdentity> {
        self.current_user().ok_or(Error::NoUser)
    }

    fn persist_in_background(&self) {
        let store = self.clone();
        self.inner.tasks.spawn("persist_favorites", async move {
            store.persist_favorites().await;
        });
    }
}
