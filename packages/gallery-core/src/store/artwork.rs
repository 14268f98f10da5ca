//! Loading the current artwork and its surrounding context.

use crate::catalog::{ArtistQuery, ArtworkQuery};
use crate::error::{Error, Result};
use crate::model::Artwork;
use crate::state::{ArtworkBundle, Mutation};

use super::{Outcome, Store};

impl Store {
    /// Load an artwork with its similar artworks, artists, and the first
    /// artist's other works, then install it as the current artwork.
    ///
    /// The four catalog calls run in order and stop at the first failure.
    /// Nothing is installed unless all of them succeed, so a failed load
    /// leaves the previous current artwork in place.
    pub async fn load_artwork_context(&self, id: &str) -> Outcome {
        self.commit(Mutation::BeginRequest);

        let result = self
            .fetch_bundle(id)
            .await
            .map(|bundle| self.commit(Mutation::CommitCurrentArtwork(Box::new(bundle))));

        self.settle("load_artwork_context", result)
    }

    async fn fetch_bundle(&self, id: &str) -> Result<ArtworkBundle> {
        let catalog = &self.services().catalog;
        let limit = self.inner.config.related_limit;

        let detail = catalog.fetch_artwork(id).await?;
        tracing::debug!("Fetched artwork {} ({})", detail.id, detail.title);

        let similar = catalog
            .search(&ArtworkQuery::similar_to(id, limit))
            .await?
            .artworks;

        let artists = catalog
            .search_artists(&ArtistQuery::for_artwork(detail.id.as_str()))
            .await?
            .artists;
        let artist_id = artists
            .first()
            .map(|artist| artist.id.clone())
            .ok_or_else(|| Error::ArtistNotFound(detail.id.clone()))?;

        let others = catalog
            .search(&ArtworkQuery::by_artist(artist_id, limit))
            .await?
            .artworks;

        Ok(ArtworkBundle {
            id: id.to_string(),
            detail,
            similar_artworks: truncated(similar, limit),
            related_artists: artists,
            artist_other_artworks: truncated(others, limit),
        })
    }
}

fn truncated(mut artworks: Vec<Artwork>, limit: u32) -> Vec<Artwork> {
    artworks.truncate(limit as usize);
    artworks
}

#[cfg(test)]
mod tests {
    use crate::model::{Artist, Artwork};
    use crate::state::RequestStatus;
    use crate::store::Outcome;
    use crate::testing::{drain_events, Harness, Stage};

    #[tokio::test]
    async fn test_load_artwork_context() {
        let harness = Harness::new();
        let mut rx = harness.store.subscribe();

        let outcome = harness.store.load_artwork_context("ab12").await;

        assert_eq!(outcome, Outcome::Succeeded);
        assert_eq!(harness.store.status(), RequestStatus::Success);

        let current = harness.store.current_artwork().unwrap();
        assert_eq!(current.id, "ab12");
        assert_eq!(current.title, "Study in Blue");
        assert_eq!(current.similar_artworks.len(), 3);
        assert_eq!(current.related_artists, vec![Artist::new("art-5", "Someone")]);
        let others: Vec<&str> = current
            .artist_other_artworks
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(others, vec!["o1", "o2"]);

        assert_eq!(
            harness.catalog.calls(),
            vec![
                "fetch_artwork:ab12",
                "similar:ab12",
                "artists:ab12",
                "by_artist:art-5",
            ]
        );
        assert_eq!(
            drain_events(&mut rx),
            vec!["begin_request", "commit_current_artwork", "complete_request"]
        );
    }

    #[tokio::test]
    async fn test_failure_at_any_stage_keeps_previous_artwork() {
        for stage in [Stage::Detail, Stage::Similar, Stage::Artists, Stage::ArtistWorks] {
            let harness = Harness::new();
            harness.store.load_artwork_context("ab12").await;
            let before = harness.store.current_artwork();

            harness.catalog.fail_at(Some(stage));
            let mut rx = harness.store.subscribe();
            let outcome = harness.store.load_artwork_context("ab12").await;

            assert_eq!(outcome, Outcome::Failed, "stage {:?}", stage);
            assert_eq!(harness.store.status(), RequestStatus::Error);
            assert_eq!(harness.store.current_artwork(), before);
            assert_eq!(drain_events(&mut rx), vec!["begin_request", "fail_request"]);
        }
    }

    #[tokio::test]
    async fn test_stages_stop_at_first_failure() {
        let harness = Harness::new();
        harness.catalog.fail_at(Some(Stage::Similar));

        harness.store.load_artwork_context("ab12").await;

        assert_eq!(
            harness.catalog.calls(),
            vec!["fetch_artwork:ab12", "similar:ab12"]
        );
        assert!(harness.store.current_artwork().is_none());
    }

    #[tokio::test]
    async fn test_artwork_without_artists_fails() {
        let harness = Harness::new();
        harness.catalog.artists.write().clear();

        let outcome = harness.store.load_artwork_context("ab12").await;

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(harness.store.status(), RequestStatus::Error);
        assert!(harness.store.current_artwork().is_none());
        assert_eq!(harness.catalog.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_artwork_fails() {
        let harness = Harness::new();
        let outcome = harness.store.load_artwork_context("missing").await;
        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(harness.catalog.calls(), vec!["fetch_artwork:missing"]);
    }

    #[tokio::test]
    async fn test_related_lists_are_capped() {
        let harness = Harness::new();
        let many: Vec<Artwork> = (0..25)
            .map(|i| Artwork::new(format!("s{}", i), format!("Similar {}", i)))
            .collect();
        harness.catalog.similar.write().insert("ab12".into(), many);

        harness.store.load_artwork_context("ab12").await;

        let current = harness.store.current_artwork().unwrap();
        assert_eq!(current.similar_artworks.len(), 10);
        assert_eq!(current.similar_artworks[0].id, "s0");
    }

    #[tokio::test]
    async fn test_second_load_replaces_bundle() {
        let harness = Harness::new();
        harness.store.load_artwork_context("ab12").await;

        harness
            .catalog
            .artworks
            .write()
            .insert("cd34".into(), Artwork::new("cd34", "Night"));
        harness
            .catalog
            .artists
            .write()
            .insert("cd34".into(), vec![Artist::new("art-5", "Someone")]);

        assert!(harness.store.load_artwork_context("cd34").await.is_success());
        let current = harness.store.current_artwork().unwrap();
        assert_eq!(current.id, "cd34");
        assert!(current.similar_artworks.is_empty());
    }
}
