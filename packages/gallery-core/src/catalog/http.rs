//! HTTP catalog client for the Artsy-style HAL+JSON API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{ArtistPage, ArtistQuery, ArtworkPage, ArtworkQuery, CatalogClient, XappToken};
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::model::{Artist, Artwork};
use crate::storage::TokenStore;

/// Header carrying the application token
pub const TOKEN_HEADER: &str = "X-Xapp-Token";

#[derive(Debug, Deserialize)]
struct HalArtworks {
    #[serde(rename = "_embedded", default)]
    embedded: EmbeddedArtworks,
}

#[derive(Debug, Default, Deserialize)]
struct EmbeddedArtworks {
    #[serde(default)]
    artworks: Vec<Artwork>,
}

#[derive(Debug, Deserialize)]
struct HalArtists {
    #[serde(rename = "_embedded", default)]
    embedded: EmbeddedArtists,
}

#[derive(Debug, Default, Deserialize)]
struct EmbeddedArtists {
    #[serde(default)]
    artists: Vec<Artist>,
}

/// Catalog client speaking HTTP
///
/// The bearer token is read from the shared [`TokenStore`] on every request,
/// so a renewal performed by the store is picked up immediately.
pub struct HttpCatalogClient {
    http: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpCatalogClient {
    /// Create a client from configuration
    pub fn new(config: &StoreConfig, tokens: Arc<dyn TokenStore>) -> Self {
        Self::with_client(Client::new(), config, tokens)
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_client(http: Client, config: &StoreConfig, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            base_url: config.catalog_base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            tokens,
        }
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/artworks/{id}` with the id as a single escaped path segment
    fn artwork_url(&self, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            Error::InvalidConfig(format!("catalog_base_url {:?}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                Error::InvalidConfig(format!("catalog_base_url {:?} cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .push("artworks")
            .push(id);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.get() {
            Ok(Some(token)) => request.header(TOKEN_HEADER, token),
            Ok(None) => request,
            Err(e) => {
                tracing::warn!("Could not read catalog token: {}", e);
                request
            }
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T> {
        let response = request.header("Accept", "application/json").send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_artwork(&self, id: &str) -> Result<Artwork> {
        let url = self.artwork_url(id)?;
        tracing::debug!("GET {}", url);
        let request = self.authorized(self.http.get(url.clone()));
        self.send_json(request, url.as_str()).await
    }

    async fn search(&self, query: &ArtworkQuery) -> Result<ArtworkPage> {
        let url = self.url("/artworks");
        tracing::debug!("GET {} {:?}", url, query);
        let request = self.authorized(self.http.get(&url).query(&query.to_pairs()));
        let page: HalArtworks = self.send_json(request, &url).await?;
        Ok(ArtworkPage {
            artworks: page.embedded.artworks,
        })
    }

    async fn search_artists(&self, query: &ArtistQuery) -> Result<ArtistPage> {
        let url = self.url("/artists");
        tracing::debug!("GET {} artwork_id={}", url, query.artwork_id);
        let request = self.authorized(
            self.http
                .get(&url)
                .query(&[("artwork_id", query.artwork_id.as_str())]),
        );
        let page: HalArtists = self.send_json(request, &url).await?;
        Ok(ArtistPage {
            artists: page.embedded.artists,
        })
    }

    async fn renew_token(&self) -> Result<XappToken> {
        let url = self.url("/tokens/xapp_token");
        tracing::debug!("POST {}", url);
        let request = self.http.post(&url).query(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ]);
        self.send_json(request, &url).await
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryTokenStore;
    use mockito::Matcher;

    fn client(base_url: &str, tokens: Arc<dyn TokenStore>) -> HttpCatalogClient {
        let config = StoreConfig {
            catalog_base_url: format!("{}/", base_url),
            client_id: "cid".into(),
            client_secret: "secret".into(),
            ..Default::default()
        };
        HttpCatalogClient::new(&config, tokens)
    }

    #[tokio::test]
    async fn test_fetch_artwork_sends_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/artworks/ab12")
            .match_header("x-xapp-token", "tok-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"ab12","title":"Study","category":"Drawing"}"#)
            .create_async()
            .await;

        let client = client(&server.url(), Arc::new(MemoryTokenStore::with_token("tok-1")));
        let artwork = client.fetch_artwork("ab12").await.unwrap();

        assert_eq!(artwork.id, "ab12");
        assert_eq!(artwork.title, "Study");
        assert_eq!(artwork.category.as_deref(), Some("Drawing"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_artwork_id_is_one_path_segment() {
        let mut server = mockito::Server::new_async().await;
        let truncated = server
            .mock("GET", Matcher::Regex(r"^/artworks/ab12($|\?)".into()))
            .expect(0)
            .create_async()
            .await;
        let escaped = server
            .mock("GET", "/artworks/ab12%3Fsize=1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"ab12?size=1","title":"Odd Id"}"#)
            .create_async()
            .await;
        let nested = server
            .mock("GET", "/artworks/a%2F..%2Fb%23c")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"a/../b#c","title":"Slashed"}"#)
            .create_async()
            .await;

        let client = client(&server.url(), Arc::new(MemoryTokenStore::new()));
        let artwork = client.fetch_artwork("ab12?size=1").await.unwrap();
        assert_eq!(artwork.title, "Odd Id");
        let artwork = client.fetch_artwork("a/../b#c").await.unwrap();
        assert_eq!(artwork.title, "Slashed");

        escaped.assert_async().await;
        nested.assert_async().await;
        truncated.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_fetch_failure() {
        let client = client("http://127.0.0.1:1", Arc::new(MemoryTokenStore::new()));
        let err = client.fetch_artwork("ab12").await.unwrap_err();
        assert!(matches!(err, Error::FetchFailed(_)));
    }

    #[tokio::test]
    async fn test_search_unwraps_embedded_artworks() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/artworks")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("similar_to_artwork_id".into(), "ab12".into()),
                Matcher::UrlEncoded("size".into(), "10".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"total_count":null,
                    "_links":{"next":{"href":"https://example.test/next"}},
                    "_embedded":{"artworks":[{"id":"s1","title":"One"},{"id":"s2","title":"Two"}]}}"#,
            )
            .create_async()
            .await;

        let client = client(&server.url(), Arc::new(MemoryTokenStore::new()));
        let page = client
            .search(&ArtworkQuery::similar_to("ab12", 10))
            .await
            .unwrap();

        let ids: Vec<&str> = page.artworks.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_artists() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/artists")
            .match_query(Matcher::UrlEncoded("artwork_id".into(), "ab12".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"_embedded":{"artists":[{"id":"art-5","name":"Someone"}]}}"#)
            .create_async()
            .await;

        let client = client(&server.url(), Arc::new(MemoryTokenStore::new()));
        let page = client
            .search_artists(&ArtistQuery::for_artwork("ab12"))
            .await
            .unwrap();

        assert_eq!(page.artists.len(), 1);
        assert_eq!(page.artists[0].name.as_deref(), Some("Someone"));
    }

    #[tokio::test]
    async fn test_missing_embedded_is_empty_page() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/artworks")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = client(&server.url(), Arc::new(MemoryTokenStore::new()));
        let page = client.search(&ArtworkQuery::by_artist("x", 10)).await.unwrap();
        assert!(page.artworks.is_empty());
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/artworks/missing")
            .with_status(404)
            .with_body(r#"{"type":"error","message":"Artwork Not Found"}"#)
            .create_async()
            .await;

        let client = client(&server.url(), Arc::new(MemoryTokenStore::new()));
        let err = client.fetch_artwork("missing").await.unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_bad_json_is_deserialization_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/artworks/ab12")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let client = client(&server.url(), Arc::new(MemoryTokenStore::new()));
        let err = client.fetch_artwork("ab12").await.unwrap_err();
        assert!(matches!(err, Error::DeserializationError(_)));
    }

    #[tokio::test]
    async fn test_renew_token_posts_credentials() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/tokens/xapp_token")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("client_id".into(), "cid".into()),
                Matcher::UrlEncoded("client_secret".into(), "secret".into()),
            ]))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"type":"xapp_token","token":"fresh","expires_at":"2030-01-01T00:00:00Z"}"#,
            )
            .create_async()
            .await;

        let client = client(&server.url(), Arc::new(MemoryTokenStore::new()));
        let token = client.renew_token().await.unwrap();

        assert_eq!(token.token, "fresh");
        assert_eq!(token.expires_at.as_deref(), Some("2030-01-01T00:00:00Z"));
        mock.assert_async().await;
    }
}
