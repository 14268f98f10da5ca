//! # Browse Demo
//!
//! Walks the store through a browsing session:
//! 1. Renew the catalog session token
//! 2. Load an artwork with its similar works and artists
//! 3. Sign up, favorite the artwork, sign out, and sign back in
//!
//! Catalog credentials come from `GALLERY_CLIENT_ID` / `GALLERY_CLIENT_SECRET`.
//! Without them the catalog steps report an error status and the identity
//! steps still run.
//!
//! ## Run
//!
//! ```bash
//! RUST_LOG=gallery_core=debug cargo run --example browse_demo -- 4d8b92eb4eb68a1b2c000968
//! ```

use gallery_core::{Artwork, Store, StoreConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_ARTWORK: &str = "4d8b92eb4eb68a1b2c000968";

#[tokio::main]
async fn main() -> gallery_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("=================================================");
    println!("            GALLERY CORE BROWSE DEMO");
    println!("=================================================\n");

    let artwork_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ARTWORK.to_string());

    let config = StoreConfig::from_env()?;
    println!("Catalog: {}", config.catalog_base_url);
    let store = Store::open(config)?;
    store.watch_identity();

    // =========================================================================
    // STEP 1: Catalog session
    // =========================================================================
    println!("\n1. Renewing catalog session...\n");

    let outcome = store.renew_session().await;
    println!("   Outcome:   {:?}", outcome);
    println!("   Status:    {}", store.status());
    println!("   Logged in: {}", store.is_logged_in());

    // =========================================================================
    // STEP 2: Artwork context
    // =========================================================================
    println!("\n2. Loading artwork {}...\n", artwork_id);

    store.load_artwork_context(&artwork_id).await;
    println!("   Status: {}", store.status());
    match store.current_artwork() {
        Some(current) => {
            println!("   Title:    {}", current.title);
            println!("   Medium:   {}", current.medium.as_deref().unwrap_or("-"));
            println!("   Similar:  {}", current.similar_artworks.len());
            for artist in &current.related_artists {
                println!("   Artist:   {}", artist.name.as_deref().unwrap_or(&artist.id));
            }
            println!("   By artist: {}", current.artist_other_artworks.len());
        }
        None => println!("   (no artwork loaded)"),
    }

    // =========================================================================
    // STEP 3: Favorites round trip
    // =========================================================================
    println!("\n3. Signing up and favoriting...\n");

    store.sign_up("demo@example.com", "demo-password").await;
    if let Some(error) = store.last_error() {
        println!("   Sign-up error: {}", error);
    }
    println!("   Signed in: {}", store.is_user_logged_in());

    let favorite = match store.current_artwork() {
        Some(current) => Artwork::new(current.id, current.title),
        None => Artwork::new(artwork_id.clone(), "Untitled"),
    };
    store.add_favorite(favorite);
    store.drain_background().await;
    println!("   Favorites: {}", store.favorited_artworks().len());

    store.sign_out().await;
    println!("   After sign-out: {} favorites", store.favorited_artworks().len());

    store.sign_in("demo@example.com", "demo-password").await;
    println!("   After sign-in:  {} favorites", store.favorited_artworks().len());
    for artwork in store.favorited_artworks() {
        println!("     - {} ({})", artwork.title, artwork.id);
    }

    println!("\n=================================================");
    println!("   Final status: {}", store.status());
    println!("=================================================");
    Ok(())
}
