use crate::{AppState, handlers::public};
use axum::{Router, routing::get};

/// Public Router Module
///
/// The reader-facing site. Nothing here needs a credential, and calls to the
/// content API are made without one. When the API is down, pages still render
/// with empty sections; only an unknown post slug yields a 404 page.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers. Never touches the content API.
        .route("/health", get(public::health_check))
        // GET /
        // Latest three posts and up to three featured books.
        .route("/", get(public::home))
        // GET /blog?category=...&page=...&q=...
        // Nine posts per page. `q` switches to the search endpoint.
        .route("/blog", get(public::blog))
        // GET /blog/{slug}
        // A single post plus related posts.
        .route("/blog/{slug}", get(public::blog_post))
        // GET /books?type=own|affiliate
        .route("/books", get(public::books))
        .route("/about", get(public::about))
}
