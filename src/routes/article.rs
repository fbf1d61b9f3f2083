use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Article Router Module
///
/// Article CRUD endpoints. Ownership enforcement for updates happens in the
/// service after the stored article is loaded, not in this layer.
pub fn article_routes() -> Router<AppState> {
    Router::new()
        // GET /article/all?searchKey=...
        // Filtered listing; the search key is required and matched against
        // titles and sub-headings.
        .route("/article/all", get(handlers::get_all_articles))
        // GET /article/{id}
        .route("/article/{id}", get(handlers::get_article))
        // POST /article/create
        .route("/article/create", post(handlers::create_article))
        // PUT /article/update
        .route("/article/update", put(handlers::update_article))
}
