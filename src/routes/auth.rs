use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Auth Router Module
///
/// Account lifecycle endpoints. Registration and login are necessarily
/// unauthenticated; listing and deletion share the same surface.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        // GET /auth/all
        // Lists every registered account (id, username, email only).
        .route("/auth/all", get(handlers::get_all_accounts))
        // POST /auth/register
        // Creates an account; the default User role is assigned as part of
        // the same operation.
        .route("/auth/register", post(handlers::register))
        // POST /auth/login
        // Verifies credentials and returns a signed bearer token.
        .route("/auth/login", post(handlers::login))
        // DELETE /auth/delete/{id}
        // Removes an account by id; owned articles cascade away in the store.
        .route("/auth/delete/{id}", delete(handlers::delete_account))
}
