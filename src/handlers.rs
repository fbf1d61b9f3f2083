use crate::{
    AppState,
    models::{
        Article, ArticleDetail, ArticleFilter, ArticleSummary, AccountSummary,
        CreateArticleRequest, LoginRequest, RegisterRequest, UpdateArticleRequest,
    },
    result::ServiceResult,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};

// Thin boundary layer: each handler deserializes the transport payload,
// delegates to the owning service, and lets the ServiceResult envelope
// translate itself into the response.

/// GET /auth/all: lists every registered account.
pub async fn get_all_accounts(State(state): State<AppState>) -> ServiceResult<Vec<AccountSummary>> {
    state.accounts.get_all_accounts().await
}

/// POST /auth/register: creates an account with the default role.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ServiceResult<()> {
    state.accounts.register(req).await
}

/// POST /auth/login: verifies credentials and returns a signed token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ServiceResult<String> {
    state.accounts.login(req).await
}

/// DELETE /auth/delete/{id}: removes an account and, via the storage
/// layer's cascade, its articles.
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ServiceResult<()> {
    state.accounts.delete_account(id).await
}

/// GET /article/all?searchKey=: filtered article listing.
pub async fn get_all_articles(
    State(state): State<AppState>,
    Query(filter): Query<ArticleFilter>,
) -> ServiceResult<Vec<ArticleSummary>> {
    state.articles.get_all(filter).await
}

/// GET /article/{id}: full article detail.
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ServiceResult<ArticleDetail> {
    state.articles.get_article(id).await
}

/// POST /article/create: creates an article for the supplied owner.
pub async fn create_article(
    State(state): State<AppState>,
    Json(req): Json<CreateArticleRequest>,
) -> ServiceResult<()> {
    state.articles.create(req).await
}

/// PUT /article/update: owner-only modification; returns the updated row.
pub async fn update_article(
    State(state): State<AppState>,
    Json(req): Json<UpdateArticleRequest>,
) -> ServiceResult<Article> {
    state.articles.update(req).await
}
