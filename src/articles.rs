use axum::http::StatusCode;

use crate::{
    models::{Article, ArticleDetail, ArticleFilter, ArticleSummary, CreateArticleRequest,
             UpdateArticleRequest},
    repository::ArticleRepositoryState,
    result::ServiceResult,
    validate,
};

/// ArticleService
///
/// Article CRUD over the article repository. Validation runs first on every
/// operation; the ownership check on update is domain logic, applied after
/// the stored article is loaded. Timestamps are never set here; the audit
/// hook in the repository write path owns them.
#[derive(Clone)]
pub struct ArticleService {
    articles: ArticleRepositoryState,
}

impl ArticleService {
    pub fn new(articles: ArticleRepositoryState) -> Self {
        Self { articles }
    }

    /// Lists articles whose title or sub-heading contains the search key.
    pub async fn get_all(&self, filter: ArticleFilter) -> ServiceResult<Vec<ArticleSummary>> {
        let errors = validate::article_filter(&filter);
        if !errors.is_empty() {
            return ServiceResult::failure_all(StatusCode::BAD_REQUEST, errors);
        }

        match self.articles.search(&filter.search_key).await {
            Ok(articles) => ServiceResult::success(articles, StatusCode::OK),
            Err(e) => {
                tracing::error!("error occurred while fetching articles: {e}");
                ServiceResult::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error occurred while fetching articles",
                )
            }
        }
    }

    /// Fetches the full article view by id.
    pub async fn get_article(&self, id: i32) -> ServiceResult<ArticleDetail> {
        let errors = validate::article_id(id);
        if !errors.is_empty() {
            return ServiceResult::failure_all(StatusCode::BAD_REQUEST, errors);
        }

        match self.articles.find_detail(id).await {
            Ok(Some(detail)) => ServiceResult::success(detail, StatusCode::OK),
            Ok(None) => ServiceResult::failure(StatusCode::NOT_FOUND, "Article not found"),
            Err(e) => {
                tracing::error!("error occurred while fetching article {id}: {e}");
                ServiceResult::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error occurred while fetching article",
                )
            }
        }
    }

    /// Creates a new article for the supplied owner. The creation timestamp
    /// comes from the audit hook at commit time; anything the caller put in
    /// the payload is irrelevant because the payload carries no timestamps
    /// at all.
    pub async fn create(&self, req: CreateArticleRequest) -> ServiceResult<()> {
        let errors = validate::create_article(&req);
        if !errors.is_empty() {
            return ServiceResult::failure_all(StatusCode::BAD_REQUEST, errors);
        }

        let mut article = Article {
            title: req.title,
            sub_heading: req.sub_heading,
            content: req.content,
            user_id: req.user_id,
            ..Article::default()
        };

        match self.articles.add(&mut article).await {
            Ok(()) => ServiceResult::ok(StatusCode::CREATED),
            Err(e) => {
                tracing::error!("error occurred while creating article: {e}");
                ServiceResult::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error occurred while creating article",
                )
            }
        }
    }

    /// Updates an article, owner-only. The supplied owner id must equal the
    /// stored one; a mismatch is 403, a missing article 404. Returns the
    /// updated article with its freshly stamped `updated_at`.
    pub async fn update(&self, req: UpdateArticleRequest) -> ServiceResult<Article> {
        let errors = validate::update_article(&req);
        if !errors.is_empty() {
            return ServiceResult::failure_all(StatusCode::BAD_REQUEST, errors);
        }

        let mut article = match self.articles.get_by_id(req.article_id).await {
            Ok(Some(article)) => article,
            Ok(None) => {
                return ServiceResult::failure(StatusCode::NOT_FOUND, "Article not found");
            }
            Err(e) => {
                tracing::error!("error occurred while updating article {}: {e}", req.article_id);
                return ServiceResult::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error occurred while updating article",
                );
            }
        };

        if article.user_id != req.user_id {
            return ServiceResult::failure(
                StatusCode::FORBIDDEN,
                "Only the article owner can modify it",
            );
        }

        article.title = req.title;
        article.sub_heading = req.sub_heading;
        article.content = req.content;

        match self.articles.update(&mut article).await {
            Ok(()) => ServiceResult::success(article, StatusCode::OK),
            Err(e) => {
                tracing::error!("error occurred while updating article {}: {e}", req.article_id);
                ServiceResult::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error occurred while updating article",
                )
            }
        }
    }
}
