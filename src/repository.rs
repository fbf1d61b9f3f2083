use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    audit::{self, EntityState},
    error::StorageError,
    models::{Account, Article, ArticleDetail, ArticleSummary, Role},
};

/// Repository
///
/// The generic data-access contract, parameterized over an entity kind `T`
/// and key type `K` and shared by every entity in the system. Implementations
/// sit on a single transactional store handle; there is no runtime type
/// inspection anywhere.
///
/// All operations propagate a typed [`StorageError`] (logged at the point of
/// occurrence); callers decide what a fault means. Absent rows from
/// `get_by_id` are a valid `Ok(None)`, not an error.
///
/// Each logical request must run on its own unit of work; the trait is not
/// meant for concurrent mutation of one shared transaction.
#[async_trait]
pub trait Repository<T, K>: Send + Sync {
    /// Materialized, ordered listing of every entity.
    async fn get_all(&self) -> Result<Vec<T>, StorageError>;
    async fn get_by_id(&self, id: K) -> Result<Option<T>, StorageError>;
    /// Inserts the entity; its key is populated as a side effect, and for
    /// auditable entities the creation timestamp is stamped pre-commit.
    async fn add(&self, entity: &mut T) -> Result<(), StorageError>;
    /// Persists a modification; auditable entities get their update
    /// timestamp stamped pre-commit.
    async fn update(&self, entity: &mut T) -> Result<(), StorageError>;
    async fn delete(&self, entity: &T) -> Result<(), StorageError>;
}

/// AccountRepository
///
/// Account-specific operations on top of the generic contract: credential
/// lookup by email and the role-assignment table.
#[async_trait]
pub trait AccountRepository: Repository<Account, i32> {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StorageError>;
    async fn roles_of(&self, account_id: i32) -> Result<Vec<Role>, StorageError>;
    async fn assign_role(&self, account_id: i32, role: Role) -> Result<(), StorageError>;
    /// Idempotent seeding of the fixed role rows. Called once at startup;
    /// the role set is immutable afterwards.
    async fn seed_roles(&self) -> Result<(), StorageError>;
}

/// ArticleRepository
///
/// Article-specific queries: filtered listing and the enriched detail view,
/// both joined with the owning account for the author name.
#[async_trait]
pub trait ArticleRepository: Repository<Article, i32> {
    /// Articles whose title or sub-heading contains `key`
    /// (case-insensitive), newest first with the id as a stable tiebreak.
    async fn search(&self, key: &str) -> Result<Vec<ArticleSummary>, StorageError>;
    async fn find_detail(&self, id: i32) -> Result<Option<ArticleDetail>, StorageError>;
}

/// Shared trait-object handles carried in the application state.
pub type AccountRepositoryState = Arc<dyn AccountRepository>;
pub type ArticleRepositoryState = Arc<dyn ArticleRepository>;

// --- PostgreSQL Implementations ---

/// PgAccountRepository
///
/// Accounts over the `accounts`, `roles`, and `account_roles` tables.
/// Deleting an account cascades to its articles through the foreign key's
/// referential action, not application logic.
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Account, i32> for PgAccountRepository {
    async fn get_all(&self) -> Result<Vec<Account>, StorageError> {
        sqlx::query_as::<_, Account>(
            "SELECT id, user_name, email, password_hash FROM accounts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("get_all accounts error: {:?}", e);
            StorageError::from(e)
        })
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Account>, StorageError> {
        sqlx::query_as::<_, Account>(
            "SELECT id, user_name, email, password_hash FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("get account {id} error: {:?}", e);
            StorageError::from(e)
        })
    }

    async fn add(&self, account: &mut Account) -> Result<(), StorageError> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO accounts (user_name, email, password_hash) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&account.user_name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("add account error: {:?}", e);
            if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                StorageError::Rejected("Email already exists".to_string())
            } else {
                StorageError::from(e)
            }
        })?;

        account.id = id;
        Ok(())
    }

    async fn update(&self, account: &mut Account) -> Result<(), StorageError> {
        sqlx::query(
            "UPDATE accounts SET user_name = $2, email = $3, password_hash = $4 WHERE id = $1",
        )
        .bind(account.id)
        .bind(&account.user_name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("update account {} error: {:?}", account.id, e);
            StorageError::from(e)
        })?;
        Ok(())
    }

    async fn delete(&self, account: &Account) -> Result<(), StorageError> {
        // Owned articles and role assignments go with the account via
        // ON DELETE CASCADE on their foreign keys.
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("delete account {} error: {:?}", account.id, e);
                StorageError::from(e)
            })?;
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StorageError> {
        sqlx::query_as::<_, Account>(
            "SELECT id, user_name, email, password_hash FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("find account by email error: {:?}", e);
            StorageError::from(e)
        })
    }

    async fn roles_of(&self, account_id: i32) -> Result<Vec<Role>, StorageError> {
        let ids: Vec<i32> = sqlx::query_scalar(
            "SELECT role_id FROM account_roles WHERE account_id = $1 ORDER BY role_id",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("roles_of {account_id} error: {:?}", e);
            StorageError::from(e)
        })?;

        Ok(ids.into_iter().filter_map(Role::from_id).collect())
    }

    async fn assign_role(&self, account_id: i32, role: Role) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO account_roles (account_id, role_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(account_id)
        .bind(role.id())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("assign role {:?} to {account_id} error: {:?}", role, e);
            StorageError::from(e)
        })?;
        Ok(())
    }

    async fn seed_roles(&self) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO roles (role_id, name) VALUES ($1, $2), ($3, $4) \
             ON CONFLICT (role_id) DO NOTHING",
        )
        .bind(Role::Admin.id())
        .bind(Role::Admin.name())
        .bind(Role::User.id())
        .bind(Role::User.name())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("seed roles error: {:?}", e);
            StorageError::from(e)
        })?;
        Ok(())
    }
}

/// PgArticleRepository
///
/// Articles over the `articles` table. Every write runs in its own
/// transaction and invokes the audit hook on the tracked entity before the
/// commit, so a failed commit never persists a stamped timestamp.
pub struct PgArticleRepository {
    pool: PgPool,
}

impl PgArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ARTICLE_COLUMNS: &str =
    "article_id, title, sub_heading, content, user_id, created_at, updated_at";

/// LIKE metacharacters in a search key must match literally, never as
/// wildcards. Backslash is the default escape character in Postgres.
fn escape_like(key: &str) -> String {
    key.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl Repository<Article, i32> for PgArticleRepository {
    async fn get_all(&self) -> Result<Vec<Article>, StorageError> {
        sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY created_at DESC, article_id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("get_all articles error: {:?}", e);
            StorageError::from(e)
        })
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Article>, StorageError> {
        sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE article_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("get article {id} error: {:?}", e);
            StorageError::from(e)
        })
    }

    async fn add(&self, article: &mut Article) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        // Pre-commit audit stamp: created_at is the commit time, any
        // caller-supplied value is overwritten, updated_at is cleared.
        audit::stamp(EntityState::Added, article);

        let id: i32 = sqlx::query_scalar(
            "INSERT INTO articles (title, sub_heading, content, user_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING article_id",
        )
        .bind(&article.title)
        .bind(&article.sub_heading)
        .bind(&article.content)
        .bind(article.user_id)
        .bind(article.created_at)
        .bind(article.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("add article error: {:?}", e);
            StorageError::from(e)
        })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("commit add article error: {:?}", e);
            StorageError::from(e)
        })?;

        article.article_id = id;
        Ok(())
    }

    async fn update(&self, article: &mut Article) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        // Pre-commit audit stamp: updated_at becomes the commit time.
        audit::stamp(EntityState::Modified, article);

        sqlx::query(
            "UPDATE articles SET title = $2, sub_heading = $3, content = $4, updated_at = $5 \
             WHERE article_id = $1",
        )
        .bind(article.article_id)
        .bind(&article.title)
        .bind(&article.sub_heading)
        .bind(&article.content)
        .bind(article.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("update article {} error: {:?}", article.article_id, e);
            StorageError::from(e)
        })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("commit update article error: {:?}", e);
            StorageError::from(e)
        })?;
        Ok(())
    }

    async fn delete(&self, article: &Article) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM articles WHERE article_id = $1")
            .bind(article.article_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("delete article {} error: {:?}", article.article_id, e);
                StorageError::from(e)
            })?;
        Ok(())
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    async fn search(&self, key: &str) -> Result<Vec<ArticleSummary>, StorageError> {
        let pattern = format!("%{}%", escape_like(key));
        sqlx::query_as::<_, ArticleSummary>(
            "SELECT a.article_id, a.title, a.sub_heading, ac.user_name AS author_name, \
                    a.created_at, a.updated_at \
             FROM articles a \
             JOIN accounts ac ON a.user_id = ac.id \
             WHERE a.title ILIKE $1 OR a.sub_heading ILIKE $1 \
             ORDER BY a.created_at DESC, a.article_id DESC",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("search articles error: {:?}", e);
            StorageError::from(e)
        })
    }

    async fn find_detail(&self, id: i32) -> Result<Option<ArticleDetail>, StorageError> {
        sqlx::query_as::<_, ArticleDetail>(
            "SELECT a.article_id, a.title, a.sub_heading, a.content, \
                    ac.user_name AS author_name, a.created_at, a.updated_at \
             FROM articles a \
             JOIN accounts ac ON a.user_id = ac.id \
             WHERE a.article_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("article detail {id} error: {:?}", e);
            StorageError::from(e)
        })
    }
}
