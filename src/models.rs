use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// --- Core Application Schemas (Mapped to Database) ---

/// Role
///
/// Coarse permission tag with a stable numeric identity. The two variants are
/// seeded into the `roles` table once at startup and never change; accounts
/// reference them through the `account_roles` join table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// The numeric identity persisted in the `roles` table.
    pub fn id(self) -> i32 {
        match self {
            Role::Admin => 1,
            Role::User => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }

    pub fn from_id(id: i32) -> Option<Role> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::User),
            _ => None,
        }
    }
}

/// Account
///
/// A registered user stored in the `accounts` table. Owned articles and
/// assigned roles are relational (fetched through the repository), keeping
/// this struct a flat row image.
///
/// The password is held only as an argon2 PHC hash and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Account {
    // Identity column, populated by the repository on insert.
    pub id: i32,
    pub user_name: String,
    // Unique at write time.
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Article
///
/// A blog article from the `articles` table. `created_at` and `updated_at`
/// are owned by the audit hook: domain code never writes them, and
/// `updated_at` stays `None` until the first modification.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Article {
    pub article_id: i32,
    pub title: String,
    pub sub_heading: String,
    pub content: String,
    // FK to accounts.id (owner); deleting the account cascades here.
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Input payload for POST /auth/register. The password only ever reaches the
/// hashing module; it is never persisted or logged in clear text.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegisterRequest {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// LoginRequest
///
/// Input payload for POST /auth/login.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// ArticleFilter
///
/// Query parameters for GET /article/all. The search key is required and
/// matched against titles and sub-headings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArticleFilter {
    #[serde(rename = "searchKey", default)]
    pub search_key: String,
}

/// CreateArticleRequest
///
/// Input payload for POST /article/create. The owner is supplied explicitly;
/// timestamps are not accepted from the caller (the audit hook owns them).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateArticleRequest {
    pub title: String,
    pub sub_heading: String,
    pub content: String,
    pub user_id: i32,
}

/// UpdateArticleRequest
///
/// Input payload for PUT /article/update. `user_id` must match the stored
/// owner; the check happens in the service after the article is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateArticleRequest {
    pub article_id: i32,
    pub title: String,
    pub sub_heading: String,
    pub content: String,
    pub user_id: i32,
}

// --- Response Schemas (Output) ---

/// AccountSummary
///
/// Output schema for GET /auth/all. Credential material is deliberately
/// absent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct AccountSummary {
    pub id: i32,
    pub user_name: String,
    pub email: String,
}

/// ArticleSummary
///
/// Listing row for GET /article/all, enriched with the author's username
/// via a join in the repository.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct ArticleSummary {
    pub article_id: i32,
    pub title: String,
    pub sub_heading: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// ArticleDetail
///
/// Full article view for GET /article/{id}, including the body content.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct ArticleDetail {
    pub article_id: i32,
    pub title: String,
    pub sub_heading: String,
    pub content: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ids_are_stable() {
        assert_eq!(Role::Admin.id(), 1);
        assert_eq!(Role::User.id(), 2);
        assert_eq!(Role::from_id(2), Some(Role::User));
        assert_eq!(Role::from_id(9), None);
    }

    #[test]
    fn account_never_serializes_password_hash() {
        let account = Account {
            id: 1,
            user_name: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$secret".into(),
        };
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn article_filter_binds_search_key_param() {
        let filter: ArticleFilter = serde_json::from_str(r#"{"searchKey":"rust"}"#).unwrap();
        assert_eq!(filter.search_key, "rust");
    }
}
