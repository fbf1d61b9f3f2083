//! Declarative rule sets for the request payloads.
//!
//! Each DTO has one independently testable function. Rules are evaluated in
//! full, never short-circuited, so a caller gets every violation in one
//! response. Validators never fail themselves; they only return messages.

use crate::models::{
    ArticleFilter, CreateArticleRequest, LoginRequest, RegisterRequest, UpdateArticleRequest,
};

/// Minimal RFC-shape check: exactly one `@`, non-empty local part and
/// domain, no whitespace. Deliverability is not this layer's problem.
fn is_email_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => !local.is_empty() && !domain.is_empty(),
        _ => false,
    }
}

/// Registration rules: username 3–50 chars, RFC-shaped email, password of
/// at least 6 characters.
pub fn register(req: &RegisterRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if req.user_name.is_empty() {
        errors.push("Username is required".to_string());
    } else if req.user_name.chars().count() < 3 {
        errors.push("Username must be at least 3 characters".to_string());
    } else if req.user_name.chars().count() > 50 {
        errors.push("Username must not exceed 50 characters".to_string());
    }

    if req.email.is_empty() {
        errors.push("Email is required".to_string());
    } else if !is_email_shaped(&req.email) {
        errors.push("Email is not valid".to_string());
    }

    if req.password.is_empty() {
        errors.push("Password is required".to_string());
    } else if req.password.chars().count() < 6 {
        errors.push("Password must be at least 6 characters".to_string());
    }

    errors
}

/// Login rules: RFC-shaped email and a non-empty password.
pub fn login(req: &LoginRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if req.email.is_empty() {
        errors.push("Email is required".to_string());
    } else if !is_email_shaped(&req.email) {
        errors.push("Email is not valid".to_string());
    }

    if req.password.is_empty() {
        errors.push("Password is required".to_string());
    }

    errors
}

/// Listing filter rules: the search key may not be empty.
pub fn article_filter(filter: &ArticleFilter) -> Vec<String> {
    let mut errors = Vec::new();
    if filter.search_key.is_empty() {
        errors.push("Search key is required".to_string());
    }
    errors
}

/// Creation rules. The title bound here (200) is intentionally looser than
/// the update bound (100).
pub fn create_article(req: &CreateArticleRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if req.title.is_empty() {
        errors.push("Title is required".to_string());
    } else if req.title.chars().count() > 200 {
        errors.push("Title cannot exceed 200 characters".to_string());
    }

    if req.sub_heading.is_empty() {
        errors.push("SubHeading is required".to_string());
    } else if req.sub_heading.chars().count() > 500 {
        errors.push("SubHeading cannot exceed 500 characters".to_string());
    }

    if req.content.is_empty() {
        errors.push("Content is required".to_string());
    }

    if req.user_id <= 0 {
        errors.push("UserId must be greater than 0".to_string());
    }

    errors
}

/// Update rules. Ownership (stored owner vs supplied owner) is not a rule
/// here; the service checks it after loading the article.
pub fn update_article(req: &UpdateArticleRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if req.article_id <= 0 {
        errors.push("Article ID must be greater than 0".to_string());
    }

    if req.title.is_empty() {
        errors.push("Title is required".to_string());
    } else if req.title.chars().count() > 100 {
        errors.push("Title cannot exceed 100 characters".to_string());
    }

    if req.sub_heading.is_empty() {
        errors.push("SubHeading is required".to_string());
    } else if req.sub_heading.chars().count() > 200 {
        errors.push("SubHeading cannot exceed 200 characters".to_string());
    }

    if req.content.is_empty() {
        errors.push("Content is required".to_string());
    }

    if req.user_id <= 0 {
        errors.push("User ID must be greater than 0".to_string());
    }

    errors
}

/// Standalone id rule used by the detail lookup.
pub fn article_id(id: i32) -> Vec<String> {
    let mut errors = Vec::new();
    if id <= 0 {
        errors.push("Article ID must be greater than 0".to_string());
    }
    errors
}
