// Routing segregation: credential/account endpoints vs article endpoints.
pub mod article;
pub mod auth;
