use axum::http::StatusCode;

use crate::{
    models::{Account, AccountSummary, LoginRequest, RegisterRequest, Role},
    password,
    repository::AccountRepositoryState,
    result::ServiceResult,
    token::TokenIssuer,
    validate,
};

/// AccountService
///
/// The credential and token service: registration, login, deletion, and
/// role assignment over the account repository. Every operation returns a
/// [`ServiceResult`]; no fault crosses this boundary unhandled.
#[derive(Clone)]
pub struct AccountService {
    accounts: AccountRepositoryState,
    tokens: TokenIssuer,
}

impl AccountService {
    pub fn new(accounts: AccountRepositoryState, tokens: TokenIssuer) -> Self {
        Self { accounts, tokens }
    }

    /// Lists every account, credential material excluded.
    pub async fn get_all_accounts(&self) -> ServiceResult<Vec<AccountSummary>> {
        match self.accounts.get_all().await {
            Ok(accounts) => ServiceResult::success(
                accounts
                    .into_iter()
                    .map(|a| AccountSummary {
                        id: a.id,
                        user_name: a.user_name,
                        email: a.email,
                    })
                    .collect(),
                StatusCode::OK,
            ),
            Err(e) => {
                tracing::error!("error fetching accounts: {e}");
                ServiceResult::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error occurred while fetching users",
                )
            }
        }
    }

    /// Registers a new account: validate, reject duplicate emails, hash the
    /// password, persist, then assign the default role.
    ///
    /// A failed role assignment is a partial-success state (the account
    /// exists without a role) and is surfaced as 500, distinct from the 400
    /// validation and creation failures.
    pub async fn register(&self, req: RegisterRequest) -> ServiceResult<()> {
        let errors = validate::register(&req);
        if !errors.is_empty() {
            return ServiceResult::failure_all(StatusCode::BAD_REQUEST, errors);
        }

        match self.accounts.find_by_email(&req.email).await {
            Ok(Some(_)) => {
                return ServiceResult::failure(StatusCode::BAD_REQUEST, "Email already exists");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("error occurred while registering user: {e}");
                return ServiceResult::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error occurred while registering user",
                );
            }
        }

        let password_hash = match password::hash(&req.password) {
            Ok(hash) => hash,
            Err(_) => {
                return ServiceResult::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error occurred while registering user",
                );
            }
        };

        let mut account = Account {
            id: 0,
            user_name: req.user_name,
            email: req.email,
            password_hash,
        };

        if let Err(e) = self.accounts.add(&mut account).await {
            return ServiceResult::failure(StatusCode::BAD_REQUEST, e.public_message());
        }

        if let Err(e) = self.accounts.assign_role(account.id, Role::User).await {
            tracing::error!(
                "account {} created but default role assignment failed: {e}",
                account.id
            );
            return ServiceResult::failure(StatusCode::INTERNAL_SERVER_ERROR, e.public_message());
        }

        ServiceResult::ok(StatusCode::CREATED)
    }

    /// Verifies credentials and issues a signed token carrying the
    /// account's role claims.
    ///
    /// A wrong password reports the same 400 as malformed input, so the
    /// boundary never distinguishes the two for a probing client.
    pub async fn login(&self, req: LoginRequest) -> ServiceResult<String> {
        let errors = validate::login(&req);
        if !errors.is_empty() {
            return ServiceResult::failure_all(StatusCode::BAD_REQUEST, errors);
        }

        let account = match self.accounts.find_by_email(&req.email).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                return ServiceResult::failure(StatusCode::NOT_FOUND, "User not found");
            }
            Err(e) => {
                tracing::error!("error occurred during user login: {e}");
                return ServiceResult::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error occurred during user login",
                );
            }
        };

        if !password::verify(&req.password, &account.password_hash) {
            return ServiceResult::failure(StatusCode::BAD_REQUEST, "Invalid user credentials");
        }

        let roles = match self.accounts.roles_of(account.id).await {
            Ok(roles) => roles,
            Err(e) => {
                tracing::error!("error loading roles for account {}: {e}", account.id);
                return ServiceResult::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error occurred during user login",
                );
            }
        };

        match self.tokens.issue(&account, &roles) {
            Ok(token) => ServiceResult::success(token, StatusCode::OK),
            Err(e) => {
                tracing::error!("token signing failed for account {}: {e}", account.id);
                ServiceResult::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error occurred during user login",
                )
            }
        }
    }

    /// Deletes an account by id. Owned articles go with it through the
    /// store's referential cascade.
    pub async fn delete_account(&self, id: i32) -> ServiceResult<()> {
        let account = match self.accounts.get_by_id(id).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                return ServiceResult::failure(StatusCode::NOT_FOUND, "User not found");
            }
            Err(e) => {
                tracing::error!("error occurred while deleting user {id}: {e}");
                return ServiceResult::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error occurred while deleting user",
                );
            }
        };

        match self.accounts.delete(&account).await {
            Ok(()) => ServiceResult::ok(StatusCode::NO_CONTENT),
            Err(e) => ServiceResult::failure(StatusCode::BAD_REQUEST, e.public_message()),
        }
    }
}
