use async_trait::async_trait;
use nblog::{
    accounts::AccountService,
    articles::ArticleService,
    config::AppConfig,
    error::StorageError,
    memory::{MemoryAccountRepository, MemoryArticleRepository, MemoryStore},
    models::{Account, CreateArticleRequest, LoginRequest, RegisterRequest, Role},
    repository::{AccountRepository, AccountRepositoryState, ArticleRepositoryState, Repository},
    token::TokenIssuer,
};
use axum::http::StatusCode;
use chrono::Utc;
use std::sync::Arc;

// --- Helpers ---

struct TestHarness {
    accounts: AccountService,
    articles: ArticleService,
    account_repo: Arc<MemoryAccountRepository>,
}

fn harness() -> TestHarness {
    let store = MemoryStore::new();
    let account_repo = Arc::new(MemoryAccountRepository::new(store.clone()));
    let article_repo =
        Arc::new(MemoryArticleRepository::new(store.clone())) as ArticleRepositoryState;
    let tokens = TokenIssuer::new(AppConfig::default().jwt);

    TestHarness {
        accounts: AccountService::new(account_repo.clone() as AccountRepositoryState, tokens),
        articles: ArticleService::new(article_repo),
        account_repo,
    }
}

fn register_request(user_name: &str, email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        user_name: user_name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

/// Repository double whose selected operations fail with a database-level
/// fault. Everything else delegates to the shared in-memory store, so the
/// non-failing parts of a flow still behave normally.
#[derive(Default)]
struct Faults {
    get_all: bool,
    assign_role: bool,
    roles_of: bool,
}

struct FaultyAccountRepository {
    inner: MemoryAccountRepository,
    faults: Faults,
}

fn storage_fault() -> StorageError {
    StorageError::Database(sqlx::Error::PoolClosed)
}

#[async_trait]
impl Repository<Account, i32> for FaultyAccountRepository {
    async fn get_all(&self) -> Result<Vec<Account>, StorageError> {
        if self.faults.get_all {
            return Err(storage_fault());
        }
        self.inner.get_all().await
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Account>, StorageError> {
        self.inner.get_by_id(id).await
    }

    async fn add(&self, account: &mut Account) -> Result<(), StorageError> {
        self.inner.add(account).await
    }

    async fn update(&self, account: &mut Account) -> Result<(), StorageError> {
        self.inner.update(account).await
    }

    async fn delete(&self, account: &Account) -> Result<(), StorageError> {
        self.inner.delete(account).await
    }
}

#[async_trait]
impl AccountRepository for FaultyAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StorageError> {
        self.inner.find_by_email(email).await
    }

    async fn roles_of(&self, account_id: i32) -> Result<Vec<Role>, StorageError> {
        if self.faults.roles_of {
            return Err(storage_fault());
        }
        self.inner.roles_of(account_id).await
    }

    async fn assign_role(&self, account_id: i32, role: Role) -> Result<(), StorageError> {
        if self.faults.assign_role {
            return Err(storage_fault());
        }
        self.inner.assign_role(account_id, role).await
    }

    async fn seed_roles(&self) -> Result<(), StorageError> {
        self.inner.seed_roles().await
    }
}

/// A service over the faulty double, plus a clean handle onto the same
/// store for inspecting what actually got persisted.
fn faulty_harness(faults: Faults) -> (AccountService, Arc<MemoryAccountRepository>) {
    let store = MemoryStore::new();
    let faulty = Arc::new(FaultyAccountRepository {
        inner: MemoryAccountRepository::new(store.clone()),
        faults,
    }) as AccountRepositoryState;
    let inspect = Arc::new(MemoryAccountRepository::new(store));

    (
        AccountService::new(faulty, TokenIssuer::new(AppConfig::default().jwt)),
        inspect,
    )
}

async fn register_ok(h: &TestHarness, user_name: &str, email: &str) -> i32 {
    let result = h
        .accounts
        .register(register_request(user_name, email, "Test@1234"))
        .await;
    assert_eq!(result.status(), StatusCode::CREATED);
    h.account_repo
        .find_by_email(email)
        .await
        .unwrap()
        .expect("registered account must be retrievable")
        .id
}

// --- Registration ---

#[tokio::test]
async fn register_rejects_invalid_data() {
    let h = harness();

    let cases = [
        ("", "", ""),
        ("test", "test@", "Test@1234"),
        ("test", "not-an-email", "Test@1234"),
        ("test", "test@email.com", "tiny"),
        ("ab", "test@email.com", "Test@1234"),
        ("", "test@email.com", "Test@1234"),
    ];

    for (user_name, email, password) in cases {
        let result = h
            .accounts
            .register(register_request(user_name, email, password))
            .await;
        assert!(!result.is_success(), "expected failure for {user_name:?}/{email:?}");
        assert_eq!(result.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let h = harness();
    register_ok(&h, "first", "dup@mail.com").await;

    // Same email, otherwise valid data.
    let result = h
        .accounts
        .register(register_request("second", "dup@mail.com", "Other@999"))
        .await;
    assert_eq!(result.status(), StatusCode::BAD_REQUEST);
    assert_eq!(result.error(), Some("Email already exists"));
}

#[tokio::test]
async fn register_creates_account_with_default_role() {
    let h = harness();
    let id = register_ok(&h, "alice", "alice@mail.com").await;

    let roles = h.account_repo.roles_of(id).await.unwrap();
    assert_eq!(roles, vec![Role::User]);

    let listing = h.accounts.get_all_accounts().await;
    assert_eq!(listing.status(), StatusCode::OK);
    let summaries = listing.value().unwrap();
    assert!(summaries.iter().any(|s| s.id == id && s.user_name == "alice"));
}

#[tokio::test]
async fn register_never_stores_plaintext_password() {
    let h = harness();
    let id = register_ok(&h, "alice", "alice@mail.com").await;

    let stored = h.account_repo.get_by_id(id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "Test@1234");
    assert!(stored.password_hash.starts_with("$argon2"));
}

// --- Login ---

#[tokio::test]
async fn login_unknown_email_is_not_found() {
    let h = harness();

    let result = h
        .accounts
        .login(LoginRequest {
            email: "ghost@mail.com".to_string(),
            password: "Test@1234".to_string(),
        })
        .await;
    assert_eq!(result.status(), StatusCode::NOT_FOUND);
    assert_eq!(result.error(), Some("User not found"));
}

#[tokio::test]
async fn login_wrong_password_is_bad_request() {
    let h = harness();
    register_ok(&h, "alice", "alice@mail.com").await;

    let result = h
        .accounts
        .login(LoginRequest {
            email: "alice@mail.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await;
    // Same status as malformed input, so the boundary cannot be used to
    // probe which emails exist with which passwords.
    assert_eq!(result.status(), StatusCode::BAD_REQUEST);
    assert_eq!(result.error(), Some("Invalid user credentials"));
}

#[tokio::test]
async fn login_invalid_payload_is_bad_request() {
    let h = harness();

    let result = h
        .accounts
        .login(LoginRequest {
            email: "not-an-email".to_string(),
            password: String::new(),
        })
        .await;
    assert_eq!(result.status(), StatusCode::BAD_REQUEST);
    // Both violations reported together.
    let error = result.error().unwrap();
    assert!(error.contains("Email is not valid"));
    assert!(error.contains("Password is required"));
}

#[tokio::test]
async fn login_issues_verifiable_token() {
    let h = harness();
    let id = register_ok(&h, "alice", "alice@mail.com").await;

    let before = Utc::now();
    let result = h
        .accounts
        .login(LoginRequest {
            email: "alice@mail.com".to_string(),
            password: "Test@1234".to_string(),
        })
        .await;
    assert_eq!(result.status(), StatusCode::OK);
    let token = result.value().unwrap();

    let settings = AppConfig::default().jwt;
    let ttl_minutes = settings.expiry_minutes;
    let issuer = TokenIssuer::new(settings);
    let claims = issuer.decode(token).expect("token must verify with the shared key");

    assert_eq!(claims.sub, id);
    assert_eq!(claims.email, "alice@mail.com");
    assert_eq!(claims.roles, "User");

    // Expiry is now + configured TTL, within clock-skew tolerance.
    let expected_exp = (before + chrono::Duration::minutes(ttl_minutes)).timestamp();
    let skew = (claims.exp as i64 - expected_exp).abs();
    assert!(skew <= 5, "expiry off by {skew}s");
}

#[tokio::test]
async fn tampered_token_fails_verification() {
    let h = harness();
    register_ok(&h, "alice", "alice@mail.com").await;

    let result = h
        .accounts
        .login(LoginRequest {
            email: "alice@mail.com".to_string(),
            password: "Test@1234".to_string(),
        })
        .await;
    let token = result.value().unwrap().clone();

    // Alter one claim byte.
    let mut parts: Vec<String> = token.split('.').map(String::from).collect();
    let mut payload = parts[1].clone().into_bytes();
    payload[0] = if payload[0] == b'x' { b'y' } else { b'x' };
    parts[1] = String::from_utf8(payload).unwrap();

    let issuer = TokenIssuer::new(AppConfig::default().jwt);
    assert!(issuer.decode(&parts.join(".")).is_err());
}

// --- Deletion ---

#[tokio::test]
async fn delete_unknown_account_is_not_found() {
    let h = harness();

    let result = h.accounts.delete_account(999).await;
    assert_eq!(result.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_account_cascades_to_articles() {
    let h = harness();
    let id = register_ok(&h, "alice", "alice@mail.com").await;

    let created = h
        .articles
        .create(CreateArticleRequest {
            title: "Borrow checker diaries".to_string(),
            sub_heading: "A field report".to_string(),
            content: "Day one.".to_string(),
            user_id: id,
        })
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let result = h.accounts.delete_account(id).await;
    assert_eq!(result.status(), StatusCode::NO_CONTENT);

    assert!(h.account_repo.get_by_id(id).await.unwrap().is_none());

    // The owned article went with the account, via the store's cascade.
    let listing = h
        .articles
        .get_all(nblog::models::ArticleFilter {
            search_key: "Borrow".to_string(),
        })
        .await;
    assert_eq!(listing.status(), StatusCode::OK);
    assert!(listing.value().unwrap().is_empty());
}

// --- Storage faults ---

#[tokio::test]
async fn register_surfaces_failed_role_assignment_as_server_error() {
    let (service, inspect) = faulty_harness(Faults {
        assign_role: true,
        ..Faults::default()
    });

    let result = service
        .register(register_request("alice", "alice@mail.com", "Test@1234"))
        .await;
    // Distinct from the 400 validation/creation failures: the account was
    // created, the role assignment was not.
    assert_eq!(result.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(result.error(), Some("A storage error occurred"));

    let account = inspect
        .find_by_email("alice@mail.com")
        .await
        .unwrap()
        .expect("account row must exist despite the failed assignment");
    assert!(inspect.roles_of(account.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn account_listing_storage_fault_is_server_error() {
    let (service, _) = faulty_harness(Faults {
        get_all: true,
        ..Faults::default()
    });

    let result = service.get_all_accounts().await;
    assert_eq!(result.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(result.error(), Some("Error occurred while fetching users"));
}

#[tokio::test]
async fn login_role_lookup_fault_is_server_error() {
    let (service, _) = faulty_harness(Faults {
        roles_of: true,
        ..Faults::default()
    });

    let result = service
        .register(register_request("alice", "alice@mail.com", "Test@1234"))
        .await;
    assert_eq!(result.status(), StatusCode::CREATED);

    // Credentials check out; the role lookup for the claim set does not.
    let result = service
        .login(LoginRequest {
            email: "alice@mail.com".to_string(),
            password: "Test@1234".to_string(),
        })
        .await;
    assert_eq!(result.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(result.error(), Some("Error occurred during user login"));
}
