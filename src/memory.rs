use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    audit::{self, EntityState},
    error::StorageError,
    models::{Account, Article, ArticleDetail, ArticleSummary, Role},
    repository::{AccountRepository, ArticleRepository, Repository},
};

/// MemoryStore
///
/// In-memory counterpart of the PostgreSQL store, used by the test suite so
/// services can be exercised without a database. It implements the same
/// repository traits with the same semantics: the audit hook runs on every
/// write before the change lands in the maps, email uniqueness is enforced,
/// and deleting an account cascades to its articles and role assignments
/// the way the real foreign keys would.
///
/// The mutex is the unit-of-work boundary: each operation takes the lock,
/// applies its change atomically, and releases it.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    accounts: BTreeMap<i32, Account>,
    articles: BTreeMap<i32, Article>,
    account_roles: HashMap<i32, BTreeSet<i32>>,
    next_account_id: i32,
    next_article_id: i32,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock means a test already panicked; propagating the
        // panic keeps the failure local to that test.
        self.inner.lock().expect("memory store lock poisoned")
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Newest first, article id as the stable tiebreak, the same order the
/// SQL queries produce.
fn by_recency(a: &Article, b: &Article) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then(b.article_id.cmp(&a.article_id))
}

/// MemoryAccountRepository
pub struct MemoryAccountRepository {
    store: Arc<MemoryStore>,
}

impl MemoryAccountRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Repository<Account, i32> for MemoryAccountRepository {
    async fn get_all(&self) -> Result<Vec<Account>, StorageError> {
        Ok(self.store.lock().accounts.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Account>, StorageError> {
        Ok(self.store.lock().accounts.get(&id).cloned())
    }

    async fn add(&self, account: &mut Account) -> Result<(), StorageError> {
        let mut inner = self.store.lock();

        if inner.accounts.values().any(|a| a.email == account.email) {
            return Err(StorageError::Rejected("Email already exists".to_string()));
        }

        inner.next_account_id += 1;
        account.id = inner.next_account_id;
        inner.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn update(&self, account: &mut Account) -> Result<(), StorageError> {
        self.store
            .lock()
            .accounts
            .insert(account.id, account.clone());
        Ok(())
    }

    async fn delete(&self, account: &Account) -> Result<(), StorageError> {
        let mut inner = self.store.lock();
        inner.accounts.remove(&account.id);
        // Emulates the ON DELETE CASCADE referential actions.
        inner.articles.retain(|_, a| a.user_id != account.id);
        inner.account_roles.remove(&account.id);
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StorageError> {
        Ok(self
            .store
            .lock()
            .accounts
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn roles_of(&self, account_id: i32) -> Result<Vec<Role>, StorageError> {
        Ok(self
            .store
            .lock()
            .account_roles
            .get(&account_id)
            .map(|ids| ids.iter().copied().filter_map(Role::from_id).collect())
            .unwrap_or_default())
    }

    async fn assign_role(&self, account_id: i32, role: Role) -> Result<(), StorageError> {
        self.store
            .lock()
            .account_roles
            .entry(account_id)
            .or_default()
            .insert(role.id());
        Ok(())
    }

    async fn seed_roles(&self) -> Result<(), StorageError> {
        // The role set lives in the Role enum itself; nothing to persist.
        Ok(())
    }
}

/// MemoryArticleRepository
pub struct MemoryArticleRepository {
    store: Arc<MemoryStore>,
}

impl MemoryArticleRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Repository<Article, i32> for MemoryArticleRepository {
    async fn get_all(&self) -> Result<Vec<Article>, StorageError> {
        let mut articles: Vec<Article> = self.store.lock().articles.values().cloned().collect();
        articles.sort_by(by_recency);
        Ok(articles)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Article>, StorageError> {
        Ok(self.store.lock().articles.get(&id).cloned())
    }

    async fn add(&self, article: &mut Article) -> Result<(), StorageError> {
        let mut inner = self.store.lock();

        if !inner.accounts.contains_key(&article.user_id) {
            return Err(StorageError::Rejected("Owner account does not exist".to_string()));
        }

        // Same pre-commit hook ordering as the SQL path: stamp, then make
        // the change durable.
        audit::stamp(EntityState::Added, article);

        inner.next_article_id += 1;
        article.article_id = inner.next_article_id;
        inner.articles.insert(article.article_id, article.clone());
        Ok(())
    }

    async fn update(&self, article: &mut Article) -> Result<(), StorageError> {
        let mut inner = self.store.lock();

        audit::stamp(EntityState::Modified, article);
        inner.articles.insert(article.article_id, article.clone());
        Ok(())
    }

    async fn delete(&self, article: &Article) -> Result<(), StorageError> {
        self.store.lock().articles.remove(&article.article_id);
        Ok(())
    }
}

#[async_trait]
impl ArticleRepository for MemoryArticleRepository {
    async fn search(&self, key: &str) -> Result<Vec<ArticleSummary>, StorageError> {
        let inner = self.store.lock();
        let mut matches: Vec<Article> = inner
            .articles
            .values()
            .filter(|a| contains_ci(&a.title, key) || contains_ci(&a.sub_heading, key))
            .cloned()
            .collect();
        matches.sort_by(by_recency);

        Ok(matches
            .into_iter()
            .map(|a| {
                let author_name = inner
                    .accounts
                    .get(&a.user_id)
                    .map(|acc| acc.user_name.clone())
                    .unwrap_or_default();
                ArticleSummary {
                    article_id: a.article_id,
                    title: a.title,
                    sub_heading: a.sub_heading,
                    author_name,
                    created_at: a.created_at,
                    updated_at: a.updated_at,
                }
            })
            .collect())
    }

    async fn find_detail(&self, id: i32) -> Result<Option<ArticleDetail>, StorageError> {
        let inner = self.store.lock();
        Ok(inner.articles.get(&id).map(|a| {
            let author_name = inner
                .accounts
                .get(&a.user_id)
                .map(|acc| acc.user_name.clone())
                .unwrap_or_default();
            ArticleDetail {
                article_id: a.article_id,
                title: a.title.clone(),
                sub_heading: a.sub_heading.clone(),
                content: a.content.clone(),
                author_name,
                created_at: a.created_at,
                updated_at: a.updated_at,
            }
        }))
    }
}
