use thiserror::Error;

/// StorageError
///
/// The single fault type surfaced by every repository operation. No fault is
/// swallowed into a boolean; each one propagates as this typed error and the
/// service layer decides which status code it maps to.
///
/// Faults are logged with `tracing::error!` at the point of occurrence, so
/// callers only ever see the sanitized message.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Any fault raised by the underlying database driver.
    #[error("storage fault: {0}")]
    Database(#[from] sqlx::Error),

    /// The store rejected the write (e.g. a unique or foreign key violation
    /// reported as a constraint name).
    #[error("{0}")]
    Rejected(String),
}

impl StorageError {
    /// A short, user-presentable description. Driver internals never leave
    /// the process boundary; constraint rejections pass their message through.
    pub fn public_message(&self) -> String {
        match self {
            StorageError::Database(_) => "A storage error occurred".to_string(),
            StorageError::Rejected(msg) => msg.clone(),
        }
    }
}
