use chrono::NaiveDate;

use super::domain::{SadhanaEntry, UserId, UserProfile};

/// Daily log storage. One record per `(user_id, date)`; `upsert` replaces it.
pub trait EntryRepository: Send + Sync {
    fn upsert(&self, entry: SadhanaEntry) -> Result<SadhanaEntry, RepositoryError>;
    fn fetch(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Option<SadhanaEntry>, RepositoryError>;
    /// Entries dated `start..=end` in no particular order.
    fn range(
        &self,
        user_id: &UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SadhanaEntry>, RepositoryError>;
}

/// Profile lookups; a missing profile is `Ok(None)`.
pub trait ProfileRepository: Send + Sync {
    fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError>;
}

/// Flat key-value settings store holding JSON strings.
pub trait ConfigurationStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, RepositoryError>;
    fn write(&self, key: &str, value: String) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("failed to encode stored value: {0}")]
    Encoding(#[from] serde_json::Error),
}
