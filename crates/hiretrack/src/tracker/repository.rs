use async_trait::async_trait;

use super::domain::{ApplicationId, ApplicationRecord, ApplicationStatus};

/// Storage abstraction so the tracker can be exercised against any document store.
///
/// Each method is a single unit of work against the backing store. Concurrent
/// writers to the same id race with last-write-wins semantics.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError>;
    async fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    async fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    /// Returns the updated record, or `None` when the id is unknown.
    async fn set_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationRecord>, RepositoryError>;
    /// Returns whether a record was actually removed.
    async fn remove(&self, id: &ApplicationId) -> Result<bool, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored documents are unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
}
