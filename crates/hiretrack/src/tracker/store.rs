use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use super::domain::{ApplicationId, ApplicationRecord, ApplicationStatus};
use super::repository::{ApplicationRepository, RepositoryError};

/// Process-local store. Contents vanish with the process.
#[derive(Default, Clone)]
pub struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl InMemoryApplicationRepository {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<ApplicationId, ApplicationRecord>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    async fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn set_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let mut guard = self.lock()?;
        Ok(guard.get_mut(id).map(|record| {
            record.status = status;
            record.clone()
        }))
    }

    async fn remove(&self, id: &ApplicationId) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.remove(id).is_some())
    }
}

/// Durable store keeping every record in one JSON document on disk.
///
/// The whole collection is held in memory and the file is rewritten after each
/// mutation, via a sibling temp file and a rename.
pub struct JsonFileRepository {
    path: PathBuf,
    records: tokio::sync::Mutex<BTreeMap<ApplicationId, ApplicationRecord>>,
}

impl JsonFileRepository {
    /// Opens the store at `path`, starting empty when the file does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => {
                let documents: Vec<ApplicationRecord> = serde_json::from_slice(&bytes)?;
                documents
                    .into_iter()
                    .map(|record| (record.id.clone(), record))
                    .collect()
            }
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(unavailable(&path, err)),
        };

        debug!(path = %path.display(), records = records.len(), "opened application store");

        Ok(Self {
            path,
            records: tokio::sync::Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(
        &self,
        records: &BTreeMap<ApplicationId, ApplicationRecord>,
    ) -> Result<(), RepositoryError> {
        let documents: Vec<&ApplicationRecord> = records.values().collect();
        let bytes = serde_json::to_vec_pretty(&documents)?;

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| unavailable(parent, err))?;
        }
        tokio::fs::write(&staging, bytes)
            .await
            .map_err(|err| unavailable(&staging, err))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|err| unavailable(&self.path, err))?;
        Ok(())
    }
}

fn unavailable(path: &Path, err: std::io::Error) -> RepositoryError {
    RepositoryError::Unavailable(format!("{}: {err}", path.display()))
}

#[async_trait]
impl ApplicationRepository for JsonFileRepository {
    async fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Ok(self.records.lock().await.values().cloned().collect())
    }

    async fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().await;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        if let Err(err) = self.persist(&guard).await {
            guard.remove(&record.id);
            return Err(err);
        }
        Ok(record)
    }

    async fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(self.records.lock().await.get(id).cloned())
    }

    async fn set_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let mut guard = self.records.lock().await;
        let Some(record) = guard.get_mut(id) else {
            return Ok(None);
        };
        let previous = std::mem::replace(&mut record.status, status);
        let updated = record.clone();

        if let Err(err) = self.persist(&guard).await {
            if let Some(record) = guard.get_mut(id) {
                record.status = previous;
            }
            return Err(err);
        }
        Ok(Some(updated))
    }

    async fn remove(&self, id: &ApplicationId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().await;
        let Some(removed) = guard.remove(id) else {
            return Ok(false);
        };

        if let Err(err) = self.persist(&guard).await {
            guard.insert(id.clone(), removed);
            return Err(err);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: &str) -> ApplicationRecord {
        ApplicationRecord {
            id: ApplicationId(id.to_string()),
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            date_applied: Utc
                .with_ymd_and_hms(2025, 5, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
            status: ApplicationStatus::Applied,
            salary: 90000.0,
            notes: "referral".to_string(),
        }
    }

    #[tokio::test]
    async fn memory_store_round_trips_mutations() {
        let store = InMemoryApplicationRepository::default();
        let id = ApplicationId("a".to_string());

        store.insert(record("a")).await.expect("insert");
        assert!(matches!(
            store.insert(record("a")).await,
            Err(RepositoryError::Conflict)
        ));

        let updated = store
            .set_status(&id, ApplicationStatus::Interview)
            .await
            .expect("update")
            .expect("record exists");
        assert_eq!(updated.status, ApplicationStatus::Interview);

        assert!(store.remove(&id).await.expect("remove"));
        assert!(!store.remove(&id).await.expect("second remove"));
        assert!(store.all().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("jobs.json");

        {
            let store = JsonFileRepository::open(&path).await.expect("open empty");
            store.insert(record("a")).await.expect("insert a");
            store.insert(record("b")).await.expect("insert b");
            store
                .set_status(&ApplicationId("a".to_string()), ApplicationStatus::Offer)
                .await
                .expect("update")
                .expect("record exists");
            assert!(store
                .remove(&ApplicationId("b".to_string()))
                .await
                .expect("remove"));
        }

        let reopened = JsonFileRepository::open(&path).await.expect("reopen");
        let records = reopened.all().await.expect("list");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "a");
        assert_eq!(records[0].status, ApplicationStatus::Offer);
        assert_eq!(records[0].notes, "referral");
    }

    #[tokio::test]
    async fn file_store_rejects_corrupt_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, b"{ not json").expect("write fixture");

        assert!(matches!(
            JsonFileRepository::open(&path).await,
            Err(RepositoryError::Corrupt(_))
        ));
    }
}
