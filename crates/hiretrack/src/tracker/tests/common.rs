use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::tracker::clock::FixedClock;
use crate::tracker::domain::{ApplicationId, ApplicationRecord, ApplicationStatus, NewApplication};
use crate::tracker::repository::{ApplicationRepository, RepositoryError};
use crate::tracker::store::InMemoryApplicationRepository;
use crate::tracker::{application_router, ApplicationTracker};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn new_application() -> NewApplication {
    NewApplication::new("Acme", "Engineer")
        .with_salary("120000")
        .with_notes("Referred by Dana")
}

pub(super) fn build_tracker() -> (
    ApplicationTracker<InMemoryApplicationRepository>,
    Arc<InMemoryApplicationRepository>,
) {
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let tracker = ApplicationTracker::with_clock(repository.clone(), Arc::new(FixedClock(now())));
    (tracker, repository)
}

pub(super) fn router_with_tracker(
    tracker: ApplicationTracker<InMemoryApplicationRepository>,
) -> axum::Router {
    application_router(Arc::new(tracker))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl ApplicationRepository for UnavailableRepository {
    async fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn set_status(
        &self,
        _id: &ApplicationId,
        _status: ApplicationStatus,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn remove(&self, _id: &ApplicationId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
