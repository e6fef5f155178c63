use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use super::clock::{Clock, SystemClock};
use super::domain::{
    normalize_salary, ApplicationId, ApplicationRecord, ApplicationStatus, NewApplication,
    UnknownStatus,
};
use super::repository::{ApplicationRepository, RepositoryError};

/// Service owning record identity and timestamps on top of a repository.
pub struct ApplicationTracker<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ApplicationTracker<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// All applications, most recently applied first.
    pub async fn list(&self) -> Result<Vec<ApplicationRecord>, TrackerError> {
        let mut records = self.repository.all().await.map_err(persistence_failure)?;
        records.sort_by(|left, right| {
            right
                .date_applied
                .cmp(&left.date_applied)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(records)
    }

    pub async fn create(&self, input: NewApplication) -> Result<ApplicationRecord, TrackerError> {
        let company = required_text("company", input.company)?;
        let role = required_text("role", input.role)?;
        let date_applied = match input.date_applied {
            Some(raw) => parse_timestamp(&raw)?,
            None => self.clock.now(),
        };

        let record = ApplicationRecord {
            id: ApplicationId::generate(),
            company,
            role,
            date_applied,
            status: ApplicationStatus::Applied,
            salary: normalize_salary(input.salary.as_ref()),
            notes: input.notes.unwrap_or_default(),
        };

        let stored = self
            .repository
            .insert(record)
            .await
            .map_err(persistence_failure)?;
        info!(id = %stored.id, company = %stored.company, "application created");
        Ok(stored)
    }

    /// Moves an application to `status`, returning the full updated record.
    ///
    /// Setting the status a record already has returns it without a write.
    pub async fn update_status(
        &self,
        id: &ApplicationId,
        status: &str,
    ) -> Result<ApplicationRecord, TrackerError> {
        let status: ApplicationStatus = status.parse().map_err(|err: UnknownStatus| {
            warn!(%id, "rejected status update: {err}");
            TrackerError::Validation {
                field: "status",
                message: err.to_string(),
            }
        })?;

        let current = self
            .repository
            .fetch(id)
            .await
            .map_err(persistence_failure)?
            .ok_or_else(|| not_found(id))?;
        if current.status == status {
            return Ok(current);
        }

        // The record may be removed between the read and the write.
        let updated = self
            .repository
            .set_status(id, status)
            .await
            .map_err(persistence_failure)?
            .ok_or_else(|| not_found(id))?;

        info!(
            %id,
            from = current.status.label(),
            to = status.label(),
            "application status updated"
        );
        Ok(updated)
    }

    /// Removes an application. Unknown ids are reported as [`TrackerError::NotFound`].
    pub async fn delete(&self, id: &ApplicationId) -> Result<(), TrackerError> {
        let removed = self
            .repository
            .remove(id)
            .await
            .map_err(persistence_failure)?;
        if !removed {
            return Err(not_found(id));
        }
        info!(%id, "application deleted");
        Ok(())
    }
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, TrackerError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => {
            warn!(field, "rejected application with missing field");
            Err(TrackerError::Validation {
                field,
                message: format!("{field} is required"),
            })
        }
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TrackerError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| TrackerError::Validation {
            field: "dateApplied",
            message: format!("'{raw}' is not an RFC 3339 timestamp ({err})"),
        })
}

fn not_found(id: &ApplicationId) -> TrackerError {
    warn!(%id, "application not found");
    TrackerError::NotFound(id.clone())
}

fn persistence_failure(err: RepositoryError) -> TrackerError {
    error!("application store failure: {err}");
    TrackerError::Repository(err)
}

/// Error raised by the application tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TrackerError {
    /// The offending request field for validation failures.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            Self::NotFound(_) | Self::Repository(_) => None,
        }
    }
}
