//! Job application tracking: the record model, its derived views, and the HTTP surface.
//!
//! Urgency, summary, and filtering are pure functions over fetched record sets
//! and take `now` explicitly. Persistence goes through [`ApplicationRepository`].

pub mod clock;
pub mod dashboard;
pub mod domain;
pub mod import;
pub mod query;
pub mod relative;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;
pub mod summary;
pub mod urgency;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dashboard::{DashboardRow, DashboardView};
pub use domain::{
    normalize_salary, ApplicationId, ApplicationRecord, ApplicationStatus, NewApplication,
    UnknownStatus,
};
pub use import::{ApplicationImportError, CsvApplicationImporter, ImportReport, ImportRow};
pub use query::{filter_records, RecordQuery, StatusFilter};
pub use relative::relative_time;
pub use repository::{ApplicationRepository, RepositoryError};
pub use router::application_router;
pub use service::{ApplicationTracker, TrackerError};
pub use store::{InMemoryApplicationRepository, JsonFileRepository};
pub use summary::{summarize, PipelineSummary};
pub use urgency::{classify, Urgency};
