use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use super::domain::{ApplicationRecord, NewApplication};
use super::repository::ApplicationRepository;
use super::service::{ApplicationTracker, TrackerError};

#[derive(Debug)]
pub enum ApplicationImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ApplicationImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationImportError::Io(err) => write!(f, "failed to read application CSV: {err}"),
            ApplicationImportError::Csv(err) => write!(f, "invalid application CSV data: {err}"),
        }
    }
}

impl std::error::Error for ApplicationImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApplicationImportError::Io(err) => Some(err),
            ApplicationImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ApplicationImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ApplicationImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One parsed CSV row with the line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub line: u64,
    pub application: NewApplication,
}

/// Outcome of a bulk import. Rejected rows do not stop the import.
#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    pub created: Vec<ApplicationRecord>,
    pub rejected: Vec<RejectedRow>,
}

#[derive(Debug, Serialize)]
pub struct RejectedRow {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    company: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    role: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    salary: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
    #[serde(
        default,
        alias = "dateApplied",
        deserialize_with = "empty_string_as_none"
    )]
    date_applied: Option<String>,
}

impl From<CsvRow> for NewApplication {
    fn from(row: CsvRow) -> Self {
        NewApplication {
            company: row.company,
            role: row.role,
            salary: row.salary.map(serde_json::Value::String),
            notes: row.notes,
            date_applied: row.date_applied,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Reads `company,role,salary,notes[,date_applied]` CSV exports into creation requests.
pub struct CsvApplicationImporter;

impl CsvApplicationImporter {
    pub fn rows_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ImportRow>, ApplicationImportError> {
        let file = std::fs::File::open(path)?;
        Self::rows_from_reader(file)
    }

    pub fn rows_from_reader<R: Read>(reader: R) -> Result<Vec<ImportRow>, ApplicationImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut rows = Vec::new();

        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map(csv::Position::line).unwrap_or_default();
            let row: CsvRow = record.deserialize(Some(&headers))?;
            rows.push(ImportRow {
                line,
                application: row.into(),
            });
        }

        Ok(rows)
    }

    /// Creates every row through the tracker, collecting per-row rejections.
    ///
    /// Persistence failures abort the import since later rows would fail the same way.
    pub async fn import<R>(
        tracker: &ApplicationTracker<R>,
        rows: Vec<ImportRow>,
    ) -> Result<ImportReport, TrackerError>
    where
        R: ApplicationRepository + 'static,
    {
        let mut report = ImportReport::default();

        for ImportRow { line, application } in rows {
            match tracker.create(application).await {
                Ok(record) => report.created.push(record),
                Err(err @ TrackerError::Validation { .. }) => {
                    warn!(line, "skipping CSV row: {err}");
                    report.rejected.push(RejectedRow {
                        line,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            created = report.created.len(),
            rejected = report.rejected.len(),
            "application import finished"
        );
        Ok(report)
    }
}
