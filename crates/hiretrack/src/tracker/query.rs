use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::domain::{ApplicationRecord, ApplicationStatus, UnknownStatus};

/// Status restriction applied on top of the free-text search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    pub fn matches(self, status: ApplicationStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed.parse().map(Self::Only)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(status) => f.write_str(status.label()),
        }
    }
}

/// Search and status selection for one view of the record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecordQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl RecordQuery {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status: Some(status.to_string()),
        }
    }

    /// Parses the raw status text. Absent or blank means [`StatusFilter::All`].
    pub fn status_filter(&self) -> Result<StatusFilter, UnknownStatus> {
        match &self.status {
            Some(raw) => raw.parse(),
            None => Ok(StatusFilter::All),
        }
    }
}

fn matches_search(record: &ApplicationRecord, needle: &str) -> bool {
    needle.is_empty()
        || record.company.to_lowercase().contains(needle)
        || record.role.to_lowercase().contains(needle)
}

/// Returns the records matching both the search term and the status filter, in input order.
pub fn filter_records<'a>(
    records: &'a [ApplicationRecord],
    search_term: &str,
    status_filter: StatusFilter,
) -> Vec<&'a ApplicationRecord> {
    let needle = search_term.to_lowercase();
    records
        .iter()
        .filter(|record| matches_search(record, &needle) && status_filter.matches(record.status))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::domain::ApplicationId;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, company: &str, role: &str, status: ApplicationStatus) -> ApplicationRecord {
        ApplicationRecord {
            id: ApplicationId(id.to_string()),
            company: company.to_string(),
            role: role.to_string(),
            date_applied: Utc
                .with_ymd_and_hms(2025, 5, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
            status,
            salary: 0.0,
            notes: String::new(),
        }
    }

    fn sample() -> Vec<ApplicationRecord> {
        vec![
            record("1", "Acme", "Engineer", ApplicationStatus::Applied),
            record("2", "Globex", "Data Analyst", ApplicationStatus::Interview),
            record("3", "Initech", "Platform Engineer", ApplicationStatus::Rejected),
            record("4", "", "", ApplicationStatus::Applied),
        ]
    }

    fn ids(records: Vec<&ApplicationRecord>) -> Vec<&str> {
        records.into_iter().map(|record| record.id.as_str()).collect()
    }

    #[test]
    fn empty_search_with_all_is_identity() {
        let records = sample();
        assert_eq!(
            ids(filter_records(&records, "", StatusFilter::All)),
            vec!["1", "2", "3", "4"]
        );
    }

    #[test]
    fn search_is_case_insensitive_across_company_and_role() {
        let records = sample();
        assert_eq!(ids(filter_records(&records, "acme", StatusFilter::All)), vec!["1"]);
        assert_eq!(
            ids(filter_records(&records, "ENGINEER", StatusFilter::All)),
            vec!["1", "3"]
        );
        assert!(filter_records(&records, "umbrella", StatusFilter::All).is_empty());
    }

    #[test]
    fn search_and_status_combine_with_and() {
        let records = sample();
        let selected = filter_records(
            &records,
            "engineer",
            StatusFilter::Only(ApplicationStatus::Rejected),
        );
        assert_eq!(ids(selected), vec!["3"]);

        let applied = filter_records(&records, "", StatusFilter::Only(ApplicationStatus::Applied));
        assert_eq!(ids(applied), vec!["1", "4"]);
    }

    #[test]
    fn status_filter_parses_all_and_statuses() {
        assert_eq!("All".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!("".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "offer".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(ApplicationStatus::Offer))
        );
        assert!("Pending".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn query_defaults_to_all() {
        let query = RecordQuery::default();
        assert_eq!(query.status_filter(), Ok(StatusFilter::All));

        let query = RecordQuery::new("acme", StatusFilter::Only(ApplicationStatus::Interview));
        assert_eq!(
            query.status_filter(),
            Ok(StatusFilter::Only(ApplicationStatus::Interview))
        );
    }
}
