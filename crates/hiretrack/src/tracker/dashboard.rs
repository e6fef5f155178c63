use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::ApplicationRecord;
use super::query::{filter_records, StatusFilter};
use super::relative::relative_time;
use super::summary::{summarize, PipelineSummary};
use super::urgency::Urgency;

/// One listed application with its derived badges.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRow {
    #[serde(flatten)]
    pub record: ApplicationRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_label: Option<&'static str>,
    pub applied_ago: String,
}

/// Snapshot backing the tracker dashboard, recomputed for every request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub generated_at: DateTime<Utc>,
    /// Computed over every record, independent of the filter.
    pub summary: PipelineSummary,
    pub search: String,
    pub status_filter: String,
    pub rows: Vec<DashboardRow>,
}

impl DashboardView {
    /// `records` are expected in display order; rows keep that order.
    pub fn build(
        records: &[ApplicationRecord],
        search_term: &str,
        status_filter: StatusFilter,
        now: DateTime<Utc>,
    ) -> Self {
        let rows = filter_records(records, search_term, status_filter)
            .into_iter()
            .map(|record| {
                let urgency = record.urgency(now);
                DashboardRow {
                    record: record.clone(),
                    urgency,
                    urgency_label: urgency.map(Urgency::label),
                    applied_ago: relative_time(record.date_applied, now),
                }
            })
            .collect();

        Self {
            generated_at: now,
            summary: summarize(records),
            search: search_term.to_string(),
            status_filter: status_filter.to_string(),
            rows,
        }
    }
}
