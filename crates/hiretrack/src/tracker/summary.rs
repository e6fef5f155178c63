use serde::Serialize;

use super::domain::ApplicationRecord;

/// Headline numbers for a set of applications.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    pub total: usize,
    pub interviews: usize,
    /// Share of applications that reached an interview, in percent with one decimal.
    pub rate: f64,
    /// Salary still in flight across Applied and Interview records.
    pub pipeline_value: f64,
}

pub fn summarize<'a, I>(records: I) -> PipelineSummary
where
    I: IntoIterator<Item = &'a ApplicationRecord>,
{
    let mut summary = PipelineSummary::default();
    let mut in_flight = Vec::new();

    for record in records {
        summary.total += 1;
        if record.status.counts_as_interview() {
            summary.interviews += 1;
        }
        if !record.status.is_terminal() {
            in_flight.push(record.salary);
        }
    }

    summary.rate = conversion_rate(summary.interviews, summary.total);
    summary.pipeline_value = pipeline_value(in_flight);
    summary
}

// Summed in sorted order so the total does not depend on record order.
fn pipeline_value(mut salaries: Vec<f64>) -> f64 {
    salaries.sort_by(f64::total_cmp);
    salaries.into_iter().sum()
}

fn conversion_rate(interviews: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = interviews as f64 / total as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::domain::{ApplicationId, ApplicationStatus};
    use chrono::{TimeZone, Utc};

    fn record(id: &str, status: ApplicationStatus, salary: f64) -> ApplicationRecord {
        ApplicationRecord {
            id: ApplicationId(id.to_string()),
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            date_applied: Utc
                .with_ymd_and_hms(2025, 5, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
            status,
            salary,
            notes: String::new(),
        }
    }

    #[test]
    fn empty_input_is_all_zero() {
        let records: Vec<ApplicationRecord> = Vec::new();
        let summary = summarize(&records);
        assert_eq!(summary, PipelineSummary::default());
        assert_eq!(summary.rate, 0.0);
    }

    #[test]
    fn mixed_pipeline_matches_expected_totals() {
        let records = vec![
            record("a", ApplicationStatus::Applied, 100000.0),
            record("b", ApplicationStatus::Offer, 999999.0),
            record("c", ApplicationStatus::Interview, 50000.0),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.interviews, 2);
        assert_eq!(summary.rate, 66.7);
        assert_eq!(summary.pipeline_value, 150000.0);
    }

    #[test]
    fn terminal_salaries_are_excluded() {
        let records = vec![
            record("a", ApplicationStatus::Rejected, 70000.0),
            record("b", ApplicationStatus::Offer, 80000.0),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.pipeline_value, 0.0);
        assert_eq!(summary.interviews, 1);
        assert_eq!(summary.rate, 50.0);
    }

    #[test]
    fn order_does_not_matter() {
        let mut records = vec![
            record("a", ApplicationStatus::Applied, 1000.0),
            record("b", ApplicationStatus::Interview, 2000.0),
            record("c", ApplicationStatus::Rejected, 4000.0),
            record("d", ApplicationStatus::Offer, 8000.0),
            record("e", ApplicationStatus::Applied, 16000.0),
        ];
        let forward = summarize(&records);
        records.reverse();
        assert_eq!(summarize(&records), forward);
        records.rotate_left(2);
        assert_eq!(summarize(&records), forward);
    }

    #[test]
    fn fractional_salaries_sum_the_same_in_any_order() {
        let mut records = vec![
            record("a", ApplicationStatus::Applied, 0.1),
            record("b", ApplicationStatus::Applied, 0.2),
            record("c", ApplicationStatus::Interview, 0.3),
            record("d", ApplicationStatus::Applied, 85000.5),
        ];
        let forward = summarize(&records);
        records.reverse();
        assert_eq!(summarize(&records), forward);
        records.swap(0, 2);
        assert_eq!(summarize(&records), forward);
        records.rotate_left(1);
        assert_eq!(summarize(&records), forward);
    }
}
