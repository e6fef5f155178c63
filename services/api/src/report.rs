use chrono::{DateTime, Utc};
use clap::Args;
use hiretrack::config::AppConfig;
use hiretrack::error::AppError;
use hiretrack::tracker::{
    ApplicationTracker, Clock, CsvApplicationImporter, DashboardView, FixedClock, ImportReport,
    JsonFileRepository, StatusFilter, SystemClock, TrackerError, UnknownStatus,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Case-insensitive text matched against company and role
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    /// Status to show (All, Applied, Interview, Offer, Rejected)
    #[arg(long, default_value = "All")]
    pub(crate) status: String,
    /// JSON store to read (defaults to APP_STORE_PATH)
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
    /// Evaluate urgency as of this RFC 3339 instant (defaults to now)
    #[arg(long, value_parser = parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV file with company,role,salary,notes columns
    pub(crate) csv: PathBuf,
    /// JSON store to write (defaults to APP_STORE_PATH)
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

async fn open_tracker(
    store: Option<PathBuf>,
    clock: Arc<dyn Clock>,
) -> Result<(ApplicationTracker<JsonFileRepository>, PathBuf), AppError> {
    let path = match store {
        Some(path) => path,
        None => AppConfig::load()?.storage.path,
    };
    let repository = Arc::new(JsonFileRepository::open(&path).await?);
    Ok((ApplicationTracker::with_clock(repository, clock), path))
}

pub(crate) async fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        search,
        status,
        store,
        now,
    } = args;

    let status_filter: StatusFilter =
        status
            .parse()
            .map_err(|err: UnknownStatus| TrackerError::Validation {
                field: "status",
                message: err.to_string(),
            })?;
    let clock: Arc<dyn Clock> = match now {
        Some(instant) => Arc::new(FixedClock(instant)),
        None => Arc::new(SystemClock),
    };

    let (tracker, path) = open_tracker(store, clock).await?;
    let records = tracker.list().await?;
    let view = DashboardView::build(&records, &search, status_filter, tracker.now());

    println!("{}", render_dashboard(&view, &path));
    Ok(())
}

pub(crate) async fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let ImportArgs { csv, store } = args;

    let rows = CsvApplicationImporter::rows_from_path(&csv)?;
    let (tracker, path) = open_tracker(store, Arc::new(SystemClock)).await?;
    let report = CsvApplicationImporter::import(&tracker, rows).await?;

    println!("{}", render_import(&report, &csv, &path));
    Ok(())
}

fn format_money(value: f64) -> String {
    let whole = value.round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("${grouped}")
}

pub(crate) fn render_dashboard(view: &DashboardView, store: &std::path::Path) -> String {
    let summary = &view.summary;
    let mut out = Vec::new();

    out.push("Application pipeline".to_string());
    out.push(format!(
        "Store: {} (evaluated {})",
        store.display(),
        view.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    out.push(format!(
        "Total: {} | Interviews: {} | Rate: {:.1}% | Pipeline: {}",
        summary.total,
        summary.interviews,
        summary.rate,
        format_money(summary.pipeline_value)
    ));

    let search = if view.search.is_empty() {
        "(none)"
    } else {
        view.search.as_str()
    };
    out.push(format!(
        "\nApplications (search {search}, status {})",
        view.status_filter
    ));

    if view.rows.is_empty() {
        out.push("- none".to_string());
    }
    for row in &view.rows {
        let badge = row
            .urgency_label
            .map(|label| format!(" [{label}]"))
            .unwrap_or_default();
        out.push(format!(
            "- {} | {} | {} | {} | {}{}",
            row.record.id,
            row.record.company,
            row.record.role,
            row.record.status,
            row.applied_ago,
            badge
        ));
    }

    out.join("\n")
}

pub(crate) fn render_import(
    report: &ImportReport,
    csv: &std::path::Path,
    store: &std::path::Path,
) -> String {
    let mut out = vec![format!(
        "Imported {} application(s) from {} into {}",
        report.created.len(),
        csv.display(),
        store.display()
    )];

    if !report.rejected.is_empty() {
        out.push(format!("Skipped {} row(s)", report.rejected.len()));
        for rejected in &report.rejected {
            out.push(format!("- line {}: {}", rejected.line, rejected.reason));
        }
    }

    out.join("\n")
}
