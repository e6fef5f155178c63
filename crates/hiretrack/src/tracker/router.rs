use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::dashboard::DashboardView;
use super::domain::{ApplicationId, NewApplication};
use super::query::{RecordQuery, StatusFilter};
use super::repository::ApplicationRepository;
use super::service::{ApplicationTracker, TrackerError};
use super::summary::summarize;

/// Body accepted by the status update route.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: Option<String>,
}

/// Router builder exposing the application CRUD and derived views.
pub fn application_router<R>(tracker: Arc<ApplicationTracker<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route(
            "/api/jobs",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route("/api/jobs/summary", get(summary_handler::<R>))
        .route("/api/jobs/dashboard", get(dashboard_handler::<R>))
        .route(
            "/api/jobs/:id",
            axum::routing::patch(update_status_handler::<R>).delete(delete_handler::<R>),
        )
        .with_state(tracker)
}

pub(crate) async fn list_handler<R>(State(tracker): State<Arc<ApplicationTracker<R>>>) -> Response
where
    R: ApplicationRepository + 'static,
{
    match tracker.list().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<R>(
    State(tracker): State<Arc<ApplicationTracker<R>>>,
    payload: Result<Json<NewApplication>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    match tracker.create(input).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_status_handler<R>(
    State(tracker): State<Arc<ApplicationTracker<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let Json(update) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    let Some(status) = update.status else {
        return error_response(TrackerError::Validation {
            field: "status",
            message: "status is required".to_string(),
        });
    };

    match tracker.update_status(&ApplicationId(id), &status).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<R>(
    State(tracker): State<Arc<ApplicationTracker<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let id = ApplicationId(id);
    match tracker.delete(&id).await {
        Ok(()) => {
            let payload = json!({ "message": "Deleted", "id": id });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// Headline numbers over every record, the same figures the dashboard shows.
pub(crate) async fn summary_handler<R>(
    State(tracker): State<Arc<ApplicationTracker<R>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match tracker.list().await {
        Ok(records) => (StatusCode::OK, Json(summarize(&records))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn dashboard_handler<R>(
    State(tracker): State<Arc<ApplicationTracker<R>>>,
    Query(query): Query<RecordQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let status_filter = match parse_filter(&query) {
        Ok(filter) => filter,
        Err(err) => return error_response(err),
    };

    match tracker.list().await {
        Ok(records) => {
            let view = DashboardView::build(&records, &query.search, status_filter, tracker.now());
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn parse_filter(query: &RecordQuery) -> Result<StatusFilter, TrackerError> {
    query
        .status_filter()
        .map_err(|err| TrackerError::Validation {
            field: "status",
            message: err.to_string(),
        })
}

fn rejection_response(rejection: JsonRejection) -> Response {
    let payload = json!({ "error": rejection.body_text() });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

pub(crate) fn error_response(err: TrackerError) -> Response {
    let status = match &err {
        TrackerError::Validation { .. } => StatusCode::BAD_REQUEST,
        TrackerError::NotFound(_) => StatusCode::NOT_FOUND,
        TrackerError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = match err.field() {
        Some(field) => json!({ "error": err.to_string(), "field": field }),
        None => json!({ "error": err.to_string() }),
    };
    (status, Json(payload)).into_response()
}
