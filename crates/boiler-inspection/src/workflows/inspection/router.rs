use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::builder::InspectionSubmission;
use super::domain::{InspectionId, InspectionPatch};
use super::record::InspectionView;
use super::reference::ReferenceSnapshot;
use super::report::PlainTextRenderer;
use super::repository::{InspectionRepository, RepositoryError};
use super::service::{InspectionServiceError, InspectionService};

const REGISTER_FILENAME: &str = "inspections.csv";

/// Router builder exposing intake, correction, and report endpoints.
pub fn inspection_router<R>(service: Arc<InspectionService<R>>) -> Router
where
    R: InspectionRepository + 'static,
{
    Router::new()
        .route("/api/v1/reference", get(reference_handler))
        .route(
            "/api/v1/inspections",
            get(list_handler::<R>).post(submit_handler::<R>),
        )
        .route(
            "/api/v1/inspections/export.csv",
            get(export_handler::<R>),
        )
        .route(
            "/api/v1/inspections/:inspection_id",
            get(fetch_handler::<R>)
                .put(replace_handler::<R>)
                .patch(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route(
            "/api/v1/inspections/:inspection_id/report",
            get(report_handler::<R>),
        )
        .route(
            "/api/v1/inspections/:inspection_id/report.txt",
            get(report_text_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn reference_handler() -> Response {
    (StatusCode::OK, axum::Json(ReferenceSnapshot::current())).into_response()
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<InspectionService<R>>>) -> Response
where
    R: InspectionRepository + 'static,
{
    let now = Utc::now();
    match service.list() {
        Ok(inspections) => {
            let views: Vec<InspectionView> = inspections
                .iter()
                .map(|inspection| InspectionView::at(inspection, now))
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    axum::Json(submission): axum::Json<InspectionSubmission>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    let now = Utc::now();
    match service.submit(&submission, now) {
        Ok(inspection) => (
            StatusCode::CREATED,
            axum::Json(InspectionView::at(&inspection, now)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(inspection_id): Path<String>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.get(&InspectionId(inspection_id)) {
        Ok(inspection) => (
            StatusCode::OK,
            axum::Json(InspectionView::at(&inspection, Utc::now())),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn replace_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(inspection_id): Path<String>,
    axum::Json(submission): axum::Json<InspectionSubmission>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    let now = Utc::now();
    match service.replace(&InspectionId(inspection_id), &submission, now) {
        Ok(inspection) => (
            StatusCode::OK,
            axum::Json(InspectionView::at(&inspection, now)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(inspection_id): Path<String>,
    axum::Json(patch): axum::Json<InspectionPatch>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.update(&InspectionId(inspection_id), &patch) {
        Ok(inspection) => (
            StatusCode::OK,
            axum::Json(InspectionView::at(&inspection, Utc::now())),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(inspection_id): Path<String>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.delete(&InspectionId(inspection_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(inspection_id): Path<String>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    match service.report(&InspectionId(inspection_id), Utc::now()) {
        Ok(document) => (StatusCode::OK, axum::Json(document)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_text_handler<R>(
    State(service): State<Arc<InspectionService<R>>>,
    Path(inspection_id): Path<String>,
) -> Response
where
    R: InspectionRepository + 'static,
{
    let id = InspectionId(inspection_id);
    match service.render_report(&id, Utc::now(), &PlainTextRenderer) {
        Ok(rendered) => {
            let fallback = format!("inspection-report-{}.txt", ascii_only(id.as_str()));
            let headers = [
                (header::CONTENT_TYPE, rendered.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    content_disposition(&rendered.filename, &fallback),
                ),
            ];
            (StatusCode::OK, headers, rendered.bytes).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<R>(State(service): State<Arc<InspectionService<R>>>) -> Response
where
    R: InspectionRepository + 'static,
{
    let mut buffer = Vec::new();
    match service.export_register(&mut buffer) {
        Ok(_) => {
            let headers = [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{REGISTER_FILENAME}\""),
                ),
            ];
            (StatusCode::OK, headers, buffer).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: InspectionServiceError) -> Response {
    let (status, payload) = match &error {
        InspectionServiceError::Validation(validation) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": validation.to_string(),
                "violations": validation.messages(),
            }),
        ),
        InspectionServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            json!({ "error": "inspection not found" }),
        ),
        InspectionServiceError::Repository(RepositoryError::Conflict) => (
            StatusCode::CONFLICT,
            json!({ "error": "inspection already exists" }),
        ),
        InspectionServiceError::Repository(RepositoryError::Unavailable(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": error.to_string() }),
        ),
        other => {
            tracing::error!(error = %other, "inspection request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": other.to_string() }),
            )
        }
    };
    (status, axum::Json(payload)).into_response()
}

/// `attachment` disposition carrying the UTF-8 name per RFC 5987 alongside
/// an ASCII fallback for older clients.
fn content_disposition(filename: &str, fallback: &str) -> String {
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

fn ascii_only(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
        .collect()
}
