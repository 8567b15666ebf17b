use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::CandidateId;
use super::intake::{CandidateSubmission, SubmissionArchive};
use super::service::{ScreeningService, ScreeningServiceError};
use super::sources::{CandidateStore, RecordFetcher};

/// Router builder exposing candidate intake and analysis.
pub fn screening_router<S, F, A>(service: Arc<ScreeningService<S, F, A>>) -> Router
where
    S: CandidateStore + 'static,
    F: RecordFetcher + 'static,
    A: SubmissionArchive + 'static,
{
    Router::new()
        .route("/submit", post(submit_handler::<S, F, A>))
        .route(
            "/api/v1/screening/analysis",
            get(analysis_handler::<S, F, A>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnalysisQuery {
    #[serde(default)]
    pub(crate) candidate_id: Option<String>,
}

pub(crate) async fn submit_handler<S, F, A>(
    State(service): State<Arc<ScreeningService<S, F, A>>>,
    axum::Json(submission): axum::Json<CandidateSubmission>,
) -> Response
where
    S: CandidateStore + 'static,
    F: RecordFetcher + 'static,
    A: SubmissionArchive + 'static,
{
    // The pipeline performs blocking I/O.
    match tokio::task::spawn_blocking(move || service.submit(submission)).await {
        Ok(Ok(receipt)) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Ok(Err(err)) => service_error_response(err),
        Err(join_err) => join_error_response(join_err),
    }
}

pub(crate) async fn analysis_handler<S, F, A>(
    State(service): State<Arc<ScreeningService<S, F, A>>>,
    Query(query): Query<AnalysisQuery>,
) -> Response
where
    S: CandidateStore + 'static,
    F: RecordFetcher + 'static,
    A: SubmissionArchive + 'static,
{
    let candidate_id = query
        .candidate_id
        .filter(|id| !id.trim().is_empty())
        .map(|id| CandidateId(id.trim().to_string()));

    match tokio::task::spawn_blocking(move || service.analyze(candidate_id.as_ref())).await {
        Ok(Ok(bundle)) => (StatusCode::OK, axum::Json(bundle)).into_response(),
        Ok(Err(err)) => service_error_response(err),
        Err(join_err) => join_error_response(join_err),
    }
}

fn service_error_response(err: ScreeningServiceError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        error!(error = %err, "screening request failed");
    }
    let payload = json!({
        "status": "error",
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

fn join_error_response(err: tokio::task::JoinError) -> Response {
    error!(error = %err, "screening task aborted");
    let payload = json!({
        "status": "error",
        "error": "screening task aborted",
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
