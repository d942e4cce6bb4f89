use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use importer::IngestionRunner;
use validator::Validate;

use super::dto::{IngestionReportResponse, IngestionStatusResponse, RunIngestionRequest};
use super::services;
use crate::error::WebError;

#[utoipa::path(
    post,
    path = "/api/ingestion/run",
    request_body = RunIngestionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Run finished, per-target outcome in the body", body = IngestionReportResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Another ingestion run is in progress")
    ),
    tag = "ingestion"
)]
pub async fn run_ingestion(
    State(runner): State<IngestionRunner>,
    Json(req): Json<RunIngestionRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let report = services::run(&runner, &req.targets(), req.season, req.dry_run).await?;

    Ok(Json(IngestionReportResponse::from(report)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/ingestion/status",
    responses(
        (status = 200, description = "Whether a run is in progress", body = IngestionStatusResponse)
    ),
    tag = "ingestion"
)]
pub async fn ingestion_status(State(runner): State<IngestionRunner>) -> Response {
    Json(IngestionStatusResponse {
        running: runner.is_running(),
        default_season: runner.default_season(),
    })
    .into_response()
}
