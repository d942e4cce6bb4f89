use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::PaginatedResponse, history::HistoricalDriverFilter,
        standings::CurrentDriverResponse,
    },
    models::HistoricalDriver,
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/drivers/standings",
    operation_id = "list_driver_standings",
    responses(
        (status = 200, description = "Active drivers ordered by championship position", body = Vec<CurrentDriverResponse>)
    ),
    tag = "drivers"
)]
pub async fn list_standings(State(db): State<Database>) -> Result<Response, WebError> {
    let drivers = services::list_standings(db.pool()).await?;

    let response: Vec<CurrentDriverResponse> =
        drivers.into_iter().map(CurrentDriverResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/drivers/{id}",
    params(
        ("id" = String, Path, description = "External driver id, e.g. max_verstappen")
    ),
    responses(
        (status = 200, description = "Driver found", body = CurrentDriverResponse),
        (status = 404, description = "Driver not found")
    ),
    tag = "drivers"
)]
pub async fn get_driver(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let driver = services::get_driver(db.pool(), &id).await?;

    Ok(Json(CurrentDriverResponse::from(driver)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/drivers/history",
    params(HistoricalDriverFilter),
    responses(
        (status = 200, description = "Page of the all-time driver archive", body = PaginatedResponse<HistoricalDriver>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "drivers"
)]
pub async fn list_history(
    State(db): State<Database>,
    Query(filter): Query<HistoricalDriverFilter>,
) -> Result<Response, WebError> {
    filter.validate().map_err(WebError::BadRequest)?;

    let (rows, total_items) = services::list_history(db.pool(), &filter).await?;

    let response = PaginatedResponse::new(rows, filter.pagination(), total_items);

    Ok(Json(response).into_response())
}
