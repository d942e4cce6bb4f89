use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::standings::CurrentConstructorResponse};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/constructors/standings",
    operation_id = "list_constructor_standings",
    responses(
        (status = 200, description = "Constructors ordered by championship position", body = Vec<CurrentConstructorResponse>)
    ),
    tag = "constructors"
)]
pub async fn list_standings(State(db): State<Database>) -> Result<Response, WebError> {
    let constructors = services::list_standings(db.pool()).await?;

    let response: Vec<CurrentConstructorResponse> = constructors
        .into_iter()
        .map(CurrentConstructorResponse::from)
        .collect();

    Ok(Json(response).into_response())
}
