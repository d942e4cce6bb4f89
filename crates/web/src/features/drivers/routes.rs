use axum::{Router, routing::get};

use super::handlers::{get_driver, list_history, list_standings};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/standings", get(list_standings))
        .route("/history", get(list_history))
        .route("/:id", get(get_driver))
}
