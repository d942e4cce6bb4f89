use axum::{Router, routing::get};

use super::handlers::list_standings;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/standings", get(list_standings))
}
