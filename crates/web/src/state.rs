use axum::extract::FromRef;
use importer::IngestionRunner;
use storage::Database;

/// Shared by every route. Handlers extract just the part they need.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub runner: IngestionRunner,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for IngestionRunner {
    fn from_ref(state: &AppState) -> Self {
        state.runner.clone()
    }
}
