use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{ingestion_status, run_ingestion};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/run", post(run_ingestion))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/status", get(ingestion_status))
        .merge(protected)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use importer::reconcile::{ConstructorChanges, DriverChanges};
    use importer::{HistoricalSource, IngestionRunner, Ingestor, StandingsSource, StandingsStore};
    use storage::Database;
    use storage::models::{
        CurrentConstructor, CurrentDriver, HistoricalDriver, HistoricalDriverKey,
        NewHistoricalDriver,
    };
    use tokio::sync::Semaphore;
    use tower::ServiceExt;

    use super::*;

    /// Empty sources and a store that accepts everything. The historical
    /// fetch waits on `gate` so a run can be held open.
    struct Quiet {
        gate: Option<Arc<Semaphore>>,
    }

    #[async_trait::async_trait]
    impl StandingsSource for Quiet {
        async fn fetch_driver_standings(&self, _season: i32) -> importer::Result<Vec<CurrentDriver>> {
            Ok(Vec::new())
        }

        async fn fetch_constructor_standings(
            &self,
            _season: i32,
        ) -> importer::Result<Vec<CurrentConstructor>> {
            Ok(Vec::new())
        }
    }

    #[async_trait::async_trait]
    impl HistoricalSource for Quiet {
        async fn fetch_historical_drivers(&self) -> importer::Result<Vec<NewHistoricalDriver>> {
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await;
            }
            Ok(Vec::new())
        }
    }

    #[async_trait::async_trait]
    impl StandingsStore for Quiet {
        async fn find_historical(
            &self,
            _key: &HistoricalDriverKey,
        ) -> importer::Result<Option<HistoricalDriver>> {
            Ok(None)
        }

        async fn insert_historical(&self, rows: &[NewHistoricalDriver]) -> importer::Result<u64> {
            Ok(rows.len() as u64)
        }

        async fn load_drivers(&self) -> importer::Result<Vec<CurrentDriver>> {
            Ok(Vec::new())
        }

        async fn apply_driver_changes(&self, _changes: &DriverChanges) -> importer::Result<()> {
            Ok(())
        }

        async fn load_constructors(&self) -> importer::Result<Vec<CurrentConstructor>> {
            Ok(Vec::new())
        }

        async fn apply_constructor_changes(
            &self,
            _changes: &ConstructorChanges,
        ) -> importer::Result<()> {
            Ok(())
        }
    }

    fn app(gate: Option<Arc<Semaphore>>) -> (Router, IngestionRunner) {
        let source = Arc::new(Quiet { gate });
        let ingestor = Ingestor::new(source.clone(), source.clone(), source);
        let runner = IngestionRunner::new(ingestor, 2025);

        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://f1:f1@localhost/f1_test")
            .unwrap();
        let state = AppState {
            db: Database::from_pool(pool),
            runner: runner.clone(),
        };

        let router = Router::new()
            .nest("/api/ingestion", routes(ApiKeys::from_comma_separated("secret")))
            .with_state(state);
        (router, runner)
    }

    fn run_request(auth: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/ingestion/run")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_run_requires_api_key() {
        let (app, _) = app(None);
        let response = app.oneshot(run_request(None, "{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_run_returns_report() {
        let (app, _) = app(None);
        let response = app
            .oneshot(run_request(
                Some("Bearer secret"),
                r#"{"targets": ["drivers", "constructors"], "season": 2023, "dry_run": true}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["season"], 2023);
        assert_eq!(body["dry_run"], true);
        assert_eq!(body["success"], true);
        assert_eq!(body["targets"].as_array().unwrap().len(), 2);
        assert_eq!(body["targets"][0]["target"], "drivers");
    }

    #[tokio::test]
    async fn test_invalid_season_is_rejected() {
        let (app, _) = app(None);
        let response = app
            .oneshot(run_request(Some("Bearer secret"), r#"{"season": 3000}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_concurrent_run_conflicts() {
        let gate = Arc::new(Semaphore::new(0));
        let (app, runner) = app(Some(gate.clone()));

        let first = tokio::spawn(app.clone().oneshot(run_request(Some("Bearer secret"), "{}")));
        while !runner.is_running() {
            tokio::task::yield_now().await;
        }

        let second = app
            .clone()
            .oneshot(run_request(Some("Bearer secret"), "{}"))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);

        let status = app
            .oneshot(
                Request::builder()
                    .uri("/api/ingestion/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(json_body(status).await["running"], true);

        gate.add_permits(1);
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert!(!runner.is_running());
    }
}
