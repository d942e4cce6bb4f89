use std::time::Duration;

use anyhow::Context;
use axum::Router;
use importer::{IngestionRunner, Ingestor};
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod state;

use config::Config;
use middleware::auth::ApiKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::drivers::handlers::list_standings,
        features::drivers::handlers::get_driver,
        features::drivers::handlers::list_history,
        features::constructors::handlers::list_standings,
        features::health::handlers::health,
        features::ingestion::handlers::run_ingestion,
        features::ingestion::handlers::ingestion_status,
    ),
    components(
        schemas(
            storage::dto::standings::CurrentDriverResponse,
            storage::dto::standings::CurrentConstructorResponse,
            storage::dto::common::PaginationMeta,
            storage::models::HistoricalDriver,
            features::health::handlers::HealthResponse,
            features::ingestion::dto::RunIngestionRequest,
            features::ingestion::dto::IngestionReportResponse,
            features::ingestion::dto::TargetReportResponse,
            features::ingestion::dto::IngestionStatusResponse,
        )
    ),
    tags(
        (name = "drivers", description = "Current and all-time driver standings"),
        (name = "constructors", description = "Current constructor standings"),
        (name = "health", description = "Liveness and database check"),
        (name = "ingestion", description = "Operator-triggered data ingestion"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

fn app(state: AppState, api_keys: ApiKeys) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .nest("/api/drivers", features::drivers::routes::routes())
        .nest("/api/constructors", features::constructors::routes::routes())
        .nest("/api/health", features::health::routes::routes())
        .nest("/api/ingestion", features::ingestion::routes::routes(api_keys))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting F1 standings API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let ingestor = Ingestor::from_config(&config.ingestion, db.clone())
        .context("Failed to build ingestion sources")?;
    let runner = IngestionRunner::new(ingestor, config.ingestion.season);

    if config.ingest_on_startup {
        tracing::info!("Running startup ingestion for season {}", config.ingestion.season);
        let report = runner.run_all().await;
        for failure in report.failures() {
            tracing::warn!(
                "Startup ingestion of {} failed, serving stored data: {}",
                failure.target,
                failure.error.as_deref().unwrap_or("unknown error")
            );
        }
    } else {
        tracing::info!("Startup ingestion disabled");
    }

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("No API_KEYS configured, the ingestion trigger will reject every request");
    }

    let state = AppState {
        db: db.clone(),
        runner,
    };

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    serve(listener, app(state, api_keys), db, shutdown_signal()).await
}

/// Serves until `shutdown` resolves, then releases the database pool.
async fn serve(
    listener: tokio::net::TcpListener,
    router: Router,
    db: Database,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped, closing database pool");
    db.close().await;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Cannot register signal handlers ({}), waiting for Ctrl-C", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received, draining connections");
}
