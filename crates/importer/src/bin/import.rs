use std::time::Duration;

use clap::{Parser, Subcommand};
use importer::config::{
    DEFAULT_HISTORICAL_TABLE_INDEX, DEFAULT_HISTORICAL_URL, DEFAULT_STANDINGS_API_URL,
    current_season,
};
use importer::{IngestionConfig, IngestionReport, IngestionTarget, Ingestor, RunMode};
use storage::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "import")]
#[command(about = "F1 standings importer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,

    /// Championship season, defaults to the current year
    #[arg(long, env = "F1_SEASON")]
    season: Option<i32>,

    #[arg(long, env = "STANDINGS_API_URL", default_value = DEFAULT_STANDINGS_API_URL)]
    api_url: String,

    #[arg(long, env = "HISTORICAL_DRIVERS_URL", default_value = DEFAULT_HISTORICAL_URL)]
    historical_url: String,

    #[arg(long, env = "HISTORICAL_TABLE_INDEX", default_value_t = DEFAULT_HISTORICAL_TABLE_INDEX)]
    table_index: usize,

    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Append new lines to the all-time driver archive
    Historical {
        #[arg(long)]
        dry_run: bool,
    },
    /// Sync current-season driver standings
    Drivers {
        #[arg(long)]
        dry_run: bool,
    },
    /// Sync current-season constructor standings
    Constructors {
        #[arg(long)]
        dry_run: bool,
    },
    /// Run all three, in that order
    All {
        #[arg(long)]
        dry_run: bool,
    },
}

impl Commands {
    fn plan(&self) -> (Vec<IngestionTarget>, RunMode) {
        match *self {
            Commands::Historical { dry_run } => {
                (vec![IngestionTarget::Historical], RunMode::from_dry_run(dry_run))
            }
            Commands::Drivers { dry_run } => {
                (vec![IngestionTarget::Drivers], RunMode::from_dry_run(dry_run))
            }
            Commands::Constructors { dry_run } => {
                (vec![IngestionTarget::Constructors], RunMode::from_dry_run(dry_run))
            }
            Commands::All { dry_run } => {
                (IngestionTarget::ALL.to_vec(), RunMode::from_dry_run(dry_run))
            }
        }
    }
}

impl Cli {
    fn ingestion_config(&self) -> IngestionConfig {
        IngestionConfig {
            season: self.season.unwrap_or_else(current_season),
            standings_api_url: self.api_url.clone(),
            historical_url: self.historical_url.clone(),
            historical_table_index: self.table_index,
            http_timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("import={},importer={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cli.ingestion_config();
    let (targets, mode) = cli.command.plan();

    tracing::info!("Connecting to database...");
    let db = Database::new(&cli.database_url).await?;
    db.run_migrations().await?;

    let ingestor = Ingestor::from_config(&config, db.clone())?;
    let report = ingestor.run(&targets, config.season, mode).await;
    db.close().await;

    log_report(&report);

    if !report.is_success() {
        return Err(format!("{} target(s) failed", report.failures().count()).into());
    }

    Ok(())
}

fn log_report(report: &IngestionReport) {
    let prefix = if report.dry_run { "[dry run] " } else { "" };

    for target in &report.targets {
        match &target.error {
            None => tracing::info!(
                "{}✓ {}: {} inserted, {} updated, {} deactivated, {} unchanged",
                prefix,
                target.target,
                target.summary.inserted,
                target.summary.updated,
                target.summary.deactivated,
                target.summary.unchanged
            ),
            Some(e) => tracing::error!("{}✗ {}: {}", prefix, target.target, e),
        }
    }
}
