use importer::{IngestionReport, IngestionRunner, IngestionTarget, RunMode, Result};

/// Run the requested targets unless a run is already underway.
pub async fn run(
    runner: &IngestionRunner,
    targets: &[IngestionTarget],
    season: Option<i32>,
    dry_run: bool,
) -> Result<IngestionReport> {
    tracing::info!(
        "Manual ingestion requested: {:?} (season {:?}, dry run {})",
        targets,
        season,
        dry_run
    );
    runner
        .run_exclusive(targets, season, RunMode::from_dry_run(dry_run))
        .await
}
