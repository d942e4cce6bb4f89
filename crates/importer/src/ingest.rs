use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storage::Database;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::IngestionConfig;
use crate::reconcile::{HistoricalBatch, StageOutcome, diff_constructors, diff_drivers};
use crate::sources::jolpica::JolpicaClient;
use crate::sources::wikipedia::WikipediaClient;
use crate::store::PgStandingsStore;
use crate::traits::{HistoricalSource, StandingsSource, StandingsStore};
use crate::{ImporterError, Result};

/// One of the three ingestion entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestionTarget {
    Historical,
    Drivers,
    Constructors,
}

impl IngestionTarget {
    /// Startup order: archive first, then the two current-season tables.
    pub const ALL: [IngestionTarget; 3] = [
        IngestionTarget::Historical,
        IngestionTarget::Drivers,
        IngestionTarget::Constructors,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IngestionTarget::Historical => "historical",
            IngestionTarget::Drivers => "drivers",
            IngestionTarget::Constructors => "constructors",
        }
    }
}

impl fmt::Display for IngestionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Commit,
    /// Fetch and diff, log what would change, write nothing.
    DryRun,
}

impl RunMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run { RunMode::DryRun } else { RunMode::Commit }
    }

    pub fn is_dry_run(self) -> bool {
        self == RunMode::DryRun
    }
}

/// Row counts of one reconciled target. In a dry run these are the writes
/// that would have been made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deactivated: usize,
    /// Rows already up to date, or archive lines already present.
    pub unchanged: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub target: IngestionTarget,
    pub summary: SyncSummary,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionReport {
    pub season: i32,
    pub dry_run: bool,
    pub targets: Vec<TargetReport>,
}

impl IngestionReport {
    pub fn is_success(&self) -> bool {
        self.targets.iter().all(|target| target.error.is_none())
    }

    pub fn failures(&self) -> impl Iterator<Item = &TargetReport> {
        self.targets.iter().filter(|target| target.error.is_some())
    }
}

/// Fetch → normalize → reconcile → apply, for each target.
///
/// Sources and store are injected so the whole pipeline runs against
/// in-memory fakes in tests.
pub struct Ingestor {
    standings: Arc<dyn StandingsSource>,
    historical: Arc<dyn HistoricalSource>,
    store: Arc<dyn StandingsStore>,
}

impl Ingestor {
    pub fn new(
        standings: Arc<dyn StandingsSource>,
        historical: Arc<dyn HistoricalSource>,
        store: Arc<dyn StandingsStore>,
    ) -> Self {
        Self {
            standings,
            historical,
            store,
        }
    }

    /// Live sources over HTTP, writes to Postgres.
    pub fn from_config(config: &IngestionConfig, db: Database) -> Result<Self> {
        let standings = JolpicaClient::new(&config.standings_api_url, config.http_timeout)?;
        let historical = WikipediaClient::new(
            &config.historical_url,
            config.historical_table_index,
            config.http_timeout,
        )?;

        Ok(Self::new(
            Arc::new(standings),
            Arc::new(historical),
            Arc::new(PgStandingsStore::new(db)),
        ))
    }

    /// Append archive lines whose natural key is not stored yet.
    pub async fn import_historical(&self, mode: RunMode) -> Result<SyncSummary> {
        let rows = self.historical.fetch_historical_drivers().await?;
        let mut batch = HistoricalBatch::new();

        for row in rows {
            let key = row.key();
            let archived = if batch.is_staged(&key) {
                false
            } else {
                self.store.find_historical(&key).await?.is_some()
            };
            let driver_name = row.driver_name.clone();
            if batch.stage(row, archived) == StageOutcome::DuplicateInBatch {
                debug!("Row for '{}' repeated in the source table, skipping", driver_name);
            }
        }

        let summary = SyncSummary {
            inserted: batch.inserts().len(),
            unchanged: batch.skipped(),
            ..SyncSummary::default()
        };

        if mode.is_dry_run() {
            info!(
                "Dry run: would insert {} historical rows, {} already archived or repeated",
                summary.inserted, summary.unchanged
            );
            return Ok(summary);
        }

        let inserted = self.store.insert_historical(batch.inserts()).await?;
        info!(
            "Inserted {} historical rows, skipped {}",
            inserted, summary.unchanged
        );

        Ok(SyncSummary {
            inserted: inserted as usize,
            ..summary
        })
    }

    /// Bring the driver table in line with the season's standings. Afterwards
    /// the active drivers are exactly the fetched ones.
    pub async fn sync_drivers(&self, season: i32, mode: RunMode) -> Result<SyncSummary> {
        let fetched = self.standings.fetch_driver_standings(season).await?;
        if fetched.is_empty() {
            warn!("Empty driver standings for {}, every stored driver will be retired", season);
        }

        let existing = self.store.load_drivers().await?;
        let changes = diff_drivers(existing, fetched);

        let summary = SyncSummary {
            inserted: changes.inserts.len(),
            updated: changes.updates.len(),
            deactivated: changes.deactivations.len(),
            unchanged: changes.unchanged,
        };

        if mode.is_dry_run() {
            info!(
                "Dry run: drivers {} to insert, {} to update, {} to deactivate",
                summary.inserted, summary.updated, summary.deactivated
            );
            for id in &changes.deactivations {
                info!("Would deactivate driver '{}'", id);
            }
            return Ok(summary);
        }

        self.store.apply_driver_changes(&changes).await?;
        info!(
            "Drivers: {} inserted, {} updated, {} deactivated, {} unchanged",
            summary.inserted, summary.updated, summary.deactivated, summary.unchanged
        );

        Ok(summary)
    }

    /// Insert new constructors and refresh points/position of known ones.
    /// Constructors absent from the fetch are left as they are.
    pub async fn sync_constructors(&self, season: i32, mode: RunMode) -> Result<SyncSummary> {
        let fetched = self.standings.fetch_constructor_standings(season).await?;
        let existing = self.store.load_constructors().await?;
        let changes = diff_constructors(existing, fetched);

        let summary = SyncSummary {
            inserted: changes.inserts.len(),
            updated: changes.updates.len(),
            deactivated: 0,
            unchanged: changes.unchanged,
        };

        if mode.is_dry_run() {
            info!(
                "Dry run: constructors {} to insert, {} to update",
                summary.inserted, summary.updated
            );
            return Ok(summary);
        }

        self.store.apply_constructor_changes(&changes).await?;
        info!(
            "Constructors: {} inserted, {} updated, {} unchanged",
            summary.inserted, summary.updated, summary.unchanged
        );

        Ok(summary)
    }

    pub async fn run_target(
        &self,
        target: IngestionTarget,
        season: i32,
        mode: RunMode,
    ) -> Result<SyncSummary> {
        match target {
            IngestionTarget::Historical => self.import_historical(mode).await,
            IngestionTarget::Drivers => self.sync_drivers(season, mode).await,
            IngestionTarget::Constructors => self.sync_constructors(season, mode).await,
        }
    }

    /// Run each target in turn. A failing target is logged and recorded in
    /// the report; the remaining targets still run.
    pub async fn run(
        &self,
        targets: &[IngestionTarget],
        season: i32,
        mode: RunMode,
    ) -> IngestionReport {
        let mut reports: Vec<TargetReport> = Vec::with_capacity(targets.len());

        for &target in targets {
            if reports.iter().any(|report| report.target == target) {
                continue;
            }

            info!("Running {} ingestion (season {})", target, season);
            let report = match self.run_target(target, season, mode).await {
                Ok(summary) => TargetReport {
                    target,
                    summary,
                    error: None,
                },
                Err(e) => {
                    error!("{} ingestion failed: {}", target, e);
                    TargetReport {
                        target,
                        summary: SyncSummary::default(),
                        error: Some(e.to_string()),
                    }
                }
            };
            reports.push(report);
        }

        IngestionReport {
            season,
            dry_run: mode.is_dry_run(),
            targets: reports,
        }
    }
}

/// Serializes ingestion runs inside one process: the startup hook and the
/// operator trigger share the same lock.
#[derive(Clone)]
pub struct IngestionRunner {
    ingestor: Arc<Ingestor>,
    default_season: i32,
    lock: Arc<Mutex<()>>,
}

impl IngestionRunner {
    pub fn new(ingestor: Ingestor, default_season: i32) -> Self {
        Self {
            ingestor: Arc::new(ingestor),
            default_season,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn default_season(&self) -> i32 {
        self.default_season
    }

    pub fn is_running(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    /// Start a run now, or fail with `IngestionInProgress` if one is underway.
    pub async fn run_exclusive(
        &self,
        targets: &[IngestionTarget],
        season: Option<i32>,
        mode: RunMode,
    ) -> Result<IngestionReport> {
        let _guard = self
            .lock
            .try_lock()
            .map_err(|_| ImporterError::IngestionInProgress)?;

        let season = season.unwrap_or(self.default_season);
        Ok(self.ingestor.run(targets, season, mode).await)
    }

    /// Every target for the default season, waiting for any run in progress.
    pub async fn run_all(&self) -> IngestionReport {
        let _guard = self.lock.lock().await;
        self.ingestor
            .run(&IngestionTarget::ALL, self.default_season, RunMode::Commit)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeHistorical, FakeStandings, MemoryStore, constructor, driver, historical};
    use rust_decimal::Decimal;

    fn ingestor(
        standings: FakeStandings,
        archive: FakeHistorical,
        store: &Arc<MemoryStore>,
    ) -> Ingestor {
        Ingestor::new(Arc::new(standings), Arc::new(archive), store.clone())
    }

    fn archive_rows() -> Vec<storage::models::NewHistoricalDriver> {
        vec![
            historical("Michael Schumacher", "1991–2006, 2010–2012", 1566),
            historical("Ayrton Senna", "1984–1994", 614),
            historical("Jim Clark", "1960–1968", 274),
        ]
    }

    #[tokio::test]
    async fn test_historical_import_is_idempotent() {
        let store = Arc::new(MemoryStore::default());

        let first = ingestor(FakeStandings::default(), FakeHistorical::new(archive_rows()), &store)
            .import_historical(RunMode::Commit)
            .await
            .unwrap();
        assert_eq!(first.inserted, 3);

        let second = ingestor(FakeStandings::default(), FakeHistorical::new(archive_rows()), &store)
            .import_historical(RunMode::Commit)
            .await
            .unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.unchanged, 3);
        assert_eq!(store.historical_keys().len(), 3);
    }

    #[tokio::test]
    async fn test_duplicated_source_row_is_inserted_once() {
        let store = Arc::new(MemoryStore::default());
        let mut rows = archive_rows();
        rows.push(rows[1].clone());

        let summary = ingestor(FakeStandings::default(), FakeHistorical::new(rows), &store)
            .import_historical(RunMode::Commit)
            .await
            .unwrap();

        assert_eq!(summary.inserted, 3);
        assert_eq!(summary.unchanged, 1);
    }

    #[tokio::test]
    async fn test_historical_row_order_does_not_change_stored_set() {
        let forward = Arc::new(MemoryStore::default());
        let reversed = Arc::new(MemoryStore::default());
        let mut rows = archive_rows();
        rows.push(rows[0].clone());

        ingestor(FakeStandings::default(), FakeHistorical::new(rows.clone()), &forward)
            .import_historical(RunMode::Commit)
            .await
            .unwrap();
        rows.reverse();
        ingestor(FakeStandings::default(), FakeHistorical::new(rows), &reversed)
            .import_historical(RunMode::Commit)
            .await
            .unwrap();

        assert_eq!(forward.historical_keys(), reversed.historical_keys());
    }

    #[tokio::test]
    async fn test_changed_stat_line_appends_a_row() {
        let store = Arc::new(MemoryStore::default());
        ingestor(FakeStandings::default(), FakeHistorical::new(archive_rows()), &store)
            .import_historical(RunMode::Commit)
            .await
            .unwrap();

        let mut rows = archive_rows();
        rows[0].points = Decimal::new(1567, 0);
        let summary = ingestor(FakeStandings::default(), FakeHistorical::new(rows), &store)
            .import_historical(RunMode::Commit)
            .await
            .unwrap();

        assert_eq!(summary.inserted, 1);
        assert_eq!(store.historical_keys().len(), 4);
    }

    #[tokio::test]
    async fn test_driver_sync_active_set_matches_fetch() {
        let store = Arc::new(MemoryStore::default());
        store.seed_drivers(vec![
            driver("hamilton", 1, 300, true),
            driver("bottas", 2, 200, false),
            driver("perez", 3, 150, true),
        ]);

        let fetched = vec![
            driver("hamilton", 2, 320, true),
            driver("bottas", 5, 210, true),
            driver("antonelli", 4, 60, true),
        ];
        let summary = ingestor(FakeStandings::drivers(fetched), FakeHistorical::default(), &store)
            .sync_drivers(2025, RunMode::Commit)
            .await
            .unwrap();

        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.updated, 2);
        assert_eq!(summary.deactivated, 1);
        assert_eq!(
            store.active_driver_ids(),
            vec!["antonelli".to_string(), "bottas".to_string(), "hamilton".to_string()]
        );

        let hamilton = store.driver("hamilton").unwrap();
        assert_eq!(hamilton.points, Decimal::new(320, 0));
        assert_eq!(hamilton.position, 2);
        assert!(!store.driver("perez").unwrap().active);
    }

    #[tokio::test]
    async fn test_unpublished_season_keeps_active_drivers() {
        let store = Arc::new(MemoryStore::default());
        store.seed_drivers(vec![driver("norris", 1, 400, true), driver("piastri", 2, 380, true)]);
        store.seed_constructors(vec![constructor("mclaren", 1, 780)]);

        let ingestor = ingestor(FakeStandings::unpublished(), FakeHistorical::default(), &store);
        let err = ingestor.sync_drivers(2026, RunMode::Commit).await.unwrap_err();
        assert!(matches!(err, ImporterError::NoStandings { season: 2026 }));

        let report = ingestor
            .run(
                &[IngestionTarget::Drivers, IngestionTarget::Constructors],
                2026,
                RunMode::Commit,
            )
            .await;
        assert_eq!(report.failures().count(), 2);

        assert_eq!(
            store.active_driver_ids(),
            vec!["norris".to_string(), "piastri".to_string()]
        );
        assert_eq!(store.driver("norris").unwrap().points, Decimal::new(400, 0));
        assert_eq!(store.constructor("mclaren").unwrap().points, Decimal::new(780, 0));
    }

    #[tokio::test]
    async fn test_second_driver_sync_changes_nothing() {
        let store = Arc::new(MemoryStore::default());
        let fetched = vec![driver("norris", 1, 250, true), driver("leclerc", 2, 200, true)];

        ingestor(FakeStandings::drivers(fetched.clone()), FakeHistorical::default(), &store)
            .sync_drivers(2025, RunMode::Commit)
            .await
            .unwrap();
        let second = ingestor(FakeStandings::drivers(fetched), FakeHistorical::default(), &store)
            .sync_drivers(2025, RunMode::Commit)
            .await
            .unwrap();

        assert_eq!(
            second,
            SyncSummary {
                unchanged: 2,
                ..SyncSummary::default()
            }
        );
    }

    #[tokio::test]
    async fn test_constructor_sync_never_removes_rows() {
        let store = Arc::new(MemoryStore::default());
        store.seed_constructors(vec![constructor("alphatauri", 8, 25), constructor("ferrari", 2, 300)]);

        let summary = ingestor(
            FakeStandings::constructors(vec![constructor("ferrari", 3, 310), constructor("audi", 10, 0)]),
            FakeHistorical::default(),
            &store,
        )
        .sync_constructors(2025, RunMode::Commit)
        .await
        .unwrap();

        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.deactivated, 0);
        assert_eq!(store.constructor_ids(), vec!["alphatauri", "audi", "ferrari"]);
        assert_eq!(store.constructor("alphatauri").unwrap().points, Decimal::new(25, 0));
        assert_eq!(store.constructor("ferrari").unwrap().position, 3);
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let store = Arc::new(MemoryStore::default());
        store.seed_drivers(vec![driver("vettel", 10, 5, true)]);

        let report = ingestor(
            FakeStandings::drivers(vec![driver("alonso", 6, 40, true)]),
            FakeHistorical::new(archive_rows()),
            &store,
        )
        .run(&IngestionTarget::ALL, 2025, RunMode::DryRun)
        .await;

        assert!(report.dry_run);
        assert!(report.is_success());
        assert_eq!(report.targets[0].summary.inserted, 3);
        assert_eq!(report.targets[1].summary.deactivated, 1);
        assert!(store.historical_keys().is_empty());
        assert_eq!(store.active_driver_ids(), vec!["vettel".to_string()]);
    }

    #[tokio::test]
    async fn test_source_failure_leaves_store_untouched_and_other_targets_run() {
        let store = Arc::new(MemoryStore::default());
        store.seed_drivers(vec![driver("zhou", 18, 0, true)]);

        let report = ingestor(
            FakeStandings::unavailable(),
            FakeHistorical::new(archive_rows()),
            &store,
        )
        .run(&IngestionTarget::ALL, 2025, RunMode::Commit)
        .await;

        assert!(!report.is_success());
        assert_eq!(report.failures().count(), 2);
        assert!(report.targets[0].error.is_none());
        assert_eq!(store.historical_keys().len(), 3);
        assert_eq!(store.active_driver_ids(), vec!["zhou".to_string()]);
    }

    #[tokio::test]
    async fn test_repeated_targets_run_once() {
        let store = Arc::new(MemoryStore::default());
        let report = ingestor(FakeStandings::default(), FakeHistorical::default(), &store)
            .run(
                &[IngestionTarget::Drivers, IngestionTarget::Drivers],
                2025,
                RunMode::Commit,
            )
            .await;

        assert_eq!(report.targets.len(), 1);
    }

    #[tokio::test]
    async fn test_runner_rejects_concurrent_run() {
        let store = Arc::new(MemoryStore::default());
        let runner = IngestionRunner::new(
            ingestor(FakeStandings::default(), FakeHistorical::default(), &store),
            2025,
        );

        let held = runner.lock.clone();
        let _guard = held.try_lock().unwrap();
        assert!(runner.is_running());

        let err = runner
            .run_exclusive(&IngestionTarget::ALL, None, RunMode::Commit)
            .await
            .unwrap_err();
        assert!(matches!(err, ImporterError::IngestionInProgress));
    }

    #[tokio::test]
    async fn test_runner_uses_default_season() {
        let store = Arc::new(MemoryStore::default());
        let runner = IngestionRunner::new(
            ingestor(FakeStandings::default(), FakeHistorical::default(), &store),
            2024,
        );

        let report = runner
            .run_exclusive(&[IngestionTarget::Constructors], None, RunMode::Commit)
            .await
            .unwrap();
        assert_eq!(report.season, 2024);
        assert!(!runner.is_running());

        let report = runner
            .run_exclusive(&[IngestionTarget::Constructors], Some(2019), RunMode::Commit)
            .await
            .unwrap();
        assert_eq!(report.season, 2019);
    }

    #[test]
    fn test_target_serde() {
        let targets: Vec<IngestionTarget> =
            serde_json::from_str(r#"["historical","drivers","constructors"]"#).unwrap();
        assert_eq!(targets, IngestionTarget::ALL.to_vec());
        assert_eq!(IngestionTarget::Drivers.to_string(), "drivers");
    }
}
