use storage::models::{
    CurrentConstructor, CurrentDriver, HistoricalDriver, HistoricalDriverKey, NewHistoricalDriver,
};

use crate::Result;
use crate::reconcile::{ConstructorChanges, DriverChanges};

/// Current-season standings feed.
#[async_trait::async_trait]
pub trait StandingsSource: Send + Sync {
    /// Normalized driver standings, in source order, all marked active.
    async fn fetch_driver_standings(&self, season: i32) -> Result<Vec<CurrentDriver>>;

    async fn fetch_constructor_standings(&self, season: i32) -> Result<Vec<CurrentConstructor>>;
}

/// All-time driver statistics feed.
#[async_trait::async_trait]
pub trait HistoricalSource: Send + Sync {
    /// Normalized archive lines, one per source row, in source row order.
    async fn fetch_historical_drivers(&self) -> Result<Vec<NewHistoricalDriver>>;
}

/// Persistence gateway the ingestion service writes through.
///
/// Every `apply_*`/`insert_*` call is a single transaction: it either lands in
/// full or not at all.
#[async_trait::async_trait]
pub trait StandingsStore: Send + Sync {
    async fn find_historical(&self, key: &HistoricalDriverKey) -> Result<Option<HistoricalDriver>>;

    /// Returns the number of rows inserted.
    async fn insert_historical(&self, rows: &[NewHistoricalDriver]) -> Result<u64>;

    async fn load_drivers(&self) -> Result<Vec<CurrentDriver>>;

    async fn apply_driver_changes(&self, changes: &DriverChanges) -> Result<()>;

    async fn load_constructors(&self) -> Result<Vec<CurrentConstructor>>;

    async fn apply_constructor_changes(&self, changes: &ConstructorChanges) -> Result<()>;
}
