use sqlx::PgPool;
use storage::{
    dto::history::HistoricalDriverFilter,
    error::Result,
    models::{CurrentDriver, HistoricalDriver},
    repository::{
        current_driver::CurrentDriverRepository, historical_driver::HistoricalDriverRepository,
    },
};

/// Active drivers in championship order
pub async fn list_standings(pool: &PgPool) -> Result<Vec<CurrentDriver>> {
    let repo = CurrentDriverRepository::new(pool);
    repo.list_standings().await
}

/// Get a driver by external id, active or not
pub async fn get_driver(pool: &PgPool, driver_id: &str) -> Result<CurrentDriver> {
    let repo = CurrentDriverRepository::new(pool);
    repo.find_by_id(driver_id).await
}

/// One page of the all-time archive, with the total row count
pub async fn list_history(
    pool: &PgPool,
    filter: &HistoricalDriverFilter,
) -> Result<(Vec<HistoricalDriver>, i64)> {
    let repo = HistoricalDriverRepository::new(pool);
    repo.list(filter).await
}
