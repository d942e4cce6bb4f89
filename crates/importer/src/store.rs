use storage::Database;
use storage::models::{
    CurrentConstructor, CurrentDriver, HistoricalDriver, HistoricalDriverKey, NewHistoricalDriver,
};
use storage::repository::current_constructor::CurrentConstructorRepository;
use storage::repository::current_driver::CurrentDriverRepository;
use storage::repository::historical_driver::HistoricalDriverRepository;
use tracing::debug;

use crate::Result;
use crate::reconcile::{ConstructorChanges, DriverChanges};
use crate::traits::StandingsStore;

/// `StandingsStore` over Postgres. Each apply call is one transaction.
#[derive(Debug, Clone)]
pub struct PgStandingsStore {
    db: Database,
}

impl PgStandingsStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl StandingsStore for PgStandingsStore {
    async fn find_historical(&self, key: &HistoricalDriverKey) -> Result<Option<HistoricalDriver>> {
        let found = HistoricalDriverRepository::new(self.db.pool())
            .find_by_key(key)
            .await?;
        Ok(found)
    }

    async fn insert_historical(&self, rows: &[NewHistoricalDriver]) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = self.db.pool().begin().await?;
        for row in rows {
            HistoricalDriverRepository::insert(&mut tx, row).await?;
        }
        tx.commit().await?;

        debug!("Committed {} historical rows", rows.len());
        Ok(rows.len() as u64)
    }

    async fn load_drivers(&self) -> Result<Vec<CurrentDriver>> {
        let drivers = CurrentDriverRepository::new(self.db.pool()).list_all().await?;
        Ok(drivers)
    }

    async fn apply_driver_changes(&self, changes: &DriverChanges) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut tx = self.db.pool().begin().await?;
        for driver in &changes.inserts {
            CurrentDriverRepository::insert(&mut tx, driver).await?;
        }
        for driver in &changes.updates {
            CurrentDriverRepository::update(&mut tx, driver).await?;
        }
        for driver_id in &changes.deactivations {
            CurrentDriverRepository::set_active(&mut tx, driver_id, false).await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn load_constructors(&self) -> Result<Vec<CurrentConstructor>> {
        let constructors = CurrentConstructorRepository::new(self.db.pool())
            .list_all()
            .await?;
        Ok(constructors)
    }

    async fn apply_constructor_changes(&self, changes: &ConstructorChanges) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut tx = self.db.pool().begin().await?;
        for constructor in &changes.inserts {
            CurrentConstructorRepository::insert(&mut tx, constructor).await?;
        }
        for constructor in &changes.updates {
            CurrentConstructorRepository::update_standing(&mut tx, constructor).await?;
        }
        tx.commit().await?;

        Ok(())
    }
}
