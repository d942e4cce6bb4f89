use sqlx::{PgPool, Postgres, QueryBuilder};

use super::PgTransaction;
use crate::dto::history::HistoricalDriverFilter;
use crate::error::Result;
use crate::models::{HistoricalDriver, HistoricalDriverKey, NewHistoricalDriver};

const COLUMNS: &str = r#"
    id, driver_name, nationality, seasons, drivers_championships,
    race_entries, race_starts, pole_positions, race_wins, podiums,
    fastest_laps, points, imported_at
"#;

pub struct HistoricalDriverRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HistoricalDriverRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find the archive line matching the natural key exactly
    pub async fn find_by_key(&self, key: &HistoricalDriverKey) -> Result<Option<HistoricalDriver>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM historical_drivers
             WHERE driver_name = $1 AND seasons = $2 AND points = $3
             LIMIT 1"
        );

        let driver = sqlx::query_as::<_, HistoricalDriver>(&sql)
            .bind(&key.driver_name)
            .bind(&key.seasons)
            .bind(key.points)
            .fetch_optional(self.pool)
            .await?;

        Ok(driver)
    }

    /// List archive lines, filtered and paginated, with the total match count
    pub async fn list(&self, filter: &HistoricalDriverFilter) -> Result<(Vec<HistoricalDriver>, i64)> {
        let pagination = filter.pagination();
        let pattern = filter.name_pattern();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM historical_drivers WHERE 1=1");
        if let Some(ref pattern) = pattern {
            count.push(" AND driver_name ILIKE ");
            count.push_bind(pattern);
        }
        let total_items = count
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM historical_drivers WHERE 1=1"));
        if let Some(ref pattern) = pattern {
            query.push(" AND driver_name ILIKE ");
            query.push_bind(pattern);
        }
        query.push(" ORDER BY points DESC, driver_name, id LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let drivers = query
            .build_query_as::<HistoricalDriver>()
            .fetch_all(self.pool)
            .await?;

        Ok((drivers, total_items))
    }

    /// Append one archive line inside `tx`
    pub async fn insert(tx: &mut PgTransaction<'_>, driver: &NewHistoricalDriver) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO historical_drivers
                (driver_name, nationality, seasons, drivers_championships,
                 race_entries, race_starts, pole_positions, race_wins,
                 podiums, fastest_laps, points)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&driver.driver_name)
        .bind(&driver.nationality)
        .bind(&driver.seasons)
        .bind(&driver.drivers_championships)
        .bind(driver.race_entries)
        .bind(driver.race_starts)
        .bind(driver.pole_positions)
        .bind(driver.race_wins)
        .bind(driver.podiums)
        .bind(driver.fastest_laps)
        .bind(driver.points)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
