use sqlx::PgPool;

use super::PgTransaction;
use crate::error::{Result, StorageError};
use crate::models::CurrentDriver;

const COLUMNS: &str = r#"
    driver_id, permanent_number, code, full_name, date_of_birth,
    nationality, points, position, team, active
"#;

pub struct CurrentDriverRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CurrentDriverRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every stored driver, active or not
    pub async fn list_all(&self) -> Result<Vec<CurrentDriver>> {
        let sql = format!("SELECT {COLUMNS} FROM current_drivers ORDER BY driver_id");
        let drivers = sqlx::query_as::<_, CurrentDriver>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(drivers)
    }

    /// Active drivers in championship order
    pub async fn list_standings(&self) -> Result<Vec<CurrentDriver>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM current_drivers WHERE active ORDER BY position, driver_id"
        );
        let drivers = sqlx::query_as::<_, CurrentDriver>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(drivers)
    }

    pub async fn find_by_id(&self, driver_id: &str) -> Result<CurrentDriver> {
        let sql = format!("SELECT {COLUMNS} FROM current_drivers WHERE driver_id = $1");
        sqlx::query_as::<_, CurrentDriver>(&sql)
            .bind(driver_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn insert(tx: &mut PgTransaction<'_>, driver: &CurrentDriver) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO current_drivers
                (driver_id, permanent_number, code, full_name, date_of_birth,
                 nationality, points, position, team, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&driver.driver_id)
        .bind(driver.permanent_number)
        .bind(&driver.code)
        .bind(&driver.full_name)
        .bind(driver.date_of_birth)
        .bind(&driver.nationality)
        .bind(driver.points)
        .bind(driver.position)
        .bind(&driver.team)
        .bind(driver.active)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            StorageError::from(e).on_unique_violation(|| {
                format!("driver '{}' already exists", driver.driver_id)
            })
        })?;

        Ok(())
    }

    /// Overwrite every refreshed field and the active flag in one statement
    pub async fn update(tx: &mut PgTransaction<'_>, driver: &CurrentDriver) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE current_drivers
            SET permanent_number = $2,
                code = $3,
                full_name = $4,
                points = $5,
                position = $6,
                team = $7,
                active = $8
            WHERE driver_id = $1
            "#,
        )
        .bind(&driver.driver_id)
        .bind(driver.permanent_number)
        .bind(&driver.code)
        .bind(&driver.full_name)
        .bind(driver.points)
        .bind(driver.position)
        .bind(&driver.team)
        .bind(driver.active)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn set_active(tx: &mut PgTransaction<'_>, driver_id: &str, active: bool) -> Result<()> {
        let result = sqlx::query("UPDATE current_drivers SET active = $2 WHERE driver_id = $1")
            .bind(driver_id)
            .bind(active)
            .execute(&mut **tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
