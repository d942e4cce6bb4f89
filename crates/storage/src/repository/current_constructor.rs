use sqlx::PgPool;

use super::PgTransaction;
use crate::error::{Result, StorageError};
use crate::models::CurrentConstructor;

pub struct CurrentConstructorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CurrentConstructorRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<CurrentConstructor>> {
        let constructors = sqlx::query_as::<_, CurrentConstructor>(
            r#"
            SELECT constructor_id, name, nationality, points, position
            FROM current_constructors
            ORDER BY position, constructor_id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(constructors)
    }

    pub async fn insert(tx: &mut PgTransaction<'_>, constructor: &CurrentConstructor) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO current_constructors (constructor_id, name, nationality, points, position)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&constructor.constructor_id)
        .bind(&constructor.name)
        .bind(&constructor.nationality)
        .bind(constructor.points)
        .bind(constructor.position)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            StorageError::from(e).on_unique_violation(|| {
                format!("constructor '{}' already exists", constructor.constructor_id)
            })
        })?;

        Ok(())
    }

    /// Only points and position are refreshed for constructors
    pub async fn update_standing(
        tx: &mut PgTransaction<'_>,
        constructor: &CurrentConstructor,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE current_constructors
            SET points = $2,
                position = $3
            WHERE constructor_id = $1
            "#,
        )
        .bind(&constructor.constructor_id)
        .bind(constructor.points)
        .bind(constructor.position)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
