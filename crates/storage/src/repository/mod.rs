pub mod current_constructor;
pub mod current_driver;
pub mod historical_driver;

/// Transaction type every write in this crate runs inside.
pub type PgTransaction<'c> = sqlx::Transaction<'c, sqlx::Postgres>;
