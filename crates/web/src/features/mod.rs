pub mod constructors;
pub mod drivers;
pub mod health;
pub mod ingestion;
