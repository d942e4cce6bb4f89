pub mod config;
pub mod error;
pub mod ingest;
pub mod normalize;
pub mod reconcile;
pub mod sources;
pub mod store;
pub mod traits;

#[cfg(test)]
mod testing;

pub use config::IngestionConfig;
pub use error::{ImporterError, Result};
pub use ingest::{
    IngestionReport, IngestionRunner, IngestionTarget, Ingestor, RunMode, SyncSummary,
    TargetReport,
};
pub use store::PgStandingsStore;
pub use traits::{HistoricalSource, StandingsSource, StandingsStore};

pub use sources::jolpica::JolpicaClient;
pub use sources::wikipedia::WikipediaClient;
