use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),

    #[error("Source unavailable: {url} returned HTTP {status}")]
    SourceUnavailable { url: String, status: u16 },

    #[error("No standings published for season {season}")]
    NoStandings { season: i32 },

    #[error("Table {index} not found: page has {found} table(s)")]
    TableNotFound { index: usize, found: usize },

    #[error("An ingestion run is already in progress")]
    IngestionInProgress,
}
