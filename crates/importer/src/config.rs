use std::time::Duration;

use chrono::Datelike;

pub const DEFAULT_STANDINGS_API_URL: &str = "https://api.jolpi.ca/ergast/f1";
pub const DEFAULT_HISTORICAL_URL: &str = "https://en.wikipedia.org/wiki/List_of_Formula_One_drivers";
/// Position of the all-time statistics table among the page's tables.
/// Breaks silently if the page gains or loses a table above it.
pub const DEFAULT_HISTORICAL_TABLE_INDEX: usize = 2;
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
pub const USER_AGENT: &str = "F1 Standings Importer/1.0";

/// Settings shared by every ingestion entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionConfig {
    pub season: i32,
    pub standings_api_url: String,
    pub historical_url: String,
    pub historical_table_index: usize,
    pub http_timeout: Duration,
}

impl IngestionConfig {
    pub fn with_season(mut self, season: i32) -> Self {
        self.season = season;
        self
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            season: current_season(),
            standings_api_url: DEFAULT_STANDINGS_API_URL.to_string(),
            historical_url: DEFAULT_HISTORICAL_URL.to_string(),
            historical_table_index: DEFAULT_HISTORICAL_TABLE_INDEX,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

/// The calendar year in UTC, which is the championship season being raced.
pub fn current_season() -> i32 {
    chrono::Utc::now().year()
}
