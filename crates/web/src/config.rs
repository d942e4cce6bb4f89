use std::time::Duration;

use anyhow::{Context, Result, bail};
use importer::IngestionConfig;
use importer::config::{
    DEFAULT_HISTORICAL_TABLE_INDEX, DEFAULT_HISTORICAL_URL, DEFAULT_HTTP_TIMEOUT,
    DEFAULT_STANDINGS_API_URL, current_season,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub ingestion: IngestionConfig,
    pub ingest_on_startup: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let ingestion = IngestionConfig {
            season: match var("F1_SEASON") {
                Some(season) => season.trim().parse().context("F1_SEASON must be a year")?,
                None => current_season(),
            },
            standings_api_url: var("STANDINGS_API_URL")
                .unwrap_or_else(|| DEFAULT_STANDINGS_API_URL.to_string()),
            historical_url: var("HISTORICAL_DRIVERS_URL")
                .unwrap_or_else(|| DEFAULT_HISTORICAL_URL.to_string()),
            historical_table_index: match var("HISTORICAL_TABLE_INDEX") {
                Some(index) => index
                    .trim()
                    .parse()
                    .context("HISTORICAL_TABLE_INDEX must be a non-negative number")?,
                None => DEFAULT_HISTORICAL_TABLE_INDEX,
            },
            http_timeout: match var("HTTP_TIMEOUT_SECS") {
                Some(secs) => Duration::from_secs(
                    secs.trim()
                        .parse()
                        .context("HTTP_TIMEOUT_SECS must be a number of seconds")?,
                ),
                None => DEFAULT_HTTP_TIMEOUT,
            },
        };

        Ok(Self {
            host: var("HOST").context("Cannot load HOST env variable")?,
            port: var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: var("DATABASE_URL").context("Cannot load DATABASE_URL env variable")?,
            api_keys: var("API_KEYS").unwrap_or_default(),
            ingestion,
            ingest_on_startup: match var("INGEST_ON_STARTUP") {
                Some(flag) => parse_flag(&flag).context("INGEST_ON_STARTUP must be true or false")?,
                None => true,
            },
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognized flag '{}'", other),
    }
}
