use std::time::Duration;

use storage::models::NewHistoricalDriver;
use tracing::info;

use super::columns::decode_table;
use super::html::extract_tables;
use crate::sources::{get_checked, http_client};
use crate::traits::HistoricalSource;
use crate::{ImporterError, Result};

pub struct WikipediaClient {
    url: String,
    table_index: usize,
    client: reqwest::Client,
}

impl WikipediaClient {
    pub fn new(url: impl Into<String>, table_index: usize, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            table_index,
            client: http_client(timeout)?,
        })
    }

    pub async fn fetch_html(&self) -> Result<String> {
        let response = get_checked(&self.client, &self.url).await?;
        let html = response.text().await?;
        info!("Fetched {} bytes of HTML", html.len());
        Ok(html)
    }

    /// Decode the configured table of an already fetched page.
    pub fn parse_page(&self, html: &str) -> Result<Vec<NewHistoricalDriver>> {
        let tables = extract_tables(html);
        let found = tables.len();

        let table = tables
            .get(self.table_index)
            .ok_or(ImporterError::TableNotFound {
                index: self.table_index,
                found,
            })?;

        info!(
            "Decoding table {} of {} ({} rows)",
            self.table_index,
            found,
            table.rows.len()
        );

        Ok(decode_table(table))
    }
}

#[async_trait::async_trait]
impl HistoricalSource for WikipediaClient {
    async fn fetch_historical_drivers(&self) -> Result<Vec<NewHistoricalDriver>> {
        let html = self.fetch_html().await?;
        let rows = self.parse_page(&html)?;
        info!("Parsed {} historical driver rows", rows.len());
        Ok(rows)
    }
}
