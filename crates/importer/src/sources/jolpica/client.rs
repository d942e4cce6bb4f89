use std::time::Duration;

use storage::models::{CurrentConstructor, CurrentDriver};
use tracing::info;

use super::models::StandingsResponse;
use crate::Result;
use crate::sources::{get_checked, http_client};
use crate::traits::StandingsSource;

pub struct JolpicaClient {
    base_url: String,
    client: reqwest::Client,
}

impl JolpicaClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: http_client(timeout)?,
        })
    }

    pub fn standings_url(&self, season: i32, kind: &str) -> String {
        format!("{}/{}/{}", self.base_url, season, kind)
    }

    async fn fetch_standings(&self, season: i32, kind: &str) -> Result<StandingsResponse> {
        let url = self.standings_url(season, kind);
        let response = get_checked(&self.client, &url).await?;
        let body = response.text().await?;
        let data = serde_json::from_str::<StandingsResponse>(&body)?;
        Ok(data)
    }
}

#[async_trait::async_trait]
impl StandingsSource for JolpicaClient {
    async fn fetch_driver_standings(&self, season: i32) -> Result<Vec<CurrentDriver>> {
        let response = self.fetch_standings(season, "driverstandings").await?;

        let list = response.into_standings_list(season)?;

        info!(
            "Fetched {} driver standings (season {}, round {})",
            list.driver_standings.len(),
            season,
            list.round.as_deref().unwrap_or("?")
        );

        Ok(list
            .driver_standings
            .into_iter()
            .map(|standing| standing.into_current())
            .collect())
    }

    async fn fetch_constructor_standings(&self, season: i32) -> Result<Vec<CurrentConstructor>> {
        let response = self.fetch_standings(season, "constructorstandings").await?;

        let list = response.into_standings_list(season)?;

        info!(
            "Fetched {} constructor standings (season {}, round {})",
            list.constructor_standings.len(),
            season,
            list.round.as_deref().unwrap_or("?")
        );

        Ok(list
            .constructor_standings
            .into_iter()
            .map(|standing| standing.into_current())
            .collect())
    }
}
