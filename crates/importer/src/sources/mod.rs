pub mod jolpica;
pub mod wikipedia;

use std::time::Duration;

use crate::config::USER_AGENT;
use crate::{ImporterError, Result};

/// Client shared by both sources: fixed user agent and a request timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// GET `url`, turning any non-success status into `SourceUnavailable`.
pub(crate) async fn get_checked(client: &reqwest::Client, url: &str) -> Result<reqwest::Response> {
    tracing::info!("Fetching {}", url);

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(ImporterError::SourceUnavailable {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    Ok(response)
}
