use serde::Deserialize;
use utoipa::IntoParams;

use super::common::PaginationParams;

/// Query string of the historical archive listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoricalDriverFilter {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// Case-insensitive substring match on the driver name
    pub name: Option<String>,
}

impl HistoricalDriverFilter {
    pub fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        }
    }

    pub fn name_pattern(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| format!("%{}%", n.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")))
    }

    pub fn validate(&self) -> Result<(), String> {
        self.pagination().validate()?;

        if let Some(name) = &self.name
            && name.chars().count() > 100
        {
            return Err("name must be at most 100 characters".to_string());
        }

        Ok(())
    }
}
