use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A stored line of the all-time driver statistics archive.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HistoricalDriver {
    pub id: i64,
    pub driver_name: String,
    pub nationality: String,
    pub seasons: String,
    pub drivers_championships: String,
    pub race_entries: i32,
    pub race_starts: i32,
    pub pole_positions: i32,
    pub race_wins: i32,
    pub podiums: i32,
    pub fastest_laps: i32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub points: Decimal,
    pub imported_at: NaiveDateTime,
}

impl HistoricalDriver {
    pub fn key(&self) -> HistoricalDriverKey {
        HistoricalDriverKey {
            driver_name: self.driver_name.clone(),
            seasons: self.seasons.clone(),
            points: self.points,
        }
    }
}

/// A normalized archive line that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoricalDriver {
    pub driver_name: String,
    pub nationality: String,
    pub seasons: String,
    pub drivers_championships: String,
    pub race_entries: i32,
    pub race_starts: i32,
    pub pole_positions: i32,
    pub race_wins: i32,
    pub podiums: i32,
    pub fastest_laps: i32,
    pub points: Decimal,
}

impl NewHistoricalDriver {
    pub fn key(&self) -> HistoricalDriverKey {
        HistoricalDriverKey {
            driver_name: self.driver_name.clone(),
            seasons: self.seasons.clone(),
            points: self.points,
        }
    }
}

/// Natural key of the archive. The source has no stable id for historical
/// entries, so `(name, seasons, points)` stands in for one.
///
/// Points move whenever an active driver scores, so a new season produces a
/// new key and therefore a new row for that driver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoricalDriverKey {
    pub driver_name: String,
    pub seasons: String,
    pub points: Decimal,
}
