use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Current-season driver standing, keyed by the source's driver id.
///
/// Rows are never deleted. A driver missing from the latest snapshot is kept
/// with `active = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CurrentDriver {
    pub driver_id: String,
    pub permanent_number: i32,
    pub code: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: String,
    pub points: Decimal,
    pub position: i32,
    pub team: String,
    pub active: bool,
}

impl CurrentDriver {
    /// True when any field refreshed on every sync differs from `other`.
    ///
    /// Date of birth and nationality are set on insert only and are ignored here.
    pub fn tracked_fields_differ(&self, other: &CurrentDriver) -> bool {
        self.team != other.team
            || self.full_name != other.full_name
            || self.code != other.code
            || self.permanent_number != other.permanent_number
            || self.points != other.points
            || self.position != other.position
    }
}
