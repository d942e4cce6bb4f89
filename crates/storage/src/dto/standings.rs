use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{CurrentConstructor, CurrentDriver};

/// Driver standing as served to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentDriverResponse {
    pub id: String,
    pub perm_number: i32,
    pub code: String,
    pub full_name: String,
    pub dob: Option<NaiveDate>,
    pub nationality: String,
    pub active: bool,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub curr_points: Decimal,
    pub curr_pos: i32,
    pub curr_team: String,
}

impl From<CurrentDriver> for CurrentDriverResponse {
    fn from(driver: CurrentDriver) -> Self {
        Self {
            id: driver.driver_id,
            perm_number: driver.permanent_number,
            code: driver.code,
            full_name: driver.full_name,
            dob: driver.date_of_birth,
            nationality: driver.nationality,
            active: driver.active,
            curr_points: driver.points,
            curr_pos: driver.position,
            curr_team: driver.team,
        }
    }
}

/// Constructor standing as served to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentConstructorResponse {
    pub id: String,
    pub name: String,
    pub nationality: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub curr_points: Decimal,
    pub curr_pos: i32,
}

impl From<CurrentConstructor> for CurrentConstructorResponse {
    fn from(constructor: CurrentConstructor) -> Self {
        Self {
            id: constructor.constructor_id,
            name: constructor.name,
            nationality: constructor.nationality,
            curr_points: constructor.points,
            curr_pos: constructor.position,
        }
    }
}
