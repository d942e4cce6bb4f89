use serde::{Deserialize, Serialize};
use storage::models::{CurrentConstructor, CurrentDriver};
use tracing::warn;

use crate::normalize::{normalize_ws, parse_date, parse_optional_int, parse_points};
use crate::{ImporterError, Result};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StandingsResponse {
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

impl StandingsResponse {
    /// The source wraps one season's standings in a list; only the first
    /// entry is ever expected. An empty list means nothing has been raced
    /// yet, which is a failed fetch rather than an empty standings table.
    pub fn into_standings_list(self, season: i32) -> Result<StandingsList> {
        self.mr_data
            .standings_table
            .standings_lists
            .into_iter()
            .next()
            .ok_or(ImporterError::NoStandings { season })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MrData {
    #[serde(rename = "StandingsTable")]
    pub standings_table: StandingsTable,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StandingsTable {
    pub season: Option<String>,
    #[serde(rename = "StandingsLists", default)]
    pub standings_lists: Vec<StandingsList>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StandingsList {
    pub season: Option<String>,
    pub round: Option<String>,
    #[serde(rename = "DriverStandings", default)]
    pub driver_standings: Vec<DriverStanding>,
    #[serde(rename = "ConstructorStandings", default)]
    pub constructor_standings: Vec<ConstructorStanding>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DriverStanding {
    pub position: Option<String>,
    #[serde(rename = "positionText")]
    pub position_text: Option<String>,
    pub points: String,
    pub wins: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructors", default)]
    pub constructors: Vec<Constructor>,
}

impl DriverStanding {
    /// The team the driver currently races for: the last constructor listed,
    /// which reflects a mid-season transfer.
    pub fn current_team(&self) -> Option<&Constructor> {
        self.constructors.last()
    }

    pub fn into_current(self) -> CurrentDriver {
        let team = match self.current_team() {
            Some(constructor) => constructor.name.clone(),
            None => {
                warn!("Driver '{}' has no constructor listed", self.driver.driver_id);
                String::new()
            }
        };
        let full_name = self.driver.full_name();

        CurrentDriver {
            permanent_number: parse_optional_int(
                self.driver.permanent_number.as_deref(),
                "permanent number",
            ),
            code: self.driver.code.unwrap_or_default(),
            full_name,
            date_of_birth: parse_date(self.driver.date_of_birth.as_deref()),
            nationality: self.driver.nationality.unwrap_or_default(),
            points: parse_points(&self.points),
            position: parse_optional_int(self.position.as_deref(), "position"),
            team,
            active: true,
            driver_id: self.driver.driver_id,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Driver {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    #[serde(rename = "permanentNumber")]
    pub permanent_number: Option<String>,
    pub code: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: Option<String>,
    pub nationality: Option<String>,
}

impl Driver {
    pub fn full_name(&self) -> String {
        normalize_ws(&format!("{} {}", self.given_name, self.family_name))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConstructorStanding {
    pub position: Option<String>,
    #[serde(rename = "positionText")]
    pub position_text: Option<String>,
    pub points: String,
    pub wins: Option<String>,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
}

impl ConstructorStanding {
    pub fn into_current(self) -> CurrentConstructor {
        CurrentConstructor {
            constructor_id: self.constructor.constructor_id,
            name: self.constructor.name,
            nationality: self.constructor.nationality.unwrap_or_default(),
            points: parse_points(&self.points),
            position: parse_optional_int(self.position.as_deref(), "position"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Constructor {
    #[serde(rename = "constructorId")]
    pub constructor_id: String,
    pub url: Option<String>,
    pub name: String,
    pub nationality: Option<String>,
}
