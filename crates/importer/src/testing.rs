//! In-memory store and canned sources for exercising the ingestion pipeline
//! without a database or network.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use storage::error::StorageError;
use storage::models::{
    CurrentConstructor, CurrentDriver, HistoricalDriver, HistoricalDriverKey, NewHistoricalDriver,
};

use crate::reconcile::{ConstructorChanges, DriverChanges};
use crate::sources::jolpica::StandingsResponse;
use crate::traits::{HistoricalSource, StandingsSource, StandingsStore};
use crate::{ImporterError, Result};

#[derive(Debug, Default, Clone)]
struct Tables {
    historical: Vec<HistoricalDriver>,
    drivers: BTreeMap<String, CurrentDriver>,
    constructors: BTreeMap<String, CurrentConstructor>,
}

/// Mirrors the Postgres store: primary keys enforced, every apply all-or-nothing.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn seed_drivers(&self, drivers: Vec<CurrentDriver>) {
        let mut tables = self.tables.lock().unwrap();
        for driver in drivers {
            tables.drivers.insert(driver.driver_id.clone(), driver);
        }
    }

    pub fn seed_constructors(&self, constructors: Vec<CurrentConstructor>) {
        let mut tables = self.tables.lock().unwrap();
        for constructor in constructors {
            tables
                .constructors
                .insert(constructor.constructor_id.clone(), constructor);
        }
    }

    pub fn historical_keys(&self) -> Vec<HistoricalDriverKey> {
        let tables = self.tables.lock().unwrap();
        let mut keys: Vec<HistoricalDriverKey> =
            tables.historical.iter().map(HistoricalDriver::key).collect();
        keys.sort_by(|a, b| {
            (&a.driver_name, &a.seasons, a.points).cmp(&(&b.driver_name, &b.seasons, b.points))
        });
        keys
    }

    pub fn driver(&self, driver_id: &str) -> Option<CurrentDriver> {
        self.tables.lock().unwrap().drivers.get(driver_id).cloned()
    }

    pub fn active_driver_ids(&self) -> Vec<String> {
        self.tables
            .lock()
            .unwrap()
            .drivers
            .values()
            .filter(|driver| driver.active)
            .map(|driver| driver.driver_id.clone())
            .collect()
    }

    pub fn constructor(&self, constructor_id: &str) -> Option<CurrentConstructor> {
        self.tables
            .lock()
            .unwrap()
            .constructors
            .get(constructor_id)
            .cloned()
    }

    pub fn constructor_ids(&self) -> Vec<String> {
        self.tables
            .lock()
            .unwrap()
            .constructors
            .keys()
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl StandingsStore for MemoryStore {
    async fn find_historical(&self, key: &HistoricalDriverKey) -> Result<Option<HistoricalDriver>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .historical
            .iter()
            .find(|row| &row.key() == key)
            .cloned())
    }

    async fn insert_historical(&self, rows: &[NewHistoricalDriver]) -> Result<u64> {
        let mut tables = self.tables.lock().unwrap();
        let imported_at = chrono::Utc::now().naive_utc();

        for row in rows {
            let id = tables.historical.len() as i64 + 1;
            tables.historical.push(HistoricalDriver {
                id,
                driver_name: row.driver_name.clone(),
                nationality: row.nationality.clone(),
                seasons: row.seasons.clone(),
                drivers_championships: row.drivers_championships.clone(),
                race_entries: row.race_entries,
                race_starts: row.race_starts,
                pole_positions: row.pole_positions,
                race_wins: row.race_wins,
                podiums: row.podiums,
                fastest_laps: row.fastest_laps,
                points: row.points,
                imported_at,
            });
        }

        Ok(rows.len() as u64)
    }

    async fn load_drivers(&self) -> Result<Vec<CurrentDriver>> {
        Ok(self.tables.lock().unwrap().drivers.values().cloned().collect())
    }

    async fn apply_driver_changes(&self, changes: &DriverChanges) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let mut staged = tables.drivers.clone();

        for driver in &changes.inserts {
            if staged.contains_key(&driver.driver_id) {
                return Err(StorageError::ConstraintViolation(driver.driver_id.clone()).into());
            }
            staged.insert(driver.driver_id.clone(), driver.clone());
        }
        for driver in &changes.updates {
            let Some(row) = staged.get_mut(&driver.driver_id) else {
                return Err(StorageError::NotFound.into());
            };
            *row = CurrentDriver {
                date_of_birth: row.date_of_birth,
                nationality: row.nationality.clone(),
                ..driver.clone()
            };
        }
        for driver_id in &changes.deactivations {
            let Some(row) = staged.get_mut(driver_id) else {
                return Err(StorageError::NotFound.into());
            };
            row.active = false;
        }

        tables.drivers = staged;
        Ok(())
    }

    async fn load_constructors(&self) -> Result<Vec<CurrentConstructor>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .constructors
            .values()
            .cloned()
            .collect())
    }

    async fn apply_constructor_changes(&self, changes: &ConstructorChanges) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let mut staged = tables.constructors.clone();

        for constructor in &changes.inserts {
            if staged.contains_key(&constructor.constructor_id) {
                return Err(
                    StorageError::ConstraintViolation(constructor.constructor_id.clone()).into(),
                );
            }
            staged.insert(constructor.constructor_id.clone(), constructor.clone());
        }
        for constructor in &changes.updates {
            let Some(row) = staged.get_mut(&constructor.constructor_id) else {
                return Err(StorageError::NotFound.into());
            };
            row.points = constructor.points;
            row.position = constructor.position;
        }

        tables.constructors = staged;
        Ok(())
    }
}

/// Season payload with nothing raced yet.
const UNPUBLISHED_SEASON: &str =
    r#"{"MRData": {"StandingsTable": {"season": "2025", "StandingsLists": []}}}"#;

/// Canned standings; `unavailable()` fails every fetch like a 503,
/// `unpublished()` answers with an empty `StandingsLists`.
#[derive(Debug, Default)]
pub struct FakeStandings {
    drivers: Vec<CurrentDriver>,
    constructors: Vec<CurrentConstructor>,
    unavailable: bool,
    unpublished: bool,
}

impl FakeStandings {
    pub fn drivers(drivers: Vec<CurrentDriver>) -> Self {
        Self {
            drivers,
            ..Self::default()
        }
    }

    pub fn constructors(constructors: Vec<CurrentConstructor>) -> Self {
        Self {
            constructors,
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn unpublished() -> Self {
        Self {
            unpublished: true,
            ..Self::default()
        }
    }

    fn check(&self, season: i32, kind: &str) -> Result<()> {
        if self.unavailable {
            return Err(ImporterError::SourceUnavailable {
                url: format!("http://standings.test/{season}/{kind}"),
                status: 503,
            });
        }
        if self.unpublished {
            let response: StandingsResponse = serde_json::from_str(UNPUBLISHED_SEASON)?;
            response.into_standings_list(season)?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl StandingsSource for FakeStandings {
    async fn fetch_driver_standings(&self, season: i32) -> Result<Vec<CurrentDriver>> {
        self.check(season, "driverstandings")?;
        Ok(self.drivers.clone())
    }

    async fn fetch_constructor_standings(&self, season: i32) -> Result<Vec<CurrentConstructor>> {
        self.check(season, "constructorstandings")?;
        Ok(self.constructors.clone())
    }
}

#[derive(Debug, Default)]
pub struct FakeHistorical {
    rows: Vec<NewHistoricalDriver>,
}

impl FakeHistorical {
    pub fn new(rows: Vec<NewHistoricalDriver>) -> Self {
        Self { rows }
    }
}

#[async_trait::async_trait]
impl HistoricalSource for FakeHistorical {
    async fn fetch_historical_drivers(&self) -> Result<Vec<NewHistoricalDriver>> {
        Ok(self.rows.clone())
    }
}

pub fn driver(id: &str, position: i32, points: i64, active: bool) -> CurrentDriver {
    CurrentDriver {
        driver_id: id.to_string(),
        permanent_number: position + 1,
        code: id.chars().take(3).collect::<String>().to_uppercase(),
        full_name: format!("Driver {id}"),
        date_of_birth: NaiveDate::from_ymd_opt(1995, 6, 15),
        nationality: "British".to_string(),
        points: Decimal::new(points, 0),
        position,
        team: "Williams".to_string(),
        active,
    }
}

pub fn constructor(id: &str, position: i32, points: i64) -> CurrentConstructor {
    CurrentConstructor {
        constructor_id: id.to_string(),
        name: id.to_uppercase(),
        nationality: "British".to_string(),
        points: Decimal::new(points, 0),
        position,
    }
}

pub fn historical(name: &str, seasons: &str, points: i64) -> NewHistoricalDriver {
    NewHistoricalDriver {
        driver_name: name.to_string(),
        nationality: String::new(),
        seasons: seasons.to_string(),
        drivers_championships: "0".to_string(),
        race_entries: 0,
        race_starts: 0,
        pole_positions: 0,
        race_wins: 0,
        podiums: 0,
        fastest_laps: 0,
        points: Decimal::new(points, 0),
    }
}
