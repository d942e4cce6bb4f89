use std::collections::{HashMap, HashSet};

use storage::models::CurrentDriver;
use tracing::warn;

/// Writes needed to bring the driver table in line with one fetch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DriverChanges {
    pub inserts: Vec<CurrentDriver>,
    /// Full replacement rows, always with `active = true`.
    pub updates: Vec<CurrentDriver>,
    /// Ids of previously active drivers absent from the fetch.
    pub deactivations: Vec<String>,
    pub unchanged: usize,
}

impl DriverChanges {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deactivations.is_empty()
    }
}

/// Diff a fresh driver fetch against the stored rows.
///
/// After applying the result, the active rows are exactly the fetched ids.
/// Date of birth and nationality of known drivers are kept as stored.
pub fn diff_drivers(existing: Vec<CurrentDriver>, fetched: Vec<CurrentDriver>) -> DriverChanges {
    let mut stored: HashMap<String, CurrentDriver> = existing
        .into_iter()
        .map(|driver| (driver.driver_id.clone(), driver))
        .collect();
    let mut seen = HashSet::with_capacity(fetched.len());
    let mut changes = DriverChanges::default();

    for incoming in fetched {
        if !seen.insert(incoming.driver_id.clone()) {
            warn!("Driver '{}' listed twice in standings, keeping the first entry", incoming.driver_id);
            continue;
        }

        match stored.get(&incoming.driver_id) {
            Some(current) => {
                if !current.active || current.tracked_fields_differ(&incoming) {
                    changes.updates.push(CurrentDriver {
                        date_of_birth: current.date_of_birth,
                        nationality: current.nationality.clone(),
                        active: true,
                        ..incoming
                    });
                } else {
                    changes.unchanged += 1;
                }
            }
            None => changes.inserts.push(CurrentDriver {
                active: true,
                ..incoming
            }),
        }
    }

    let mut retired: Vec<String> = stored
        .drain()
        .filter(|(id, driver)| driver.active && !seen.contains(id))
        .map(|(id, _)| id)
        .collect();
    retired.sort();
    changes.deactivations = retired;

    changes
}
