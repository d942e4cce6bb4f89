use std::collections::{HashMap, HashSet};

use storage::models::CurrentConstructor;
use tracing::warn;

/// Writes needed to bring the constructor table in line with one fetch.
///
/// There is no deactivation list: constructors missing from a fetch keep
/// their last stored standing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConstructorChanges {
    pub inserts: Vec<CurrentConstructor>,
    /// Stored rows with refreshed points and position.
    pub updates: Vec<CurrentConstructor>,
    pub unchanged: usize,
}

impl ConstructorChanges {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty()
    }
}

pub fn diff_constructors(
    existing: Vec<CurrentConstructor>,
    fetched: Vec<CurrentConstructor>,
) -> ConstructorChanges {
    let stored: HashMap<String, CurrentConstructor> = existing
        .into_iter()
        .map(|constructor| (constructor.constructor_id.clone(), constructor))
        .collect();
    let mut seen = HashSet::with_capacity(fetched.len());
    let mut changes = ConstructorChanges::default();

    for incoming in fetched {
        if !seen.insert(incoming.constructor_id.clone()) {
            warn!(
                "Constructor '{}' listed twice in standings, keeping the first entry",
                incoming.constructor_id
            );
            continue;
        }

        match stored.get(&incoming.constructor_id) {
            Some(current)
                if current.points != incoming.points || current.position != incoming.position =>
            {
                changes.updates.push(CurrentConstructor {
                    points: incoming.points,
                    position: incoming.position,
                    ..current.clone()
                });
            }
            Some(_) => changes.unchanged += 1,
            None => changes.inserts.push(incoming),
        }
    }

    changes
}
