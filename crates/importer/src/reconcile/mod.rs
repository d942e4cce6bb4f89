//! Snapshot → diff → apply.
//!
//! Everything in here is pure: callers load the stored snapshot, hand it over
//! with the fresh fetch, and get back the complete set of writes to commit.

mod constructors;
mod drivers;
mod historical;

pub use constructors::{ConstructorChanges, diff_constructors};
pub use drivers::{DriverChanges, diff_drivers};
pub use historical::{HistoricalBatch, StageOutcome};
