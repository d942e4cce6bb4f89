mod current_constructor;
mod current_driver;
mod historical_driver;

pub use current_constructor::CurrentConstructor;
pub use current_driver::CurrentDriver;
pub use historical_driver::{HistoricalDriver, HistoricalDriverKey, NewHistoricalDriver};
