//! Ergast-compatible standings API (api.jolpi.ca).

mod client;
mod models;

pub use client::JolpicaClient;
pub use models::*;
