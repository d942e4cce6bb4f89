//! All-time driver statistics scraped from the "List of Formula One drivers" page.

mod client;
pub mod columns;
pub mod html;

pub use client::WikipediaClient;
pub use columns::{ColumnLayout, HistoricalColumn, decode_table};
pub use html::{HtmlCell, HtmlTable, extract_tables};
