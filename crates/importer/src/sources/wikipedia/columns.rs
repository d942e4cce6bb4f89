use storage::models::NewHistoricalDriver;
use tracing::{debug, warn};

use super::html::{HtmlCell, HtmlTable};
use crate::normalize::{clean_name, normalize_ws, parse_count, parse_points, strip_brackets};

/// Canonical fields of the all-time statistics table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoricalColumn {
    DriverName,
    Nationality,
    Seasons,
    Championships,
    RaceEntries,
    RaceStarts,
    PolePositions,
    RaceWins,
    Podiums,
    FastestLaps,
    Points,
}

/// Source header label → canonical field.
const COLUMN_LABELS: &[(&str, HistoricalColumn)] = &[
    ("driver name", HistoricalColumn::DriverName),
    ("nationality", HistoricalColumn::Nationality),
    ("seasons competed", HistoricalColumn::Seasons),
    ("drivers' championships", HistoricalColumn::Championships),
    ("race entries", HistoricalColumn::RaceEntries),
    ("race starts", HistoricalColumn::RaceStarts),
    ("pole positions", HistoricalColumn::PolePositions),
    ("race wins", HistoricalColumn::RaceWins),
    ("podiums", HistoricalColumn::Podiums),
    ("fastest laps", HistoricalColumn::FastestLaps),
    ("points", HistoricalColumn::Points),
];

impl HistoricalColumn {
    pub const ALL: [HistoricalColumn; 11] = [
        HistoricalColumn::DriverName,
        HistoricalColumn::Nationality,
        HistoricalColumn::Seasons,
        HistoricalColumn::Championships,
        HistoricalColumn::RaceEntries,
        HistoricalColumn::RaceStarts,
        HistoricalColumn::PolePositions,
        HistoricalColumn::RaceWins,
        HistoricalColumn::Podiums,
        HistoricalColumn::FastestLaps,
        HistoricalColumn::Points,
    ];

    /// Match a header cell, ignoring case, footnote markers and whitespace.
    pub fn from_header(header: &str) -> Option<Self> {
        let label = normalize_ws(&strip_brackets(header))
            .to_lowercase()
            .replace('’', "'");
        COLUMN_LABELS
            .iter()
            .find(|(known, _)| *known == label)
            .map(|(_, column)| *column)
    }

    pub fn label(self) -> &'static str {
        COLUMN_LABELS
            .iter()
            .find(|(_, column)| *column == self)
            .map(|(label, _)| *label)
            .unwrap_or("")
    }
}

/// Which cell index holds each canonical field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    positions: Vec<(HistoricalColumn, usize)>,
}

impl ColumnLayout {
    /// Build the layout from the header row. The first occurrence of a
    /// repeated label wins.
    pub fn from_header(header: &[HtmlCell]) -> Self {
        let mut positions: Vec<(HistoricalColumn, usize)> = Vec::new();

        for (index, cell) in header.iter().enumerate() {
            match HistoricalColumn::from_header(&cell.text) {
                Some(column) if positions.iter().any(|(known, _)| *known == column) => {
                    debug!("Ignoring repeated column '{}' at {}", cell.text, index);
                }
                Some(column) => positions.push((column, index)),
                None => warn!("Dropping unrecognized column '{}'", cell.text),
            }
        }

        for column in HistoricalColumn::ALL {
            if !positions.iter().any(|(known, _)| *known == column) {
                warn!("Column '{}' missing from table, using defaults", column.label());
            }
        }

        Self { positions }
    }

    pub fn index_of(&self, column: HistoricalColumn) -> Option<usize> {
        self.positions
            .iter()
            .find(|(known, _)| *known == column)
            .map(|(_, index)| *index)
    }

    fn cell<'r>(&self, row: &'r [HtmlCell], column: HistoricalColumn) -> &'r str {
        self.index_of(column)
            .and_then(|index| row.get(index))
            .map(|cell| cell.text.as_str())
            .unwrap_or("")
    }

    pub fn decode_row(&self, row: &[HtmlCell]) -> NewHistoricalDriver {
        let text = |column| self.cell(row, column);

        NewHistoricalDriver {
            driver_name: clean_name(text(HistoricalColumn::DriverName)),
            nationality: normalize_ws(&strip_brackets(text(HistoricalColumn::Nationality))),
            seasons: normalize_ws(&strip_brackets(text(HistoricalColumn::Seasons))),
            drivers_championships: normalize_ws(&strip_brackets(text(
                HistoricalColumn::Championships,
            ))),
            race_entries: parse_count(&strip_brackets(text(HistoricalColumn::RaceEntries))),
            race_starts: parse_count(&strip_brackets(text(HistoricalColumn::RaceStarts))),
            pole_positions: parse_count(&strip_brackets(text(HistoricalColumn::PolePositions))),
            race_wins: parse_count(&strip_brackets(text(HistoricalColumn::RaceWins))),
            podiums: parse_count(&strip_brackets(text(HistoricalColumn::Podiums))),
            fastest_laps: parse_count(&strip_brackets(text(HistoricalColumn::FastestLaps))),
            points: parse_points(text(HistoricalColumn::Points)),
        }
    }
}

/// Decode every data row of the statistics table, in source order.
pub fn decode_table(table: &HtmlTable) -> Vec<NewHistoricalDriver> {
    let Some(header) = table.header() else {
        warn!("Historical table has no rows");
        return Vec::new();
    };

    let layout = ColumnLayout::from_header(header);
    let rows: Vec<NewHistoricalDriver> = table.body().map(|row| layout.decode_row(row)).collect();

    let unnamed = rows.iter().filter(|row| row.driver_name.is_empty()).count();
    if unnamed > 0 {
        warn!("{} historical row(s) have an empty driver name", unnamed);
    }

    rows
}
