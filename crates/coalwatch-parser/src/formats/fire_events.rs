use crate::errors::ParserError;
use crate::model::FireEvent;

use super::{cell_string, cell_text, parse_datetime, parse_i64, read_table};

/// Fire-event register. Fixed eight-column layout {prepared_date, cargo,
/// weight, warehouse, start_date, end_date, pile_formed_at, pile}. Upstream
/// spreadsheets sometimes carry a header line and sometimes do not; row 0 is
/// treated as a header only when it contains the known header label.
pub struct FireEventsParser;

impl FireEventsParser {
    const NAME: &'static str = "fire-events";
    const MIN_COLUMNS: usize = 8;

    /// Header label on the prepared-date column of files that include one.
    const HEADER_MARKER: &'static str = "Дата составления";

    pub fn parse(&self, contents: &[u8]) -> Result<Vec<FireEvent>, ParserError> {
        let rows = read_table(contents);
        if rows.is_empty() {
            return Err(ParserError::EmptyFile {
                format: Self::NAME,
            });
        }
        let width = rows[0].len();
        if width < Self::MIN_COLUMNS {
            return Err(ParserError::NotEnoughColumns {
                format: Self::NAME,
                found: width,
                expected: Self::MIN_COLUMNS,
            });
        }

        let has_header = rows[0].iter().any(|cell| cell.contains(Self::HEADER_MARKER));
        let data_rows = if has_header { &rows[1..] } else { &rows[..] };

        let mut events = Vec::with_capacity(data_rows.len());
        for row in data_rows {
            if row.len() < Self::MIN_COLUMNS {
                continue;
            }
            let Some(warehouse) = parse_i64(&row[3]) else {
                continue;
            };
            let Some(fire_start) = parse_datetime(&row[4]) else {
                continue;
            };
            let Some(pile_id) = cell_string(&row[7]) else {
                continue;
            };
            // prepared_date (0), weight (2), and end_date (5) are not kept.
            events.push(FireEvent {
                warehouse,
                pile_id,
                coal_grade: cell_text(&row[1]),
                fire_start,
                pile_formed_at: parse_datetime(&row[6]),
            });
        }
        Ok(events)
    }
}
