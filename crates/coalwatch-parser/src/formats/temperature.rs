use crate::errors::ParserError;
use crate::model::TemperatureReading;

use super::{cell_text, parse_datetime, parse_f64, parse_i64, read_table};

/// Warehouse temperature log. Positional layout, no header row:
/// {warehouse, pile, grade, max_temp, picket, date, shift}, anything past
/// column seven ignored.
pub struct TemperatureParser;

impl TemperatureParser {
    const NAME: &'static str = "temperature";
    const MIN_COLUMNS: usize = 7;

    pub fn parse(&self, contents: &[u8]) -> Result<Vec<TemperatureReading>, ParserError> {
        let rows = read_table(contents);
        let width = rows.first().map(|row| row.len()).unwrap_or(0);
        if width < Self::MIN_COLUMNS {
            return Err(ParserError::NotEnoughColumns {
                format: Self::NAME,
                found: width,
                expected: Self::MIN_COLUMNS,
            });
        }

        let mut readings = Vec::with_capacity(rows.len());
        for row in &rows {
            if row.len() < Self::MIN_COLUMNS {
                continue;
            }
            let Some(warehouse) = parse_i64(&row[0]) else {
                continue;
            };
            let Some(max_temp) = parse_f64(&row[3]) else {
                continue;
            };
            // row[4] is the picket marker; positional only, never stored.
            let Some(measurement_date) = parse_datetime(&row[5]) else {
                continue;
            };
            let Some(shift) = parse_i64(&row[6]) else {
                continue;
            };
            readings.push(TemperatureReading {
                warehouse,
                pile_id: cell_text(&row[1]),
                coal_grade: cell_text(&row[2]),
                max_temp,
                measurement_date,
                shift,
            });
        }
        Ok(readings)
    }
}
