use crate::errors::ParserError;
use crate::model::WeatherObservation;

use super::{cell_string, parse_datetime, parse_f64, parse_i64, read_table};

/// Hourly weather export. Positional layout {datetime, temp, pressure,
/// humidity, precipitation, wind_dir, wind_speed, v_max, cloudcover,
/// visibility, weather_code}; v_max and anything past column eleven are
/// ignored.
pub struct WeatherParser;

impl WeatherParser {
    const NAME: &'static str = "weather";
    const MIN_COLUMNS: usize = 11;

    pub fn parse(&self, contents: &[u8]) -> Result<Vec<WeatherObservation>, ParserError> {
        let rows = read_table(contents);
        let width = rows.first().map(|row| row.len()).unwrap_or(0);
        if width < Self::MIN_COLUMNS {
            return Err(ParserError::NotEnoughColumns {
                format: Self::NAME,
                found: width,
                expected: Self::MIN_COLUMNS,
            });
        }

        let mut observations = Vec::with_capacity(rows.len());
        for row in &rows {
            if row.len() < Self::MIN_COLUMNS {
                continue;
            }
            let Some(datetime) = parse_datetime(&row[0]) else {
                continue;
            };
            let Some(temp) = parse_f64(&row[1]) else {
                continue;
            };
            let Some(humidity) = parse_i64(&row[3]) else {
                continue;
            };
            observations.push(WeatherObservation {
                datetime,
                temp,
                pressure: parse_f64(&row[2]),
                humidity,
                precipitation: parse_f64(&row[4]),
                wind_dir: cell_string(&row[5]),
                wind_speed: parse_f64(&row[6]),
                cloudcover: cell_string(&row[8]),
                visibility: cell_string(&row[9]),
                weather_code: cell_string(&row[10]),
            });
        }
        Ok(observations)
    }
}
