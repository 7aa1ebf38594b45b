mod common;
mod fire_events;
mod temperature;
mod weather;

pub use fire_events::FireEventsParser;
pub use temperature::TemperatureParser;
pub use weather::WeatherParser;

pub(crate) use common::{
    cell_string, cell_text, parse_datetime, parse_f64, parse_i64, read_table,
};
