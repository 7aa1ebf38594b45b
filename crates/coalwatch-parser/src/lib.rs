pub mod errors;
pub mod formats;
pub mod model;
mod registry;

pub use errors::ParserError;
pub use model::{
    CanonicalRecords, FireEvent, IngestReport, TemperatureReading, UploadFormat,
    WeatherObservation,
};
pub use registry::parse_upload;

#[cfg(test)]
mod tests;
