use crate::errors::ParserError;
use crate::formats::{FireEventsParser, TemperatureParser, WeatherParser};
use crate::model::{CanonicalRecords, UploadFormat};

/// Entry point for one upload: classify the file by name, run the single
/// matching format parser over the raw bytes, and return the accepted
/// canonical records.
pub fn parse_upload(filename: &str, contents: &[u8]) -> Result<CanonicalRecords, ParserError> {
    match UploadFormat::detect(filename) {
        Some(UploadFormat::Temperature) => TemperatureParser
            .parse(contents)
            .map(CanonicalRecords::Temperature),
        Some(UploadFormat::FireEvents) => FireEventsParser
            .parse(contents)
            .map(CanonicalRecords::FireEvents),
        Some(UploadFormat::Weather) => WeatherParser
            .parse(contents)
            .map(CanonicalRecords::Weather),
        None => Err(ParserError::UnsupportedFile {
            filename: filename.to_string(),
        }),
    }
}
