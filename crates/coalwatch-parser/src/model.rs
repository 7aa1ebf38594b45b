use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The three source file shapes the ingestion pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadFormat {
    Temperature,
    FireEvents,
    Weather,
}

impl UploadFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadFormat::Temperature => "temperature",
            UploadFormat::FireEvents => "fire-events",
            UploadFormat::Weather => "weather",
        }
    }

    /// Classifies an uploaded file by case-insensitive keyword match against
    /// its name. The match order is load-bearing: a name mentioning two
    /// keywords resolves to the first hit (temperature, then fire, then
    /// weather), matching the only ordering observed upstream.
    pub fn detect(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        if lower.contains("temperature") {
            Some(UploadFormat::Temperature)
        } else if lower.contains("fire") {
            Some(UploadFormat::FireEvents)
        } else if lower.contains("weather") {
            Some(UploadFormat::Weather)
        } else {
            None
        }
    }
}

/// One accepted temperature-log row. `picket` from the source layout is a
/// positional marker only and is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub warehouse: i64,
    pub pile_id: String,
    pub coal_grade: String,
    pub max_temp: f64,
    pub measurement_date: NaiveDateTime,
    pub shift: i64,
}

/// One accepted fire-event row. `coal_grade` comes from the source's cargo
/// column; the prepared-date, weight, and end-date columns are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireEvent {
    pub warehouse: i64,
    pub pile_id: String,
    pub coal_grade: String,
    pub fire_start: NaiveDateTime,
    pub pile_formed_at: Option<NaiveDateTime>,
}

/// One accepted weather observation. Everything past the three required
/// fields stores as null when missing or unparseable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub datetime: NaiveDateTime,
    pub temp: f64,
    pub pressure: Option<f64>,
    pub humidity: i64,
    pub precipitation: Option<f64>,
    pub wind_dir: Option<String>,
    pub wind_speed: Option<f64>,
    pub cloudcover: Option<String>,
    pub visibility: Option<String>,
    pub weather_code: Option<String>,
}

/// All records accepted from one upload, ready for a single storage batch.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalRecords {
    Temperature(Vec<TemperatureReading>),
    FireEvents(Vec<FireEvent>),
    Weather(Vec<WeatherObservation>),
}

impl CanonicalRecords {
    pub fn format(&self) -> UploadFormat {
        match self {
            CanonicalRecords::Temperature(_) => UploadFormat::Temperature,
            CanonicalRecords::FireEvents(_) => UploadFormat::FireEvents,
            CanonicalRecords::Weather(_) => UploadFormat::Weather,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CanonicalRecords::Temperature(rows) => rows.len(),
            CanonicalRecords::FireEvents(rows) => rows.len(),
            CanonicalRecords::Weather(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the caller gets back from one upload. Dropped rows are only visible
/// as a lower `inserted_rows` than the file's data-row count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub filename: String,
    pub inserted_rows: u64,
}
