use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord};

/// Reads raw upload bytes into a headerless table of text cells. Lines the
/// CSV reader cannot make sense of are skipped rather than failing the
/// upload; structural checks happen per format afterwards.
pub(crate) fn read_table(contents: &[u8]) -> Vec<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(contents);

    reader.records().filter_map(|record| record.ok()).collect()
}

static DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M",
];

static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

/// Free-form timestamp coercion. The source spreadsheets mix ISO dates with
/// day-first dd.mm.yyyy entries, with or without a time of day. Unparseable
/// input is "missing", never an error.
pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Numeric coercion tolerant of the usual spreadsheet dirt: surrounding
/// whitespace, decimal commas, and `nan`/`-` placeholders.
pub(crate) fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }
    trimmed.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer coercion via the numeric path, so cells exported as "4.0" still
/// coerce to 4 the way a dataframe cast would.
pub(crate) fn parse_i64(value: &str) -> Option<i64> {
    parse_f64(value).map(|v| v as i64)
}

/// Plain string conversion of a cell; pure-whitespace cells are missing.
pub(crate) fn cell_string(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// String fields that are not row-survival requirements keep whatever text
/// the cell held, trimmed, empty included.
pub(crate) fn cell_text(value: &str) -> String {
    value.trim().to_string()
}
