use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::errors::ParserError;
use crate::model::{CanonicalRecords, UploadFormat};
use crate::parse_upload;

fn fixture(path: &str) -> Vec<u8> {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let full_path = base.join("tests/data").join(path);
    fs::read(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

#[test]
fn detects_format_by_filename_keyword() {
    assert_eq!(
        UploadFormat::detect("Warehouse_Temperature_Nov.csv"),
        Some(UploadFormat::Temperature)
    );
    assert_eq!(
        UploadFormat::detect("actual_FIRES_2025.csv"),
        Some(UploadFormat::FireEvents)
    );
    assert_eq!(
        UploadFormat::detect("weather_export.csv"),
        Some(UploadFormat::Weather)
    );
    assert_eq!(UploadFormat::detect("inventory.csv"), None);
}

#[test]
fn ambiguous_filenames_resolve_in_priority_order() {
    assert_eq!(
        UploadFormat::detect("temperature_during_fire_weather.csv"),
        Some(UploadFormat::Temperature)
    );
    assert_eq!(
        UploadFormat::detect("fire_weather_log.csv"),
        Some(UploadFormat::FireEvents)
    );
}

#[test]
fn unsupported_filename_rejects_upload() {
    let err = parse_upload("inventory.csv", b"1,2,3").unwrap_err();
    assert!(matches!(err, ParserError::UnsupportedFile { .. }));
}

#[test]
fn temperature_upload_drops_rows_with_bad_required_fields() {
    let contents = fixture("warehouse_temperature_log.csv");
    let records = parse_upload("warehouse_temperature_log.csv", &contents)
        .expect("temperature parse failed");

    let CanonicalRecords::Temperature(readings) = records else {
        panic!("expected temperature records");
    };
    // 8 lines in the file: 3 clean, 4 with a bad required cell, 1 too short.
    assert_eq!(readings.len(), 3);

    let first = &readings[0];
    assert_eq!(first.warehouse, 4);
    assert_eq!(first.pile_id, "39");
    assert_eq!(first.coal_grade, "DG");
    assert_eq!(first.max_temp, 52.5);
    assert_eq!(first.shift, 1);
    assert_eq!(
        first.measurement_date.date(),
        NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()
    );

    // Decimal comma and day-first datetime both coerce.
    let second = &readings[1];
    assert_eq!(second.max_temp, 53.1);
    assert_eq!(
        second.measurement_date,
        NaiveDate::from_ymd_opt(2025, 11, 1)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    );
}

#[test]
fn temperature_upload_with_six_columns_fails_whole_upload() {
    let contents = fixture("temperature_six_columns.csv");
    let err = parse_upload("temperature_six_columns.csv", &contents).unwrap_err();
    assert!(matches!(
        err,
        ParserError::NotEnoughColumns {
            found: 6,
            expected: 7,
            ..
        }
    ));
}

#[test]
fn fire_events_header_row_is_consumed_when_marker_present() {
    let contents = fixture("fires_with_header.csv");
    let records =
        parse_upload("fires_with_header.csv", &contents).expect("fire-events parse failed");

    let CanonicalRecords::FireEvents(events) = records else {
        panic!("expected fire events");
    };
    // Header consumed; of 4 data rows one has a bad warehouse and one has no
    // start date.
    assert_eq!(events.len(), 2);

    let first = &events[0];
    assert_eq!(first.warehouse, 4);
    assert_eq!(first.pile_id, "39");
    assert_eq!(first.coal_grade, "DG");
    assert!(first.pile_formed_at.is_some());

    let second = &events[1];
    assert_eq!(second.pile_id, "12");
    assert!(second.pile_formed_at.is_none());
}

#[test]
fn fire_events_without_header_keep_every_data_row() {
    let with_header = parse_upload("fires_with_header.csv", &fixture("fires_with_header.csv"))
        .expect("parse with header");
    let without_header = parse_upload("fires_no_header.csv", &fixture("fires_no_header.csv"))
        .expect("parse without header");

    // Same data rows, so the same accepted records either way: the marker
    // check consumes exactly the header line and nothing else.
    assert_eq!(with_header.len(), without_header.len());
    assert_eq!(with_header, without_header);
}

#[test]
fn empty_fire_events_upload_fails() {
    let err = parse_upload("fires_empty.csv", b"").unwrap_err();
    assert!(matches!(err, ParserError::EmptyFile { .. }));
}

#[test]
fn weather_row_without_humidity_is_dropped() {
    let contents = fixture("weather_hourly.csv");
    let records = parse_upload("weather_hourly.csv", &contents).expect("weather parse failed");

    let CanonicalRecords::Weather(observations) = records else {
        panic!("expected weather observations");
    };
    // 6 rows: one missing humidity, one with a bad datetime, one with a nan
    // temperature all drop.
    assert_eq!(observations.len(), 3);

    let first = &observations[0];
    assert_eq!(first.temp, -3.5);
    assert_eq!(first.humidity, 84);
    assert_eq!(first.wind_dir.as_deref(), Some("N"));
    assert_eq!(first.weather_code.as_deref(), Some("fog"));

    // Optional cells that fail to parse store as missing, not row-dropping.
    let third = &observations[2];
    assert_eq!(third.humidity, 88);
    assert!(third.pressure.is_none());
    assert!(third.wind_dir.is_none());
    assert!(third.cloudcover.is_none());
    assert!(third.weather_code.is_none());
}

#[test]
fn accepted_rows_never_exceed_data_rows() {
    let contents = fixture("weather_hourly.csv");
    let data_rows = contents.split(|b| *b == b'\n').filter(|l| !l.is_empty()).count();
    let records = parse_upload("weather_hourly.csv", &contents).expect("weather parse failed");
    assert!(records.len() <= data_rows);
}
