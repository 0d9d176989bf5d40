//! Integration tests for marketrows record construction and batch ingestion

use std::io::Write;

use marketrows::extraction::split_row;
use marketrows::identity;
use marketrows::runtime::RowStatus;
use marketrows::{
    Entity, FieldValue, GeoPoint, HeaderIndex, IngestConfig, Ingestor, MemoryStore, OutputFormat,
    Record, RecordError, RecordWriter, Tenure,
};

const EXPORT: &str = "First Name,Last Name,Address,City,State,Zip Code,County,Metro Area,Latitude,Longitude,Age Range,Adult Gender,Own / Rent,Estimated Household Income,Estimated Home Value,Wealth Finder,FIPS
Ada,Lovelace,12 Elm Ave,Boston,MA,02108,Suffolk,Boston-Cambridge,42.3601,-71.0589,65+,Female,Owns,Under $20K,$1M or More,$549 or less,25025
Alan,Turing,7 Oak Rd,Cambridge,MA,02139,Middlesex,Boston-Cambridge,42.3736,-71.1097,75+,Male,Renter,Unknown,,,25017
";

#[test]
fn test_identity_is_deterministic_across_variants() {
    let a = identity::record_id(Some("12 Elm Ave"), Some("Boston"), Some("MA")).unwrap();
    let b = identity::record_id(Some("  12 ELM AVE"), Some("boston  "), Some(" ma ")).unwrap();
    let c = identity::record_id(Some("12 Elm Ave"), Some("Boston"), Some("MA")).unwrap();

    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(a.len(), 24);
}

#[test]
fn test_header_order_independence() {
    let canonical = Record::from_csv_line("address,city,state", "12 Elm Ave,Boston,MA").unwrap();
    let permuted = Record::from_csv_line("city,address,state", "Boston,12 Elm Ave,MA").unwrap();

    assert_eq!(canonical.address(), permuted.address());
    assert_eq!(canonical.city(), permuted.city());
    assert_eq!(canonical.state(), permuted.state());
    assert_eq!(canonical.id(), permuted.id());
}

#[test]
fn test_missing_zip_column_is_tolerated() {
    let record = Record::from_csv_line("address,city,state,county", "12 Elm Ave,Boston,MA,Suffolk").unwrap();

    assert_eq!(record.zip, None);
    assert_eq!(record.county.as_deref(), Some("Suffolk"));
}

#[test]
fn test_decode_cases() {
    let header = HeaderIndex::parse(
        "address,city,state,estimated household income,estimated home value,wealth finder,age range,own / rent",
    );
    let build = |income: &str, home: &str, wealth: &str, age: &str, tenure: &str| {
        let row = vec!["12 Elm Ave", "Boston", "MA", income, home, wealth, age, tenure];
        Record::from_row(&header, &row).unwrap()
    };

    let record = build("Under $20", "$1", "", "65+", "Rent");
    assert_eq!(record.household_income_estimate(), Some(10_000));
    assert_eq!(record.wealth_estimate(), None);
    assert_eq!(record.age_estimate(), Some(70));
    assert_eq!(record.tenure(), Some(Tenure::Rents));
    assert_eq!(record.tenure().map(Tenure::code), Some(0));

    let record = build("$100", "$1", "$549", "Age 75+", "Own");
    assert_eq!(record.age_estimate(), Some(80));
    assert_eq!(record.tenure().map(Tenure::code), Some(1));
    assert_eq!(record.wealth_estimate(), Some(250));

    // Labels with embedded commas can't survive comma splitting, so exercise
    // the tables through fields set directly.
    let mut record = build("", "", "", "", "");
    record.household_income = Some("$100,000 to $124,999".to_string());
    record.home_value = Some("$1,000,000 or More".to_string());
    assert_eq!(record.household_income_estimate(), Some(112_500));
    assert_eq!(record.home_value_estimate(), Some(1_000_000));
    assert_eq!(record.age_estimate(), None);
}

#[test]
fn test_geo_point_is_not_swapped() {
    let record = Record::from_csv_line(
        "address,city,state,latitude,longitude",
        "1 Broadway,New York,NY,40.7128,-74.0060",
    )
    .unwrap();

    let point = record.location.unwrap();
    assert_eq!(point, GeoPoint::new(40.7128, -74.0060));
    assert_eq!(point.latitude, 40.7128);
    assert_eq!(point.longitude, -74.0060);
    assert_eq!(record.lat.as_deref(), Some("40.7128"));
}

#[test]
fn test_fatal_row_errors() {
    let header = HeaderIndex::parse("address,city,state,latitude,longitude");

    let short = Record::from_row(&header, &split_row("1 Broadway,New York,NY,40.7"));
    assert!(matches!(short, Err(RecordError::RowTooShort { .. })));

    let malformed = Record::from_row(&header, &split_row("1 Broadway,New York,NY,40.7,abc"));
    assert!(matches!(malformed, Err(RecordError::MalformedNumeric { field: "longitude", .. })));

    let no_state = Record::from_csv_line("address,city", "1 Broadway,New York");
    assert_eq!(no_state.unwrap_err(), RecordError::MissingIdentityField { field: "state" });
}

#[test]
fn test_full_export_row() {
    let mut lines = EXPORT.lines();
    let header = HeaderIndex::parse(lines.next().unwrap());
    let record = Record::from_row(&header, &split_row(lines.next().unwrap())).unwrap();

    assert_eq!(record.first_name.as_deref(), Some("Ada"));
    assert_eq!(record.last_name.as_deref(), Some("Lovelace"));
    assert_eq!(record.zip.as_deref(), Some("02108"));
    assert_eq!(record.metro_area.as_deref(), Some("Boston-Cambridge"));
    assert_eq!(record.gender.as_deref(), Some("Female"));
    assert_eq!(record.fips.as_deref(), Some("25025"));
    assert_eq!(record.location, Some(GeoPoint::new(42.3601, -71.0589)));

    let estimates = record.estimates();
    assert_eq!(estimates.household_income, Some(10_000));
    assert_eq!(estimates.age, Some(70));
    assert_eq!(estimates.tenure, Some(1));
    assert_eq!(estimates.wealth, Some(250));
    // "$1M or More" matches no home value trigger
    assert_eq!(estimates.home_value, None);
}

#[test]
fn test_idempotent_reingestion() {
    let ingestor = Ingestor::default();
    let mut store = MemoryStore::new();

    let first = ingestor.ingest_str(EXPORT, &mut store).unwrap();
    let second = ingestor.ingest_str(EXPORT, &mut store).unwrap();

    let first_ids: Vec<&str> = first.persisted_ids().collect();
    let second_ids: Vec<&str> = second.persisted_ids().collect();

    assert_eq!(first_ids.len(), 2);
    assert_eq!(first_ids, second_ids);
    assert_ne!(first.batch_id, second.batch_id);
    assert_eq!(store.len(Record::COLLECTION), 2);
    assert!(second.rows.iter().all(|row| matches!(
        &row.status,
        RowStatus::Persisted { outcome: marketrows::UpsertOutcome::ReplacedExisting, .. }
    )));
}

#[test]
fn test_failed_rows_are_not_persisted() {
    let csv = "address,city,state,latitude,longitude\n\
        1 Broadway,New York,NY,40.7128,-74.0060\n\
        2 Broadway,New York,NY,forty,-74.0060\n\
        3 Broadway,New York,NY\n";
    let mut store = MemoryStore::new();
    let report = Ingestor::default().ingest_str(csv, &mut store).unwrap();

    assert_eq!(report.persisted, 1);
    assert_eq!(report.failed, 2);
    assert_eq!(store.len(Record::COLLECTION), 1);

    let failed_id = identity::record_id(Some("2 Broadway"), Some("New York"), Some("NY")).unwrap();
    assert!(store.get(Record::COLLECTION, &failed_id).is_none());

    let kept_id = identity::record_id(Some("1 Broadway"), Some("New York"), Some("NY")).unwrap();
    let doc = store.get(Record::COLLECTION, &kept_id).unwrap();
    assert_eq!(doc["id"], FieldValue::String(kept_id.clone()));
}

#[test]
fn test_ingest_file_and_write_documents() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(EXPORT.as_bytes()).unwrap();

    let config = IngestConfig::from_yaml_str("include_estimates: true\noutput_format: json\n").unwrap();
    let ingestor = Ingestor::new(config.clone());
    let mut store = MemoryStore::new();
    let report = ingestor.ingest_path(file.path(), &mut store).unwrap();
    assert_eq!(report.persisted, 2);

    let records: Vec<Record> = store.load_all().unwrap();
    let mut writer = RecordWriter::new(Vec::new(), config.output_format, config.include_estimates).unwrap();
    writer.write_all(&records).unwrap();
    let output = String::from_utf8(writer.finish().unwrap()).unwrap();

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value[0]["fName"], "Ada");
    assert_eq!(value[0]["estimates"]["age"], 70);
    assert_eq!(value[1]["estimates"]["tenure"], 0);
    assert!(value[1]["estimates"]["householdIncome"].is_null());
    assert_eq!(config.output_format, OutputFormat::Json);
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_failures: 2").unwrap();
    writeln!(file, "fail_on_row_error: true").unwrap();

    let config = IngestConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.max_failures, Some(2));
    assert!(config.fail_on_row_error);
    assert!(config.skip_blank_lines);

    assert!(IngestConfig::load_from_file("/nonexistent/marketrows.yaml").is_err());
}
