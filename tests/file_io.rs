//! File round-trip tests.

use std::fs;

use geoshrink::{Error, ReductionPolicy, WriteOptions, parse_geojson, shrink_file};
use tempfile::TempDir;

const INPUT: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "geometry": {"type": "Point", "coordinates": [1.1111, 2.2222]},
      "properties": {"name": "A", "keep": true, "remove": "x"}
    },
    {
      "type": "Feature",
      "geometry": {"type": "Point", "coordinates": [3.3333, 4.4444]},
      "properties": {"name": "B", "keep": false, "remove": "y"}
    }
  ]
}"#;

#[test]
fn test_shrink_file_writes_reduced_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.geojson");
    let output = dir.path().join("out.geojson");
    fs::write(&input, INPUT).unwrap();

    let report = shrink_file(
        &input,
        &output,
        &ReductionPolicy::new(2, ["name", "keep"]),
        &WriteOptions::default(),
    )
    .unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(report.original, INPUT.len() as u64);
    assert_eq!(report.reduced, written.len() as u64);
    assert!(report.percentage().unwrap() > 0.0);

    let fc = parse_geojson(&written).unwrap();
    assert_eq!(fc.features.len(), 2);
    let names: Vec<_> = fc
        .features
        .iter()
        .map(|f| f.properties.as_ref().unwrap()["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
    assert!(!written.contains("remove"));
    assert!(written.contains("[1.11,2.22]"));
    assert!(written.contains("[3.33,4.44]"));
}

#[test]
fn test_shrink_file_pretty() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.geojson");
    let output = dir.path().join("out.geojson");
    fs::write(&input, INPUT).unwrap();

    shrink_file(
        &input,
        &output,
        &ReductionPolicy::new(2, ["name"]),
        &WriteOptions { pretty: true },
    )
    .unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.lines().count() > 1);
    assert_eq!(parse_geojson(&written).unwrap().features.len(), 2);
}

#[test]
fn test_shrink_file_missing_input() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.geojson");

    let err = shrink_file(
        &dir.path().join("nope.geojson"),
        &output,
        &ReductionPolicy::default(),
        &WriteOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, Error::Io(_)));
    assert!(!output.exists());
}

#[test]
fn test_shrink_file_invalid_policy_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.geojson");
    let output = dir.path().join("out.geojson");
    fs::write(&input, INPUT).unwrap();

    let err = shrink_file(
        &input,
        &output,
        &ReductionPolicy::new(-2, ["name"]),
        &WriteOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, Error::InvalidPolicy(_)));
    assert!(!output.exists());
}
