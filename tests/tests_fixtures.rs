//! Fixture Tests
//!
//! Every document under `tests/fixtures/valid` must build, serialize to a
//! canonical form that rebuilds to the same model, and reach a fixed point.
//! Every document under `tests/fixtures/invalid` starts with an
//! `// expect: CODE, CODE` line listing the error codes it must produce.

mod helpers;

use std::fs;
use std::path::Path;

use dflow::{FormatOptions, build_model, serialize, serialize_with};
use helpers::{diagnostics_from, fixtures};

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {}: {}", path.display(), e))
}

fn expected_codes(source: &str, path: &Path) -> Vec<String> {
    let first = source.lines().next().unwrap_or_default();
    let list = first
        .strip_prefix("// expect:")
        .unwrap_or_else(|| panic!("{} has no '// expect:' header", path.display()));
    let mut codes: Vec<String> = list.split(',').map(|c| c.trim().to_string()).collect();
    codes.sort();
    codes
}

#[test]
fn test_fixtures_exist() {
    assert!(!fixtures("valid").is_empty());
    assert!(!fixtures("invalid").is_empty());
}

#[test]
fn test_valid_fixtures_round_trip() {
    for path in fixtures("valid") {
        let source = read(&path);
        let model = build_model(&source)
            .unwrap_or_else(|e| panic!("{} should build:\n{}", path.display(), e));

        let text = serialize(&model);
        let rebuilt = build_model(&text)
            .unwrap_or_else(|e| panic!("{} canonical form should build:\n{}\n{}", path.display(), text, e));
        assert_eq!(rebuilt, model, "round trip changed {}", path.display());

        assert_eq!(serialize(&rebuilt), text, "{} is not a fixed point", path.display());
    }
}

#[test]
fn test_valid_fixtures_round_trip_with_tabs() {
    let tabs = FormatOptions {
        tab_size: 4,
        insert_spaces: false,
    };
    for path in fixtures("valid") {
        let model = build_model(&read(&path)).unwrap();
        let text = serialize_with(&model, &tabs);
        assert_eq!(build_model(&text).unwrap(), model, "{}", path.display());
    }
}

#[test]
fn test_valid_fixtures_build_deterministically() {
    for path in fixtures("valid") {
        let source = read(&path);
        let first = build_model(&source).unwrap();
        let second = build_model(&source).unwrap();
        assert_eq!(first, second, "{}", path.display());
        assert_eq!(serialize(&first), serialize(&second), "{}", path.display());
    }
}

#[test]
fn test_invalid_fixtures_report_expected_codes() {
    for path in fixtures("invalid") {
        let source = read(&path);
        let expected = expected_codes(&source, &path);

        let mut actual: Vec<String> = diagnostics_from(&source)
            .iter()
            .filter(|d| d.is_error())
            .map(|d| d.code.to_string())
            .collect();
        actual.sort();

        assert_eq!(actual, expected, "unexpected errors for {}", path.display());
    }
}

#[test]
fn test_invalid_fixtures_report_deterministically() {
    for path in fixtures("invalid") {
        let source = read(&path);
        assert_eq!(
            diagnostics_from(&source),
            diagnostics_from(&source),
            "{}",
            path.display()
        );
    }
}

#[test]
fn test_pipeline_fixture_shape() {
    let path = fixtures("valid")
        .into_iter()
        .find(|p| p.ends_with("pipeline.dflow"))
        .unwrap();
    let model = build_model(&read(&path)).unwrap();

    assert_eq!(model.len(), 5);
    assert_eq!(
        model.topological_order(),
        vec!["fetch", "validate", "transform", "load", "notify"]
    );
}
