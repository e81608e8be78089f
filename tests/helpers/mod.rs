//! Shared assertion helpers for integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dflow::{Diagnostic, DiagnosticKind, build_model};
use walkdir::WalkDir;

/// Build `source` and return every diagnostic of the failure.
pub fn diagnostics_from(source: &str) -> Vec<Diagnostic> {
    match build_model(source) {
        Ok(model) => panic!("expected build to fail, got {:?}", model),
        Err(e) => e.diagnostics().to_vec(),
    }
}

/// Only the error-level diagnostics of a failed build.
pub fn errors_from(source: &str) -> Vec<Diagnostic> {
    diagnostics_from(source)
        .into_iter()
        .filter(|d| d.is_error())
        .collect()
}

/// Codes of every error, in report order.
pub fn error_codes(source: &str) -> Vec<&'static str> {
    errors_from(source).iter().map(|d| d.code).collect()
}

/// Assert a source builds without errors.
pub fn assert_no_errors(source: &str) {
    if let Err(e) = build_model(source) {
        panic!("Expected no errors, got:\n{}", e);
    }
}

/// Names carried by unresolved-reference diagnostics.
pub fn unresolved_names(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics
        .iter()
        .filter_map(|d| match &d.kind {
            DiagnosticKind::UnresolvedReference { name } => Some(name.to_string()),
            _ => None,
        })
        .collect()
}

/// Every cycle reported, as plain strings.
pub fn cycles(diagnostics: &[Diagnostic]) -> Vec<Vec<String>> {
    diagnostics
        .iter()
        .filter_map(|d| match &d.kind {
            DiagnosticKind::CyclicDependency { cycle } => {
                Some(cycle.iter().map(|n| n.to_string()).collect())
            }
            _ => None,
        })
        .collect()
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// All `.dflow` fixtures below `tests/fixtures/<kind>`, sorted.
pub fn fixtures(kind: &str) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(fixtures_dir().join(kind))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "dflow"))
        .map(|e| e.into_path())
        .collect();
    paths.sort();
    paths
}
