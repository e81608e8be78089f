//! Merge Tests
//!
//! Union of disjoint and overlapping documents, each collision policy, and
//! the re-validation of the merged graph.

use dflow::{
    CollisionPolicy, DiagnosticKind, DocumentId, Limits, MergeError, MergeOptions, Merger, Value,
    VertexKind, build_model, merge_models,
};
use rstest::rstest;

fn merger(policy: CollisionPolicy) -> Merger {
    Merger::new(MergeOptions::default().with_collision(policy))
}

#[test]
fn test_disjoint_union_has_no_warnings() {
    let merged = Merger::default().merge(&["task X {}", "task Y {}"]).unwrap();
    let names: Vec<_> = merged.model.vertices().map(|v| v.name().as_str()).collect();
    assert_eq!(names, vec!["X", "Y"]);
    assert!(merged.warnings.is_empty());
    assert_eq!(merged.text, "task X {}\n\ntask Y {}\n");
}

#[test]
fn test_collision_later_wins_with_one_warning() {
    let merged = Merger::default()
        .merge(&["task X { p = 1; }", "task X { p = 2; }"])
        .unwrap();

    let x = merged.model.vertex("X").unwrap();
    assert_eq!(x.parameter("p"), Some(&Value::Integer(2)));

    assert_eq!(merged.warnings.len(), 1);
    let warning = &merged.warnings[0];
    assert_eq!(warning.code, "W0004");
    assert_eq!(warning.document, Some(DocumentId::new(1)));
    assert!(matches!(
        &warning.kind,
        DiagnosticKind::MergeCollision { name, previous } if name == "X" && *previous == DocumentId::new(0)
    ));
}

#[test]
fn test_later_wins_replaces_parameters_but_keeps_dependencies() {
    let merged = Merger::default()
        .merge(&[
            "task base {}\ntask X { a = 1; depends on base; }",
            "step X { b = 2; }",
        ])
        .unwrap();

    let x = merged.model.vertex("X").unwrap();
    assert_eq!(x.kind(), VertexKind::Step);
    assert_eq!(x.parameter("a"), None);
    assert_eq!(x.parameter("b"), Some(&Value::Integer(2)));
    assert_eq!(merged.model.dependencies("X"), vec!["base"]);
}

#[test]
fn test_deep_merge_keeps_earlier_parameters() {
    let merged = merger(CollisionPolicy::DeepMerge)
        .merge(&["task X { a = 1; p = 1; }", "task X { p = 2; b = true; }"])
        .unwrap();

    let x = merged.model.vertex("X").unwrap();
    assert_eq!(x.parameter("a"), Some(&Value::Integer(1)));
    assert_eq!(x.parameter("p"), Some(&Value::Integer(2)));
    assert_eq!(x.parameter("b"), Some(&Value::Boolean(true)));
    assert_eq!(merged.warnings.len(), 1);
}

#[test]
fn test_reject_policy_fails_on_collision() {
    let err = merger(CollisionPolicy::Reject)
        .merge(&["task X {}", "task Y {}", "task X {}"])
        .unwrap_err();

    let MergeError::Invalid { diagnostics } = &err else {
        panic!("expected an invalid merge, got {:?}", err);
    };
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, "E0016");
    assert_eq!(err.documents(), vec![2]);
}

#[test]
fn test_reject_policy_allows_disjoint_inputs() {
    let merged = merger(CollisionPolicy::Reject)
        .merge(&["task X {}", "task Y { depends on X; }"])
        .unwrap();
    assert_eq!(merged.model.edge_count(), 1);
}

#[test]
fn test_merge_induced_cycle() {
    let first = "task A { depends on B; }\ntask B {}";
    let second = "task B { depends on A; }";
    assert!(build_model(first).is_ok());

    let err = Merger::default().merge(&[first, second]).unwrap_err();
    let cycles: Vec<_> = err
        .diagnostics()
        .into_iter()
        .filter(|d| matches!(d.kind, DiagnosticKind::CyclicDependency { .. }))
        .collect();
    assert_eq!(cycles.len(), 1);
}

#[test]
fn test_cross_document_reference_resolves() {
    let merged = Merger::default()
        .merge(&["task fetch {}", "step parse { depends on fetch; source = fetch; }"])
        .unwrap();
    assert_eq!(merged.model.dependencies("parse"), vec!["fetch"]);
}

#[test]
fn test_dangling_reference_after_union() {
    let err = Merger::default()
        .merge(&["task A {}", "task B { depends on C; }"])
        .unwrap_err();
    assert!(matches!(err, MergeError::Invalid { .. }));
    assert_eq!(err.documents(), vec![1]);
}

#[test]
fn test_invalid_inputs_are_reported_by_index() {
    let err = Merger::default()
        .merge(&["task A {}", "task B { x = ; }", "task C {}", "task D {} task D {}"])
        .unwrap_err();

    let MergeError::Documents { failures } = &err else {
        panic!("expected per-document failures, got {:?}", err);
    };
    let indices: Vec<_> = failures.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![1, 3]);
    assert!(
        err.diagnostics()
            .iter()
            .all(|d| d.document.is_some())
    );
}

#[test]
fn test_no_documents() {
    let empty: [&str; 0] = [];
    assert!(matches!(
        Merger::default().merge(&empty),
        Err(MergeError::NoDocuments)
    ));
}

#[test]
fn test_document_count_limit() {
    let merger = Merger::new(
        MergeOptions::default().with_limits(Limits::default().with_max_documents(2)),
    );
    let err = merger.merge(&["", "", ""]).unwrap_err();
    assert!(matches!(
        err,
        MergeError::TooManyDocuments { actual: 3, max: 2 }
    ));
}

#[test]
fn test_single_document_merge_is_canonical_form() {
    let text = merge_models(&["step b { depends on a; }\ntask a { x = 1; }"]).unwrap();
    assert_eq!(text, "task a {\n    x = 1;\n}\n\nstep b {\n    depends on a;\n}\n");
}

#[rstest]
#[case(CollisionPolicy::LaterWins)]
#[case(CollisionPolicy::DeepMerge)]
#[case(CollisionPolicy::Reject)]
fn test_merge_is_deterministic(#[case] policy: CollisionPolicy) {
    let inputs = ["task A { p = 1; }\ntask B {}", "task C { depends on A; }", "task A { q = 2; }"];
    let merger = merger(policy);
    let first = merger.merge(&inputs);
    let second = merger.merge(&inputs);
    match (first, second) {
        (Ok(a), Ok(b)) => {
            assert_eq!(a.model, b.model);
            assert_eq!(a.text, b.text);
            assert_eq!(a.warnings, b.warnings);
        }
        (Err(a), Err(b)) => assert_eq!(a.diagnostics(), b.diagnostics()),
        _ => panic!("merge outcome differed between runs"),
    }
}

#[test]
fn test_merged_text_rebuilds_to_merged_model() {
    let merged = merger(CollisionPolicy::DeepMerge)
        .merge(&[
            "task fetch { url = \"a\"; }\nstep parse { depends on fetch; }",
            "task fetch { retries = 3; }\nstep report { depends on parse; ratio = 0.5; }",
        ])
        .unwrap();
    assert_eq!(build_model(&merged.text).unwrap(), merged.model);
}
