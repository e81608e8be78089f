//! Resolution pass: check references and build the edge set.

use std::collections::BTreeSet;

use tracing::trace;

use super::cycles::find_cycles;
use super::diagnostics::DiagnosticCollector;
use super::lower::{Draft, DraftVertex};
use super::model::Edge;
use crate::base::{Limit, Limits};

/// Resolve every dependency target and reference value against the draft.
///
/// Reports one `UnresolvedReference` per unresolved occurrence and treats a
/// self-dependency as a one-vertex cycle. Repeated declarations are checked
/// against the registered names but never contribute edges. Returns the
/// edges that did resolve.
pub(crate) fn resolve(
    draft: &Draft,
    limits: &Limits,
    diagnostics: &mut DiagnosticCollector,
) -> BTreeSet<Edge> {
    let mut edges = BTreeSet::new();

    for vertex in draft.vertices.values() {
        for dependency in &vertex.dependencies {
            if dependency.target == vertex.name {
                diagnostics.cyclic_dependency(
                    vec![vertex.name.clone()],
                    Some(dependency.span),
                    dependency.document,
                );
            } else if draft.vertices.contains_key(&dependency.target) {
                edges.insert(Edge::new(dependency.target.clone(), vertex.name.clone()));
            } else {
                diagnostics.unresolved_reference(
                    &dependency.target,
                    dependency.span,
                    dependency.document,
                );
            }
        }

        report_dangling_values(draft, vertex, diagnostics);
    }

    for vertex in &draft.shadowed {
        for dependency in &vertex.dependencies {
            if !draft.vertices.contains_key(&dependency.target) {
                diagnostics.unresolved_reference(
                    &dependency.target,
                    dependency.span,
                    dependency.document,
                );
            }
        }
        report_dangling_values(draft, vertex, diagnostics);
    }

    if edges.len() > limits.max_edges {
        diagnostics.limit_exceeded(Limit::Edges, edges.len(), limits.max_edges, None);
    }

    trace!(edges = edges.len(), "resolved references");
    edges
}

fn report_dangling_values(draft: &Draft, vertex: &DraftVertex, diagnostics: &mut DiagnosticCollector) {
    for parameter in vertex.parameters.values() {
        let Some(name) = parameter.value.as_reference() else {
            continue;
        };
        if !draft.vertices.contains_key(name) {
            diagnostics.unresolved_reference(name, parameter.span, parameter.document);
        }
    }
}

/// Run cycle detection and report every cycle found.
///
/// The diagnostic points at the dependency clause that closes the cycle.
pub(crate) fn check_cycles(
    draft: &Draft,
    edges: &BTreeSet<Edge>,
    diagnostics: &mut DiagnosticCollector,
) {
    for cycle in find_cycles(draft.vertices.keys(), edges) {
        let closing = cycle.last().zip(cycle.first()).and_then(|(last, first)| {
            draft
                .vertices
                .get(last)?
                .dependencies
                .iter()
                .find(|d| &d.target == first)
        });
        diagnostics.cyclic_dependency(
            cycle,
            closing.map(|d| d.span),
            closing.and_then(|d| d.document),
        );
    }
}
