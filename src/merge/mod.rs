//! Structural merge of several dflow documents into one model.
//!
//! Documents are lowered independently, then unioned in input order:
//! vertices by name under a [`CollisionPolicy`], edges by `(from, to)`.
//! The union is resolved and cycle-checked again, because a merge can
//! introduce dangling references or cycles that no single input has.

mod options;

use thiserror::Error;
use tracing::{debug, warn};

use crate::base::{DocumentId, Limits};
use crate::hir::lower::{Draft, lower_document};
use crate::hir::resolve::{check_cycles, resolve};
use crate::hir::{Diagnostic, DiagnosticCollector, Model, Severity, assemble, render};
use crate::syntax::serialize_with;

pub use options::{CollisionPolicy, MergeOptions};

/// Diagnostics of one input document that failed on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    /// Position of the document in the merge input
    pub index: usize,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Error)]
pub enum MergeError {
    #[error("no documents to merge")]
    NoDocuments,

    #[error("too many documents to merge: {actual} (maximum {max})")]
    TooManyDocuments { actual: usize, max: usize },

    /// One or more inputs failed before merging; nothing was merged.
    #[error("{} document(s) failed to build:\n{}", .failures.len(), render_failures(.failures))]
    Documents { failures: Vec<DocumentFailure> },

    /// The union of valid documents is itself invalid.
    #[error("merged model is invalid:\n{}", render(.diagnostics))]
    Invalid { diagnostics: Vec<Diagnostic> },
}

fn render_failures(failures: &[DocumentFailure]) -> String {
    failures
        .iter()
        .map(|f| render(&f.diagnostics))
        .collect::<Vec<_>>()
        .join("\n")
}

impl MergeError {
    /// Every diagnostic carried by the error
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        match self {
            MergeError::Documents { failures } => {
                failures.iter().flat_map(|f| f.diagnostics.iter()).collect()
            }
            MergeError::Invalid { diagnostics } => diagnostics.iter().collect(),
            MergeError::NoDocuments | MergeError::TooManyDocuments { .. } => Vec::new(),
        }
    }

    /// Indices of the documents the failure is attributed to
    pub fn documents(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            MergeError::Documents { failures } => failures.iter().map(|f| f.index).collect(),
            MergeError::Invalid { diagnostics } => diagnostics
                .iter()
                .filter(|d| d.is_error())
                .filter_map(|d| d.document.map(DocumentId::index))
                .collect(),
            MergeError::NoDocuments | MergeError::TooManyDocuments { .. } => Vec::new(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

/// A successful merge
#[derive(Debug, Clone)]
pub struct Merged {
    pub model: Model,
    /// Canonical document text of `model`
    pub text: String,
    /// Warnings from every input and from the merge itself
    pub warnings: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default)]
pub struct Merger {
    options: MergeOptions,
}

impl Merger {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge `texts` in order. All or nothing: any failing document fails
    /// the whole call.
    pub fn merge<S: AsRef<str>>(&self, texts: &[S]) -> Result<Merged, MergeError> {
        let limits = &self.options.limits;
        if texts.is_empty() {
            return Err(MergeError::NoDocuments);
        }
        if texts.len() > limits.max_documents {
            return Err(MergeError::TooManyDocuments {
                actual: texts.len(),
                max: limits.max_documents,
            });
        }

        let mut warnings = DiagnosticCollector::new();
        let mut failures = Vec::new();
        let mut drafts = Vec::with_capacity(texts.len());

        for (index, text) in texts.iter().enumerate() {
            let document = DocumentId::from(index);
            let mut diagnostics = DiagnosticCollector::new();
            let draft = lower_document(text.as_ref(), Some(document), limits, &mut diagnostics);
            debug!(
                document = index,
                vertices = draft.vertices.len(),
                errors = diagnostics.error_count(),
                "lowered merge input"
            );

            if diagnostics.has_errors() {
                failures.push(DocumentFailure {
                    index,
                    diagnostics: diagnostics.into_diagnostics(),
                });
            } else {
                warnings.extend(diagnostics);
                drafts.push(draft);
            }
        }

        if !failures.is_empty() {
            return Err(MergeError::Documents { failures });
        }

        let mut diagnostics = warnings;
        let union = self.union(drafts, &mut diagnostics);
        let edges = resolve(&union, limits, &mut diagnostics);
        check_cycles(&union, &edges, &mut diagnostics);

        debug!(
            vertices = union.vertices.len(),
            edges = edges.len(),
            errors = diagnostics.error_count(),
            "merged documents"
        );

        if diagnostics.has_errors() {
            return Err(MergeError::Invalid {
                diagnostics: diagnostics.into_diagnostics(),
            });
        }

        let model = assemble(union, edges);
        let text = serialize_with(&model, &self.options.format);
        Ok(Merged {
            model,
            text,
            warnings: diagnostics.into_diagnostics(),
        })
    }

    fn union(&self, drafts: Vec<Draft>, diagnostics: &mut DiagnosticCollector) -> Draft {
        let mut union = Draft::default();

        for draft in drafts {
            for (name, vertex) in draft.vertices {
                let Some(existing) = union.vertices.get_mut(&name) else {
                    union.vertices.insert(name, vertex);
                    continue;
                };

                let previous = existing.document.unwrap_or_default();
                let document = vertex.document.unwrap_or_default();
                let severity = match self.options.collision {
                    CollisionPolicy::Reject => Severity::Error,
                    CollisionPolicy::LaterWins | CollisionPolicy::DeepMerge => Severity::Warning,
                };
                diagnostics.merge_collision(&name, previous, vertex.span, document, severity);

                match self.options.collision {
                    CollisionPolicy::Reject => continue,
                    CollisionPolicy::LaterWins => {
                        warn!(vertex = %name, %previous, %document, "later definition overrides vertex");
                        existing.parameters = vertex.parameters;
                    }
                    CollisionPolicy::DeepMerge => {
                        warn!(vertex = %name, %previous, %document, "merging parameters into vertex");
                        existing.parameters.extend(vertex.parameters);
                    }
                }
                existing.kind = vertex.kind;
                existing.span = vertex.span;
                existing.document = vertex.document;
                existing.dependencies.extend(vertex.dependencies);
            }
        }

        check_vertex_limit(&union, &self.options.limits, diagnostics);
        union
    }
}

fn check_vertex_limit(union: &Draft, limits: &Limits, diagnostics: &mut DiagnosticCollector) {
    if union.vertices.len() > limits.max_vertices {
        diagnostics.limit_exceeded(
            crate::base::Limit::Vertices,
            union.vertices.len(),
            limits.max_vertices,
            None,
        );
    }
}

/// Merge with default options and return the canonical merged text.
pub fn merge_models<S: AsRef<str>>(texts: &[S]) -> Result<String, MergeError> {
    Merger::default().merge(texts).map(|merged| merged.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::{DiagnosticKind, Value, VertexKind};

    fn merge_with(policy: CollisionPolicy, texts: &[&str]) -> Result<Merged, MergeError> {
        Merger::new(MergeOptions::default().with_collision(policy)).merge(texts)
    }

    #[test]
    fn test_no_documents() {
        let texts: [&str; 0] = [];
        assert!(matches!(merge_models(&texts), Err(MergeError::NoDocuments)));
    }

    #[test]
    fn test_too_many_documents() {
        let merger = Merger::new(
            MergeOptions::default().with_limits(Limits::default().with_max_documents(1)),
        );
        assert!(matches!(
            merger.merge(&["task A {}", "task B {}"]),
            Err(MergeError::TooManyDocuments { actual: 2, max: 1 })
        ));
    }

    #[test]
    fn test_later_wins_replaces_parameters() {
        let merged = merge_with(
            CollisionPolicy::LaterWins,
            &["task X { p = 1; q = 1; }", "step X { p = 2; }"],
        )
        .unwrap();
        let x = merged.model.vertex("X").unwrap();
        assert_eq!(x.kind(), VertexKind::Step);
        assert_eq!(x.parameter("p"), Some(&Value::Integer(2)));
        assert_eq!(x.parameter("q"), None);
        assert_eq!(merged.warnings.len(), 1);
    }

    #[test]
    fn test_deep_merge_keeps_earlier_parameters() {
        let merged = merge_with(
            CollisionPolicy::DeepMerge,
            &["task X { p = 1; q = 1; }", "task X { p = 2; r = 3; }"],
        )
        .unwrap();
        let x = merged.model.vertex("X").unwrap();
        let params: Vec<_> = x.parameters().map(|(k, v)| (k.as_str(), v.clone())).collect();
        assert_eq!(
            params,
            vec![
                ("p", Value::Integer(2)),
                ("q", Value::Integer(1)),
                ("r", Value::Integer(3))
            ]
        );
        assert_eq!(merged.warnings.len(), 1);
    }

    #[test]
    fn test_reject_policy_fails() {
        let err = merge_with(CollisionPolicy::Reject, &["task X {}", "task X {}"]).unwrap_err();
        let MergeError::Invalid { diagnostics } = &err else {
            panic!("expected Invalid, got {:?}", err);
        };
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "E0016");
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::MergeCollision {
                name: "X".into(),
                previous: DocumentId::new(0)
            }
        );
        assert_eq!(err.documents(), vec![1]);
    }

    #[test]
    fn test_dependencies_of_every_definition_are_kept() {
        let merged = merge_with(
            CollisionPolicy::LaterWins,
            &["task A {}\ntask B {}\ntask X { depends on A; }", "task X { depends on B; }"],
        )
        .unwrap();
        assert_eq!(merged.model.dependencies("X"), vec!["A", "B"]);
    }

    #[test]
    fn test_cross_document_reference_resolves() {
        let merged = merge_models(&["task B { depends on A; }", "task A {}"]).unwrap();
        assert_eq!(merged, "task A {}\n\ntask B {\n    depends on A;\n}\n");
    }

    #[test]
    fn test_failing_documents_are_all_named() {
        let err = merge_models(&["task A {", "task B {}", "task C {}\ntask C {}"]).unwrap_err();
        assert_eq!(err.documents(), vec![0, 2]);
        assert!(
            err.diagnostics()
                .iter()
                .all(|d| d.document.is_some())
        );
    }

    #[test]
    fn test_dangling_reference_names_its_document() {
        let err = merge_models(&["task A {}", "task B { depends on Z; }"]).unwrap_err();
        assert!(matches!(err, MergeError::Invalid { .. }));
        assert_eq!(err.documents(), vec![1]);
    }
}
