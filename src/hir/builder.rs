//! Model builder: text in, validated [`Model`] or every diagnostic out.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use super::diagnostics::{Diagnostic, DiagnosticCollector, render};
use super::lower::{Draft, lower_document};
use super::model::{Edge, Model, Vertex};
use super::resolve::{check_cycles, resolve};
use crate::base::Limits;

/// A failed build. Holds every error and warning found, in pass order.
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    #[error("model validation failed with {} error(s):\n{}", error_count(.diagnostics), render(.diagnostics))]
    Invalid { diagnostics: Vec<Diagnostic> },
}

fn error_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics.iter().filter(|d| d.is_error()).count()
}

impl BuildError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            BuildError::Invalid { diagnostics } => diagnostics,
        }
    }

    /// Only the error-severity diagnostics
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics().iter().filter(|d| d.is_error())
    }
}

/// A successful build; warnings did not prevent the model.
#[derive(Debug, Clone)]
pub struct Built {
    pub model: Model,
    pub warnings: Vec<Diagnostic>,
}

/// Builds models from dflow text under configurable limits.
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    limits: Limits,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Parse, lower, resolve and check `text`.
    ///
    /// All passes run even when an earlier one reported errors, so the
    /// result covers every detectable problem.
    pub fn build(&self, text: &str) -> Result<Built, BuildError> {
        let mut diagnostics = DiagnosticCollector::new();

        let draft = lower_document(text, None, &self.limits, &mut diagnostics);
        let edges = resolve(&draft, &self.limits, &mut diagnostics);
        check_cycles(&draft, &edges, &mut diagnostics);

        debug!(
            vertices = draft.vertices.len(),
            edges = edges.len(),
            errors = diagnostics.error_count(),
            warnings = diagnostics.warning_count(),
            "built model"
        );

        if diagnostics.has_errors() {
            return Err(BuildError::Invalid {
                diagnostics: diagnostics.into_diagnostics(),
            });
        }

        Ok(Built {
            model: assemble(draft, edges),
            warnings: diagnostics.into_diagnostics(),
        })
    }
}

/// Build a model with default limits, discarding warnings.
pub fn build_model(text: &str) -> Result<Model, BuildError> {
    ModelBuilder::new().build(text).map(|built| built.model)
}

/// Turn a validated draft into the immutable model.
pub(crate) fn assemble(draft: Draft, edges: BTreeSet<Edge>) -> Model {
    let vertices: IndexMap<_, _> = draft
        .vertices
        .into_iter()
        .map(|(name, vertex)| {
            let parameters = vertex
                .parameters
                .into_iter()
                .map(|(key, parameter)| (key, parameter.value))
                .collect();
            (name.clone(), Vertex::new(vertex.kind, name, parameters))
        })
        .collect();
    Model::from_parts(vertices, edges)
}
