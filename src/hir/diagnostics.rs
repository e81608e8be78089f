//! Diagnostics: structured reports of syntax and semantic problems.
//!
//! Every problem found while building or merging a model becomes a
//! [`Diagnostic`]. They are accumulated in a [`DiagnosticCollector`] and
//! returned together, so one call surfaces everything that is wrong.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{DocumentId, Limit, LineIndex, Span};
use crate::parser::{ErrorCode, SyntaxError};

/// Whether a diagnostic blocks the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// What went wrong, as a closed set callers can branch on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Lexical or grammatical error, or an undecodable literal
    Syntax(ErrorCode),
    /// A vertex name declared twice in one document
    DuplicateVertex { name: SmolStr },
    /// A dependency target or reference value naming no vertex
    UnresolvedReference { name: SmolStr },
    /// Vertex names forming a dependency cycle, in traversal order
    CyclicDependency { cycle: Vec<SmolStr> },
    /// A vertex redefined by a later merge input
    MergeCollision { name: SmolStr, previous: DocumentId },
    /// A parameter assigned twice in one vertex
    DuplicateParameter { vertex: SmolStr, parameter: SmolStr },
    /// Input exceeded a configured bound
    ResourceLimitExceeded { limit: Limit, actual: usize, max: usize },
}

impl DiagnosticKind {
    /// Stable code for this kind at the given severity
    pub fn code(&self, severity: Severity) -> &'static str {
        match self {
            DiagnosticKind::Syntax(code) => code.as_str(),
            DiagnosticKind::DuplicateVertex { .. } => codes::DUPLICATE_VERTEX,
            DiagnosticKind::UnresolvedReference { .. } => codes::UNRESOLVED_REFERENCE,
            DiagnosticKind::CyclicDependency { .. } => codes::CYCLIC_DEPENDENCY,
            DiagnosticKind::MergeCollision { .. } if severity.is_error() => {
                codes::MERGE_COLLISION_REJECTED
            }
            DiagnosticKind::MergeCollision { .. } => codes::MERGE_COLLISION,
            DiagnosticKind::DuplicateParameter { .. } => codes::DUPLICATE_PARAMETER,
            DiagnosticKind::ResourceLimitExceeded { .. } => codes::RESOURCE_LIMIT_EXCEEDED,
        }
    }
}

/// Related location for a diagnostic, e.g. the first of two duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub message: Arc<str>,
    pub span: Span,
    pub document: Option<DocumentId>,
}

/// A diagnostic message with location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: &'static str,
    pub message: Arc<str>,
    /// 0-indexed line/column range, when the problem has a source location.
    pub span: Option<Span>,
    /// Merge input the diagnostic came from, if any.
    pub document: Option<DocumentId>,
    pub related: Vec<RelatedInfo>,
}

impl Diagnostic {
    /// Create a new diagnostic; the code follows from kind and severity.
    pub fn new(kind: DiagnosticKind, severity: Severity, message: impl Into<Arc<str>>) -> Self {
        Self {
            code: kind.code(severity),
            kind,
            severity,
            message: message.into(),
            span: None,
            document: None,
            related: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(kind: DiagnosticKind, message: impl Into<Arc<str>>) -> Self {
        Self::new(kind, Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(kind: DiagnosticKind, message: impl Into<Arc<str>>) -> Self {
        Self::new(kind, Severity::Warning, message)
    }

    /// Set the source span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Set the source span when one is known.
    pub fn with_span_opt(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    /// Attribute to a merge input. `None` leaves the diagnostic untouched.
    pub fn with_document(mut self, document: Option<DocumentId>) -> Self {
        if document.is_some() {
            self.document = document;
        }
        self
    }

    /// Add related information.
    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

/// `[document N ]line:col: severity[code]: message`, with 1-indexed
/// line and column.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(document) = self.document {
            write!(f, "{} ", document)?;
        }
        if let Some(span) = self.span {
            write!(f, "{}: ", span.start)?;
        }
        write!(
            f,
            "{}[{}]: {}",
            self.severity.as_str(),
            self.code,
            self.message
        )
    }
}

/// Render a diagnostic list one per line.
pub(crate) fn render(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes for semantic problems.
///
/// ## Error Code Ranges
///
/// - **E0001-E0099**: Semantic errors (resolution, structure, limits)
/// - **E01xx-E09xx**: Syntax errors, see [`ErrorCode`]
/// - **W0001-W0099**: Warnings
pub mod codes {
    /// Undefined reference (name not found).
    pub const UNRESOLVED_REFERENCE: &str = "E0001";
    /// Vertex name declared twice.
    pub const DUPLICATE_VERTEX: &str = "E0004";
    /// Circular dependency detected.
    pub const CYCLIC_DEPENDENCY: &str = "E0007";
    /// Input exceeded a configured limit.
    pub const RESOURCE_LIMIT_EXCEEDED: &str = "E0015";
    /// Merge collision under the rejecting policy.
    pub const MERGE_COLLISION_REJECTED: &str = "E0016";

    /// Vertex overridden by a later merge input.
    pub const MERGE_COLLISION: &str = "W0004";
    /// Parameter assigned more than once.
    pub const DUPLICATE_PARAMETER: &str = "W0005";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during model building and merging.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add a parser error, converting its range to a line/column span.
    pub fn syntax(&mut self, error: &SyntaxError, index: &LineIndex, document: Option<DocumentId>) {
        let mut message = error.message.clone();
        if let Some(hint) = &error.hint {
            message.push_str(&format!(" (hint: {})", hint));
        }
        let mut diagnostic = Diagnostic::error(DiagnosticKind::Syntax(error.code), message)
            .with_span(index.span(error.range))
            .with_document(document);
        for related in &error.related {
            diagnostic = diagnostic.with_related(RelatedInfo {
                message: Arc::from(related.message.as_str()),
                span: index.span(related.range),
                document,
            });
        }
        self.add(diagnostic);
    }

    /// Add an undecodable-literal error.
    pub fn invalid_literal(
        &mut self,
        code: ErrorCode,
        message: impl Into<Arc<str>>,
        span: Span,
        document: Option<DocumentId>,
    ) {
        self.add(
            Diagnostic::error(DiagnosticKind::Syntax(code), message)
                .with_span(span)
                .with_document(document),
        );
    }

    /// Add a duplicate vertex error pointing at the repeat.
    pub fn duplicate_vertex(
        &mut self,
        name: &SmolStr,
        span: Span,
        first: Span,
        document: Option<DocumentId>,
    ) {
        self.add(
            Diagnostic::error(
                DiagnosticKind::DuplicateVertex { name: name.clone() },
                format!("duplicate vertex: '{}' is already declared", name),
            )
            .with_span(span)
            .with_document(document)
            .with_related(RelatedInfo {
                message: Arc::from(format!("first declaration of '{}'", name)),
                span: first,
                document,
            }),
        );
    }

    /// Add an unresolved reference error.
    pub fn unresolved_reference(
        &mut self,
        name: &SmolStr,
        span: Span,
        document: Option<DocumentId>,
    ) {
        self.add(
            Diagnostic::error(
                DiagnosticKind::UnresolvedReference { name: name.clone() },
                format!("unresolved reference: no vertex named '{}'", name),
            )
            .with_span(span)
            .with_document(document),
        );
    }

    /// Add a cyclic dependency error. The cycle is rendered closed, e.g.
    /// `A -> B -> A`, read as "depends on".
    pub fn cyclic_dependency(
        &mut self,
        cycle: Vec<SmolStr>,
        span: Option<Span>,
        document: Option<DocumentId>,
    ) {
        let mut path: Vec<&str> = cycle.iter().map(SmolStr::as_str).collect();
        if let Some(first) = cycle.first() {
            path.push(first.as_str());
        }
        let message = format!("cyclic dependency: {}", path.join(" -> "));
        self.add(
            Diagnostic::error(DiagnosticKind::CyclicDependency { cycle }, message)
                .with_span_opt(span)
                .with_document(document),
        );
    }

    /// Add a duplicate parameter warning.
    pub fn duplicate_parameter(
        &mut self,
        vertex: &SmolStr,
        parameter: &SmolStr,
        span: Span,
        document: Option<DocumentId>,
    ) {
        self.add(
            Diagnostic::warning(
                DiagnosticKind::DuplicateParameter {
                    vertex: vertex.clone(),
                    parameter: parameter.clone(),
                },
                format!(
                    "parameter '{}' of '{}' is assigned more than once; the last value wins",
                    parameter, vertex
                ),
            )
            .with_span(span)
            .with_document(document),
        );
    }

    /// Add a resource limit error.
    pub fn limit_exceeded(
        &mut self,
        limit: Limit,
        actual: usize,
        max: usize,
        document: Option<DocumentId>,
    ) {
        self.add(
            Diagnostic::error(
                DiagnosticKind::ResourceLimitExceeded { limit, actual, max },
                format!("resource limit exceeded: {} is {} (maximum {})", limit, actual, max),
            )
            .with_document(document),
        );
    }

    /// Add a merge collision at the given severity.
    pub fn merge_collision(
        &mut self,
        name: &SmolStr,
        previous: DocumentId,
        span: Span,
        document: DocumentId,
        severity: Severity,
    ) {
        let message = if severity.is_error() {
            format!("merge collision: '{}' is already declared in {}", name, previous)
        } else {
            format!("merge collision: '{}' overrides the definition from {}", name, previous)
        };
        self.add(
            Diagnostic::new(
                DiagnosticKind::MergeCollision {
                    name: name.clone(),
                    previous,
                },
                severity,
                message,
            )
            .with_span(span)
            .with_document(Some(document)),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Move every diagnostic of `other` into this collector.
    pub fn extend(&mut self, other: DiagnosticCollector) {
        self.diagnostics.extend(other.diagnostics);
    }
}
