//! # dflow
//!
//! Compiler and structural merger for dflow workflow-definition documents.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → Reading documents from disk
//!   ↓
//! merge     → Union of several documents, collision policy, re-validation
//!   ↓
//! syntax    → Canonical serializer (Model → text)
//!   ↓
//! hir       → Model, diagnostics, builder passes
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, typed AST
//!   ↓
//! base      → Primitives (DocumentId, Limits, TextRange, Span)
//! ```
//!
//! ## Quick start
//!
//! ```
//! let model = dflow::build_model("task fetch {}\nstep parse { depends on fetch; }").unwrap();
//! assert_eq!(model.dependencies("parse"), vec!["fetch"]);
//!
//! let merged = dflow::merge_models(&["task A { p = 1; }", "task A { p = 2; }"]).unwrap();
//! assert_eq!(merged, "task A {\n    p = 2;\n}\n");
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → hir → syntax → merge → project)
// ============================================================================

/// Foundation types: DocumentId, Limits, TextRange, Span
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, typed AST
pub mod parser;

/// High-level IR: the validated model and its builder
pub mod hir;

/// Syntax output: canonical serializer
pub mod syntax;

/// Merging several documents into one model
pub mod merge;

/// Filesystem helpers
pub mod project;

/// Model export formats: JSON, YAML
#[cfg(feature = "interchange")]
pub mod interchange;

// Re-export commonly needed items
pub use parser::keywords;

pub use base::{DocumentId, Limit, Limits, LineCol, LineIndex, Position, Span, TextRange, TextSize};
pub use hir::{
    BuildError, Built, Diagnostic, DiagnosticKind, Edge, Model, ModelBuilder, Severity, Value,
    Vertex, VertexKind, build_model,
};
pub use merge::{CollisionPolicy, MergeError, MergeOptions, Merged, Merger, merge_models};
pub use syntax::{FormatOptions, serialize, serialize_with};
