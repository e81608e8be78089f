//! High-level IR (HIR): the validated workflow model and how it is built.
//!
//! ## Passes
//!
//! ```text
//! text
//!   │  limit check (max_document_bytes)
//!   ▼
//! parse(text)               ← CST + syntax errors
//!   │
//!   ▼
//! lower_document            ← declaration pass: names, literals, duplicates
//!   │
//!   ▼
//! resolve                   ← references, edges, self-dependencies
//!   │
//!   ▼
//! check_cycles              ← iterative DFS
//!   │
//!   ▼
//! Model  or  BuildError { diagnostics }
//! ```
//!
//! Every pass runs; diagnostics are collected and returned together.

mod builder;
mod cycles;
mod diagnostics;
pub(crate) mod lower;
mod model;
pub(crate) mod resolve;

pub use builder::{BuildError, Built, ModelBuilder, build_model};
pub(crate) use builder::assemble;
pub use diagnostics::{
    Diagnostic, DiagnosticCollector, DiagnosticKind, RelatedInfo, Severity, codes,
};
pub(crate) use diagnostics::render;
pub use model::{Edge, Model, Value, Vertex, VertexKind};
