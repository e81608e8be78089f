//! Resource bounds for untrusted documents.

use std::fmt;

/// Upper bounds on input size and model shape.
///
/// Exceeding any of them is reported as a `ResourceLimitExceeded`
/// diagnostic instead of being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum length of one document, in bytes.
    pub max_document_bytes: usize,
    /// Maximum number of vertices in one model (per document and merged).
    pub max_vertices: usize,
    /// Maximum number of dependency edges in one model.
    pub max_edges: usize,
    /// Maximum number of documents accepted by a single merge.
    pub max_documents: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_document_bytes: 4 * 1024 * 1024, // 4 MiB
            max_vertices: 10_000,
            max_edges: 100_000,
            max_documents: 256,
        }
    }
}

impl Limits {
    /// No bounds at all; intended for trusted input and tests.
    pub fn unbounded() -> Self {
        Self {
            max_document_bytes: usize::MAX,
            max_vertices: usize::MAX,
            max_edges: usize::MAX,
            max_documents: usize::MAX,
        }
    }

    pub fn with_max_document_bytes(mut self, max: usize) -> Self {
        self.max_document_bytes = max;
        self
    }

    pub fn with_max_vertices(mut self, max: usize) -> Self {
        self.max_vertices = max;
        self
    }

    pub fn with_max_edges(mut self, max: usize) -> Self {
        self.max_edges = max;
        self
    }

    pub fn with_max_documents(mut self, max: usize) -> Self {
        self.max_documents = max;
        self
    }

    pub fn max_for(&self, limit: Limit) -> usize {
        match limit {
            Limit::DocumentBytes => self.max_document_bytes,
            Limit::Vertices => self.max_vertices,
            Limit::Edges => self.max_edges,
            Limit::Documents => self.max_documents,
        }
    }
}

/// Which bound in [`Limits`] was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limit {
    DocumentBytes,
    Vertices,
    Edges,
    Documents,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Limit::DocumentBytes => "document size in bytes",
            Limit::Vertices => "vertex count",
            Limit::Edges => "edge count",
            Limit::Documents => "document count",
        })
    }
}
