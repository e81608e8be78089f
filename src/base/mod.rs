//! Foundation types for the dflow toolchain.
//!
//! This module provides fundamental types used throughout the compiler:
//! - [`DocumentId`] - Identifies one input document of a merge
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Position`], [`Span`] - Line/column positions for diagnostics
//! - [`Limits`] - Resource bounds applied to untrusted input
//!
//! This module has NO dependencies on other dflow modules.

mod document_id;
mod limits;
mod position;
mod span;

pub use document_id::DocumentId;
pub use limits::{Limit, Limits};
pub use position::{Position, Span};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
