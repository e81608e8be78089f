// Text output for dflow models
pub mod formatter;

pub use formatter::{FormatOptions, serialize, serialize_with};

// Re-export Position and Span from base for convenience
pub use crate::base::{Position, Span};
