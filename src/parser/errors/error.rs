//! The error record produced by the parser.
//!
//! Parser errors are always hard errors; warnings only arise later, while a
//! model is assembled, so there is no severity here.

use crate::base::TextRange;

use super::codes::ErrorCode;

/// A second location an error points at, such as the `{` an unclosed body
/// started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub message: String,
    pub range: TextRange,
}

/// A grammatical or lexical problem in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub code: ErrorCode,
    /// Byte range of the offending token, or an empty range where something
    /// is missing.
    pub range: TextRange,
    pub message: String,
    /// How to fix it, when there is an obvious fix.
    pub hint: Option<String>,
    pub related: Vec<RelatedInfo>,
}

impl SyntaxError {
    pub fn new(code: ErrorCode, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            code,
            range,
            message: message.into(),
            hint: None,
            related: Vec::new(),
        }
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Point at a second location.
    pub fn related(mut self, message: impl Into<String>, range: TextRange) -> Self {
        self.related.push(RelatedInfo {
            message: message.into(),
            range,
        });
        self
    }
}
