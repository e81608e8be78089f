//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (invalid tokens, malformed literals)
//! - E02xx: Structural errors (braces, semicolons)
//! - E03xx: Declaration errors (names, keywords, bodies)
//! - E04xx: Value errors
//! - E09xx: Generic/fallback errors

use std::fmt;

/// Stable code of a parser error. The numbers are part of the output format
/// and never get reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,
    /// Unterminated string literal
    E0102,
    /// Unterminated block comment
    E0103,
    /// Numeric literal out of range
    E0104,
    /// Unknown escape sequence in a string literal
    E0105,

    // =========================================================================
    // E02xx: Structural errors (braces, semicolons)
    // =========================================================================
    /// Missing semicolon
    E0201,
    /// Unclosed brace `{`
    E0202,
    /// Unexpected closing brace
    E0205,

    // =========================================================================
    // E03xx: Declaration errors
    // =========================================================================
    /// Missing identifier/name
    E0301,
    /// Missing `task`/`step` keyword
    E0302,
    /// Unexpected token in declaration body
    E0304,
    /// Missing body `{ ... }`
    E0307,

    // =========================================================================
    // E04xx: Value errors
    // =========================================================================
    /// Expected a parameter value
    E0401,

    // =========================================================================
    // E09xx: Generic/fallback errors
    // =========================================================================
    /// Unexpected token in current context
    E0901,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexical
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0103 => "E0103",
            Self::E0104 => "E0104",
            Self::E0105 => "E0105",
            // Structural
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0205 => "E0205",
            // Declaration
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            Self::E0304 => "E0304",
            Self::E0307 => "E0307",
            // Value
            Self::E0401 => "E0401",
            // Generic
            Self::E0901 => "E0901",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
