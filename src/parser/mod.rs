//! Lossless parser for dflow documents
//!
//! This module provides a lossless parser using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind and Position
//!     ↓
//! Parser → GreenNode tree + SyntaxErrors
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//!     ↓
//! HIR → Model
//! ```
//!
//! The parser never stops at the first error. Statement-level recovery
//! resynchronises on `task`/`step`, member-level recovery on `;` and `}`,
//! so one pass reports every independent syntax error in a document.

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
pub mod errors;
pub mod keywords;
mod lexer;
mod syntax_kind;

pub use ast::*;
pub use errors::{ErrorCode, RelatedInfo, SyntaxError};
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, parse};
pub use syntax_kind::{DflowLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Re-export rowan types for convenience
pub use rowan::GreenNode;
