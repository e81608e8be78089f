//! Parser error handling module
//!
//! Every error carries a stable [`ErrorCode`], and may carry a hint and
//! related locations such as where an unclosed body was opened.

mod codes;
mod error;

pub use codes::ErrorCode;
pub use error::{RelatedInfo, SyntaxError};
