use std::fmt;

/// Index of an input document within one merge call.
///
/// Single-document builds leave diagnostics without a document; merges tag
/// every diagnostic with the document it came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u32);

impl DocumentId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Position of the document in the caller's input list.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for DocumentId {
    fn from(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document {}", self.0)
    }
}
