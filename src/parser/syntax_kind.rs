//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the dflow syntax tree.

/// All syntax kinds (tokens and nodes) in dflow
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (declarations, bodies, parameters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,
    UNTERMINATED_COMMENT, // /* ... <eof>

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,               // identifier
    INTEGER,             // 42
    DECIMAL,             // 3.14, 1e9
    STRING,              // "hello"
    UNTERMINATED_STRING, // "hello<eol>

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,   // {
    R_BRACE,   // }
    SEMICOLON, // ;
    COMMA,     // ,
    EQ,        // =
    MINUS,     // -

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    TASK_KW,
    STEP_KW,
    DEPENDS_KW,
    ON_KW,
    TRUE_KW,
    FALSE_KW,

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_FILE,
    DECLARATION, // task Name { ... }
    NAME,        // declared name (vertex or parameter)
    NAME_REF,    // reference to a vertex
    BODY,        // { Member* }
    PARAMETER,   // name = value;
    DEPENDENCY,  // depends on A, B;
    VALUE,       // literal or reference on the right of '='

    // Special
    ERROR,
    EOF,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT | Self::UNTERMINATED_COMMENT
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::TASK_KW as u16) && (self as u16) <= (Self::FALSE_KW as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(self, Self::IDENT | Self::INTEGER | Self::DECIMAL | Self::STRING)
    }

    /// Keywords that open a declaration; also the statement recovery boundary
    pub fn is_vertex_keyword(self) -> bool {
        matches!(self, Self::TASK_KW | Self::STEP_KW)
    }

    /// Tokens the lexer produces for input it could not classify
    pub fn is_lexical_error(self) -> bool {
        matches!(
            self,
            Self::ERROR | Self::UNTERMINATED_STRING | Self::UNTERMINATED_COMMENT
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DflowLanguage {}

impl rowan::Language for DflowLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<DflowLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<DflowLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<DflowLanguage>;
