//! Logos-based lexer for dflow
//!
//! Fast tokenization using the logos crate. The lexer is lossless: trivia
//! is kept so the CST covers every byte of the input, and input it cannot
//! classify becomes error tokens instead of stopping the scan.

use super::syntax_kind::SyntaxKind;
use crate::base::{Position, TextSize};
use logos::Logos;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
    /// 0-indexed line and byte column of the first character
    pub position: Position,
}

/// Lexer wrapping the logos-generated tokenizer
///
/// Yields every token of the input followed by exactly one
/// [`SyntaxKind::EOF`] token, then stops.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
    position: Position,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
            position: Position::default(),
            finished: false,
        }
    }

    fn advance(&mut self, text: &str) {
        self.offset += text.len() as u32;
        match text.rfind('\n') {
            Some(last_newline) => {
                self.position.line += text.matches('\n').count();
                self.position.column = text.len() - last_newline - 1;
            }
            None => self.position.column += text.len(),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let Some(logos_token) = self.inner.next() else {
            self.finished = true;
            return Some(Token {
                kind: SyntaxKind::EOF,
                text: "",
                offset: TextSize::new(self.offset),
                position: self.position,
            });
        };

        let text = self.inner.slice();
        let token = Token {
            kind: match logos_token {
                Ok(t) => t.into(),
                Err(()) => SyntaxKind::ERROR,
            },
            text,
            offset: TextSize::new(self.offset),
            position: self.position,
        };
        self.advance(text);

        Some(token)
    }
}

/// Tokenize an entire string into a Vec (including the trailing EOF)
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\**")]
    UnterminatedComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Decimal,

    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    String,

    #[regex(r#""([^"\\\n]|\\[^\n])*"#)]
    UnterminatedString,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
    #[token("-")]
    Minus,

    // =========================================================================
    // KEYWORDS (exact tokens win over the Ident regex at equal length)
    // =========================================================================
    #[token("task")]
    TaskKw,
    #[token("step")]
    StepKw,
    #[token("depends")]
    DependsKw,
    #[token("on")]
    OnKw,
    #[token("true")]
    TrueKw,
    #[token("false")]
    FalseKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,
            UnterminatedComment => SyntaxKind::UNTERMINATED_COMMENT,

            Ident => SyntaxKind::IDENT,
            Integer => SyntaxKind::INTEGER,
            Decimal => SyntaxKind::DECIMAL,
            String => SyntaxKind::STRING,
            UnterminatedString => SyntaxKind::UNTERMINATED_STRING,

            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            Semicolon => SyntaxKind::SEMICOLON,
            Comma => SyntaxKind::COMMA,
            Eq => SyntaxKind::EQ,
            Minus => SyntaxKind::MINUS,

            TaskKw => SyntaxKind::TASK_KW,
            StepKw => SyntaxKind::STEP_KW,
            DependsKw => SyntaxKind::DEPENDS_KW,
            OnKw => SyntaxKind::ON_KW,
            TrueKw => SyntaxKind::TRUE_KW,
            FalseKw => SyntaxKind::FALSE_KW,
        }
    }
}
