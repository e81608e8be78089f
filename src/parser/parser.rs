//! Recursive descent parser for dflow
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST.

use super::errors::{ErrorCode, SyntaxError};
use super::keywords;
use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use crate::base::{TextRange, TextSize};
use rowan::{GreenNode, GreenNodeBuilder};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse dflow source text into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.report_lexical_errors();
    parser.parse_source_file();
    parser.finish()
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(mut self) -> Parse {
        self.errors.sort_by_key(|e| e.range.start());
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::EOF)
    }

    fn current_text(&self) -> &str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    fn current_range(&self) -> TextRange {
        self.current()
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| TextRange::empty(self.end_offset()))
    }

    fn end_offset(&self) -> TextSize {
        self.tokens
            .last()
            .map(|t| t.offset + TextSize::of(t.text))
            .unwrap_or_default()
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    fn at_eof(&self) -> bool {
        self.at(SyntaxKind::EOF)
    }

    /// Look ahead, skipping trivia
    fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    /// Consume the current token into the tree; EOF is never consumed
    fn bump(&mut self) {
        if let Some(token) = self.current() {
            if token.kind == SyntaxKind::EOF {
                return;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_trivia(&mut self) {
        while self.current_kind().is_trivia() {
            self.bump();
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    /// Lexical errors are reported once, up front, straight from the tokens
    fn report_lexical_errors(&mut self) {
        for token in self.tokens {
            let range = TextRange::at(token.offset, TextSize::of(token.text));
            let error = match token.kind {
                SyntaxKind::ERROR => SyntaxError::new(
                    ErrorCode::E0101,
                    range,
                    format!("invalid character '{}'", token.text.escape_debug()),
                ),
                SyntaxKind::UNTERMINATED_STRING => {
                    SyntaxError::new(ErrorCode::E0102, range, "unterminated string literal")
                        .hint("close the string with '\"' before the end of the line")
                }
                SyntaxKind::UNTERMINATED_COMMENT => {
                    SyntaxError::new(ErrorCode::E0103, range, "unterminated block comment")
                        .hint("close the comment with '*/'")
                }
                _ => continue,
            };
            self.errors.push(error);
        }
    }

    /// Record an error at the current token.
    ///
    /// Errors landing on a lexical error token are dropped: that token was
    /// already reported with a more precise code.
    fn error(&mut self, error: SyntaxError) {
        if self.current_kind().is_lexical_error() {
            return;
        }
        self.errors.push(error);
    }

    fn error_here(&mut self, code: ErrorCode, message: impl Into<String>) {
        let error = SyntaxError::new(code, self.current_range(), message);
        self.error(error);
    }

    /// Statement-level recovery: skip to the next declaration keyword at
    /// brace depth 0, or EOF
    fn recover_statement(&mut self) {
        if self.at_eof() || self.current_kind().is_vertex_keyword() {
            return;
        }
        self.builder.start_node(SyntaxKind::ERROR.into());
        let mut depth = 0usize;
        while !self.at_eof() {
            match self.current_kind() {
                kind if kind.is_vertex_keyword() && depth == 0 => break,
                SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_BRACE => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
        }
        self.builder.finish_node();
    }

    /// Member-level recovery: skip past the next ';', or up to '}' or a
    /// declaration keyword. Always consumes at least one token unless
    /// already at a stop token.
    fn recover_member(&mut self) {
        if self.at_eof() || self.at(SyntaxKind::R_BRACE) || self.current_kind().is_vertex_keyword() {
            return;
        }
        self.builder.start_node(SyntaxKind::ERROR.into());
        while !self.at_eof()
            && !self.at(SyntaxKind::R_BRACE)
            && !self.current_kind().is_vertex_keyword()
        {
            let was_semicolon = self.at(SyntaxKind::SEMICOLON);
            self.bump();
            if was_semicolon {
                break;
            }
        }
        self.builder.finish_node();
    }

    /// Expect a member-terminating ';'.
    ///
    /// When it is missing but the next token can start a new member, only
    /// the error is recorded; otherwise the rest of the member is skipped.
    fn expect_member_end(&mut self, what: &str) {
        self.skip_trivia();
        if self.eat(SyntaxKind::SEMICOLON) {
            return;
        }
        let error = SyntaxError::new(
            ErrorCode::E0201,
            TextRange::empty(self.current_range().start()),
            format!("expected ';' after {}", what),
        )
        .hint(format!("add ';' at the end of the {}", what));
        self.error(error);

        if !self.at_member_start() {
            self.recover_member();
        }
    }

    fn at_member_start(&self) -> bool {
        self.at_any(&[
            SyntaxKind::IDENT,
            SyntaxKind::DEPENDS_KW,
            SyntaxKind::R_BRACE,
            SyntaxKind::TASK_KW,
            SyntaxKind::STEP_KW,
            SyntaxKind::EOF,
        ])
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// SourceFile = Declaration*
    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);

        loop {
            self.skip_trivia();
            if self.at_eof() {
                break;
            }
            let pos_before = self.pos;

            match self.current_kind() {
                SyntaxKind::TASK_KW | SyntaxKind::STEP_KW => self.parse_declaration(),
                // Empty statement
                SyntaxKind::SEMICOLON => self.bump(),
                SyntaxKind::R_BRACE => {
                    self.error_here(ErrorCode::E0205, "unexpected '}' outside of a declaration body");
                    self.start_node(SyntaxKind::ERROR);
                    self.bump();
                    self.finish_node();
                }
                SyntaxKind::IDENT => {
                    let text = self.current_text().to_string();
                    let mut error = SyntaxError::new(
                        ErrorCode::E0302,
                        self.current_range(),
                        format!("expected 'task' or 'step', found '{}'", text),
                    );
                    if let Some(kw) = keywords::keyword_kind(&text.to_ascii_lowercase())
                        .filter(|kind| kind.is_vertex_keyword())
                    {
                        let word = if kw == SyntaxKind::TASK_KW { "task" } else { "step" };
                        error = error.hint(format!(
                            "keywords are case-sensitive; did you mean '{}'?",
                            word
                        ));
                    }
                    self.error(error);
                    self.recover_statement();
                }
                kind => {
                    self.error_here(ErrorCode::E0901, format!("unexpected {}", describe(kind)));
                    self.recover_statement();
                }
            }

            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.start_node(SyntaxKind::ERROR);
                self.bump();
                self.finish_node();
            }
        }

        self.finish_node();
    }

    /// Declaration = ('task' | 'step') Name Body ';'?
    fn parse_declaration(&mut self) {
        self.start_node(SyntaxKind::DECLARATION);

        let keyword = self.current_text().to_string();
        self.bump(); // task | step
        self.skip_trivia();

        if self.at(SyntaxKind::IDENT) {
            self.parse_name();
            self.skip_trivia();
        } else if self.current_kind().is_keyword() {
            self.error_here(
                ErrorCode::E0301,
                format!("'{}' is a keyword and cannot name a {}", self.current_text(), keyword),
            );
            self.bump();
            self.skip_trivia();
        } else {
            self.error_here(ErrorCode::E0301, format!("expected a name after '{}'", keyword));
            if !self.at(SyntaxKind::L_BRACE) {
                self.recover_statement();
                self.finish_node();
                return;
            }
        }

        if self.at(SyntaxKind::L_BRACE) {
            self.parse_body();
            if self.nth(0) == SyntaxKind::SEMICOLON {
                self.skip_trivia();
                self.bump();
            }
        } else {
            let error = SyntaxError::new(
                ErrorCode::E0307,
                self.current_range(),
                format!("expected '{{' to open the body of {}", keyword),
            )
            .hint("declarations need a body, even an empty one: '{ }'");
            self.error(error);
            self.recover_statement();
        }

        self.finish_node();
    }

    /// Name = IDENT
    fn parse_name(&mut self) {
        self.start_node(SyntaxKind::NAME);
        self.bump();
        self.finish_node();
    }

    /// NameRef = IDENT
    fn parse_name_ref(&mut self) {
        self.start_node(SyntaxKind::NAME_REF);
        self.bump();
        self.finish_node();
    }

    /// Body = '{' Member* '}'
    fn parse_body(&mut self) {
        self.start_node(SyntaxKind::BODY);

        let open = self.current_range();
        self.bump(); // {

        loop {
            self.skip_trivia();
            let pos_before = self.pos;

            match self.current_kind() {
                SyntaxKind::R_BRACE => {
                    self.bump();
                    break;
                }
                SyntaxKind::EOF => {
                    let error = SyntaxError::new(
                        ErrorCode::E0202,
                        self.current_range(),
                        "unclosed '{' at end of input",
                    )
                    .hint("add '}' to close the body")
                    .related("opening brace here", open);
                    self.error(error);
                    break;
                }
                SyntaxKind::TASK_KW | SyntaxKind::STEP_KW => {
                    let error = SyntaxError::new(
                        ErrorCode::E0202,
                        TextRange::empty(self.current_range().start()),
                        "missing '}' before the next declaration",
                    )
                    .hint("add '}' to close the body")
                    .related("opening brace here", open);
                    self.error(error);
                    break;
                }
                SyntaxKind::IDENT => self.parse_parameter(),
                SyntaxKind::DEPENDS_KW => self.parse_dependency(),
                // Empty member
                SyntaxKind::SEMICOLON => self.bump(),
                kind => {
                    self.error_here(
                        ErrorCode::E0304,
                        format!(
                            "unexpected {} in body; expected a parameter or 'depends on'",
                            describe(kind)
                        ),
                    );
                    self.recover_member();
                }
            }

            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.start_node(SyntaxKind::ERROR);
                self.bump();
                self.finish_node();
            }
        }

        self.finish_node();
    }

    /// Parameter = Name '=' Value ';'
    fn parse_parameter(&mut self) {
        self.start_node(SyntaxKind::PARAMETER);

        self.parse_name();
        self.skip_trivia();

        if !self.eat(SyntaxKind::EQ) {
            self.error_here(ErrorCode::E0304, "expected '=' after parameter name");
            self.recover_member();
            self.finish_node();
            return;
        }
        self.skip_trivia();

        if !self.parse_value() {
            self.recover_member();
            self.finish_node();
            return;
        }

        self.expect_member_end("parameter");
        self.finish_node();
    }

    /// Value = STRING | '-'? (INTEGER | DECIMAL) | 'true' | 'false' | NameRef
    fn parse_value(&mut self) -> bool {
        match self.current_kind() {
            SyntaxKind::STRING
            | SyntaxKind::INTEGER
            | SyntaxKind::DECIMAL
            | SyntaxKind::TRUE_KW
            | SyntaxKind::FALSE_KW => {
                self.start_node(SyntaxKind::VALUE);
                self.bump();
                self.finish_node();
                true
            }
            SyntaxKind::MINUS => {
                self.start_node(SyntaxKind::VALUE);
                self.bump(); // -
                let ok = self.at_any(&[SyntaxKind::INTEGER, SyntaxKind::DECIMAL]);
                if ok {
                    self.bump();
                } else {
                    self.error_here(ErrorCode::E0401, "expected a number directly after '-'");
                }
                self.finish_node();
                ok
            }
            SyntaxKind::IDENT => {
                self.start_node(SyntaxKind::VALUE);
                self.parse_name_ref();
                self.finish_node();
                true
            }
            kind => {
                let error = SyntaxError::new(
                    ErrorCode::E0401,
                    self.current_range(),
                    format!("expected a value, found {}", describe(kind)),
                )
                .hint("values are strings, numbers, 'true', 'false' or a vertex name");
                self.error(error);
                false
            }
        }
    }

    /// Dependency = 'depends' 'on' NameRef (',' NameRef)* ';'
    fn parse_dependency(&mut self) {
        self.start_node(SyntaxKind::DEPENDENCY);

        self.bump(); // depends
        self.skip_trivia();

        if !self.eat(SyntaxKind::ON_KW) {
            self.error_here(ErrorCode::E0304, "expected 'on' after 'depends'");
            self.recover_member();
            self.finish_node();
            return;
        }
        self.skip_trivia();

        loop {
            if !self.at(SyntaxKind::IDENT) {
                self.error_here(
                    ErrorCode::E0301,
                    format!("expected a vertex name, found {}", describe(self.current_kind())),
                );
                self.recover_member();
                self.finish_node();
                return;
            }
            self.parse_name_ref();

            if self.nth(0) != SyntaxKind::COMMA {
                break;
            }
            self.skip_trivia();
            self.bump(); // ,
            self.skip_trivia();
        }

        self.expect_member_end("dependency clause");
        self.finish_node();
    }
}

/// Human-readable token description for error messages
fn describe(kind: SyntaxKind) -> String {
    match kind {
        SyntaxKind::EOF => "end of input".to_string(),
        SyntaxKind::IDENT => "identifier".to_string(),
        SyntaxKind::INTEGER | SyntaxKind::DECIMAL => "number".to_string(),
        SyntaxKind::STRING => "string".to_string(),
        SyntaxKind::L_BRACE => "'{'".to_string(),
        SyntaxKind::R_BRACE => "'}'".to_string(),
        SyntaxKind::SEMICOLON => "';'".to_string(),
        SyntaxKind::COMMA => "','".to_string(),
        SyntaxKind::EQ => "'='".to_string(),
        SyntaxKind::MINUS => "'-'".to_string(),
        kind if kind.is_keyword() => {
            let word = keywords::KEYWORDS
                .iter()
                .find(|w| keywords::keyword_kind(w) == Some(kind))
                .copied()
                .unwrap_or("keyword");
            format!("keyword '{}'", word)
        }
        kind => format!("{:?}", kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let parse = parse("");
        assert!(parse.ok());
        assert_eq!(parse.syntax().kind(), SyntaxKind::SOURCE_FILE);
    }

    #[test]
    fn test_parse_empty_declaration() {
        let parse = parse("task A {}");
        assert!(parse.ok(), "errors: {:?}", parse.errors);
    }

    #[test]
    fn test_parse_declaration_with_members() {
        let source = r#"
            task fetch {
                url = "https://example.org";
                retries = 3;
                ratio = -0.5;
                verbose = true;
                input = prepare;
                depends on prepare, setup;
            }
        "#;
        let parse = parse(source);
        assert!(parse.ok(), "errors: {:?}", parse.errors);
    }

    #[test]
    fn test_parse_optional_terminator() {
        let parse = parse("task A {};\nstep B {}\n;");
        assert!(parse.ok(), "errors: {:?}", parse.errors);
    }

    #[test]
    fn test_parse_is_lossless() {
        let source = "task A { // note\n  x = 1 ;\n} garbage\nstep B {}";
        let parse = parse(source);
        assert_eq!(parse.syntax().text().to_string(), source);
    }

    #[test]
    fn test_recovery_continues_after_bad_declaration() {
        let parse = parse("tsk A { x = 1; }\ntask B { y = ; }\ntask C {}");
        let codes: Vec<_> = parse.errors.iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![ErrorCode::E0302, ErrorCode::E0401]);
    }

    #[test]
    fn test_statement_recovery_balances_braces() {
        let parse = parse("tsk A { step = 1; }\ntask B {}");
        assert_eq!(parse.errors.len(), 1, "errors: {:?}", parse.errors);
        assert_eq!(parse.errors[0].code, ErrorCode::E0302);
    }

    #[test]
    fn test_case_mismatched_keyword_gets_hint() {
        let parse = parse("Task A {}");
        assert_eq!(parse.errors.len(), 1);
        assert!(parse.errors[0].hint.as_deref().unwrap_or("").contains("'task'"));
    }

    #[test]
    fn test_missing_semicolon_is_reported_once() {
        let parse = parse("task A {\n  x = 1\n  y = 2;\n}");
        assert_eq!(parse.errors.len(), 1, "errors: {:?}", parse.errors);
        assert_eq!(parse.errors[0].code, ErrorCode::E0201);
    }

    #[test]
    fn test_missing_body() {
        let parse = parse("task A\ntask B {}");
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(parse.errors[0].code, ErrorCode::E0307);
    }

    #[test]
    fn test_missing_name_still_parses_body() {
        let parse = parse("task { x = 1; }");
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(parse.errors[0].code, ErrorCode::E0301);
    }

    #[test]
    fn test_unclosed_body_before_next_declaration() {
        let parse = parse("task A { x = 1;\ntask B {}");
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(parse.errors[0].code, ErrorCode::E0202);
    }

    #[test]
    fn test_stray_closing_brace() {
        let parse = parse("task A {} }");
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(parse.errors[0].code, ErrorCode::E0205);
    }

    #[test]
    fn test_dependency_without_on() {
        let parse = parse("task A { depends B; }");
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(parse.errors[0].code, ErrorCode::E0304);
    }

    #[test]
    fn test_errors_sorted_by_position() {
        let parse = parse("task A { x = ; }\n$\ntask B { depends on ; }");
        let starts: Vec<_> = parse.errors.iter().map(|e| e.range.start()).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
        assert_eq!(parse.errors.len(), 3, "errors: {:?}", parse.errors);
    }
}
