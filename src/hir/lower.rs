//! Declaration pass: lower the CST into draft vertices.
//!
//! Lowering registers every vertex name, decodes literal values and keeps
//! source spans for the later passes. References are kept as names here;
//! they are only checked by [`super::resolve`], which lets the merger lower
//! documents that depend on each other.

use indexmap::IndexMap;
use indexmap::map::Entry;
use smol_str::SmolStr;
use tracing::trace;

use super::diagnostics::DiagnosticCollector;
use super::model::{Value, VertexKind};
use crate::base::{DocumentId, Limit, Limits, LineIndex, Span};
use crate::parser::{
    AstNode, Declaration, DeclarationKeyword, ErrorCode, Member, SourceFile, SyntaxToken,
    ValueKind, parse,
};

/// All vertices of one or more documents, not yet resolved.
#[derive(Debug, Clone, Default)]
pub(crate) struct Draft {
    pub(crate) vertices: IndexMap<SmolStr, DraftVertex>,
    /// Repeated declarations. They never become vertices, but their
    /// dependencies and reference values are still resolved.
    pub(crate) shadowed: Vec<DraftVertex>,
}

#[derive(Debug, Clone)]
pub(crate) struct DraftVertex {
    pub(crate) name: SmolStr,
    pub(crate) kind: VertexKind,
    /// Span of the declared name
    pub(crate) span: Span,
    pub(crate) document: Option<DocumentId>,
    pub(crate) parameters: IndexMap<SmolStr, DraftParameter>,
    pub(crate) dependencies: Vec<DraftDependency>,
}

#[derive(Debug, Clone)]
pub(crate) struct DraftParameter {
    pub(crate) value: Value,
    /// Span of the value
    pub(crate) span: Span,
    pub(crate) document: Option<DocumentId>,
}

#[derive(Debug, Clone)]
pub(crate) struct DraftDependency {
    pub(crate) target: SmolStr,
    pub(crate) span: Span,
    pub(crate) document: Option<DocumentId>,
}

/// Parse and lower one document.
///
/// Syntax errors, duplicate vertices, undecodable literals and limit
/// violations go to `diagnostics`. Whatever could be lowered is returned
/// regardless, so later passes can still report their own problems.
pub(crate) fn lower_document(
    text: &str,
    document: Option<DocumentId>,
    limits: &Limits,
    diagnostics: &mut DiagnosticCollector,
) -> Draft {
    if text.len() > limits.max_document_bytes {
        diagnostics.limit_exceeded(
            Limit::DocumentBytes,
            text.len(),
            limits.max_document_bytes,
            document,
        );
        return Draft::default();
    }

    let parsed = parse(text);
    let index = LineIndex::new(text);
    for error in &parsed.errors {
        diagnostics.syntax(error, &index, document);
    }

    let mut lowerer = Lowerer {
        index,
        document,
        diagnostics,
        draft: Draft::default(),
    };
    if let Some(root) = SourceFile::cast(parsed.syntax()) {
        for declaration in root.declarations() {
            lowerer.declaration(&declaration);
        }
    }
    let draft = lowerer.draft;

    if draft.vertices.len() > limits.max_vertices {
        diagnostics.limit_exceeded(
            Limit::Vertices,
            draft.vertices.len(),
            limits.max_vertices,
            document,
        );
    }

    trace!(
        vertices = draft.vertices.len(),
        syntax_errors = parsed.errors.len(),
        "lowered document"
    );
    draft
}

struct Lowerer<'d> {
    index: LineIndex,
    document: Option<DocumentId>,
    diagnostics: &'d mut DiagnosticCollector,
    draft: Draft,
}

impl Lowerer<'_> {
    fn span(&self, token: &SyntaxToken) -> Span {
        self.index.span(token.text_range())
    }

    fn declaration(&mut self, declaration: &Declaration) {
        // A missing name was already reported by the parser
        let Some(ident) = declaration.name().and_then(|n| n.ident()) else {
            return;
        };
        let name = SmolStr::new(ident.text());
        let span = self.span(&ident);

        let kind = match declaration.keyword() {
            Some(DeclarationKeyword::Step) => VertexKind::Step,
            _ => VertexKind::Task,
        };
        let mut vertex = DraftVertex {
            name: name.clone(),
            kind,
            span,
            document: self.document,
            parameters: IndexMap::new(),
            dependencies: Vec::new(),
        };
        self.members(declaration, &mut vertex);

        if let Some(first) = self.draft.vertices.get(&name) {
            let first = first.span;
            self.diagnostics
                .duplicate_vertex(&name, span, first, self.document);
            // Not registered, but its references are still resolved
            self.draft.shadowed.push(vertex);
            return;
        }

        self.draft.vertices.insert(name, vertex);
    }

    fn members(&mut self, declaration: &Declaration, vertex: &mut DraftVertex) {
        for member in declaration.body().iter().flat_map(|b| b.members()) {
            match member {
                Member::Parameter(parameter) => {
                    let Some(ident) = parameter.name().and_then(|n| n.ident()) else {
                        continue;
                    };
                    let Some(value) = parameter.value() else {
                        continue;
                    };
                    let value_span = self.index.span(value.text_range());
                    let Some(decoded) = value.kind().and_then(|k| self.decode(k, value_span)) else {
                        continue;
                    };

                    let parameter_name = SmolStr::new(ident.text());
                    let lowered = DraftParameter {
                        value: decoded,
                        span: value_span,
                        document: self.document,
                    };
                    match vertex.parameters.entry(parameter_name) {
                        Entry::Occupied(mut entry) => {
                            let name_span = self.span(&ident);
                            self.diagnostics.duplicate_parameter(
                                &vertex.name,
                                entry.key(),
                                name_span,
                                self.document,
                            );
                            entry.insert(lowered);
                        }
                        Entry::Vacant(entry) => {
                            entry.insert(lowered);
                        }
                    }
                }
                Member::Dependency(dependency) => {
                    for target in dependency.targets() {
                        let Some(ident) = target.ident() else {
                            continue;
                        };
                        vertex.dependencies.push(DraftDependency {
                            target: SmolStr::new(ident.text()),
                            span: self.span(&ident),
                            document: self.document,
                        });
                    }
                }
            }
        }
    }

    fn decode(&mut self, kind: ValueKind, span: Span) -> Option<Value> {
        let result = match kind {
            ValueKind::String(token) => decode_string(token.text()).map(Value::String),
            ValueKind::Integer { negative, token } => {
                decode_integer(token.text(), negative).map(Value::Integer)
            }
            ValueKind::Decimal { negative, token } => {
                decode_decimal(token.text(), negative).map(Value::Decimal)
            }
            ValueKind::Boolean(b) => Ok(Value::Boolean(b)),
            ValueKind::Reference(name_ref) => {
                let ident = name_ref.ident()?;
                Ok(Value::Reference(SmolStr::new(ident.text())))
            }
        };
        match result {
            Ok(value) => Some(value),
            Err((code, message)) => {
                self.diagnostics
                    .invalid_literal(code, message, span, self.document);
                None
            }
        }
    }
}

type DecodeResult<T> = Result<T, (ErrorCode, String)>;

/// Strip the quotes and process `\n \r \t \" \\`.
fn decode_string(raw: &str) -> DecodeResult<String> {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                return Err((
                    ErrorCode::E0105,
                    format!("invalid escape sequence '\\{}' in string", other),
                ));
            }
            None => {
                return Err((ErrorCode::E0105, "dangling '\\' at end of string".to_string()));
            }
        }
    }
    Ok(out)
}

fn decode_integer(digits: &str, negative: bool) -> DecodeResult<i64> {
    let overflow = || {
        (
            ErrorCode::E0104,
            format!(
                "integer literal '{}{}' does not fit in 64 bits",
                if negative { "-" } else { "" },
                digits
            ),
        )
    };
    let magnitude: i128 = digits.parse().map_err(|_| overflow())?;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).map_err(|_| overflow())
}

fn decode_decimal(text: &str, negative: bool) -> DecodeResult<f64> {
    let value: f64 = text
        .parse()
        .map_err(|_| (ErrorCode::E0104, format!("invalid decimal literal '{}'", text)))?;
    if !value.is_finite() {
        return Err((
            ErrorCode::E0104,
            format!("decimal literal '{}' is out of range", text),
        ));
    }
    Ok(if negative { -value } else { value })
}
