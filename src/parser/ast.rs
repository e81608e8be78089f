//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a SyntaxNode and provides methods to access children.
//! Accessors return `Option` because a tree produced by error recovery may
//! be missing any part of a construct.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};
use crate::base::TextRange;

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    fn text_range(&self) -> TextRange {
        self.syntax().text_range()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Find the first direct child token matching a predicate.
#[inline]
fn find_token(node: &SyntaxNode, pred: impl Fn(SyntaxKind) -> bool) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| pred(t.kind()))
}

#[inline]
fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    find_token(node, |k| k == kind).is_some()
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

macro_rules! first_child_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get the first `", stringify!($type), "` child of this node.")]
        pub fn $name(&self) -> Option<$type> {
            self.0.children().find_map($type::cast)
        }
    };
}

macro_rules! children_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get all `", stringify!($type), "` children of this node.")]
        pub fn $name(&self) -> impl Iterator<Item = $type> + '_ {
            self.0.children().filter_map($type::cast)
        }
    };
}

// ============================================================================
// Root
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    children_method!(declarations, Declaration);
}

// ============================================================================
// Declarations
// ============================================================================

/// Which keyword introduced a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKeyword {
    Task,
    Step,
}

ast_node!(Declaration, DECLARATION);

impl Declaration {
    /// The introducing keyword, `task` or `step`
    pub fn keyword(&self) -> Option<DeclarationKeyword> {
        find_token(&self.0, SyntaxKind::is_vertex_keyword).map(|t| match t.kind() {
            SyntaxKind::STEP_KW => DeclarationKeyword::Step,
            _ => DeclarationKeyword::Task,
        })
    }

    first_child_method!(name, Name);
    first_child_method!(body, Body);

    /// Whether the body was closed with `}`
    pub fn is_closed(&self) -> bool {
        self.body()
            .is_some_and(|body| has_token(body.syntax(), SyntaxKind::R_BRACE))
    }
}

ast_node!(Name, NAME);

impl Name {
    pub fn ident(&self) -> Option<SyntaxToken> {
        find_token(&self.0, |k| k == SyntaxKind::IDENT)
    }

    pub fn text(&self) -> Option<String> {
        self.ident().map(|t| t.text().to_string())
    }
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn ident(&self) -> Option<SyntaxToken> {
        find_token(&self.0, |k| k == SyntaxKind::IDENT)
    }

    pub fn text(&self) -> Option<String> {
        self.ident().map(|t| t.text().to_string())
    }
}

// ============================================================================
// Body members
// ============================================================================

ast_node!(Body, BODY);

impl Body {
    children_method!(members, Member);
}

/// A member of a declaration body
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Member {
    Parameter(Parameter),
    Dependency(Dependency),
}

impl AstNode for Member {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(kind, SyntaxKind::PARAMETER | SyntaxKind::DEPENDENCY)
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::PARAMETER => Some(Self::Parameter(Parameter(node))),
            SyntaxKind::DEPENDENCY => Some(Self::Dependency(Dependency(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Parameter(n) => n.syntax(),
            Self::Dependency(n) => n.syntax(),
        }
    }
}

ast_node!(Parameter, PARAMETER);

impl Parameter {
    first_child_method!(name, Name);
    first_child_method!(value, Value);
}

ast_node!(Dependency, DEPENDENCY);

impl Dependency {
    children_method!(targets, NameRef);
}

// ============================================================================
// Values
// ============================================================================

ast_node!(Value, VALUE);

/// The literal form of a value, still undecoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Raw string token text, quotes included
    String(SyntaxToken),
    Integer { negative: bool, token: SyntaxToken },
    Decimal { negative: bool, token: SyntaxToken },
    Boolean(bool),
    Reference(NameRef),
}

impl Value {
    first_child_method!(name_ref, NameRef);

    pub fn is_negative(&self) -> bool {
        has_token(&self.0, SyntaxKind::MINUS)
    }

    /// Classify the value. `None` when recovery left the node incomplete.
    pub fn kind(&self) -> Option<ValueKind> {
        if let Some(name_ref) = self.name_ref() {
            return Some(ValueKind::Reference(name_ref));
        }
        let negative = self.is_negative();
        let token = find_token(&self.0, |k| k.is_literal() || matches!(k, SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW))?;
        Some(match token.kind() {
            SyntaxKind::STRING => ValueKind::String(token),
            SyntaxKind::INTEGER => ValueKind::Integer { negative, token },
            SyntaxKind::DECIMAL => ValueKind::Decimal { negative, token },
            SyntaxKind::TRUE_KW => ValueKind::Boolean(true),
            SyntaxKind::FALSE_KW => ValueKind::Boolean(false),
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn source_file(text: &str) -> SourceFile {
        let parsed = parse(text);
        assert!(parsed.ok(), "errors: {:?}", parsed.errors);
        SourceFile::cast(parsed.syntax()).unwrap()
    }

    #[test]
    fn test_ast_declaration() {
        let root = source_file("task fetch {}\nstep clean {}");
        let decls: Vec<_> = root.declarations().collect();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].keyword(), Some(DeclarationKeyword::Task));
        assert_eq!(decls[0].name().and_then(|n| n.text()), Some("fetch".to_string()));
        assert_eq!(decls[1].keyword(), Some(DeclarationKeyword::Step));
        assert!(decls[1].is_closed());
    }

    #[test]
    fn test_ast_members_in_source_order() {
        let root = source_file("task A { x = 1; depends on B, C; y = \"s\"; }");
        let decl = root.declarations().next().unwrap();
        let members: Vec<_> = decl.body().unwrap().members().collect();
        assert_eq!(members.len(), 3);

        let Member::Dependency(dep) = &members[1] else {
            panic!("expected Dependency");
        };
        let targets: Vec<_> = dep.targets().filter_map(|t| t.text()).collect();
        assert_eq!(targets, vec!["B", "C"]);
    }

    #[test]
    fn test_ast_value_kinds() {
        let root = source_file("task A { a = \"s\"; b = -3; c = 2.5; d = false; e = B; }");
        let decl = root.declarations().next().unwrap();
        let kinds: Vec<_> = decl
            .body()
            .unwrap()
            .members()
            .filter_map(|m| match m {
                Member::Parameter(p) => p.value().and_then(|v| v.kind()),
                Member::Dependency(_) => None,
            })
            .collect();

        assert!(matches!(&kinds[0], ValueKind::String(t) if t.text() == "\"s\""));
        assert!(matches!(&kinds[1], ValueKind::Integer { negative: true, token } if token.text() == "3"));
        assert!(matches!(&kinds[2], ValueKind::Decimal { negative: false, .. }));
        assert_eq!(kinds[3], ValueKind::Boolean(false));
        assert!(matches!(&kinds[4], ValueKind::Reference(r) if r.text().as_deref() == Some("B")));
    }

    #[test]
    fn test_ast_unclosed_body() {
        let parsed = parse("task A { x = 1;");
        let root = SourceFile::cast(parsed.syntax()).unwrap();
        let decl = root.declarations().next().unwrap();
        assert!(!decl.is_closed());
    }
}
