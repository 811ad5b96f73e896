//! Typed AST layer on top of the rowan CST.
//!
//! Wrappers are newtypes around `SyntaxNode`: `cast()` is a kind check and
//! accessors walk the rowan tree directly.
//!
//! Type references and signatures are read back as *canonical text*: the
//! significant tokens joined with normalised spacing, so `[String:Int] ?`
//! and `[String: Int]?` render identically.

pub mod item;

use stubby_common::span::Span;

use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

/// Trait for typed AST nodes that wrap a rowan `SyntaxNode`.
pub trait AstNode: Sized {
    /// Try to cast a generic `SyntaxNode` into this typed AST node.
    fn cast(node: SyntaxNode) -> Option<Self>;

    /// Access the underlying `SyntaxNode`.
    fn syntax(&self) -> &SyntaxNode;

    /// Byte span of the node in the source.
    fn span(&self) -> Span {
        node_span(self.syntax())
    }
}

/// Generate a typed wrapper struct with an `AstNode` impl checking one kind.
macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub(crate) syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn cast(node: SyntaxNode) -> Option<Self> {
                if node.kind() == SyntaxKind::$kind {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

pub(crate) use ast_node;

/// Find the first child node that can be cast to type `N`.
pub fn child_node<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

/// Find all child nodes that can be cast to type `N`.
pub fn child_nodes<'a, N: AstNode + 'a>(parent: &'a SyntaxNode) -> impl Iterator<Item = N> + 'a {
    parent.children().filter_map(N::cast)
}

/// Find the first child token with the given kind.
pub fn child_token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|it| it.kind() == kind)
}

/// First direct child token that is not trivia.
pub fn first_significant_token(parent: &SyntaxNode) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|it| !it.kind().is_trivia())
}

pub fn node_span(node: &SyntaxNode) -> Span {
    let range = node.text_range();
    Span::new(range.start().into(), range.end().into())
}

pub fn token_span(token: &SyntaxToken) -> Span {
    let range = token.text_range();
    Span::new(range.start().into(), range.end().into())
}

/// Canonical text of every token under `node`.
pub fn canonical_text(node: &SyntaxNode) -> String {
    render_tokens(
        node.descendants_with_tokens()
            .filter_map(|it| it.into_token()),
    )
}

/// Join tokens with normalised spacing. Comments are dropped.
///
/// Spacing, first matching rule wins (operator names stay glued):
/// - around `->` and `=`, before effect keywords: always a space;
/// - after `,` and `:`: always a space;
/// - before `,` `:` `)` `]` `<` `>` `?` `!` `...` `.`: never;
/// - after `(` `[` `<` `@` `.`: never;
/// - otherwise a single space where the source had trivia.
pub fn render_tokens(tokens: impl Iterator<Item = SyntaxToken>) -> String {
    let mut out = String::new();
    let mut prev: Option<SyntaxToken> = None;
    let mut saw_trivia = false;

    for token in tokens {
        let kind = token.kind();
        if kind.is_trivia() {
            saw_trivia = prev.is_some();
            continue;
        }
        if let Some(prev) = &prev {
            if wants_space(prev, &token, saw_trivia) {
                out.push(' ');
            }
        }
        out.push_str(token.text());
        prev = Some(token);
        saw_trivia = false;
    }
    out
}

fn wants_space(prev: &SyntaxToken, cur: &SyntaxToken, saw_trivia: bool) -> bool {
    let (p, c) = (prev.kind(), cur.kind());
    let cur_in_name = in_name(cur);
    if cur_in_name && in_name(prev) {
        return false;
    }
    if p == SyntaxKind::ARROW || c == SyntaxKind::ARROW {
        return true;
    }
    if matches!(c, SyntaxKind::ASYNC_KW | SyntaxKind::THROWS_KW | SyntaxKind::RETHROWS_KW) {
        return true;
    }
    if (p == SyntaxKind::EQ && !in_name(prev)) || (c == SyntaxKind::EQ && !cur_in_name) {
        return true;
    }
    if matches!(p, SyntaxKind::COMMA | SyntaxKind::COLON) {
        return true;
    }
    if !cur_in_name
        && matches!(
            c,
            SyntaxKind::COMMA
                | SyntaxKind::COLON
                | SyntaxKind::R_PAREN
                | SyntaxKind::R_BRACKET
                | SyntaxKind::LT
                | SyntaxKind::GT
                | SyntaxKind::QUESTION
                | SyntaxKind::BANG
                | SyntaxKind::ELLIPSIS
                | SyntaxKind::DOT
        )
    {
        return false;
    }
    if matches!(
        p,
        SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::LT | SyntaxKind::AT | SyntaxKind::DOT
    ) {
        return false;
    }
    saw_trivia
}

fn in_name(token: &SyntaxToken) -> bool {
    token.parent().is_some_and(|parent| parent.kind() == SyntaxKind::NAME)
}

#[cfg(test)]
mod tests {
    use super::item::SourceFile;
    use super::*;

    fn first_type_text(source: &str) -> String {
        let parse = crate::parse(source);
        assert!(parse.ok(), "{:?}", parse.errors());
        let node = parse
            .syntax()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::TYPE_ANNOTATION)
            .and_then(|n| n.children().next())
            .expect("type annotation");
        canonical_text(&node)
    }

    #[test]
    fn canonical_text_normalises_spacing() {
        let src = "class A { var x: [String:Int] ? }";
        assert_eq!(first_type_text(src), "[String: Int]?");
    }

    #[test]
    fn canonical_text_keeps_word_spacing() {
        let src = "class A { var x: some  Collection < Int > }";
        assert_eq!(first_type_text(src), "some Collection<Int>");
    }

    #[test]
    fn canonical_text_function_types() {
        let src = "class A { var x: (Int,String)async throws->Void }";
        assert_eq!(first_type_text(src), "(Int, String) async throws -> Void");
    }

    #[test]
    fn canonical_text_drops_comments() {
        let src = "class A { var x: Int /* count */ ? }";
        assert_eq!(first_type_text(src), "Int?");
    }

    #[test]
    fn node_span_is_tight() {
        let src = "  class A {}  ";
        let parse = crate::parse(src);
        let file = SourceFile::cast(parse.syntax()).unwrap();
        let def = file.type_defs().next().unwrap();
        assert_eq!(def.span(), Span::new(2, 12));
    }
}
