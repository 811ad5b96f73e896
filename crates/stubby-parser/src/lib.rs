//! stubby parser: event-based parser producing a rowan-based CST.
//!
//! This crate transforms the token stream from `stubby-lexer` into a lossless
//! concrete syntax tree using the `rowan` library. The CST preserves all
//! tokens including whitespace and comments; the emitter copies original
//! members straight out of it.
//!
//! Only declarations are structured: type definitions, their attributes,
//! modifiers and members, parameter lists and types. Bodies and initializer
//! expressions are balanced token runs.

pub mod ast;
pub mod cst;
pub mod error;
mod parser;
pub mod syntax_kind;

pub use cst::{StubbyLanguage, SyntaxElement, SyntaxNode, SyntaxToken};
pub use error::ParseError;
pub use syntax_kind::SyntaxKind;

use ast::item::SourceFile;
use ast::AstNode;

/// Result of parsing a source file.
///
/// Lexer errors come first, followed by at most one parse error (the parser
/// stops structuring the file at the first problem).
#[derive(Debug, Clone)]
pub struct Parse {
    green: rowan::GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Build the syntax tree root from the green node.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The typed root of the tree.
    pub fn tree(&self) -> SourceFile {
        // The root is always built as SOURCE_FILE.
        SourceFile::cast(self.syntax()).unwrap_or_else(|| unreachable!("root is SOURCE_FILE"))
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Whether parsing completed without errors.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a source file into a CST.
pub fn parse(source: &str) -> Parse {
    let (tokens, lex_errors) = stubby_lexer::Lexer::tokenize_with_errors(source);
    let mut p = parser::Parser::new(tokens, source);
    parser::parse_source_file(&mut p);
    let (green, parse_errors) = p.build_tree();

    let mut errors: Vec<ParseError> = lex_errors.into_iter().map(ParseError::from).collect();
    errors.extend(parse_errors);
    Parse { green, errors }
}

/// Render a tree as an indented `KIND@start..end` listing, one element per
/// line. Tokens also show their text. Used by snapshot tests.
pub fn debug_tree(node: &SyntaxNode) -> String {
    let mut out = String::new();
    write_tree(&mut out, node, 0);
    out
}

fn write_tree(out: &mut String, node: &SyntaxNode, depth: usize) {
    use std::fmt::Write;

    let range = node.text_range();
    let _ = writeln!(
        out,
        "{:indent$}{:?}@{}..{}",
        "",
        node.kind(),
        u32::from(range.start()),
        u32::from(range.end()),
        indent = depth * 2
    );
    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Node(n) => write_tree(out, &n, depth + 1),
            rowan::NodeOrToken::Token(t) => {
                let range = t.text_range();
                let _ = writeln!(
                    out,
                    "{:indent$}{:?}@{}..{} {:?}",
                    "",
                    t.kind(),
                    u32::from(range.start()),
                    u32::from(range.end()),
                    t.text(),
                    indent = (depth + 1) * 2
                );
            }
        }
    }
}
