use serde::Serialize;

use crate::span::Span;

/// A token produced by the stubby lexer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

/// Every kind of token in the declaration language.
///
/// Only the declaration skeleton is keyword-sensitive. Method bodies and
/// initializer expressions are kept as balanced token trees, so operators
/// other than the few the grammar needs collapse into [`TokenKind::Operator`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Keywords (19) ──────────────────────────────────────────────────
    Any,
    Async,
    Await,
    Class,
    Deinit,
    Enum,
    Extension,
    Func,
    Init,
    Let,
    Protocol,
    Rethrows,
    Some,
    Struct,
    Subscript,
    Throws,
    Try,
    Typealias,
    Var,

    // ── Delimiters (6) ─────────────────────────────────────────────────
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,

    // ── Punctuation and operators (14) ─────────────────────────────────
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `=`
    Eq,
    /// `->`
    Arrow,
    /// `?`
    Question,
    /// `!`
    Bang,
    /// `@`
    At,
    /// `&`
    Amp,
    /// `...`
    Ellipsis,
    /// Any other run of operator characters (`+`, `==`, `&&`, ...).
    Operator,

    // ── Literals (3) ───────────────────────────────────────────────────
    /// Integer literal, e.g. `42`, `0xFF`.
    IntLiteral,
    /// Floating-point literal, e.g. `3.14`.
    FloatLiteral,
    /// A complete string literal including its quotes (`"..."` or `"""..."""`).
    StringLiteral,

    // ── Identifiers (2) ────────────────────────────────────────────────
    /// Regular or backtick-escaped identifier, e.g. `foo`, `` `default` ``, `$0`.
    Ident,
    /// `_` on its own (wildcard argument label).
    Underscore,

    // ── Trivia (3) ─────────────────────────────────────────────────────
    /// Spaces, tabs and newlines. Kept so the CST is lossless.
    Whitespace,
    /// `// ...` and `/// ...` comments.
    LineComment,
    /// `/* ... */` comments, possibly nested.
    BlockComment,

    // ── Special (3) ────────────────────────────────────────────────────
    /// `#` (compiler directives inside bodies).
    Hash,
    /// End of file.
    Eof,
    /// Invalid/unexpected input. Used for error recovery.
    Error,
}

impl TokenKind {
    /// Whether the token carries no syntactic meaning for the declaration
    /// skeleton.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }
}

/// Look up a keyword from its source text.
///
/// Declaration modifiers (`public`, `static`, `mutating`, ...) are not
/// keywords; the parser recognises them by text so they stay usable as
/// ordinary identifiers inside bodies.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        "any" => Some(TokenKind::Any),
        "async" => Some(TokenKind::Async),
        "await" => Some(TokenKind::Await),
        "class" => Some(TokenKind::Class),
        "deinit" => Some(TokenKind::Deinit),
        "enum" => Some(TokenKind::Enum),
        "extension" => Some(TokenKind::Extension),
        "func" => Some(TokenKind::Func),
        "init" => Some(TokenKind::Init),
        "let" => Some(TokenKind::Let),
        "protocol" => Some(TokenKind::Protocol),
        "rethrows" => Some(TokenKind::Rethrows),
        "some" => Some(TokenKind::Some),
        "struct" => Some(TokenKind::Struct),
        "subscript" => Some(TokenKind::Subscript),
        "throws" => Some(TokenKind::Throws),
        "try" => Some(TokenKind::Try),
        "typealias" => Some(TokenKind::Typealias),
        "var" => Some(TokenKind::Var),
        _ => None,
    }
}

/// Identifiers that act as declaration modifiers in front of a member.
pub const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "fileprivate",
    "internal",
    "open",
    "static",
    "final",
    "override",
    "mutating",
    "nonmutating",
    "lazy",
    "weak",
    "unowned",
    "required",
    "convenience",
    "nonisolated",
    "dynamic",
    "optional",
];

pub fn is_modifier(text: &str) -> bool {
    MODIFIERS.contains(&text)
}
