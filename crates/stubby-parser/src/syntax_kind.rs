//! SyntaxKind enum for the CST.
//!
//! This is a superset of `TokenKind` (mapped to SCREAMING_SNAKE_CASE) plus
//! composite node kinds for CST nodes produced by the parser.

use stubby_common::token::TokenKind;

/// Every kind of syntax element in the CST.
///
/// Token kinds (leaves) are mapped 1:1 from [`TokenKind`]. Composite node kinds
/// represent parser-produced tree nodes. The first two values are sentinels used
/// by the event-based parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Sentinels ──────────────────────────────────────────────────────
    /// Placeholder kind for incomplete/unfinished parser events.
    TOMBSTONE = 0,
    /// Wrapper for tokens/nodes that couldn't be parsed.
    ERROR_NODE = 1,

    // ── Keywords (19) ──────────────────────────────────────────────────
    ANY_KW,
    ASYNC_KW,
    AWAIT_KW,
    CLASS_KW,
    DEINIT_KW,
    ENUM_KW,
    EXTENSION_KW,
    FUNC_KW,
    INIT_KW,
    LET_KW,
    PROTOCOL_KW,
    RETHROWS_KW,
    SOME_KW,
    STRUCT_KW,
    SUBSCRIPT_KW,
    THROWS_KW,
    TRY_KW,
    TYPEALIAS_KW,
    VAR_KW,

    // ── Delimiters (6) ─────────────────────────────────────────────────
    L_PAREN,
    R_PAREN,
    L_BRACKET,
    R_BRACKET,
    L_BRACE,
    R_BRACE,

    // ── Punctuation and operators (14) ─────────────────────────────────
    LT,
    GT,
    COMMA,
    DOT,
    COLON,
    SEMICOLON,
    EQ,
    ARROW,
    QUESTION,
    BANG,
    AT,
    AMP,
    ELLIPSIS,
    OPERATOR,

    // ── Literals (3) ───────────────────────────────────────────────────
    INT_LITERAL,
    FLOAT_LITERAL,
    STRING_LITERAL,

    // ── Identifiers (2) ────────────────────────────────────────────────
    IDENT,
    UNDERSCORE,

    // ── Trivia (3) ─────────────────────────────────────────────────────
    WHITESPACE,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // ── Special (3) ────────────────────────────────────────────────────
    HASH,
    EOF,
    /// Lexer error token
    ERROR,

    // ── Composite node kinds ───────────────────────────────────────────
    /// Root node of a parsed source file.
    SOURCE_FILE,
    /// `import Foundation`
    IMPORT_DECL,
    /// A top-level declaration that is not a class or struct (enum, protocol,
    /// extension, free function, ...). Kept verbatim.
    OTHER_ITEM,
    /// `class Name { ... }` or `struct Name { ... }`, at top level or nested.
    TYPE_DEF,
    /// Name in a definition position.
    NAME,
    /// `@Name` or `@Name(args)`
    ATTRIBUTE,
    /// Parenthesised attribute arguments, kept as a balanced token tree.
    ATTRIBUTE_ARGS,
    /// Declaration modifier: `public`, `static`, `private(set)`, ...
    MODIFIER,
    /// Generic parameter clause: `<T: Codable, U>`
    GENERIC_PARAM_LIST,
    /// Inheritance clause: `: Base, Proto`
    INHERITANCE_CLAUSE,
    /// `where T: Equatable`
    WHERE_CLAUSE,
    /// `{ member* }` of a type definition.
    MEMBER_LIST,
    /// `var name: Type = value { accessors }`
    PROPERTY_DECL,
    /// `= expression` on a property or parameter.
    INITIALIZER,
    /// `func name(params) async throws -> Type { body }`
    FUNC_DECL,
    /// `async`, `throws`, `rethrows`, `throws(E)` after a parameter list.
    EFFECTS,
    /// `init(params) { body }`
    INIT_DECL,
    /// Nested `enum`/`protocol`/`extension`/`actor`. Nested classes and
    /// structs are TYPE_DEF.
    NESTED_TYPE,
    /// Any other member (`subscript`, `typealias`, `deinit`, `#if`, ...).
    OTHER_MEMBER,
    /// Parameter list: `(a: Int, _ b: String)`
    PARAM_LIST,
    /// Single parameter in a parameter list.
    PARAM,
    /// External (call-site) label of a parameter that also has a binding name.
    PARAM_LABEL,
    /// Type annotation: `: Type`
    TYPE_ANNOTATION,
    /// Return clause: `-> Type`
    RETURN_TYPE,
    /// Balanced `{ ... }` token tree: bodies and accessor blocks.
    BLOCK,

    // ── Type node kinds ────────────────────────────────────────────────
    /// `Name`, `Module.Name`, `Name<Args>`
    PATH_TYPE,
    /// Generic argument list in a type: `<Int, String>`
    GENERIC_ARG_LIST,
    /// `(A, B)`, `(label: A)`, `()`
    TUPLE_TYPE,
    /// `(A) async throws -> B`
    FUNCTION_TYPE,
    /// `[Element]`
    ARRAY_TYPE,
    /// `[Key: Value]`
    DICTIONARY_TYPE,
    /// `Wrapped?` or `Wrapped!`
    OPTIONAL_TYPE,
    /// `some P` / `any P`
    OPAQUE_TYPE,
    /// `@escaping T`, `inout T`
    ATTRIBUTED_TYPE,
    /// `A & B`
    COMPOSITION_TYPE,
    /// `Element...` in a parameter position.
    VARIADIC_TYPE,
}

impl SyntaxKind {
    /// The last variant; raw kinds above this value are invalid.
    pub const LAST: SyntaxKind = SyntaxKind::VARIADIC_TYPE;

    /// Whether this kind represents trivia (tokens that don't affect parsing).
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT
        )
    }

    /// Whether this kind is one of the type node kinds.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::PATH_TYPE
                | SyntaxKind::TUPLE_TYPE
                | SyntaxKind::FUNCTION_TYPE
                | SyntaxKind::ARRAY_TYPE
                | SyntaxKind::DICTIONARY_TYPE
                | SyntaxKind::OPTIONAL_TYPE
                | SyntaxKind::OPAQUE_TYPE
                | SyntaxKind::ATTRIBUTED_TYPE
                | SyntaxKind::COMPOSITION_TYPE
                | SyntaxKind::VARIADIC_TYPE
        )
    }

    /// How the token is spelled in diagnostics (`` `)` ``, `identifier`, ...).
    pub fn describe(self) -> String {
        let fixed = match self {
            SyntaxKind::L_PAREN => "`(`",
            SyntaxKind::R_PAREN => "`)`",
            SyntaxKind::L_BRACKET => "`[`",
            SyntaxKind::R_BRACKET => "`]`",
            SyntaxKind::L_BRACE => "`{`",
            SyntaxKind::R_BRACE => "`}`",
            SyntaxKind::LT => "`<`",
            SyntaxKind::GT => "`>`",
            SyntaxKind::COMMA => "`,`",
            SyntaxKind::COLON => "`:`",
            SyntaxKind::ARROW => "`->`",
            SyntaxKind::EQ => "`=`",
            SyntaxKind::IDENT => "identifier",
            SyntaxKind::EOF => "end of file",
            other => return format!("{other:?}"),
        };
        fixed.to_string()
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            // Keywords
            TokenKind::Any => SyntaxKind::ANY_KW,
            TokenKind::Async => SyntaxKind::ASYNC_KW,
            TokenKind::Await => SyntaxKind::AWAIT_KW,
            TokenKind::Class => SyntaxKind::CLASS_KW,
            TokenKind::Deinit => SyntaxKind::DEINIT_KW,
            TokenKind::Enum => SyntaxKind::ENUM_KW,
            TokenKind::Extension => SyntaxKind::EXTENSION_KW,
            TokenKind::Func => SyntaxKind::FUNC_KW,
            TokenKind::Init => SyntaxKind::INIT_KW,
            TokenKind::Let => SyntaxKind::LET_KW,
            TokenKind::Protocol => SyntaxKind::PROTOCOL_KW,
            TokenKind::Rethrows => SyntaxKind::RETHROWS_KW,
            TokenKind::Some => SyntaxKind::SOME_KW,
            TokenKind::Struct => SyntaxKind::STRUCT_KW,
            TokenKind::Subscript => SyntaxKind::SUBSCRIPT_KW,
            TokenKind::Throws => SyntaxKind::THROWS_KW,
            TokenKind::Try => SyntaxKind::TRY_KW,
            TokenKind::Typealias => SyntaxKind::TYPEALIAS_KW,
            TokenKind::Var => SyntaxKind::VAR_KW,

            // Delimiters
            TokenKind::LParen => SyntaxKind::L_PAREN,
            TokenKind::RParen => SyntaxKind::R_PAREN,
            TokenKind::LBracket => SyntaxKind::L_BRACKET,
            TokenKind::RBracket => SyntaxKind::R_BRACKET,
            TokenKind::LBrace => SyntaxKind::L_BRACE,
            TokenKind::RBrace => SyntaxKind::R_BRACE,

            // Punctuation and operators
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Semicolon => SyntaxKind::SEMICOLON,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::Arrow => SyntaxKind::ARROW,
            TokenKind::Question => SyntaxKind::QUESTION,
            TokenKind::Bang => SyntaxKind::BANG,
            TokenKind::At => SyntaxKind::AT,
            TokenKind::Amp => SyntaxKind::AMP,
            TokenKind::Ellipsis => SyntaxKind::ELLIPSIS,
            TokenKind::Operator => SyntaxKind::OPERATOR,

            // Literals
            TokenKind::IntLiteral => SyntaxKind::INT_LITERAL,
            TokenKind::FloatLiteral => SyntaxKind::FLOAT_LITERAL,
            TokenKind::StringLiteral => SyntaxKind::STRING_LITERAL,

            // Identifiers
            TokenKind::Ident => SyntaxKind::IDENT,
            TokenKind::Underscore => SyntaxKind::UNDERSCORE,

            // Trivia
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::LineComment => SyntaxKind::LINE_COMMENT,
            TokenKind::BlockComment => SyntaxKind::BLOCK_COMMENT,

            // Special
            TokenKind::Hash => SyntaxKind::HASH,
            TokenKind::Eof => SyntaxKind::EOF,
            TokenKind::Error => SyntaxKind::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_kinds_are_first_values() {
        assert_eq!(SyntaxKind::TOMBSTONE as u16, 0);
        assert_eq!(SyntaxKind::ERROR_NODE as u16, 1);
    }

    #[test]
    fn token_kinds_map_to_syntax_kinds() {
        assert_eq!(SyntaxKind::from(TokenKind::Func), SyntaxKind::FUNC_KW);
        assert_eq!(SyntaxKind::from(TokenKind::Arrow), SyntaxKind::ARROW);
        assert_eq!(SyntaxKind::from(TokenKind::Whitespace), SyntaxKind::WHITESPACE);
        assert_eq!(SyntaxKind::from(TokenKind::Error), SyntaxKind::ERROR);
    }

    #[test]
    fn trivia_and_type_classification() {
        assert!(SyntaxKind::LINE_COMMENT.is_trivia());
        assert!(!SyntaxKind::IDENT.is_trivia());
        assert!(SyntaxKind::OPTIONAL_TYPE.is_type());
        assert!(!SyntaxKind::TYPE_ANNOTATION.is_type());
    }

    #[test]
    fn last_is_the_highest_discriminant() {
        assert!(SyntaxKind::LAST as u16 > SyntaxKind::SOURCE_FILE as u16);
        assert_eq!(SyntaxKind::LAST, SyntaxKind::VARIADIC_TYPE);
    }

    #[test]
    fn describe_punctuation() {
        assert_eq!(SyntaxKind::R_BRACE.describe(), "`}`");
        assert_eq!(SyntaxKind::IDENT.describe(), "identifier");
        assert_eq!(SyntaxKind::FUNC_KW.describe(), "FUNC_KW");
    }
}
