//! Declaration parsers: top-level items, type definitions and their members.
//!
//! Only the declaration skeleton is parsed structurally. Bodies, accessor
//! blocks and initializer expressions are consumed as balanced token runs
//! (see `blocks.rs`) so arbitrary code inside them never trips the parser.

use stubby_common::token::is_modifier;

use crate::syntax_kind::SyntaxKind;

use super::blocks::{parse_balanced, parse_block};
use super::types::parse_type;
use super::{MarkOpened, Parser};

/// Keywords that start a declaration on their own.
const DECL_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::VAR_KW,
    SyntaxKind::LET_KW,
    SyntaxKind::FUNC_KW,
    SyntaxKind::INIT_KW,
    SyntaxKind::DEINIT_KW,
    SyntaxKind::SUBSCRIPT_KW,
    SyntaxKind::TYPEALIAS_KW,
    SyntaxKind::CLASS_KW,
    SyntaxKind::STRUCT_KW,
    SyntaxKind::ENUM_KW,
    SyntaxKind::PROTOCOL_KW,
    SyntaxKind::EXTENSION_KW,
];

// ── Boundaries ───────────────────────────────────────────────────────────

/// Whether the current token begins a new declaration.
///
/// Used to find where an unstructured run (initializer expression, where
/// clause, opaque member) ends.
pub(crate) fn at_decl_start(p: &Parser) -> bool {
    match p.current() {
        SyntaxKind::AT | SyntaxKind::HASH => true,
        kind if DECL_KEYWORDS.contains(&kind) => true,
        SyntaxKind::IDENT => {
            at_modifier(p)
                || (matches!(p.current_text(), "actor" | "import") && p.nth(1) == SyntaxKind::IDENT)
        }
        _ => false,
    }
}

/// Whether the current token is a declaration modifier.
fn at_modifier(p: &Parser) -> bool {
    match p.current() {
        SyntaxKind::IDENT if is_modifier(p.current_text()) => {
            let next = p.nth(1);
            DECL_KEYWORDS.contains(&next)
                || next == SyntaxKind::L_PAREN
                || (next == SyntaxKind::IDENT && (is_modifier(p.nth_text(1)) || p.nth_text(1) == "actor"))
        }
        // `class func`, `class var`: the class-level member modifier.
        SyntaxKind::CLASS_KW => matches!(
            p.nth(1),
            SyntaxKind::FUNC_KW | SyntaxKind::VAR_KW | SyntaxKind::LET_KW | SyntaxKind::SUBSCRIPT_KW
        ),
        _ => false,
    }
}

// ── Top level ────────────────────────────────────────────────────────────

/// Parse one top-level item: an import, a class/struct definition, or any
/// other declaration kept as OTHER_ITEM.
pub(crate) fn parse_item(p: &mut Parser) {
    if p.at_contextual("import") {
        parse_import_decl(p);
        return;
    }

    let m = p.open();
    parse_attributes_and_modifiers(p);

    match p.current() {
        SyntaxKind::CLASS_KW | SyntaxKind::STRUCT_KW => parse_type_def_rest(p, m),
        SyntaxKind::EOF => {
            p.error("expected a declaration after attributes");
            p.close(m, SyntaxKind::ERROR_NODE);
        }
        _ => {
            p.advance(); // item keyword (or whatever token starts it)
            skip_to_decl_boundary(p);
            p.close(m, SyntaxKind::OTHER_ITEM);
        }
    }
}

/// `import Module.Sub`
fn parse_import_decl(p: &mut Parser) {
    let m = p.open();
    p.advance(); // import
    // `import struct Foo.Bar` names the imported kind first.
    if p.at_any(DECL_KEYWORDS) {
        p.advance();
    }
    p.expect(SyntaxKind::IDENT);
    while p.at(SyntaxKind::DOT) {
        p.advance();
        p.expect(SyntaxKind::IDENT);
    }
    p.close(m, SyntaxKind::IMPORT_DECL);
}

/// Consume tokens up to the next declaration, closing brace, `;` or EOF.
/// Braced blocks are consumed whole.
fn skip_to_decl_boundary(p: &mut Parser) {
    loop {
        match p.current() {
            SyntaxKind::R_BRACE | SyntaxKind::EOF | SyntaxKind::SEMICOLON => break,
            SyntaxKind::L_BRACE => parse_block(p),
            SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET => parse_balanced(p),
            SyntaxKind::DOT => advance_member_access(p),
            _ if at_decl_start(p) => break,
            _ => p.advance(),
        }
        if p.has_error() {
            break;
        }
    }
}

/// `.name` where the name may be a keyword (`.init`, `.default`).
fn advance_member_access(p: &mut Parser) {
    p.advance(); // .
    if !p.at_any(&[SyntaxKind::R_BRACE, SyntaxKind::EOF, SyntaxKind::L_BRACE]) {
        p.advance();
    }
}

// ── Attributes and modifiers ─────────────────────────────────────────────

fn parse_attributes_and_modifiers(p: &mut Parser) {
    loop {
        if p.at(SyntaxKind::AT) {
            parse_attribute(p);
        } else if at_modifier(p) {
            parse_modifier(p);
        } else {
            break;
        }
    }
}

/// `@Name` or `@Name(arguments)`. Arguments must follow the name directly.
pub(crate) fn parse_attribute(p: &mut Parser) {
    let m = p.open();
    p.advance(); // @
    if p.expect(SyntaxKind::IDENT) {
        while p.at(SyntaxKind::DOT) && p.nth(1) == SyntaxKind::IDENT {
            p.advance();
            p.advance();
        }
    }
    if p.at(SyntaxKind::L_PAREN) && !p.has_leading_trivia() {
        let args = p.open();
        parse_balanced(p);
        p.close(args, SyntaxKind::ATTRIBUTE_ARGS);
    }
    p.close(m, SyntaxKind::ATTRIBUTE);
}

/// `public`, `static`, `private(set)`, `class` (in `class func`).
fn parse_modifier(p: &mut Parser) {
    let m = p.open();
    p.advance();
    if p.at(SyntaxKind::L_PAREN) && !p.has_leading_trivia() {
        p.advance(); // (
        p.expect(SyntaxKind::IDENT);
        p.expect(SyntaxKind::R_PAREN);
    }
    p.close(m, SyntaxKind::MODIFIER);
}

// ── Type definitions ─────────────────────────────────────────────────────

/// Parse the rest of `class Name<T>: Base where ... { members }` after its
/// attributes and modifiers.
fn parse_type_def_rest(p: &mut Parser, m: MarkOpened) {
    p.advance(); // class / struct

    if p.at(SyntaxKind::IDENT) {
        parse_name(p);
    } else {
        p.error("expected type name");
        p.close(m, SyntaxKind::TYPE_DEF);
        return;
    }

    if p.at(SyntaxKind::LT) {
        parse_generic_param_list(p);
    }
    if p.at(SyntaxKind::COLON) {
        parse_inheritance_clause(p);
    }
    if p.at_contextual("where") {
        parse_where_clause(p);
    }

    if p.at(SyntaxKind::L_BRACE) {
        parse_member_list(p);
    } else {
        p.error("expected `{` to open the type body");
    }

    p.close(m, SyntaxKind::TYPE_DEF);
}

fn parse_name(p: &mut Parser) {
    let name = p.open();
    p.advance();
    p.close(name, SyntaxKind::NAME);
}

/// `<T: Codable, U>` with nested angle brackets balanced.
fn parse_generic_param_list(p: &mut Parser) {
    let m = p.open();
    let open_span = p.current_span();
    p.advance(); // <
    let mut depth = 1u32;
    loop {
        match p.current() {
            SyntaxKind::EOF | SyntaxKind::L_BRACE => {
                p.error_with_related(
                    "expected `>` to close generic parameters",
                    open_span,
                    "generic parameters start here",
                );
                break;
            }
            SyntaxKind::LT => depth += 1,
            SyntaxKind::GT => {
                depth -= 1;
                if depth == 0 {
                    p.advance();
                    break;
                }
            }
            _ => {}
        }
        p.advance();
    }
    p.close(m, SyntaxKind::GENERIC_PARAM_LIST);
}

/// `: Base, Proto & Other`
fn parse_inheritance_clause(p: &mut Parser) {
    let m = p.open();
    p.advance(); // :
    parse_type(p);
    while !p.has_error() && p.eat(SyntaxKind::COMMA) {
        parse_type(p);
    }
    p.close(m, SyntaxKind::INHERITANCE_CLAUSE);
}

/// `where T: Equatable, U == Int`, up to the body or next declaration.
fn parse_where_clause(p: &mut Parser) {
    let m = p.open();
    p.advance(); // where
    loop {
        match p.current() {
            SyntaxKind::L_BRACE | SyntaxKind::R_BRACE | SyntaxKind::EOF | SyntaxKind::SEMICOLON => {
                break
            }
            SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET => parse_balanced(p),
            _ if at_decl_start(p) => break,
            _ => p.advance(),
        }
        if p.has_error() {
            break;
        }
    }
    p.close(m, SyntaxKind::WHERE_CLAUSE);
}

/// `{ member* }`
fn parse_member_list(p: &mut Parser) {
    let m = p.open();
    let open_span = p.current_span();
    p.advance(); // {

    loop {
        while p.eat(SyntaxKind::SEMICOLON) {}
        if p.at(SyntaxKind::R_BRACE) || p.at(SyntaxKind::EOF) || p.has_error() {
            break;
        }
        parse_member(p);
    }

    if p.at(SyntaxKind::R_BRACE) {
        p.advance();
    } else {
        p.error_with_related(
            "expected `}` to close the type body",
            open_span,
            "type body opened here",
        );
    }
    p.close(m, SyntaxKind::MEMBER_LIST);
}

// ── Members ──────────────────────────────────────────────────────────────

fn parse_member(p: &mut Parser) {
    let m = p.open();
    parse_attributes_and_modifiers(p);

    match p.current() {
        SyntaxKind::VAR_KW | SyntaxKind::LET_KW => parse_property_rest(p, m),
        SyntaxKind::FUNC_KW => parse_func_rest(p, m),
        SyntaxKind::INIT_KW => parse_init_rest(p, m),
        // Nested classes and structs are full definitions and may be mocked.
        SyntaxKind::CLASS_KW | SyntaxKind::STRUCT_KW => parse_type_def_rest(p, m),
        SyntaxKind::ENUM_KW | SyntaxKind::PROTOCOL_KW | SyntaxKind::EXTENSION_KW => {
            parse_nested_type_rest(p, m)
        }
        SyntaxKind::IDENT if p.current_text() == "actor" => parse_nested_type_rest(p, m),
        SyntaxKind::SUBSCRIPT_KW
        | SyntaxKind::TYPEALIAS_KW
        | SyntaxKind::DEINIT_KW
        | SyntaxKind::HASH => {
            p.advance();
            skip_to_decl_boundary(p);
            p.close(m, SyntaxKind::OTHER_MEMBER);
        }
        _ => {
            p.advance_with_error("expected a member declaration");
            p.close(m, SyntaxKind::ERROR_NODE);
        }
    }
}

/// `var name: Type = value { accessors }`
fn parse_property_rest(p: &mut Parser, m: MarkOpened) {
    p.advance(); // var / let

    if p.at(SyntaxKind::IDENT) {
        parse_name(p);
    } else {
        p.error("expected property name");
        p.close(m, SyntaxKind::PROPERTY_DECL);
        return;
    }

    if p.at(SyntaxKind::COLON) {
        parse_type_annotation(p);
    }
    if !p.has_error() && p.at(SyntaxKind::EQ) {
        parse_property_initializer(p);
    }
    if !p.has_error() && p.at(SyntaxKind::L_BRACE) {
        parse_block(p);
    }

    p.close(m, SyntaxKind::PROPERTY_DECL);
}

/// `= expression` up to the next declaration.
///
/// A `{` directly after `=` is a closure literal; a later `{` opening
/// `willSet`/`didSet` is the property's observer block and ends the
/// expression.
fn parse_property_initializer(p: &mut Parser) {
    let m = p.open();
    p.advance(); // =
    let mut first = true;
    loop {
        match p.current() {
            SyntaxKind::R_BRACE | SyntaxKind::EOF | SyntaxKind::SEMICOLON => break,
            SyntaxKind::L_BRACE if !first && at_observer_block(p) => break,
            SyntaxKind::L_BRACE => parse_block(p),
            SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET => parse_balanced(p),
            SyntaxKind::DOT => advance_member_access(p),
            _ if !first && at_decl_start(p) => break,
            _ => p.advance(),
        }
        first = false;
        if p.has_error() {
            break;
        }
    }
    if first {
        p.error("expected an expression after `=`");
    }
    p.close(m, SyntaxKind::INITIALIZER);
}

fn at_observer_block(p: &Parser) -> bool {
    p.nth(1) == SyntaxKind::IDENT && matches!(p.nth_text(1), "willSet" | "didSet")
}

fn parse_type_annotation(p: &mut Parser) {
    let m = p.open();
    p.advance(); // :
    parse_type(p);
    p.close(m, SyntaxKind::TYPE_ANNOTATION);
}

/// `func name<T>(params) async throws -> Type where ... { body }`
fn parse_func_rest(p: &mut Parser, m: MarkOpened) {
    p.advance(); // func

    if p.at(SyntaxKind::IDENT) {
        parse_name(p);
    } else if p.at_any(OPERATOR_NAME_TOKENS) {
        // Operator implementations: `func ==(lhs: T, rhs: T) -> Bool`.
        let name = p.open();
        while p.at_any(OPERATOR_NAME_TOKENS) {
            p.advance();
        }
        p.close(name, SyntaxKind::NAME);
    } else {
        p.error("expected function name");
        p.close(m, SyntaxKind::FUNC_DECL);
        return;
    }

    if p.at(SyntaxKind::LT) {
        parse_generic_param_list(p);
    }
    if p.at(SyntaxKind::L_PAREN) {
        parse_param_list(p);
    } else {
        p.error("expected `(` to start the parameter list");
        p.close(m, SyntaxKind::FUNC_DECL);
        return;
    }

    parse_signature_tail(p, true);
    p.close(m, SyntaxKind::FUNC_DECL);
}

const OPERATOR_NAME_TOKENS: &[SyntaxKind] = &[
    SyntaxKind::OPERATOR,
    SyntaxKind::LT,
    SyntaxKind::GT,
    SyntaxKind::BANG,
    SyntaxKind::AMP,
    SyntaxKind::QUESTION,
    SyntaxKind::EQ,
    SyntaxKind::DOT,
];

/// Effects, return clause, where clause and body shared by `func` and `init`.
fn parse_signature_tail(p: &mut Parser, allow_return: bool) {
    if p.at_any(&[SyntaxKind::ASYNC_KW, SyntaxKind::THROWS_KW, SyntaxKind::RETHROWS_KW]) {
        parse_effects(p);
    }
    if allow_return && !p.has_error() && p.at(SyntaxKind::ARROW) {
        let ret = p.open();
        p.advance(); // ->
        parse_type(p);
        p.close(ret, SyntaxKind::RETURN_TYPE);
    }
    if !p.has_error() && p.at_contextual("where") {
        parse_where_clause(p);
    }
    if !p.has_error() && p.at(SyntaxKind::L_BRACE) {
        parse_block(p);
    }
}

/// `async`, `throws`, `rethrows`, `throws(ErrorType)` in any order.
pub(crate) fn parse_effects(p: &mut Parser) {
    let m = p.open();
    loop {
        match p.current() {
            SyntaxKind::ASYNC_KW | SyntaxKind::RETHROWS_KW => p.advance(),
            SyntaxKind::THROWS_KW => {
                p.advance();
                if p.at(SyntaxKind::L_PAREN) && !p.has_leading_trivia() {
                    p.advance(); // (
                    parse_type(p);
                    p.expect(SyntaxKind::R_PAREN);
                }
            }
            _ => break,
        }
        if p.has_error() {
            break;
        }
    }
    p.close(m, SyntaxKind::EFFECTS);
}

/// `init?<T>(params) async throws { body }`
fn parse_init_rest(p: &mut Parser, m: MarkOpened) {
    p.advance(); // init
    if p.at_any(&[SyntaxKind::QUESTION, SyntaxKind::BANG]) {
        p.advance();
    }
    if p.at(SyntaxKind::LT) {
        parse_generic_param_list(p);
    }
    if p.at(SyntaxKind::L_PAREN) {
        parse_param_list(p);
    } else {
        p.error("expected `(` to start the parameter list");
        p.close(m, SyntaxKind::INIT_DECL);
        return;
    }
    parse_signature_tail(p, false);
    p.close(m, SyntaxKind::INIT_DECL);
}

/// An enum, protocol, extension or actor declared inside a type. Its body is
/// opaque.
fn parse_nested_type_rest(p: &mut Parser, m: MarkOpened) {
    let keyword_span = p.current_span();
    p.advance(); // enum / protocol / extension / actor

    if p.at(SyntaxKind::IDENT) {
        parse_name(p);
    }

    loop {
        match p.current() {
            SyntaxKind::L_BRACE => {
                parse_block(p);
                break;
            }
            SyntaxKind::R_BRACE | SyntaxKind::EOF => {
                p.error_with_related(
                    "expected `{` to open the nested type body",
                    keyword_span,
                    "nested type declared here",
                );
                break;
            }
            SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET => parse_balanced(p),
            _ => p.advance(),
        }
        if p.has_error() {
            break;
        }
    }
    p.close(m, SyntaxKind::NESTED_TYPE);
}

// ── Parameters ───────────────────────────────────────────────────────────

/// `(label name: Type = default, ...)`
pub(crate) fn parse_param_list(p: &mut Parser) {
    let m = p.open();
    let open_span = p.current_span();
    p.advance(); // (

    while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) && !p.has_error() {
        parse_param(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }

    if !p.has_error() {
        if p.at(SyntaxKind::R_PAREN) {
            p.advance();
        } else {
            p.error_with_related(
                "expected `)` to close the parameter list",
                open_span,
                "parameter list starts here",
            );
        }
    }
    p.close(m, SyntaxKind::PARAM_LIST);
}

fn is_name_like(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::IDENT
        || kind == SyntaxKind::UNDERSCORE
        || (kind >= SyntaxKind::ANY_KW && kind <= SyntaxKind::VAR_KW)
}

fn parse_param(p: &mut Parser) {
    let m = p.open();

    // Parameter attributes (`@MainActor` on a closure parameter) belong to
    // the type and are handled by `parse_type`; the names come first.
    match (is_name_like(p.current()), is_name_like(p.nth(1))) {
        (true, true) => {
            let label = p.open();
            p.advance();
            p.close(label, SyntaxKind::PARAM_LABEL);
            parse_name(p);
        }
        (true, false) => parse_name(p),
        _ => {
            p.error("expected parameter name");
            p.close(m, SyntaxKind::PARAM);
            return;
        }
    }

    if p.at(SyntaxKind::COLON) {
        parse_type_annotation(p);
    } else {
        p.error("expected `:` followed by the parameter type");
        p.close(m, SyntaxKind::PARAM);
        return;
    }

    if !p.has_error() && p.at(SyntaxKind::EQ) {
        let default = p.open();
        p.advance(); // =
        while !p.at_any(&[SyntaxKind::COMMA, SyntaxKind::R_PAREN, SyntaxKind::EOF]) && !p.has_error() {
            match p.current() {
                SyntaxKind::L_BRACE => parse_block(p),
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET => parse_balanced(p),
                _ => p.advance(),
            }
        }
        p.close(default, SyntaxKind::INITIALIZER);
    }

    p.close(m, SyntaxKind::PARAM);
}
