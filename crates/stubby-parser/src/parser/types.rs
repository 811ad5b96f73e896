//! Type parsing.
//!
//! Supports:
//! - Named types: `Int`, `Swift.Result<User, Error>`, `Self.Element`
//! - Tuples and function types: `(Int, label: String)`, `(Int) async throws -> Void`
//! - Collections: `[Int]`, `[String: Int]`
//! - Postfix forms: `Int?`, `Int!`, `Int...`, `A & B`
//! - Prefixed forms: `some P`, `any P`, `@escaping () -> Void`, `inout Int`

use crate::syntax_kind::SyntaxKind;

use super::items::{parse_attribute, parse_effects};
use super::{MarkClosed, Parser};

/// Contextual keywords written in front of a parameter type.
const TYPE_SPECIFIERS: &[&str] = &["inout", "borrowing", "consuming", "sending", "__owned", "__shared"];

pub(crate) fn parse_type(p: &mut Parser) {
    let Some(mut done) = parse_type_atom(p) else {
        return;
    };

    loop {
        let kind = match p.current() {
            SyntaxKind::QUESTION | SyntaxKind::BANG => SyntaxKind::OPTIONAL_TYPE,
            SyntaxKind::ELLIPSIS => SyntaxKind::VARIADIC_TYPE,
            SyntaxKind::AMP => {
                let m = p.open_before(done);
                p.advance(); // &
                parse_type(p);
                p.close(m, SyntaxKind::COMPOSITION_TYPE);
                return;
            }
            _ => return,
        };
        let m = p.open_before(done);
        p.advance();
        done = p.close(m, kind);
    }
}

fn parse_type_atom(p: &mut Parser) -> Option<MarkClosed> {
    match p.current() {
        SyntaxKind::AT => {
            let m = p.open();
            parse_attribute(p);
            parse_type(p);
            Some(p.close(m, SyntaxKind::ATTRIBUTED_TYPE))
        }
        SyntaxKind::IDENT if TYPE_SPECIFIERS.contains(&p.current_text()) && starts_type(p.nth(1)) => {
            let m = p.open();
            p.advance();
            parse_type(p);
            Some(p.close(m, SyntaxKind::ATTRIBUTED_TYPE))
        }
        SyntaxKind::SOME_KW | SyntaxKind::ANY_KW => {
            let m = p.open();
            p.advance();
            parse_type(p);
            Some(p.close(m, SyntaxKind::OPAQUE_TYPE))
        }
        SyntaxKind::L_PAREN => Some(parse_tuple_or_function_type(p)),
        SyntaxKind::L_BRACKET => Some(parse_collection_type(p)),
        SyntaxKind::IDENT | SyntaxKind::UNDERSCORE => Some(parse_path_type(p)),
        _ => {
            p.error("expected a type");
            None
        }
    }
}

fn starts_type(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IDENT
            | SyntaxKind::L_PAREN
            | SyntaxKind::L_BRACKET
            | SyntaxKind::AT
            | SyntaxKind::SOME_KW
            | SyntaxKind::ANY_KW
    )
}

/// `Name`, `Module.Name<Args>`, `T.Type`
fn parse_path_type(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // first segment
    if p.at(SyntaxKind::LT) {
        parse_generic_arg_list(p);
    }
    while !p.has_error() && p.at(SyntaxKind::DOT) && p.nth(1) == SyntaxKind::IDENT {
        p.advance(); // .
        p.advance(); // segment
        if p.at(SyntaxKind::LT) {
            parse_generic_arg_list(p);
        }
    }
    p.close(m, SyntaxKind::PATH_TYPE)
}

/// `<Int, [String]>`
fn parse_generic_arg_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // <
    if !p.at(SyntaxKind::GT) {
        parse_type(p);
        while !p.has_error() && p.eat(SyntaxKind::COMMA) {
            parse_type(p);
        }
    }
    if !p.has_error() {
        p.expect(SyntaxKind::GT);
    }
    p.close(m, SyntaxKind::GENERIC_ARG_LIST);
}

/// `(A, label: B)` optionally followed by `async throws -> R`, which turns
/// the tuple into the parameter list of a function type.
fn parse_tuple_or_function_type(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // (
    while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) && !p.has_error() {
        // Element labels: `name: T` or `_ name: T`.
        if p.nth(1) == SyntaxKind::COLON && is_label(p.current()) {
            p.advance();
            p.advance();
        } else if p.nth(2) == SyntaxKind::COLON && is_label(p.current()) && is_label(p.nth(1)) {
            p.advance();
            p.advance();
            p.advance();
        }
        parse_type(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    if !p.has_error() {
        p.expect(SyntaxKind::R_PAREN);
    }
    let tuple = p.close(m, SyntaxKind::TUPLE_TYPE);

    if p.has_error()
        || !p.at_any(&[
            SyntaxKind::ASYNC_KW,
            SyntaxKind::THROWS_KW,
            SyntaxKind::RETHROWS_KW,
            SyntaxKind::ARROW,
        ])
    {
        return tuple;
    }

    let func = p.open_before(tuple);
    if !p.at(SyntaxKind::ARROW) {
        parse_effects(p);
    }
    if p.expect(SyntaxKind::ARROW) {
        parse_type(p);
    }
    p.close(func, SyntaxKind::FUNCTION_TYPE)
}

fn is_label(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::IDENT | SyntaxKind::UNDERSCORE)
}

/// `[Element]` or `[Key: Value]`
fn parse_collection_type(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // [
    parse_type(p);
    let kind = if !p.has_error() && p.eat(SyntaxKind::COLON) {
        parse_type(p);
        SyntaxKind::DICTIONARY_TYPE
    } else {
        SyntaxKind::ARRAY_TYPE
    };
    if !p.has_error() {
        p.expect(SyntaxKind::R_BRACKET);
    }
    p.close(m, kind)
}
