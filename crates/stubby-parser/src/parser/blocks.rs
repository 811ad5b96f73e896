//! Opaque token runs: braced bodies and balanced parenthesised groups.

use crate::syntax_kind::SyntaxKind;

use super::Parser;

/// Parse `{ ... }` as a single BLOCK node. Inner braces are balanced but not
/// given nodes of their own; the body is never interpreted.
pub(crate) fn parse_block(p: &mut Parser) {
    let m = p.open();
    let open_span = p.current_span();
    p.advance(); // {

    let mut depth = 1u32;
    loop {
        match p.current() {
            SyntaxKind::EOF => {
                p.error_with_related("expected `}` to close block", open_span, "block opened here");
                break;
            }
            SyntaxKind::L_BRACE => depth += 1,
            SyntaxKind::R_BRACE => {
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

    p.close(m, SyntaxKind::BLOCK);
}

/// Consume a `( ... )` or `[ ... ]` group including everything nested in it.
/// No node is created; the tokens land in whatever node is open.
pub(crate) fn parse_balanced(p: &mut Parser) {
    let open_span = p.current_span();
    let mut closers = vec![closer_for(p.current())];
    p.advance();

    while let Some(&expected) = closers.last() {
        let current = p.current();
        match current {
            SyntaxKind::EOF => {
                p.error_with_related(
                    &format!("expected {} to close this group", expected.describe()),
                    open_span,
                    "group opened here",
                );
                return;
            }
            SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => {
                closers.push(closer_for(current));
            }
            SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                if current != expected {
                    p.error_with_related(
                        &format!("expected {}, found {}", expected.describe(), current.describe()),
                        open_span,
                        "group opened here",
                    );
                    return;
                }
                closers.pop();
            }
            _ => {}
        }
        p.advance();
    }
}

fn closer_for(open: SyntaxKind) -> SyntaxKind {
    match open {
        SyntaxKind::L_PAREN => SyntaxKind::R_PAREN,
        SyntaxKind::L_BRACKET => SyntaxKind::R_BRACKET,
        _ => SyntaxKind::R_BRACE,
    }
}
