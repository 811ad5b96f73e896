//! Splices expansions into the source they came from.
//!
//! The mocked type keeps its text byte for byte except for two edits: the
//! mock attribute (and the whitespace after it) is removed, and the handle
//! field plus the companion type are inserted before the closing brace of
//! the type body.

use std::ops::Range;

use rowan::NodeOrToken;
use stubby_gen::expansion::{CompanionField, DelegateMethod, MockExpansion};
use stubby_gen::MockConfig;
use stubby_parser::ast::item::TypeDef;
use stubby_parser::ast::AstNode;
use stubby_parser::{SyntaxElement, SyntaxKind, SyntaxToken};
use tracing::trace;

use crate::ir::{block, concat, hardline, indent, join, text, Doc};
use crate::printer::{print, FormatConfig};

/// Replace `range` of the source with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub range: Range<usize>,
    pub text: String,
}

/// The handle field and the companion type, unindented.
pub fn expansion_doc(expansion: &MockExpansion) -> Doc {
    concat(vec![
        text(expansion.handle.render()),
        hardline(),
        hardline(),
        companion_doc(expansion),
    ])
}

fn companion_doc(expansion: &MockExpansion) -> Doc {
    let companion = &expansion.companion;
    let open = format!("class {} {{", companion.name);
    if companion.fields.is_empty() {
        return text(format!("{open}}}"));
    }

    let mut body = vec![join(
        companion
            .fields
            .iter()
            .map(|field| field_doc(field, &expansion.unit_type)),
        hardline(),
    )];
    if !companion.methods.is_empty() {
        body.push(hardline());
        body.push(hardline());
        body.push(join(companion.methods.iter().map(method_doc), hardline()));
    }
    concat(vec![
        text(open),
        indent(concat(vec![hardline(), concat(body)])),
        hardline(),
        text("}"),
    ])
}

fn field_doc(field: &CompanionField, unit: &str) -> Doc {
    text(field.render(unit))
}

fn method_doc(method: &DelegateMethod) -> Doc {
    block(
        format!("{} {{", method.header()),
        text(method.call.render()),
        "}",
    )
}

/// The two edits that expand `def`. Empty when the type has no body to
/// insert into.
pub fn splices_for(
    source: &str,
    def: &TypeDef,
    expansion: &MockExpansion,
    mock: &MockConfig,
    format: &FormatConfig,
) -> Vec<Splice> {
    let Some(list) = def.member_list() else {
        return Vec::new();
    };
    let Some(r_brace) = list.r_brace() else {
        return Vec::new();
    };

    let mut splices = Vec::new();
    if let Some(attribute) = def.attribute(&mock.attribute) {
        let start = usize::from(attribute.syntax().text_range().start());
        let end = end_of_following_whitespace(attribute.syntax().clone().into());
        splices.push(Splice {
            range: start..end,
            text: String::new(),
        });
    }

    let def_start = usize::from(def.syntax().text_range().start());
    let type_indent = line_indent(source, def_start);
    let member_indent = def
        .members()
        .first()
        .and_then(|m| own_line_indent(source, usize::from(m.syntax().text_range().start())))
        .unwrap_or_else(|| format!("{type_indent}{}", " ".repeat(format.indent_size)));

    let layout = FormatConfig {
        max_width: format.max_width.saturating_sub(member_indent.len()),
        ..format.clone()
    };
    let printed = print(&expansion_doc(expansion), &layout);

    let brace_start = usize::from(r_brace.text_range().start());
    let insert_at = start_of_preceding_whitespace(&r_brace);
    let l_brace_end = list
        .l_brace()
        .map(|t| usize::from(t.text_range().end()))
        .unwrap_or(insert_at);
    let separator = if insert_at > l_brace_end { "\n\n" } else { "\n" };

    let mut inserted = String::from(separator);
    inserted.push_str(&reindent(&printed, &member_indent));
    inserted.push('\n');
    inserted.push_str(&type_indent);
    let eol = line_ending(source);
    if eol != "\n" {
        inserted = inserted.replace('\n', eol);
    }

    trace!(
        r#type = %expansion.type_name,
        at = insert_at,
        "splicing companion"
    );
    splices.push(Splice {
        range: insert_at..brace_start,
        text: inserted,
    });
    splices
}

/// Apply non-overlapping splices.
pub fn apply_splices(source: &str, mut splices: Vec<Splice>) -> String {
    splices.sort_by_key(|s| s.range.start);
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for splice in splices {
        out.push_str(&source[cursor..splice.range.start]);
        out.push_str(&splice.text);
        cursor = splice.range.end;
    }
    out.push_str(&source[cursor..]);
    out
}

fn end_of_following_whitespace(element: SyntaxElement) -> usize {
    let mut end = usize::from(element.text_range().end());
    let mut next = element.next_sibling_or_token();
    while let Some(NodeOrToken::Token(token)) = next {
        if token.kind() != SyntaxKind::WHITESPACE {
            break;
        }
        end = usize::from(token.text_range().end());
        next = token.next_sibling_or_token();
    }
    end
}

fn start_of_preceding_whitespace(token: &SyntaxToken) -> usize {
    let mut start = usize::from(token.text_range().start());
    let mut prev = token.prev_sibling_or_token();
    while let Some(NodeOrToken::Token(t)) = prev {
        if t.kind() != SyntaxKind::WHITESPACE {
            break;
        }
        start = usize::from(t.text_range().start());
        prev = t.prev_sibling_or_token();
    }
    start
}

/// `\r\n` when the source uses it, else `\n`.
fn line_ending(source: &str) -> &'static str {
    if source.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Leading whitespace of the line containing `offset`.
fn line_indent(source: &str, offset: usize) -> String {
    source[line_start(source, offset)..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

/// The indentation before `offset`, if nothing else precedes it on its line.
fn own_line_indent(source: &str, offset: usize) -> Option<String> {
    let prefix = &source[line_start(source, offset)..offset];
    prefix
        .chars()
        .all(|c| c == ' ' || c == '\t')
        .then(|| prefix.to_string())
}

/// Prefix every non-empty line with `prefix`.
fn reindent(text: &str, prefix: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splices_apply_in_order() {
        let out = apply_splices(
            "abcdef",
            vec![
                Splice {
                    range: 4..5,
                    text: "E".into(),
                },
                Splice {
                    range: 0..1,
                    text: String::new(),
                },
            ],
        );
        assert_eq!(out, "bcdEf");
    }

    #[test]
    fn indentation_helpers() {
        let source = "struct A {\n\t  var x: Int; var y: Int\n}";
        let x = source.find("var x").unwrap();
        let y = source.find("var y").unwrap();
        assert_eq!(line_indent(source, y), "\t  ");
        assert_eq!(own_line_indent(source, x).as_deref(), Some("\t  "));
        assert_eq!(own_line_indent(source, y), None);
    }

    #[test]
    fn line_ending_follows_source() {
        assert_eq!(line_ending("a\r\nb"), "\r\n");
        assert_eq!(line_ending("a\nb"), "\n");
        assert_eq!(line_ending("a"), "\n");
    }

    #[test]
    fn reindent_skips_blank_lines() {
        assert_eq!(reindent("a\n\n  b", "    "), "    a\n\n      b");
    }
}
