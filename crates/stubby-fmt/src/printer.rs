//! Prints a [`Doc`] to text.
//!
//! Groups are decided one at a time: a group is flat when its flat width fits
//! in what is left of the current line. Indentation is written lazily, only
//! before text, so blank lines carry no trailing whitespace.

use serde::Deserialize;

use crate::ir::Doc;

/// Layout settings, read from the `[format]` table of `stubby.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    /// Spaces per indentation level.
    pub indent_size: usize,
    /// Groups wider than this are broken.
    pub max_width: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_size: 4,
            max_width: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

struct Cmd<'a> {
    indent: usize,
    mode: Mode,
    doc: &'a Doc,
}

/// Render `doc`. The result has no trailing newline.
pub fn print(doc: &Doc, config: &FormatConfig) -> String {
    let mut out = String::new();
    let mut col = 0usize;
    let mut pending_indent: Option<usize> = None;
    let mut stack = vec![Cmd {
        indent: 0,
        mode: Mode::Break,
        doc,
    }];

    while let Some(cmd) = stack.pop() {
        match cmd.doc {
            Doc::Empty => {}
            Doc::Text(s) => {
                if s.is_empty() {
                    continue;
                }
                if let Some(width) = pending_indent.take() {
                    out.extend(std::iter::repeat(' ').take(width));
                }
                out.push_str(s);
                col += s.len();
            }
            Doc::Line if cmd.mode == Mode::Flat => {
                out.push(' ');
                col += 1;
            }
            Doc::Line | Doc::Hardline => {
                out.push('\n');
                pending_indent = Some(cmd.indent);
                col = cmd.indent;
            }
            Doc::Indent(child) => stack.push(Cmd {
                indent: cmd.indent + config.indent_size,
                mode: cmd.mode,
                doc: child,
            }),
            Doc::Group(child) => {
                let mode = if cmd.mode == Mode::Flat
                    || col.saturating_add(flat_width(child)) <= config.max_width
                {
                    Mode::Flat
                } else {
                    Mode::Break
                };
                stack.push(Cmd {
                    indent: cmd.indent,
                    mode,
                    doc: child,
                });
            }
            Doc::Concat(parts) => {
                stack.extend(parts.iter().rev().map(|part| Cmd {
                    indent: cmd.indent,
                    mode: cmd.mode,
                    doc: part,
                }));
            }
        }
    }

    out
}

/// Width of `doc` printed on one line; `usize::MAX` if it contains a
/// hard line break.
fn flat_width(doc: &Doc) -> usize {
    match doc {
        Doc::Empty => 0,
        Doc::Text(s) => s.len(),
        Doc::Line => 1,
        Doc::Hardline => usize::MAX,
        Doc::Indent(child) | Doc::Group(child) => flat_width(child),
        Doc::Concat(parts) => parts
            .iter()
            .try_fold(0usize, |total, part| match flat_width(part) {
                usize::MAX => None,
                w => total.checked_add(w),
            })
            .unwrap_or(usize::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::*;

    fn narrow(max_width: usize) -> FormatConfig {
        FormatConfig {
            indent_size: 2,
            max_width,
        }
    }

    #[test]
    fn block_stays_flat_when_it_fits() {
        let doc = block("func f() {", text("fCalls.record()"), "}");
        assert_eq!(
            print(&doc, &FormatConfig::default()),
            "func f() { fCalls.record() }"
        );
    }

    #[test]
    fn block_breaks_when_too_wide() {
        let doc = block("func f() {", text("fCalls.record()"), "}");
        assert_eq!(print(&doc, &narrow(20)), "func f() {\n  fCalls.record()\n}");
    }

    #[test]
    fn blank_lines_have_no_indentation() {
        let doc = concat(vec![
            text("class A {"),
            indent(concat(vec![hardline(), text("a"), hardline(), hardline(), text("b")])),
            hardline(),
            text("}"),
        ]);
        assert_eq!(
            print(&doc, &FormatConfig::default()),
            "class A {\n    a\n\n    b\n}"
        );
    }

    #[test]
    fn hardline_forces_enclosing_group_to_break() {
        let doc = block("{", concat(vec![text("a"), hardline(), text("b")]), "}");
        assert_eq!(print(&doc, &narrow(80)), "{\n  a\n  b\n}");
    }

    #[test]
    fn nested_group_inside_broken_group_can_be_flat() {
        let inner = block("g {", text("x"), "}");
        let doc = block("outer {", concat(vec![text("aaaaaaaaaa"), hardline(), inner]), "}");
        assert_eq!(
            print(&doc, &narrow(12)),
            "outer {\n  aaaaaaaaaa\n  g { x }\n}"
        );
    }

    #[test]
    fn measures_flat_width() {
        assert_eq!(flat_width(&concat(vec![text("ab"), line(), text("c")])), 4);
        assert_eq!(flat_width(&concat(vec![text("a"), hardline()])), usize::MAX);
        assert_eq!(flat_width(&Doc::Empty), 0);
    }

    #[test]
    fn config_from_toml() {
        let config: FormatConfig = toml::from_str("indent_size = 2").unwrap();
        assert_eq!(config, FormatConfig { indent_size: 2, max_width: 100 });
    }
}
