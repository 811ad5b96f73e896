//! Document IR for laying out generated declarations.
//!
//! A small Wadler-style document: text, line breaks that a group may
//! flatten into spaces, indentation, and groups that are printed on one
//! line when they fit.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Doc {
    Text(String),
    /// A space when the enclosing group is flat, otherwise a line break.
    Line,
    /// Always a line break.
    Hardline,
    /// Children are indented one level further after each line break.
    Indent(Box<Doc>),
    /// Printed flat if it fits in the remaining width.
    Group(Box<Doc>),
    Concat(Vec<Doc>),
    Empty,
}

pub fn text(s: impl Into<String>) -> Doc {
    Doc::Text(s.into())
}

pub fn line() -> Doc {
    Doc::Line
}

pub fn hardline() -> Doc {
    Doc::Hardline
}

pub fn indent(doc: Doc) -> Doc {
    Doc::Indent(Box::new(doc))
}

pub fn group(doc: Doc) -> Doc {
    Doc::Group(Box::new(doc))
}

pub fn concat(parts: Vec<Doc>) -> Doc {
    Doc::Concat(parts)
}

/// `parts` separated by `sep`.
pub fn join(parts: impl IntoIterator<Item = Doc>, sep: Doc) -> Doc {
    let mut out = Vec::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            out.push(sep.clone());
        }
        out.push(part);
    }
    Doc::Concat(out)
}

/// `open`, the indented `body`, then `close` on its own line. The body sits
/// on the opening line when the whole block fits.
pub fn block(open: impl Into<String>, body: Doc, close: impl Into<String>) -> Doc {
    group(concat(vec![
        text(open),
        indent(concat(vec![line(), body])),
        line(),
        text(close),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_inserts_separators_between() {
        let doc = join([text("a"), text("b"), text("c")], hardline());
        assert_eq!(
            doc,
            concat(vec![text("a"), hardline(), text("b"), hardline(), text("c")])
        );
        assert_eq!(join(Vec::<Doc>::new(), hardline()), concat(vec![]));
    }
}
