use std::ops::Range;

use serde::Serialize;

/// Byte-offset span into declaration source. Start is inclusive, end is exclusive.
///
/// Spans survive from the lexer all the way into generator errors, so a
/// failing member can be pointed at in the original file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start ({start}) must be <= end ({end})");
        Self { start, end }
    }

    /// Zero-length span at `offset`.
    pub fn empty_at(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The span as a `usize` range, widened to at least one byte and clamped
    /// to `source_len`. Diagnostic renderers need a non-empty label range.
    pub fn to_label_range(self, source_len: usize) -> Range<usize> {
        let start = (self.start as usize).min(source_len);
        let end = (self.end as usize).min(source_len).max(start);
        if start == end {
            start..(end + 1).min(source_len.max(start))
        } else {
            start..end
        }
    }
}

/// Line start offsets for a source text, used to turn byte offsets into
/// `(line, column)` pairs and to recover the indentation a member was
/// written at.
#[derive(Debug)]
pub struct LineIndex {
    /// Byte offset of the start of each line. The first entry is always 0.
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| (i + 1) as u32),
        );
        Self { line_starts }
    }

    /// 1-based (line, column) of `offset`. Columns count bytes.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = self.line_idx(offset);
        let line = (line_idx as u32) + 1;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Byte offset of the start of the line containing `offset`.
    pub fn line_start(&self, offset: u32) -> u32 {
        self.line_starts[self.line_idx(offset)]
    }

    /// Number of bytes between the start of the line and `offset`.
    pub fn column_offset(&self, offset: u32) -> u32 {
        offset - self.line_start(offset)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line_idx(&self, offset: u32) -> usize {
        // partition_point gives the first line starting after `offset`.
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_merge_covers_both() {
        let merged = Span::new(5, 10).merge(Span::new(8, 15));
        assert_eq!(merged, Span::new(5, 15));
        assert_eq!(merged.len(), 10);
    }

    #[test]
    fn empty_span() {
        let span = Span::empty_at(3);
        assert!(span.is_empty());
        assert_eq!(span.len(), 0);
    }

    #[test]
    fn label_range_widens_empty_spans() {
        assert_eq!(Span::new(2, 2).to_label_range(10), 2..3);
        assert_eq!(Span::new(2, 6).to_label_range(10), 2..6);
        // Past the end of the source: clamp instead of overflowing.
        assert_eq!(Span::new(12, 20).to_label_range(10), 10..10);
    }

    #[test]
    fn line_col_across_lines() {
        let idx = LineIndex::new("class A {\n    func f()\n}");
        assert_eq!(idx.line_col(0), (1, 1));
        assert_eq!(idx.line_col(14), (2, 5));
        assert_eq!(idx.line_col(23), (3, 1));
        assert_eq!(idx.line_count(), 3);
    }

    #[test]
    fn column_offset_recovers_indentation() {
        let src = "class A {\n    var x: Int\n}";
        let idx = LineIndex::new(src);
        let var_offset = src.find("var").unwrap() as u32;
        assert_eq!(idx.line_start(var_offset), 10);
        assert_eq!(idx.column_offset(var_offset), 4);
    }

    #[test]
    fn newline_belongs_to_its_line() {
        let idx = LineIndex::new("ab\ncd");
        assert_eq!(idx.line_col(2), (1, 3));
        assert_eq!(idx.line_col(3), (2, 1));
    }
}
