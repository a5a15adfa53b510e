// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.

/// A byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The source text this span covers.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// A resolved source position. Line and column are 1-based, column counts bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

/// Precomputed line-start offsets for O(log n) byte-offset → line:col lookup.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offset of the start of each line. line_starts[0] is always 0.
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .bytes()
                    .enumerate()
                    .filter(|&(_, b)| b == b'\n')
                    .map(|(i, _)| (i + 1) as u32),
            )
            .collect();
        LineMap { line_starts }
    }

    /// Convert byte offset to (line, col), both 1-based.
    pub fn offset_to_line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset as u32;
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line = (line_idx + 1) as u32;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    pub fn position(&self, offset: usize) -> Position {
        let (line, column) = self.offset_to_line_col(offset);
        Position { offset, line, column }
    }

    /// Source text of a 1-based line number, without its newline.
    pub fn line_text<'a>(&self, source: &'a str, line: u32) -> Option<&'a str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| (s as usize).saturating_sub(1))
            .unwrap_or(source.len());
        source.get(start..end).map(|l| l.strip_suffix('\r').unwrap_or(l))
    }

    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source() {
        let lm = LineMap::new("");
        assert_eq!(lm.offset_to_line_col(0), (1, 1));
        assert_eq!(lm.line_count(), 1);
    }

    #[test]
    fn module_header_positions() {
        let src = "MODULE M;\nCONST\n  N = 10;\nEND M.";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_count(), 4);
        assert_eq!(lm.offset_to_line_col(0), (1, 1)); // 'M' of MODULE
        assert_eq!(lm.offset_to_line_col(7), (1, 8)); // module name
        assert_eq!(lm.position(18).line, 3); // 'N'
        assert_eq!(lm.position(18).column, 3);
        assert_eq!(lm.line_text(src, 3), Some("  N = 10;"));
        assert_eq!(lm.line_text(src, 4), Some("END M."));
        assert_eq!(lm.line_text(src, 5), None);
    }

    #[test]
    fn newline_belongs_to_its_line() {
        let src = "ab\ncd\n";
        let lm = LineMap::new(src);
        assert_eq!(lm.offset_to_line_col(2), (1, 3));
        assert_eq!(lm.offset_to_line_col(3), (2, 1));
        assert_eq!(lm.line_text(src, 3), Some(""));
    }

    #[test]
    fn crlf_line_text() {
        let src = "TYPE\r\nT = INTEGER;\r\n";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_text(src, 1), Some("TYPE"));
        assert_eq!(lm.line_text(src, 2), Some("T = INTEGER;"));
    }

    #[test]
    fn span_merge_and_text() {
        let src = "ARRAY [1..10] OF CHAR";
        let a = Span::new(0, 5);
        let b = Span::new(17, 21);
        let whole = a.to(b);
        assert_eq!(whole, Span::new(0, 21));
        assert_eq!(b.text(src), "CHAR");
        assert_eq!(whole.len(), src.len());
        assert!(Span::new(3, 3).is_empty());
    }
}
