//! Byte offsets to source-map positions and back.
//!
//! Lines are split on `\n` only and columns count UTF-16 code units, which
//! is what source map consumers expect.

#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(at, _)| at + 1))
            .collect();
        LineIndex {
            source,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Zero-based `(line, column)` of a byte offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        let start = self.line_starts.get(line).copied().unwrap_or_default();
        let column = self
            .source
            .get(start..offset)
            .map_or(0, |text| text.encode_utf16().count());
        (line, column)
    }

    /// Byte offset of a zero-based `(line, column)`, if it lies on a character
    /// boundary within the line.
    pub fn offset(&self, line: usize, column: usize) -> Option<usize> {
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map_or(self.source.len(), |next| next - 1);
        let text = self.source.get(start..end)?;
        let mut units = 0;
        for (at, c) in text.char_indices() {
            if units == column {
                return Some(start + at);
            }
            units += c.len_utf16();
        }
        (units == column).then_some(end)
    }
}
