//! Text insertions over an unchanged original, with a source map back to it.

use crate::transform::source_map::{OriginalPosition, Segment, SourceMap};

/// Pending insertions into `original`. Text appended at the same offset keeps
/// the order it was appended in.
#[derive(Debug, Clone)]
pub struct Patch<'a> {
    original: &'a str,
    insertions: Vec<(usize, String)>,
}

impl<'a> Patch<'a> {
    pub fn new(original: &'a str) -> Self {
        Patch {
            original,
            insertions: Vec::new(),
        }
    }

    /// Insert `text` at `offset`, attached to the text on its left.
    pub fn append_left(&mut self, offset: usize, text: impl Into<String>) -> &mut Self {
        let offset = offset.min(self.original.len());
        let at = self.insertions.partition_point(|(o, _)| *o <= offset);
        self.insertions.insert(at, (offset, text.into()));
        self
    }

    pub fn has_changed(&self) -> bool {
        self.insertions.iter().any(|(_, text)| !text.is_empty())
    }

    pub fn insertion_offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.insertions.iter().map(|(offset, _)| *offset)
    }

    pub fn render(&self) -> String {
        let extra: usize = self.insertions.iter().map(|(_, text)| text.len()).sum();
        let mut out = String::with_capacity(self.original.len() + extra);
        let mut copied = 0;
        for (offset, text) in &self.insertions {
            out.push_str(self.original.get(copied..*offset).unwrap_or_default());
            out.push_str(text);
            copied = *offset;
        }
        out.push_str(self.original.get(copied..).unwrap_or_default());
        out
    }

    /// Map the rendered text back to the original. A segment starts at every
    /// offset in `boundaries` (sorted token starts), at every line start and
    /// after every insertion.
    pub fn source_map(&self, file: &str, source_name: &str, boundaries: &[usize]) -> SourceMap {
        let mut map = SourceMap::new(Some(file.to_string()));
        let source = map.add_source(source_name, Some(self.original.to_string()));

        let mut generated = Cursor::default();
        let mut original = Cursor::default();
        let mut boundaries = boundaries.iter().copied().peekable();
        let mut insertions = self.insertions.iter().peekable();
        let mut resync = true;

        for (offset, c) in self.original.char_indices() {
            while let Some((_, text)) = insertions.next_if(|(at, _)| *at == offset) {
                generated.advance_str(text);
                resync = true;
            }
            while boundaries.next_if(|at| *at < offset).is_some() {}
            let boundary = boundaries.next_if_eq(&offset).is_some();
            if boundary || resync || original.column == 0 {
                map.add_segment(
                    generated.line,
                    Segment {
                        generated_column: generated.column,
                        original: Some(OriginalPosition {
                            source,
                            line: original.line,
                            column: original.column,
                            name: None,
                        }),
                    },
                );
                resync = false;
            }
            generated.advance(c);
            original.advance(c);
        }
        map
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Cursor {
    line: u32,
    column: u32,
}

impl Cursor {
    fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += u32::try_from(c.len_utf16()).unwrap_or(1);
        }
    }

    fn advance_str(&mut self, text: &str) {
        text.chars().for_each(|c| self.advance(c));
    }
}
