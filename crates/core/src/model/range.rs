use serde::{Deserialize, Serialize};

/// Byte-offset span of a declaration or scope in its source file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn encloses(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maps zero-based line/column pairs to byte offsets and back.
///
/// Front-ends that rewrite the source before parsing install an adjusted map so cursor
/// positions keep pointing at the text the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineMap {
    line_starts: Vec<usize>,
}

impl LineMap {
    pub fn from_text(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.char_indices()
                .filter(|(_, c)| *c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    pub fn from_line_starts(mut line_starts: Vec<usize>) -> Self {
        if line_starts.first() != Some(&0) {
            line_starts.insert(0, 0);
        }
        line_starts.sort_unstable();
        line_starts.dedup();
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn offset(&self, line: usize, col: usize) -> Option<usize> {
        self.line_starts.get(line)?.checked_add(col)
    }

    /// Line and column of `offset`; an empty map is a single line starting at 0.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        let start = self.line_starts.get(line).copied().unwrap_or_default();
        (line, offset.saturating_sub(start))
    }
}
