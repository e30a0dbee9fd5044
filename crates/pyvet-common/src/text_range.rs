//! Half-open source spans measured in bytes from the start of the file.

/// A contiguous span of source text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: u32,
    pub length: u32,
}

impl TextRange {
    pub const fn new(start: u32, length: u32) -> TextRange {
        TextRange { start, length }
    }

    /// Build a range covering `start..end`.
    pub const fn from_bounds(start: u32, end: u32) -> TextRange {
        TextRange {
            start,
            length: end.saturating_sub(start),
        }
    }

    pub const fn end(&self) -> u32 {
        self.start + self.length
    }

    /// Grow this range so it also covers `other`.
    pub fn extend(&mut self, other: TextRange) {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        self.start = start;
        self.length = end - start;
    }

    pub const fn contains(&self, other: TextRange) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }
}
