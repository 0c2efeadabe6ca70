use text_size::{TextRange, TextSize};

/// A just-applied document edit.
///
/// `start..end` is the replacement text in the new document and
/// `start..old_end` is the replaced region in the old one, so
/// `end - old_end` is how far everything after the edit moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEdit {
    pub start: TextSize,
    pub end: TextSize,
    pub old_end: TextSize,
}

impl TextEdit {
    pub fn new(
        start: impl Into<TextSize>,
        end: impl Into<TextSize>,
        old_end: impl Into<TextSize>,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            old_end: old_end.into(),
        }
    }

    /// An insertion of `len` bytes at `at`.
    pub fn insert(at: u32, len: u32) -> Self {
        Self::new(at, at + len, at)
    }

    /// A deletion of `len` bytes at `at`.
    pub fn delete(at: u32, len: u32) -> Self {
        Self::new(at, at, at + len)
    }

    /// The edit used for a full re-tokenize of a document of `len` bytes.
    pub fn whole(len: TextSize) -> Self {
        Self::new(0u32, len, 0u32)
    }

    /// Signed distance every offset after the edit moved by.
    pub fn delta(&self) -> i64 {
        i64::from(u32::from(self.end)) - i64::from(u32::from(self.old_end))
    }

    /// The inserted text's range in the new document.
    pub fn new_range(&self) -> TextRange {
        TextRange::new(self.start, self.end.max(self.start))
    }
}
