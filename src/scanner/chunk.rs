use std::borrow::Cow;

/// A finalized bitmap definition captured from the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based line number of the header line
    pub start_line: usize,
    /// 1-based line number of the closing line (inclusive)
    pub end_line: usize,
    /// Verbatim bytes from the header through the closing line
    pub content: Vec<u8>,
}

impl Chunk {
    /// Number of source lines covered by this chunk
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Content as text, replacing invalid UTF-8
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}
