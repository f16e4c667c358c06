use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Header at line {line} opened while chunk from line {open_line} is still open")]
    NestedStart { open_line: usize, line: usize },

    #[error("Closing marker at line {line} without an open chunk")]
    OrphanEnd { line: usize },

    #[error("Chunk starting at line {start_line} is never closed")]
    Unterminated { start_line: usize },

    #[error("Failed to encode manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
