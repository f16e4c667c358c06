// Public API exports
pub mod config;
pub mod extract;
pub mod manifest;
pub mod output;
pub mod scanner;
pub mod xbm;


// Re-export main types for convenience
pub use config::{ExtractConfig, Markers, ScanPolicy};

pub use scanner::{
    classify, read_line, scan_chunks, Chunk, ChunkScanner, ExtractError, LineKind, ScanStats,
};

pub use output::{ArtifactLayout, ChunkWriter, WrittenArtifact};

pub use extract::{extract, progress_line, run, ExtractSummary, ExtractedChunk, Extractor};

pub use manifest::{Manifest, ManifestEntry};

pub use xbm::XbmInfo;
