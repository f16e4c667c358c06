use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::extract::ExtractedChunk;
use crate::scanner::ExtractError;
use crate::xbm::XbmInfo;

/// Index of every artifact written by one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub generator: String,
    pub source: String,
    pub chunk_count: usize,
    pub chunks: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub index: usize,
    pub file: String,
    pub start_line: usize,
    pub end_line: usize,
    pub line_count: usize,
    pub size_bytes: usize,
    pub sha256: String,
    pub xbm: XbmInfo,
}

impl Manifest {
    pub fn new(source: &Path) -> Self {
        Self {
            generator: format!("xbm-extract v{}", env!("CARGO_PKG_VERSION")),
            source: source.display().to_string(),
            chunk_count: 0,
            chunks: Vec::new(),
        }
    }

    /// Append the entry for a written chunk
    pub fn record(&mut self, extracted: &ExtractedChunk) {
        let file = extracted
            .artifact
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.chunks.push(ManifestEntry {
            index: extracted.artifact.index,
            file,
            start_line: extracted.chunk.start_line,
            end_line: extracted.chunk.end_line,
            line_count: extracted.chunk.line_count(),
            size_bytes: extracted.artifact.size_bytes,
            sha256: extracted.artifact.sha256.clone(),
            xbm: extracted.xbm.clone(),
        });
        self.chunk_count = self.chunks.len();
    }

    pub fn to_json(&self) -> Result<String, ExtractError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the manifest as pretty JSON with a trailing newline
    pub fn write(&self, path: &Path) -> Result<(), ExtractError> {
        let mut json = self.to_json()?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        let data = fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}
