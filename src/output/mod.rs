
use crate::scanner::{Chunk, ExtractError};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Naming template for artifacts: `<dir>/<prefix><NN><suffix>`
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    dir: PathBuf,
    prefix: String,
    suffix: String,
}

impl ArtifactLayout {
    pub fn new(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for an output index, zero-padded to two digits
    pub fn file_name(&self, index: usize) -> String {
        format!("{}{:02}{}", self.prefix, index, self.suffix)
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(self.file_name(index))
    }
}

/// Record of one artifact on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    pub index: usize,
    pub path: PathBuf,
    pub size_bytes: usize,
    /// SHA-256 of the written bytes, hex encoded
    pub sha256: String,
}

/// Writes chunks verbatim into the artifact layout
pub struct ChunkWriter {
    layout: ArtifactLayout,
}

impl ChunkWriter {
    /// Create the writer, making sure the output directory exists
    pub fn create(layout: ArtifactLayout) -> Result<Self, ExtractError> {
        fs::create_dir_all(layout.dir())?;
        Ok(Self { layout })
    }

    /// Write `chunk` to the artifact for `index`, replacing any existing file
    pub fn write(&self, index: usize, chunk: &Chunk) -> Result<WrittenArtifact, ExtractError> {
        let path = self.layout.path_for(index);

        let mut file = File::create(&path)?;
        file.write_all(&chunk.content)?;
        file.flush()?;

        info!(
            index,
            path = %path.display(),
            bytes = chunk.content.len(),
            "wrote artifact"
        );

        Ok(WrittenArtifact {
            index,
            path,
            size_bytes: chunk.content.len(),
            sha256: digest(&chunk.content),
        })
    }
}

/// Hex SHA-256 of a byte slice
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
