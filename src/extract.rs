//! The extraction driver: scanned chunks flow into numbered artifacts.
//!
//! [`Extractor`] is a lazy iterator. Each call to `next` advances the scan to
//! the next closed chunk, prints the progress line, writes the artifact and
//! only then hands the chunk back, so consuming it is what produces output.
//! The output index lives in the extractor and starts at 0 for every run.

use crate::config::{ExtractConfig, Markers, ScanPolicy};
use crate::manifest::Manifest;
use crate::output::{ArtifactLayout, ChunkWriter, WrittenArtifact};
use crate::scanner::{scan_chunks, Chunk, ChunkScanner, ExtractError, ScanStats};
use crate::xbm::XbmInfo;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing::{debug, info};

/// A chunk together with the artifact it was written to
#[derive(Debug, Clone)]
pub struct ExtractedChunk {
    pub chunk: Chunk,
    pub artifact: WrittenArtifact,
    pub xbm: XbmInfo,
}

pub struct Extractor<R> {
    scanner: ChunkScanner<R>,
    writer: ChunkWriter,
    next_index: usize,
    failed: bool,
}

impl<R: BufRead> Extractor<R> {
    pub fn new(reader: R, markers: Markers, policy: ScanPolicy, writer: ChunkWriter) -> Self {
        Self {
            scanner: scan_chunks(reader, markers, policy),
            writer,
            next_index: 0,
            failed: false,
        }
    }

    /// Number of artifacts written so far
    pub fn written(&self) -> usize {
        self.next_index
    }

    pub fn stats(&self) -> &ScanStats {
        self.scanner.stats()
    }
}

impl<R: BufRead> Iterator for Extractor<R> {
    type Item = Result<ExtractedChunk, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let chunk = match self.scanner.next()? {
            Ok(chunk) => chunk,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };

        println!("{}", progress_line(&chunk));

        let artifact = match self.writer.write(self.next_index, &chunk) {
            Ok(artifact) => artifact,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };
        self.next_index += 1;

        let xbm = XbmInfo::from_text(&chunk.as_text());
        debug!(
            index = artifact.index,
            width = ?xbm.width,
            height = ?xbm.height,
            "bitmap header"
        );

        Some(Ok(ExtractedChunk {
            chunk,
            artifact,
            xbm,
        }))
    }
}

/// Console line reported for each chunk found
pub fn progress_line(chunk: &Chunk) -> String {
    format!("Found chunk in lines: {}-{}", chunk.start_line, chunk.end_line)
}

/// Set up an extractor over `reader`, writing into the layout from `config`
pub fn extract<R: BufRead>(
    reader: R,
    config: &ExtractConfig,
) -> Result<Extractor<R>, ExtractError> {
    let layout = ArtifactLayout::new(&config.output_dir, &config.prefix, &config.suffix);
    let writer = ChunkWriter::create(layout)?;
    Ok(Extractor::new(
        reader,
        config.markers.clone(),
        config.policy,
        writer,
    ))
}

/// Outcome of a complete run
#[derive(Debug, Clone)]
pub struct ExtractSummary {
    pub artifacts: Vec<WrittenArtifact>,
    pub stats: ScanStats,
    pub manifest: Option<PathBuf>,
}

/// Extract every chunk of `config.input`, then write the manifest if enabled
pub fn run(config: &ExtractConfig) -> Result<ExtractSummary, ExtractError> {
    info!(input = %config.input.display(), "scanning dump");

    let file = File::open(&config.input)?;
    let mut extractor = extract(BufReader::new(file), config)?;
    let mut manifest = Manifest::new(&config.input);
    let mut artifacts = Vec::new();

    for extracted in extractor.by_ref() {
        let extracted = extracted?;
        manifest.record(&extracted);
        artifacts.push(extracted.artifact);
    }

    let manifest_path = if config.write_manifest {
        let path = config.manifest_path();
        manifest.write(&path)?;
        info!(path = %path.display(), "wrote manifest");
        Some(path)
    } else {
        None
    };

    info!(
        chunks = extractor.written(),
        lines = extractor.stats().lines,
        "scan complete"
    );

    Ok(ExtractSummary {
        artifacts,
        stats: extractor.stats().clone(),
        manifest: manifest_path,
    })
}
