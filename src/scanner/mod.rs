mod chunk;
mod error;

#[cfg(test)]
mod tests;

pub use chunk::Chunk;
pub use error::ExtractError;

use crate::config::{Markers, ScanPolicy};
use std::io::{self, BufRead};
use tracing::{debug, warn};

/// Classification of a single source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Contains the start marker
    Start,
    /// Terminated line ending in the end marker
    End,
    /// Anything else
    Other,
}

/// Classify a raw line (terminator included) against the markers.
///
/// A header line is never treated as a closing line, even if it also ends in
/// the end marker. The closing marker has to sit right before the line
/// terminator (`\n`, `\r\n` or a lone `\r`), so a last line without one
/// never closes a chunk.
pub fn classify(line: &[u8], markers: &Markers) -> LineKind {
    if contains(line, markers.start.as_bytes()) {
        return LineKind::Start;
    }

    let Some(body) = strip_terminator(line) else {
        return LineKind::Other;
    };

    if body.ends_with(markers.end.as_bytes()) {
        LineKind::End
    } else {
        LineKind::Other
    }
}

fn strip_terminator(line: &[u8]) -> Option<&[u8]> {
    line.strip_suffix(b"\r\n")
        .or_else(|| line.strip_suffix(b"\n"))
        .or_else(|| line.strip_suffix(b"\r"))
}

/// Append the next line to `buf`, terminator included.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`, like text-mode reads of a
/// console capture. Returns the number of bytes appended, 0 at end of input.
pub fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<usize> {
    let start = buf.len();
    let mut after_cr = false;

    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            return Ok(buf.len() - start);
        }

        if after_cr {
            if available[0] == b'\n' {
                buf.push(b'\n');
                reader.consume(1);
            }
            return Ok(buf.len() - start);
        }

        let (used, done) = match available.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) => {
                buf.extend_from_slice(&available[..=i]);
                after_cr = available[i] == b'\r';
                (i + 1, !after_cr)
            }
            None => {
                buf.extend_from_slice(available);
                (available.len(), false)
            }
        };
        reader.consume(used);

        if done {
            return Ok(buf.len() - start);
        }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

/// Counters describing what the scan ran into besides finalized chunks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Lines read so far
    pub lines: usize,
    /// Headers that replaced a still-open chunk
    pub restarted_headers: usize,
    /// Closing lines seen with no open chunk
    pub orphan_ends: usize,
    /// Start line of a chunk still open at end of input
    pub dropped_tail: Option<usize>,
}

/// Chunk being captured between its header and closing line
struct OpenChunk {
    start_line: usize,
    buffer: Vec<u8>,
}

/// Single forward pass over a line source, yielding chunks as they close.
///
/// Stops after the first error.
pub struct ChunkScanner<R> {
    reader: R,
    markers: Markers,
    policy: ScanPolicy,
    line: Vec<u8>,
    open: Option<OpenChunk>,
    stats: ScanStats,
    finished: bool,
}

impl<R: BufRead> ChunkScanner<R> {
    pub fn new(reader: R, markers: Markers, policy: ScanPolicy) -> Self {
        Self {
            reader,
            markers,
            policy,
            line: Vec::new(),
            open: None,
            stats: ScanStats::default(),
            finished: false,
        }
    }

    /// Counters for the lines consumed so far
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    fn fail(&mut self, err: ExtractError) -> Option<Result<Chunk, ExtractError>> {
        self.finished = true;
        Some(Err(err))
    }

    fn finish(&mut self) -> Option<Result<Chunk, ExtractError>> {
        self.finished = true;
        let open = self.open.take()?;

        if self.policy.is_strict() {
            return Some(Err(ExtractError::Unterminated {
                start_line: open.start_line,
            }));
        }

        warn!(
            start_line = open.start_line,
            "input ended inside a chunk, dropping it"
        );
        self.stats.dropped_tail = Some(open.start_line);
        None
    }
}

impl<R: BufRead> Iterator for ChunkScanner<R> {
    type Item = Result<Chunk, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            self.line.clear();
            let read = match read_line(&mut self.reader, &mut self.line) {
                Ok(n) => n,
                Err(e) => return self.fail(e.into()),
            };
            if read == 0 {
                return self.finish();
            }

            self.stats.lines += 1;
            let line_no = self.stats.lines;

            match classify(&self.line, &self.markers) {
                LineKind::Start => {
                    debug!(line = line_no, "chunk header");
                    if let Some(open) = self.open.take() {
                        if self.policy.is_strict() {
                            return self.fail(ExtractError::NestedStart {
                                open_line: open.start_line,
                                line: line_no,
                            });
                        }
                        warn!(
                            open_line = open.start_line,
                            line = line_no,
                            "header inside an open chunk, restarting capture"
                        );
                        self.stats.restarted_headers += 1;
                    }
                    self.open = Some(OpenChunk {
                        start_line: line_no,
                        buffer: self.line.clone(),
                    });
                }
                LineKind::End => match self.open.take() {
                    Some(mut open) => {
                        debug!(line = line_no, "chunk closed");
                        open.buffer.extend_from_slice(&self.line);
                        return Some(Ok(Chunk {
                            start_line: open.start_line,
                            end_line: line_no,
                            content: open.buffer,
                        }));
                    }
                    None => {
                        if self.policy.is_strict() {
                            return self.fail(ExtractError::OrphanEnd { line: line_no });
                        }
                        debug!(line = line_no, "closing marker outside a chunk, ignored");
                        self.stats.orphan_ends += 1;
                    }
                },
                LineKind::Other => {
                    if let Some(open) = self.open.as_mut() {
                        open.buffer.extend_from_slice(&self.line);
                    }
                }
            }
        }
    }
}

/// Scan `reader` for chunks bounded by `markers`
pub fn scan_chunks<R: BufRead>(
    reader: R,
    markers: Markers,
    policy: ScanPolicy,
) -> ChunkScanner<R> {
    ChunkScanner::new(reader, markers, policy)
}
