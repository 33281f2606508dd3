//! Chunked line reading
//!
//! Files are read through a bounded buffer and split into lines as they stream in,
//! so a very large file is never materialized as one byte vector first. Both `\n`
//! and `\r\n` terminate a line; a trailing terminator does not produce an extra
//! empty line.

use super::error::SourceError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const SMALL_FILE: u64 = 4096;
const SMALL_CHUNK: usize = 4 * 1024;
const LARGE_CHUNK: usize = 96 * 1024;

/// Whole-file cancellation handle for a load in progress.
///
/// Cancelling discards everything read so far; the load returns
/// [`SourceError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct LoadCancel(Arc<AtomicBool>);

impl LoadCancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Buffer size for a file of `size` bytes.
pub fn chunk_size(size: u64) -> usize {
    if size < SMALL_FILE {
        SMALL_CHUNK
    } else {
        LARGE_CHUNK
    }
}

/// Read all lines of `path`, checking `cancel` between lines.
pub fn read_lines(path: &Path, cancel: Option<&LoadCancel>) -> Result<Vec<String>, SourceError> {
    let file = File::open(path).map_err(|e| SourceError::io(path, &e))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    let mut reader = BufReader::with_capacity(chunk_size(size), file);

    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        if cancel.is_some_and(LoadCancel::is_cancelled) {
            return Err(SourceError::Cancelled(path.to_path_buf()));
        }
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| SourceError::io(path, &e))?;
        if read == 0 {
            break;
        }
        lines.push(decode_line(&buf));
    }
    Ok(lines)
}

/// Split in-memory text into lines with the same terminator rules as [`read_lines`].
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n')
        .map(|line| decode_line(line.as_bytes()))
        .collect()
}

fn decode_line(raw: &[u8]) -> String {
    let mut end = raw.len();
    if end > 0 && raw[end - 1] == b'\n' {
        end -= 1;
        if end > 0 && raw[end - 1] == b'\r' {
            end -= 1;
        }
    }
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_is_line_ending_agnostic() {
        assert_eq!(split_lines("A\r\nB\nC"), vec!["A", "B", "C"]);
        assert_eq!(split_lines("A\n"), vec!["A"]);
        assert_eq!(split_lines("A\n\n"), vec!["A", ""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_chunk_size_thresholds() {
        assert_eq!(chunk_size(10), 4096);
        assert_eq!(chunk_size(4096), 96 * 1024);
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let cancel = LoadCancel::new();
        let other = cancel.clone();
        other.cancel();
        assert!(cancel.is_cancelled());
    }
}
