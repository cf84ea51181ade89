//! Windowed loading of persisted bit streams.

use std::fs;
use std::path::Path;

use crate::bits::BitSequence;
use crate::error::PrepError;
use crate::transcript::Transcript;

/// A window read from a bit-stream file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitWindow {
    pub bits: BitSequence,
    /// Offset actually used; 0 if the requested offset was out of range.
    pub offset: usize,
    pub requested_offset: usize,
    pub requested_length: usize,
    /// Valid bits in the whole file.
    pub available: usize,
}

impl BitWindow {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn offset_was_reset(&self) -> bool {
        self.offset != self.requested_offset
    }

    /// Bits missing relative to the requested length, if any.
    pub fn shortfall(&self) -> Option<usize> {
        let missing = self.requested_length.saturating_sub(self.bits.len());
        (missing > 0).then_some(missing)
    }
}

/// Load `length` bits starting at `offset` from the text file at `path`.
///
/// Characters other than `'0'`/`'1'` are dropped. An offset at or past the end
/// of the data is reset to 0 with a warning; a short read is not an error.
///
/// A file that cannot be read is an error (`PrepError::Io`), not an empty
/// window. The cause is also written to the transcript as an `Error:` line.
/// Callers that want to continue with no data can match on the error and
/// use an empty [`BitSequence`].
pub fn load_window(
    path: &Path,
    length: usize,
    offset: usize,
    transcript: &mut Transcript,
) -> Result<BitWindow, PrepError> {
    let content = fs::read_to_string(path).map_err(|e| {
        transcript.error(format!("loading data from {}: {e}", path.display()));
        PrepError::io(path, e)
    })?;
    Ok(window(&content, length, offset, transcript))
}

/// The in-memory half of [`load_window`].
pub fn window(content: &str, length: usize, offset: usize, transcript: &mut Transcript) -> BitWindow {
    let all = BitSequence::from_text(content);
    let total = all.len();

    let mut start = offset;
    if start >= total {
        transcript.warn(format!(
            "Requested offset ({offset}) exceeds data length ({total})"
        ));
        start = 0;
    }
    let end = start.saturating_add(length).min(total);
    let bits = all.slice(start, end);
    transcript.line(format!(
        "Data segment: offset={start}, length={}, requested={length}",
        bits.len()
    ));

    BitWindow {
        bits,
        offset: start,
        requested_offset: offset,
        requested_length: length,
        available: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN: &str = "0110100111";

    #[test]
    fn whitespace_and_junk_are_filtered() {
        let mut t = Transcript::new();
        let w = window("01 1\r\n0x1\t0", 100, 0, &mut t);
        assert_eq!(w.bits.to_string(), "011010");
    }

    #[test]
    fn offset_far_past_end_resets_to_zero() {
        let mut t = Transcript::new();
        let w = window(TEN, 5, 1000, &mut t);
        assert_eq!(w.offset, 0);
        assert!(w.offset_was_reset());
        assert_eq!(w.bits.to_string(), "01101");
        assert_eq!(w.shortfall(), None);
        assert!(t.has_warnings());
    }

    #[test]
    fn offset_equal_to_length_resets() {
        let mut t = Transcript::new();
        let w = window(TEN, 20, 10, &mut t);
        assert_eq!(w.offset, 0);
        assert_eq!(w.len(), 10);
        assert_eq!(w.shortfall(), Some(10));
    }

    #[test]
    fn offset_one_before_end_is_honoured() {
        let mut t = Transcript::new();
        let w = window(TEN, 5, 9, &mut t);
        assert_eq!(w.offset, 9);
        assert!(!w.offset_was_reset());
        assert_eq!(w.bits.to_string(), "1");
        assert_eq!(w.shortfall(), Some(4));
        assert!(!t.has_warnings());
    }

    #[test]
    fn huge_length_does_not_overflow() {
        let mut t = Transcript::new();
        let w = window(TEN, usize::MAX, 3, &mut t);
        assert_eq!(w.bits.to_string(), "0100111");
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut t = Transcript::new();
        let err = load_window(Path::new("/nonexistent/bits.txt"), 10, 0, &mut t);
        assert!(matches!(err, Err(PrepError::Io { .. })));
        assert!(t.contains("Error: loading data"));
    }

    #[test]
    fn unreadable_path_yields_no_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut t = Transcript::new();
        // A directory cannot be read as text.
        let err = load_window(dir.path(), 10, 0, &mut t);
        assert!(matches!(err, Err(PrepError::Io { ref path, .. }) if path == dir.path()));
        assert_eq!(t.lines().len(), 1);
    }
}
