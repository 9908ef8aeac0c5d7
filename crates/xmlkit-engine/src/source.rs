//! Line tracking for buffered input.

use std::io::{self, BufRead, Read};

/// A [`BufRead`] wrapper that remembers where every newline it handed out was.
///
/// quick-xml reports byte offsets. Issues are more useful with a line and
/// column, so the reader's input goes through this wrapper, which records the
/// absolute offset of each `\n` as bytes are consumed.
#[derive(Debug)]
pub struct TrackedSource<R> {
    inner: R,
    consumed: u64,
    newlines: Vec<u64>,
}

impl<R> TrackedSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            consumed: 0,
            newlines: Vec::new(),
        }
    }

    /// Total number of bytes consumed so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// 1-based line and 1-based byte column of `offset`.
    ///
    /// Only offsets that have already been consumed are guaranteed to be
    /// accurate.
    pub fn location(&self, offset: u64) -> (u64, u64) {
        let preceding = self.newlines.partition_point(|&newline| newline < offset);
        let line_start = match preceding {
            0 => 0,
            n => self.newlines[n - 1] + 1,
        };
        (preceding as u64 + 1, offset - line_start + 1)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for TrackedSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        for index in memchr::memchr_iter(b'\n', &buf[..read]) {
            self.newlines.push(self.consumed + index as u64);
        }
        self.consumed += read as u64;
        Ok(read)
    }
}

impl<R: BufRead> BufRead for TrackedSource<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        // The bytes being consumed are still at the front of the inner buffer.
        if let Ok(available) = self.inner.fill_buf() {
            let end = amt.min(available.len());
            for index in memchr::memchr_iter(b'\n', &available[..end]) {
                self.newlines.push(self.consumed + index as u64);
            }
        }
        self.consumed += amt as u64;
        self.inner.consume(amt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consume_all(source: &mut TrackedSource<&[u8]>) {
        loop {
            let len = source.fill_buf().unwrap().len();
            if len == 0 {
                break;
            }
            source.consume(len.min(3));
        }
    }

    #[test]
    fn test_location_on_first_line() {
        let mut source = TrackedSource::new("<root/>".as_bytes());
        consume_all(&mut source);
        assert_eq!(source.location(0), (1, 1));
        assert_eq!(source.location(5), (1, 6));
    }

    #[test]
    fn test_location_after_newlines() {
        let mut source = TrackedSource::new("<a>\n  <b/>\n</a>".as_bytes());
        consume_all(&mut source);
        assert_eq!(source.consumed(), 15);
        // '<' of <b/> is at offset 6
        assert_eq!(source.location(6), (2, 3));
        // '<' of </a> is at offset 11
        assert_eq!(source.location(11), (3, 1));
    }

    #[test]
    fn test_newline_itself_belongs_to_its_line() {
        let mut source = TrackedSource::new("ab\ncd".as_bytes());
        consume_all(&mut source);
        assert_eq!(source.location(2), (1, 3));
        assert_eq!(source.location(3), (2, 1));
    }
}
