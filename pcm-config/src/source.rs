//! Fixed-size chunked input for the XML reader.
//!
//! The reader pulls bytes through [`ChunkedSource`], which refills a single
//! preallocated buffer with at most `chunk_size` bytes per underlying read.
//! A zero-byte read marks the end of input.

use std::cmp;
use std::io::{self, BufRead, Read};

use tracing::trace;

use crate::error::LoadError;

/// Buffered reader over `R` with a fallibly allocated, fixed-size buffer.
pub(crate) struct ChunkedSource<R> {
    inner: R,
    buf: Vec<u8>,
    pos: usize,
    filled: usize,
    chunks: usize,
}

impl<R: Read> ChunkedSource<R> {
    /// Wrap `inner`, reserving a `chunk_size` buffer up front.
    ///
    /// Returns [`LoadError::OutOfResources`] if the buffer cannot be allocated.
    pub(crate) fn new(inner: R, chunk_size: usize) -> Result<Self, LoadError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(chunk_size)
            .map_err(|_| LoadError::OutOfResources { size: chunk_size })?;
        buf.resize(chunk_size, 0);

        Ok(Self {
            inner,
            buf,
            pos: 0,
            filled: 0,
            chunks: 0,
        })
    }

    /// Number of non-empty chunks read so far.
    pub(crate) fn chunks_read(&self) -> usize {
        self.chunks
    }
}

impl<R: Read> BufRead for ChunkedSource<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.filled {
            let read = loop {
                match self.inner.read(&mut self.buf) {
                    Ok(read) => break read,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            trace!(bytes = read, chunk = self.chunks, "read mixer chunk");
            if read > 0 {
                self.chunks += 1;
            }
            self.pos = 0;
            self.filled = read;
        }
        Ok(&self.buf[self.pos..self.filled])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = cmp::min(self.pos + amt, self.filled);
    }
}

impl<R: Read> Read for ChunkedSource<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = cmp::min(available.len(), out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}
