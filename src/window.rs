//! A fixed-capacity window over a forward-only byte source.

use crate::error::{Error, Result};
use log::{debug, trace};
use std::io::Read;

/// Default working buffer size: 64 KiB.
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Working buffer preset for streams dominated by very large records: 64 MiB.
pub const LARGE_CAPACITY: usize = 64 * 1024 * 1024;

/// Serves exact-length byte requests from a source through one reusable buffer.
///
/// A request may be larger than the buffer; it is then stitched together from
/// as many refills as needed, and whatever is left of the last chunk stays
/// buffered for the next request. Steady-state memory is bounded by the buffer
/// capacity plus the size of the largest request.
///
/// ```rust
/// # use varstream::WindowedReader;
/// # use std::io::Cursor;
/// let mut window = WindowedReader::with_capacity(Cursor::new(b"hello world".to_vec()), 4)?;
/// assert_eq!(window.request(5)?, b"hello");
/// assert_eq!(window.request(6)?, b" world");
/// assert_eq!(window.position(), 11);
/// assert!(window.at_end()?);
/// # Ok::<(), varstream::Error>(())
/// ```
pub struct WindowedReader<R: Read> {
    source: R,
    buffer: Box<[u8]>,
    // Invariant: cursor <= filled <= buffer.len()
    filled: usize,
    cursor: usize,
    eof: bool,
    // Set when a request failed after draining bytes it could not deliver.
    failed: bool,
    position: u64,
}

impl<R: Read> WindowedReader<R> {
    /// Creates a reader with a [`DEFAULT_CAPACITY`] buffer.
    pub fn new(source: R) -> Self {
        Self::from_parts(source, DEFAULT_CAPACITY)
    }

    /// Creates a reader with a buffer of `capacity` bytes.
    ///
    /// Returns `Error::InvalidCapacity` if `capacity` is zero.
    pub fn with_capacity(source: R, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        Ok(Self::from_parts(source, capacity))
    }

    fn from_parts(source: R, capacity: usize) -> Self {
        Self {
            source,
            buffer: vec![0u8; capacity].into_boxed_slice(),
            filled: 0,
            cursor: 0,
            eof: false,
            failed: false,
            position: 0,
        }
    }

    /// Returns exactly `n` bytes as a freshly allocated vector.
    pub fn request(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.request_into(n, &mut out)?;
        Ok(out)
    }

    /// Appends exactly `n` bytes to `out`.
    ///
    /// On failure `out` is restored to its original length and the position
    /// does not move. A request spanning several refills may already have
    /// consumed buffered bytes when it fails; those cannot be handed out again,
    /// so every later request fails with `Error::Poisoned` until `reset()`.
    ///
    /// # Errors
    /// * `Error::Truncated` - the source ended before `n` bytes were collected
    /// * `Error::Io` - the source failed
    /// * `Error::Poisoned` - an earlier request failed midway
    pub fn request_into(&mut self, n: usize, out: &mut Vec<u8>) -> Result<()> {
        self.check_poisoned()?;
        if self.filled - self.cursor >= n {
            out.extend_from_slice(&self.buffer[self.cursor..self.cursor + n]);
            self.cursor += n;
        } else {
            let original_len = out.len();
            if let Err(e) = self.collect_across_refills(n, out) {
                if out.len() > original_len {
                    debug!(
                        "request for {} bytes failed after draining {} at position {}",
                        n,
                        out.len() - original_len,
                        self.position
                    );
                    self.failed = true;
                }
                out.truncate(original_len);
                return Err(e);
            }
        }
        self.position += n as u64;
        Ok(())
    }

    /// Returns the next single byte; `request(1)` without the allocation.
    pub fn request_byte(&mut self) -> Result<u8> {
        self.check_poisoned()?;
        if self.cursor == self.filled && !self.refill()? {
            return Err(Error::truncated(1, 0));
        }
        let byte = self.buffer[self.cursor];
        self.cursor += 1;
        self.position += 1;
        Ok(byte)
    }

    fn check_poisoned(&self) -> Result<()> {
        if self.failed {
            return Err(Error::Poisoned);
        }
        Ok(())
    }

    fn collect_across_refills(&mut self, n: usize, out: &mut Vec<u8>) -> Result<()> {
        let mut collected = 0;
        loop {
            let take = (self.filled - self.cursor).min(n - collected);
            // Never reserve more than what is already in hand, so a bogus
            // huge request fails on the source rather than on allocation.
            out.reserve(take);
            out.extend_from_slice(&self.buffer[self.cursor..self.cursor + take]);
            self.cursor += take;
            collected += take;

            if collected == n {
                return Ok(());
            }
            if !self.refill()? {
                return Err(Error::truncated(n, collected));
            }
        }
    }

    /// Replaces the drained window with the next chunk from the source.
    /// Returns false once the source has nothing more to give.
    fn refill(&mut self) -> Result<bool> {
        debug_assert_eq!(self.cursor, self.filled);
        if self.eof {
            return Ok(false);
        }

        self.cursor = 0;
        self.filled = 0;
        while self.filled < self.buffer.len() {
            match self.source.read(&mut self.buffer[self.filled..])? {
                0 => {
                    self.eof = true;
                    break;
                }
                read => self.filled += read,
            }
        }

        trace!(
            "refilled window with {} bytes at stream position {}{}",
            self.filled,
            self.position,
            if self.eof { " (source exhausted)" } else { "" }
        );
        Ok(self.filled > 0)
    }

    /// Returns true when no further byte can be delivered.
    ///
    /// If the window is drained this pulls the next chunk to find out, so it can
    /// fail with the source's I/O error, or with `Error::Poisoned` after a
    /// failed request.
    pub fn at_end(&mut self) -> Result<bool> {
        self.check_poisoned()?;
        if self.cursor < self.filled {
            return Ok(false);
        }
        Ok(!self.refill()?)
    }

    /// Absolute number of bytes delivered since creation or the last reset.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes fetched from the source but not yet delivered.
    pub fn buffered(&self) -> usize {
        self.filled - self.cursor
    }

    /// Size of the working buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Drops any buffered bytes, clears a poisoned state and zeroes the
    /// position. The source is kept.
    pub fn reset(&mut self) {
        self.filled = 0;
        self.cursor = 0;
        self.eof = false;
        self.failed = false;
        self.position = 0;
    }

    /// Resets the reader onto a fresh source, returning the previous one.
    pub fn reset_with_source(&mut self, source: R) -> R {
        self.reset();
        std::mem::replace(&mut self.source, source)
    }

    /// Borrows the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.source
    }

    /// Consumes the reader, returning the source. Buffered bytes are lost.
    pub fn into_inner(self) -> R {
        self.source
    }
}
