//! Extraction of `header | varint length | payload` records from a byte stream.

use crate::error::{Error, Result};
use crate::varint;
use crate::window::WindowedReader;
use log::debug;
use std::io::Read;
use std::ops::Range;

/// Where the framer is within the record it is extracting.
///
/// `ReadingLength` and `ReadingPayload` only last for the duration of an
/// `advance()` call; between calls the framer is `Idle`, `Exhausted` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramerState {
    /// Positioned at a header byte (or at the very start of the stream).
    Idle,
    /// Header consumed, collecting the length varint.
    ReadingLength,
    /// Length known, collecting the payload.
    ReadingPayload,
    /// The source ended cleanly on a record boundary.
    Exhausted,
    /// A framing or I/O error ended extraction; only `reset()` recovers.
    Failed,
}

/// Half-open byte interval `[start, end)` within the original stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_range(&self) -> Range<u64> {
        self.start..self.end
    }
}

/// One extracted record: an owned copy of its payload and where the payload
/// sits in the stream. Header and length bytes are not part of the span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub payload: Vec<u8>,
    pub span: Span,
}

impl Record {
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

/// Pulls records one at a time from a source of concatenated
/// `header(1 byte) | varint(len) | payload(len bytes)` frames.
///
/// The header byte is skipped without inspection; every record in the stream
/// is assumed to share the same tag, as with a repeated length-delimited field.
/// Memory use is the working buffer plus the current record, however long
/// the stream is.
///
/// ```rust
/// # use varstream::{RecordFramer, Span};
/// # use std::io::Cursor;
/// let stream = vec![0x00, 0x03, b'a', b'b', b'c', 0x00, 0x00];
/// let mut framer = RecordFramer::new(Cursor::new(stream));
///
/// assert!(framer.advance()?);
/// assert_eq!(framer.current_with_offsets()?, (&b"abc"[..], Span { start: 2, end: 5 }));
/// assert!(framer.advance()?);
/// assert_eq!(framer.current()?, b"");
/// assert!(!framer.advance()?);
/// # Ok::<(), varstream::Error>(())
/// ```
pub struct RecordFramer<R: Read> {
    window: WindowedReader<R>,
    state: FramerState,
    length: varint::Accumulator,
    max_record_len: Option<u64>,
    current: Option<Record>,
}

impl<R: Read> RecordFramer<R> {
    /// Creates a framer with the default working buffer capacity.
    pub fn new(source: R) -> Self {
        Self::from_window(WindowedReader::new(source))
    }

    /// Creates a framer whose working buffer holds `capacity` bytes.
    ///
    /// Records longer than `capacity` are still extracted; they just take
    /// several refills.
    pub fn with_capacity(source: R, capacity: usize) -> Result<Self> {
        Ok(Self::from_window(WindowedReader::with_capacity(
            source, capacity,
        )?))
    }

    fn from_window(window: WindowedReader<R>) -> Self {
        Self {
            window,
            state: FramerState::Idle,
            length: varint::Accumulator::new(),
            max_record_len: None,
            current: None,
        }
    }

    /// Rejects records whose declared length exceeds `max` bytes.
    ///
    /// The check happens before any payload byte is read, so a corrupt length
    /// prefix cannot make the framer buffer an arbitrary amount of data.
    pub fn bounded(mut self, max: u64) -> Self {
        self.max_record_len = Some(max);
        self
    }

    /// Moves to the next record.
    ///
    /// # Returns
    /// * `Ok(true)` - A record is available through `current()`
    /// * `Ok(false)` - The source ended cleanly on a record boundary
    /// * `Err(e)` - The stream is malformed or the source failed; the framer
    ///   stays failed until `reset()`
    pub fn advance(&mut self) -> Result<bool> {
        match self.state {
            FramerState::Failed => return Err(Error::Poisoned),
            FramerState::Exhausted => return Ok(false),
            _ => {}
        }
        self.current = None;

        match self.read_record() {
            Ok(Some(record)) => {
                self.current = Some(record);
                self.state = FramerState::Idle;
                Ok(true)
            }
            Ok(None) => {
                debug!("stream exhausted at position {}", self.window.position());
                self.state = FramerState::Exhausted;
                Ok(false)
            }
            Err(e) => {
                debug!(
                    "framing failed in {:?} at position {}: {}",
                    self.state,
                    self.window.position(),
                    e
                );
                self.state = FramerState::Failed;
                Err(e)
            }
        }
    }

    fn read_record(&mut self) -> Result<Option<Record>> {
        self.state = FramerState::Idle;
        if self.window.at_end()? {
            return Ok(None);
        }
        // Header byte: uniform across the stream, so it carries nothing we need.
        self.window.request_byte()?;

        self.state = FramerState::ReadingLength;
        self.length.clear();
        let declared = loop {
            let byte = self.window.request_byte()?;
            if let Some(value) = self.length.push(byte)? {
                break value;
            }
        };
        let len = self.check_length(declared)?;

        self.state = FramerState::ReadingPayload;
        let start = self.window.position();
        let mut payload = Vec::new();
        self.window.request_into(len, &mut payload)?;
        let end = self.window.position();

        Ok(Some(Record {
            payload,
            span: Span { start, end },
        }))
    }

    fn check_length(&self, declared: u64) -> Result<usize> {
        if let Some(max) = self.max_record_len {
            if declared > max {
                return Err(Error::record_too_large(declared, max));
            }
        }
        usize::try_from(declared)
            .map_err(|_| Error::record_too_large(declared, usize::MAX as u64))
    }

    /// Payload of the record made available by the last successful `advance()`.
    pub fn current(&self) -> Result<&[u8]> {
        self.current_record().map(|r| r.payload.as_slice())
    }

    /// Payload plus its byte span in the stream.
    pub fn current_with_offsets(&self) -> Result<(&[u8], Span)> {
        self.current_record().map(|r| (r.payload.as_slice(), r.span))
    }

    pub fn current_record(&self) -> Result<&Record> {
        self.current.as_ref().ok_or(Error::NoCurrentRecord)
    }

    /// Hands the current record over to the caller.
    pub fn take_current(&mut self) -> Result<Record> {
        self.current.take().ok_or(Error::NoCurrentRecord)
    }

    /// Advances and returns the record by value.
    /// Returns Ok(Some(record)) on success, Ok(None) on clean end of stream.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        if self.advance()? {
            self.take_current().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Processes every remaining record with a closure.
    ///
    /// The closure receives each payload and its span; returning an error stops
    /// processing and propagates that error.
    pub fn process_all<F>(&mut self, mut processor: F) -> Result<()>
    where
        F: FnMut(&[u8], Span) -> Result<()>,
    {
        while self.advance()? {
            let (payload, span) = self.current_with_offsets()?;
            processor(payload, span)?;
        }
        Ok(())
    }

    /// Iterates over the remaining records. Iteration ends after the first error.
    pub fn records(&mut self) -> Records<'_, R> {
        Records {
            framer: self,
            done: false,
        }
    }

    /// Returns to the initial state and zeroes the position. Buffered bytes are
    /// dropped; the source itself is kept.
    pub fn reset(&mut self) {
        debug!("resetting framer at position {}", self.window.position());
        self.window.reset();
        self.state = FramerState::Idle;
        self.length.clear();
        self.current = None;
    }

    /// Resets the framer onto a fresh source, returning the previous one.
    pub fn reset_with_source(&mut self, source: R) -> R {
        self.reset();
        self.window.reset_with_source(source)
    }

    /// Absolute number of stream bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.window.position()
    }

    pub fn state(&self) -> FramerState {
        self.state
    }

    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    pub fn max_record_len(&self) -> Option<u64> {
        self.max_record_len
    }

    pub fn into_inner(self) -> R {
        self.window.into_inner()
    }
}

/// Iterator over owned records, returned by [`RecordFramer::records`].
pub struct Records<'a, R: Read> {
    framer: &'a mut RecordFramer<R>,
    done: bool,
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.framer.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
