//! Writing `header | varint length | payload` records.

use crate::error::Result;
use crate::varint::{self, MAX_VARINT_LEN};
use std::io::Write;

/// Tag for field 1 with the length-delimited wire type, as produced for a
/// repeated embedded message.
pub const DEFAULT_TAG: u8 = 0x0A;

/// Appends one framed record to `out`.
pub fn encode_record(tag: u8, payload: &[u8], out: &mut Vec<u8>) {
    out.reserve(1 + varint::encoded_len(payload.len() as u64) + payload.len());
    out.push(tag);
    varint::encode_into(payload.len() as u64, out);
    out.extend_from_slice(payload);
}

/// A writer producing streams that [`RecordFramer`](crate::RecordFramer) reads.
///
/// Every record gets the same header byte.
pub struct RecordWriter<W: Write> {
    writer: W,
    tag: u8,
    prefix: Vec<u8>,
    records_written: u64,
}

impl<W: Write> RecordWriter<W> {
    /// Creates a writer using [`DEFAULT_TAG`] as the header byte.
    pub fn new(writer: W) -> Self {
        Self::with_tag(writer, DEFAULT_TAG)
    }

    pub fn with_tag(writer: W, tag: u8) -> Self {
        Self {
            writer,
            tag,
            prefix: Vec::with_capacity(1 + MAX_VARINT_LEN),
            records_written: 0,
        }
    }

    /// Writes one record.
    pub fn write(&mut self, payload: &[u8]) -> Result<()> {
        self.prefix.clear();
        self.prefix.push(self.tag);
        varint::encode_into(payload.len() as u64, &mut self.prefix);
        self.writer.write_all(&self.prefix)?;
        self.writer.write_all(payload)?;
        self.records_written += 1;
        Ok(())
    }

    /// Writes every payload from `payloads` in order, stopping at the first error.
    pub fn write_all_records<I, P>(&mut self, payloads: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        for payload in payloads {
            self.write(payload.as_ref())?;
        }
        Ok(())
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// Consumes the writer, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
