//! # varstream
//!
//! Bounded-memory extraction of length-delimited records from byte streams of
//! any length.
//!
//! ## Overview
//!
//! A stream is a plain concatenation of records, each laid out as
//!
//! ```text
//! header (1 byte) | varint payload length | payload
//! ```
//!
//! which is exactly how a message consisting of one repeated embedded-message
//! field is serialized. A file holding millions of such records can be walked
//! one record at a time without ever holding more than one working buffer and
//! the current payload in memory. Interpreting the payload bytes is left to the
//! caller.
//!
//! ## Key Features
//!
//! * **Fixed working buffer**: one buffer of configurable capacity, reused across refills
//! * **Records of any size**: payloads larger than the buffer are stitched across refills
//! * **Byte offsets**: every record reports the `[start, end)` span of its payload
//! * **Strict framing**: truncated or overflowing input is an error, never a short record
//!
//! ## Quick Start
//!
//! ```rust
//! use varstream::*;
//! use std::io::Cursor;
//!
//! fn main() -> Result<()> {
//!     let mut writer = RecordWriter::new(Vec::new());
//!     writer.write(b"first")?;
//!     writer.write(b"second")?;
//!     let stream = writer.into_inner();
//!
//!     let mut framer = RecordFramer::with_capacity(Cursor::new(stream), 4)?;
//!     while framer.advance()? {
//!         let (payload, span) = framer.current_with_offsets()?;
//!         println!("{} bytes at {}..{}", payload.len(), span.start, span.end);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! * **`varint`**: base-128 length prefix codec
//! * **`WindowedReader`**: exact-length byte requests over a fixed buffer
//! * **`RecordFramer`**: the record state machine built on both
//! * **`RecordWriter`**: produces streams the framer reads

pub mod error;
pub mod framer;
pub mod varint;
pub mod window;
pub mod writer;

// Re-export the main public API for user convenience.
pub use error::{Error, Result};
pub use framer::{FramerState, Record, RecordFramer, Records, Span};
pub use varint::{decode as decode_varint, encode as encode_varint, MAX_VARINT_LEN};
pub use window::{WindowedReader, DEFAULT_CAPACITY, LARGE_CAPACITY};
pub use writer::{encode_record, RecordWriter, DEFAULT_TAG};
