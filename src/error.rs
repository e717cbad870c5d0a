use thiserror::Error;

/// Custom error types for the varstream library.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O errors from the source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source ended before the requested number of bytes could be collected.
    #[error("Truncated stream: requested {requested} bytes, only {available} available")]
    Truncated { requested: usize, available: usize },

    /// A length varint did not terminate within the budget for a 64-bit value.
    #[error("Varint overflow: length prefix exceeds 64 bits")]
    VarintOverflow,

    /// A declared payload length exceeds the configured limit.
    #[error("Record too large: declared {declared} bytes, limit {limit}")]
    RecordTooLarge { declared: u64, limit: u64 },

    /// A working buffer must hold at least one byte.
    #[error("Invalid buffer capacity: must be greater than zero")]
    InvalidCapacity,

    /// No record is available to inspect.
    #[error("No current record: advance() has not produced one")]
    NoCurrentRecord,

    /// An earlier failure left the reader or framer unusable until it is reset.
    #[error("Stream is poisoned by an earlier error; call reset()")]
    Poisoned,
}

impl Error {
    /// Create a new `Truncated` error.
    pub fn truncated(requested: usize, available: usize) -> Self {
        Self::Truncated {
            requested,
            available,
        }
    }

    /// Create a new `RecordTooLarge` error.
    pub fn record_too_large(declared: u64, limit: u64) -> Self {
        Self::RecordTooLarge { declared, limit }
    }

    /// Returns true for errors caused by the stream ending early.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

/// Result type alias for the library operations.
pub type Result<T> = std::result::Result<T, Error>;
