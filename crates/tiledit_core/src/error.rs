//! Error type shared by buffers, readers and scanners.
use thiserror::Error;

/// Errors raised by readers, writers and the scanners built on them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RwError {
    #[error("offset out of range")]
    OutOfRange,

    #[error("invalid utf-8 encoding")]
    InvalidEncoding,

    /// Soft end of the readable range; scanners clamp on it.
    #[error("end of range")]
    EndOfRange,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("cancelled")]
    Cancelled,

    #[error("write vetoed: {0}")]
    VetoedWrite(String),

    #[error("allocation failure")]
    FatalAlloc,
}

impl RwError {
    /// True for the one error kind that callers cannot recover from.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalAlloc)
    }

    /// True when the error is the soft end-of-range condition.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfRange)
    }
}

/// Convenience alias for reader and writer results.
pub type RwResult<T> = Result<T, RwError>;
