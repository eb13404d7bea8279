//! Output sink contract.
//!
//! The engine never owns the shared result buffer; it only appends to
//! whatever sink the call boundary hands it. A concrete bounded buffer
//! lives in `engine-protocol`.

use thiserror::Error;

/// Errors a sink can report while being written to.
///
/// Any of these is fatal for the engine call that hit it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The write would run past the end of a bounded sink.
    #[error("sink overflow: need {needed} bytes, {remaining} remaining")]
    Overflow { needed: usize, remaining: usize },

    /// A text blob whose byte length does not fit the int32 prefix.
    #[error("text of {0} bytes does not fit an int32 length prefix")]
    TextTooLong(usize),
}

/// Ordered byte sink with typed write primitives.
pub trait ExceptionSink {
    /// Write one fixed-width 32-bit integer.
    fn write_i32(&mut self, value: i32) -> Result<(), SinkError>;

    /// Write `text` as an int32 byte length followed by its UTF-8 bytes.
    fn write_text(&mut self, text: &str) -> Result<(), SinkError>;

    /// Current write position, in bytes.
    fn position(&self) -> usize;
}

/// Length prefix for a text blob, or `TextTooLong`.
pub fn text_length_prefix(text: &str) -> Result<i32, SinkError> {
    i32::try_from(text.len()).map_err(|_| SinkError::TextTooLong(text.len()))
}
