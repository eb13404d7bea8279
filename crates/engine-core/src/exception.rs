//! Serializable exceptions.
//!
//! Every failure that has to cross the engine/host boundary is one of
//! the variants of [`SerializableException`]. The set is closed: the
//! host decoder dispatches on the discriminant and must know every kind.
//!
//! Framing is uniform across variants and lives in [`serialize`]:
//!
//! ```text
//! [ discriminant      : int32 ]
//! [ message_length    : int32 ]
//! [ message_bytes     : message_length bytes (UTF-8) ]
//! [ kind-specific trailer (0+ bytes) ]
//! ```
//!
//! Variants only decide the trailer, through [`ExceptionKind::write_trailer`].

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

use crate::discriminant::ExceptionDiscriminant;
use crate::sink::{ExceptionSink, SinkError};

mod sealed {
    use super::ExceptionMessage;

    /// Message storage of a kind. Only appending is exposed, so a
    /// stored message can grow but never be replaced or shortened.
    pub trait Sealed {
        fn stored_message(&self) -> &ExceptionMessage;

        fn append_to_message(&mut self, more: &str);
    }
}

/// Accumulated exception message.
///
/// Can only grow: context is appended as the exception propagates, but
/// nothing is ever removed. Outside this crate a message can only be
/// read; there is no way to build or overwrite one:
///
/// ```compile_fail
/// use engine_core::ExceptionMessage;
///
/// let _empty = ExceptionMessage::default();
/// ```
///
/// ```compile_fail
/// use engine_core::{ExceptionKind, QueryException};
///
/// let mut e = QueryException::new("no such column C");
/// e.stored_message_mut().append("");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionMessage(String);

impl ExceptionMessage {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        ExceptionMessage(message.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Plain concatenation, no separator.
    pub(crate) fn append(&mut self, more: &str) {
        self.0.push_str(more);
    }
}

impl fmt::Display for ExceptionMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Behaviour shared by every concrete exception kind.
///
/// Sealed: only this crate defines kinds, so each live exception
/// always has a concrete, serializable discriminant.
pub trait ExceptionKind: sealed::Sealed + fmt::Debug {
    /// Fixed tag for this kind. Never `None`.
    const DISCRIMINANT: ExceptionDiscriminant;

    /// Current message. Kinds may compose a derived message here
    /// instead of returning the stored text.
    fn message(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.stored_message().as_str())
    }

    /// Append `more` to the stored message. No separator is inserted.
    fn append_context_to_message(&mut self, more: &str) {
        self.append_to_message(more);
    }

    /// Write the kind-specific trailer, and only that.
    fn write_trailer(&self, sink: &mut dyn ExceptionSink) -> Result<(), SinkError>;
}

/// Write discriminant, message and trailer for any exception kind.
pub fn serialize<K: ExceptionKind>(
    exception: &K,
    sink: &mut dyn ExceptionSink,
) -> Result<(), SinkError> {
    sink.write_i32(K::DISCRIMINANT.ordinal())?;
    sink.write_text(&exception.message())?;
    exception.write_trailer(sink)
}

// -----------------------------------------------------------------------------
// Variants
// -----------------------------------------------------------------------------

/// Catch-all for failures that have no richer category.
///
/// Carries nothing beyond its message; the serialized trailer is empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UnexpectedEngineException {
    message: ExceptionMessage,
}

impl UnexpectedEngineException {
    /// Build from a message, stored verbatim (may be empty).
    pub fn new(message: impl Into<String>) -> Self {
        UnexpectedEngineException {
            message: ExceptionMessage::new(message),
        }
    }
}

impl sealed::Sealed for UnexpectedEngineException {
    fn stored_message(&self) -> &ExceptionMessage {
        &self.message
    }

    fn append_to_message(&mut self, more: &str) {
        self.message.append(more);
    }
}

impl ExceptionKind for UnexpectedEngineException {
    const DISCRIMINANT: ExceptionDiscriminant = ExceptionDiscriminant::UnexpectedEngine;

    fn write_trailer(&self, _sink: &mut dyn ExceptionSink) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Query execution failure.
///
/// The host decoder's trailer layout for this kind is not available
/// here, so only the common framing is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct QueryException {
    message: ExceptionMessage,
}

impl QueryException {
    pub fn new(message: impl Into<String>) -> Self {
        QueryException {
            message: ExceptionMessage::new(message),
        }
    }
}

impl sealed::Sealed for QueryException {
    fn stored_message(&self) -> &ExceptionMessage {
        &self.message
    }

    fn append_to_message(&mut self, more: &str) {
        self.message.append(more);
    }
}

impl ExceptionKind for QueryException {
    const DISCRIMINANT: ExceptionDiscriminant = ExceptionDiscriminant::Query;

    fn write_trailer(&self, _sink: &mut dyn ExceptionSink) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Constraint violation. Same framing-only placeholder as [`QueryException`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConstraintViolationException {
    message: ExceptionMessage,
}

impl ConstraintViolationException {
    pub fn new(message: impl Into<String>) -> Self {
        ConstraintViolationException {
            message: ExceptionMessage::new(message),
        }
    }
}

impl sealed::Sealed for ConstraintViolationException {
    fn stored_message(&self) -> &ExceptionMessage {
        &self.message
    }

    fn append_to_message(&mut self, more: &str) {
        self.message.append(more);
    }
}

impl ExceptionKind for ConstraintViolationException {
    const DISCRIMINANT: ExceptionDiscriminant = ExceptionDiscriminant::ConstraintViolation;

    fn write_trailer(&self, _sink: &mut dyn ExceptionSink) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Cooperative interruption of a running operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InterruptedException {
    message: ExceptionMessage,
}

impl InterruptedException {
    pub fn new(message: impl Into<String>) -> Self {
        InterruptedException {
            message: ExceptionMessage::new(message),
        }
    }
}

impl sealed::Sealed for InterruptedException {
    fn stored_message(&self) -> &ExceptionMessage {
        &self.message
    }

    fn append_to_message(&mut self, more: &str) {
        self.message.append(more);
    }
}

impl ExceptionKind for InterruptedException {
    const DISCRIMINANT: ExceptionDiscriminant = ExceptionDiscriminant::Interrupted;

    fn write_trailer(&self, _sink: &mut dyn ExceptionSink) -> Result<(), SinkError> {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Sum type
// -----------------------------------------------------------------------------

/// Any failure that can be handed back to the host.
///
/// There is no bare case: every value is one concrete kind, and the
/// discriminant is fixed by the variant for the value's whole life.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializableException {
    #[error(transparent)]
    Unexpected(#[from] UnexpectedEngineException),

    #[error(transparent)]
    Query(#[from] QueryException),

    #[error(transparent)]
    ConstraintViolation(#[from] ConstraintViolationException),

    #[error(transparent)]
    Interrupted(#[from] InterruptedException),
}

impl SerializableException {
    pub fn discriminant(&self) -> ExceptionDiscriminant {
        match self {
            SerializableException::Unexpected(_) => UnexpectedEngineException::DISCRIMINANT,
            SerializableException::Query(_) => QueryException::DISCRIMINANT,
            SerializableException::ConstraintViolation(_) => {
                ConstraintViolationException::DISCRIMINANT
            }
            SerializableException::Interrupted(_) => InterruptedException::DISCRIMINANT,
        }
    }

    pub fn message(&self) -> Cow<'_, str> {
        match self {
            SerializableException::Unexpected(e) => e.message(),
            SerializableException::Query(e) => e.message(),
            SerializableException::ConstraintViolation(e) => e.message(),
            SerializableException::Interrupted(e) => e.message(),
        }
    }

    /// Append context to the message. Safe to call any number of times.
    pub fn append_context_to_message(&mut self, more: &str) {
        match self {
            SerializableException::Unexpected(e) => e.append_context_to_message(more),
            SerializableException::Query(e) => e.append_context_to_message(more),
            SerializableException::ConstraintViolation(e) => e.append_context_to_message(more),
            SerializableException::Interrupted(e) => e.append_context_to_message(more),
        }
    }

    /// By-value form of [`append_context_to_message`](Self::append_context_to_message),
    /// for use in `map_err` while propagating.
    pub fn with_context(mut self, more: &str) -> Self {
        self.append_context_to_message(more);
        self
    }

    /// Write the full wire representation into `sink`.
    pub fn serialize(&self, sink: &mut dyn ExceptionSink) -> Result<(), SinkError> {
        match self {
            SerializableException::Unexpected(e) => serialize(e, sink),
            SerializableException::Query(e) => serialize(e, sink),
            SerializableException::ConstraintViolation(e) => serialize(e, sink),
            SerializableException::Interrupted(e) => serialize(e, sink),
        }
    }
}

/// Adds message context to the error side of an engine result.
pub trait ExceptionContext {
    fn exception_context(self, more: &str) -> Self;
}

impl<T> ExceptionContext for Result<T, SerializableException> {
    fn exception_context(self, more: &str) -> Self {
        self.map_err(|e| e.with_context(more))
    }
}
