//! engine-core
//!
//! Failure taxonomy of the native execution engine and the contract
//! every failure must satisfy to cross back to the host:
//! - discriminant (wire tag of each exception kind)
//! - serializable exceptions (closed set of kinds, uniform framing)
//! - the output sink the framing is written into
//! - raise helpers (bounded formatted raise, streamed raise)

pub mod discriminant;
pub mod exception;
pub mod raise;
pub mod sink;

pub use discriminant::ExceptionDiscriminant;

pub use exception::{
    ConstraintViolationException,
    ExceptionContext,
    ExceptionKind,
    ExceptionMessage,
    InterruptedException,
    QueryException,
    SerializableException,
    UnexpectedEngineException,
};

pub use raise::{format_bounded, format_streamed, FORMAT_BUFFER_SIZE, MAX_FORMATTED_MESSAGE_LEN};
pub use sink::{ExceptionSink, SinkError};
