//! Shared types for the engine call boundary.
//!
//! This module defines:
//! - `ErrorCode`: the coarse success/error code returned next to the buffer
//! - `CallOutcome`: what a wrapped engine call produced
//! - `HostFailure`: the failure the host reconstructs from the buffer

use engine_core::{ExceptionDiscriminant, SerializableException, SinkError};

/// Coarse result code of an engine call.
///
/// `Error` means the exception region holds at most one serialized
/// exception; `Success` means the region is unused.
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,
    Error = 1,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(ErrorCode::Success),
            1 => Some(ErrorCode::Error),
            _ => None,
        }
    }
}

/// Result of [`EngineBoundary::invoke`](crate::boundary::EngineBoundary::invoke).
#[derive(Debug)]
pub enum CallOutcome<T> {
    /// The call returned normally.
    Completed(T),

    /// The call failed and its exception was written to the region.
    Failed(ExceptionDiscriminant),

    /// The exception could not be written. The region is left empty.
    Fatal(SinkError),
}

impl<T> CallOutcome<T> {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CallOutcome::Completed(_) => ErrorCode::Success,
            CallOutcome::Failed(_) | CallOutcome::Fatal(_) => ErrorCode::Error,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, CallOutcome::Completed(_))
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            CallOutcome::Completed(v) => Some(v),
            _ => None,
        }
    }
}

/// Failure as seen by the host after an error code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostFailure {
    /// The region held a serialized exception.
    Serialized(SerializableException),

    /// Error code without details; only the code is known.
    Unspecified { error_code: i32 },
}
