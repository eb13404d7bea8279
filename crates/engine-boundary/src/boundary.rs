//! Outermost engine call wrapper.
//!
//! Every engine entry point runs through [`EngineBoundary::invoke`]:
//! - the exception region is reset before the call,
//! - a returned `SerializableException` (any kind) is written to the region,
//! - a panic is turned into an `UnexpectedEngineException` and written the same way,
//! - the coarse `ErrorCode` goes back alongside the buffer.
//!
//! A failure to write the exception is fatal for that call. The region
//! is cleared and no substitute encoding is attempted.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use engine_core::{SerializableException, UnexpectedEngineException};
use engine_protocol::{
    reset_exception_region, write_exception_region, ExceptionBuffer, ProtocolError, WireByteOrder,
};
use tracing::{debug, error, warn};

use crate::config::{BoundaryConfig, ConfigError};
use crate::host;
use crate::types::{CallOutcome, ErrorCode, HostFailure};

/// Owns the exception buffer shared with the host.
#[derive(Debug)]
pub struct EngineBoundary {
    buffer: ExceptionBuffer,
}

impl EngineBoundary {
    pub fn new(config: &BoundaryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut buffer = ExceptionBuffer::new(config.exception_buffer_capacity, config.byte_order);
        reset_exception_region(&mut buffer)?;
        Ok(EngineBoundary { buffer })
    }

    /// Raw exception region as the host would read it.
    pub fn exception_region(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    pub fn byte_order(&self) -> WireByteOrder {
        self.buffer.order()
    }

    /// Run one engine call.
    ///
    /// `operation` only labels log events.
    pub fn invoke<T, F>(&mut self, operation: &str, f: F) -> CallOutcome<T>
    where
        F: FnOnce() -> Result<T, SerializableException>,
    {
        if let Err(e) = reset_exception_region(&mut self.buffer) {
            error!(operation, error = %e, "cannot reset exception region");
            return CallOutcome::Fatal(e);
        }

        debug!(operation, "engine call");

        let result = match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(result) => result,
            Err(payload) => {
                let text = panic_text(payload.as_ref());
                error!(operation, panic = %text, "engine call panicked");
                Err(UnexpectedEngineException::new(format!(
                    "unexpected panic in {}: {}",
                    operation, text
                ))
                .into())
            }
        };

        match result {
            Ok(value) => CallOutcome::Completed(value),
            Err(exception) => self.record(operation, &exception),
        }
    }

    /// Host view of the last call, given the code it returned.
    pub fn raise_serialized(&self, code: ErrorCode) -> Result<HostFailure, ProtocolError> {
        host::raise_serialized(self.buffer.as_bytes(), self.buffer.order(), code.as_i32())
    }

    fn record<T>(&mut self, operation: &str, exception: &SerializableException) -> CallOutcome<T> {
        let discriminant = exception.discriminant();

        match write_exception_region(exception, &mut self.buffer) {
            Ok(len) => {
                warn!(
                    operation,
                    discriminant = discriminant.as_str(),
                    reason = %exception.message(),
                    bytes = len,
                    "engine call failed"
                );
                CallOutcome::Failed(discriminant)
            }
            Err(e) => {
                error!(
                    operation,
                    discriminant = discriminant.as_str(),
                    error = %e,
                    "cannot serialize engine exception"
                );
                if let Err(reset) = reset_exception_region(&mut self.buffer) {
                    error!(operation, error = %reset, "cannot reset exception region");
                }
                CallOutcome::Fatal(e)
            }
        }
    }
}

fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
