//! Binary encoding/decoding of serialized engine exceptions.
//!
//! Framing model:
//!
//! ```text
//! Exception region (shared buffer, as the host reads it)
//! ------------------------------------------------------
//! [0..4]  : region_length (int32), 0 = no exception details
//! [4..]   : serialized exception, region_length bytes
//!
//! Serialized exception
//! --------------------
//! [0..4]          : discriminant (int32, ExceptionDiscriminant ordinal)
//! [4..8]          : message_length (int32)
//! [8..8+len]      : message bytes (UTF-8)
//! [8+len..]       : kind-specific trailer (empty for every kind today)
//! ```
//!
//! All int32 fields use the buffer's [`WireByteOrder`].
//!
//! The decoder here is the reference the host side must agree with
//! byte-for-byte; it does not interpret trailers.

use engine_core::{
    ConstraintViolationException, ExceptionDiscriminant, InterruptedException, QueryException,
    SerializableException, SinkError, UnexpectedEngineException,
};
use thiserror::Error;

use crate::buffer::ExceptionBuffer;
use crate::wire_types::{
    WireByteOrder, DISCRIMINANT_WIDTH, LENGTH_PREFIX_WIDTH, MIN_EXCEPTION_LEN, REGION_HEADER_WIDTH,
};

/// Errors that can arise when decoding a serialized exception.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Buffer too short for the expected fields.
    #[error("buffer truncated")]
    Truncated,

    /// Discriminant ordinal outside the known set.
    #[error("unknown exception discriminant: {0}")]
    UnknownDiscriminant(i32),

    /// A payload tagged "none"; such a tag never describes a thrown exception.
    #[error("payload carries the 'none' discriminant")]
    NoException,

    #[error("negative length field: {0}")]
    NegativeLength(i32),

    #[error("message is not valid UTF-8")]
    InvalidUtf8,

    /// A length field claims more bytes than the buffer holds.
    #[error("declared length {declared} exceeds the {available} bytes available")]
    LengthMismatch { declared: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, ProtocolError>;

/// A decoded exception payload, trailer left opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedException {
    pub discriminant: ExceptionDiscriminant,
    pub message: String,
    pub trailer: Vec<u8>,
}

impl DecodedException {
    /// Rebuild the engine-side exception this payload was written from.
    ///
    /// The discriminant is kept as decoded; a `None` tag is refused
    /// rather than mapped onto another kind.
    pub fn into_exception(self) -> Result<SerializableException> {
        let exception: SerializableException = match self.discriminant {
            ExceptionDiscriminant::UnexpectedEngine => {
                UnexpectedEngineException::new(self.message).into()
            }
            ExceptionDiscriminant::Query => QueryException::new(self.message).into(),
            ExceptionDiscriminant::ConstraintViolation => {
                ConstraintViolationException::new(self.message).into()
            }
            ExceptionDiscriminant::Interrupted => InterruptedException::new(self.message).into(),
            ExceptionDiscriminant::None => return Err(ProtocolError::NoException),
        };
        Ok(exception)
    }
}

// ============================================================================
// ENCODE: engine side
// ============================================================================

/// Serialize `exception` into a fresh unbounded buffer and return its bytes.
pub fn encode_exception(
    exception: &SerializableException,
    order: WireByteOrder,
) -> std::result::Result<Vec<u8>, SinkError> {
    let mut buf = ExceptionBuffer::unbounded(order);
    exception.serialize(&mut buf)?;
    Ok(buf.into_bytes())
}

/// Clear `buf` and mark it as holding no exception.
pub fn reset_exception_region(buf: &mut ExceptionBuffer) -> std::result::Result<(), SinkError> {
    buf.clear();
    buf.reserve_i32().map(|_| ())
}

/// Write `exception` as a length-prefixed region at the start of `buf`.
///
/// Returns the region length (bytes after the header). On error the
/// buffer content is unspecified; callers reset it.
pub fn write_exception_region(
    exception: &SerializableException,
    buf: &mut ExceptionBuffer,
) -> std::result::Result<usize, SinkError> {
    buf.clear();
    let slot = buf.reserve_i32()?;
    let start = buf.len();

    exception.serialize(&mut *buf)?;

    let written = buf.len() - start;
    // ExceptionBuffer caps its capacity at i32::MAX, so this cannot truncate.
    buf.write_i32_at(slot, written as i32)?;
    Ok(written)
}

// ============================================================================
// DECODE: host side
// ============================================================================

/// Decode one serialized exception occupying all of `buf`.
pub fn decode_exception(buf: &[u8], order: WireByteOrder) -> Result<DecodedException> {
    if buf.len() < MIN_EXCEPTION_LEN {
        return Err(ProtocolError::Truncated);
    }

    let raw = read_i32(buf, 0, order)?;
    let discriminant = ExceptionDiscriminant::from_ordinal(raw)
        .ok_or(ProtocolError::UnknownDiscriminant(raw))?;
    if discriminant == ExceptionDiscriminant::None {
        return Err(ProtocolError::NoException);
    }

    let message_len = read_len(buf, DISCRIMINANT_WIDTH, order)?;
    let start = DISCRIMINANT_WIDTH + LENGTH_PREFIX_WIDTH;
    let available = buf.len() - start;
    if message_len > available {
        return Err(ProtocolError::LengthMismatch {
            declared: message_len,
            available,
        });
    }

    let end = start + message_len;
    let message = std::str::from_utf8(&buf[start..end])
        .map_err(|_| ProtocolError::InvalidUtf8)?
        .to_string();

    Ok(DecodedException {
        discriminant,
        message,
        trailer: buf[end..].to_vec(),
    })
}

/// Decode the exception region at the start of `buf`.
///
/// `Ok(None)` means the engine wrote no exception details.
pub fn read_exception_region(buf: &[u8], order: WireByteOrder) -> Result<Option<DecodedException>> {
    let region_len = read_len(buf, 0, order)?;
    if region_len == 0 {
        return Ok(None);
    }

    let available = buf.len() - REGION_HEADER_WIDTH;
    if region_len > available {
        return Err(ProtocolError::LengthMismatch {
            declared: region_len,
            available,
        });
    }

    let body = &buf[REGION_HEADER_WIDTH..REGION_HEADER_WIDTH + region_len];
    decode_exception(body, order).map(Some)
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn read_i32(buf: &[u8], offset: usize, order: WireByteOrder) -> Result<i32> {
    let bytes: [u8; 4] = buf
        .get(offset..offset + 4)
        .and_then(|s| s.try_into().ok())
        .ok_or(ProtocolError::Truncated)?;
    Ok(order.decode_i32(bytes))
}

fn read_len(buf: &[u8], offset: usize, order: WireByteOrder) -> Result<usize> {
    let raw = read_i32(buf, offset, order)?;
    usize::try_from(raw).map_err(|_| ProtocolError::NegativeLength(raw))
}
