//! Bounded byte buffer used as the shared exception sink.

use engine_core::sink::text_length_prefix;
use engine_core::{ExceptionSink, SinkError};

use crate::wire_types::{WireByteOrder, DEFAULT_EXCEPTION_BUFFER_CAPACITY};

/// Append-only byte buffer with a hard capacity.
///
/// Writes that would exceed the capacity fail with
/// [`SinkError::Overflow`] and leave the buffer untouched. Capacity is
/// capped at `i32::MAX` so every region length fits its int32 header.
#[derive(Debug, Clone)]
pub struct ExceptionBuffer {
    bytes: Vec<u8>,
    capacity: usize,
    order: WireByteOrder,
}

impl ExceptionBuffer {
    pub fn new(capacity: usize, order: WireByteOrder) -> Self {
        ExceptionBuffer {
            bytes: Vec::new(),
            capacity: capacity.min(i32::MAX as usize),
            order,
        }
    }

    /// Buffer limited only by the int32 framing.
    pub fn unbounded(order: WireByteOrder) -> Self {
        ExceptionBuffer::new(usize::MAX, order)
    }

    pub fn order(&self) -> WireByteOrder {
        self.order
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Drop all content; capacity and byte order are kept.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Reserve an int32 slot (zeroed) and return its offset.
    pub fn reserve_i32(&mut self) -> Result<usize, SinkError> {
        let at = self.bytes.len();
        self.write_i32(0)?;
        Ok(at)
    }

    /// Overwrite a previously written int32 at `offset`.
    pub fn write_i32_at(&mut self, offset: usize, value: i32) -> Result<(), SinkError> {
        let end = offset.checked_add(4).filter(|end| *end <= self.bytes.len());
        match end {
            Some(end) => {
                self.bytes[offset..end].copy_from_slice(&self.order.encode_i32(value));
                Ok(())
            }
            None => Err(SinkError::Overflow {
                needed: 4,
                remaining: self.bytes.len().saturating_sub(offset),
            }),
        }
    }

    fn ensure(&self, needed: usize) -> Result<(), SinkError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(SinkError::Overflow { needed, remaining });
        }
        Ok(())
    }
}

impl Default for ExceptionBuffer {
    fn default() -> Self {
        ExceptionBuffer::new(DEFAULT_EXCEPTION_BUFFER_CAPACITY, WireByteOrder::default())
    }
}

impl ExceptionSink for ExceptionBuffer {
    fn write_i32(&mut self, value: i32) -> Result<(), SinkError> {
        self.ensure(4)?;
        self.bytes.extend_from_slice(&self.order.encode_i32(value));
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<(), SinkError> {
        let len = text_length_prefix(text)?;
        // Check the whole blob up front so a failed write leaves no partial prefix.
        self.ensure(4 + text.len())?;
        self.bytes.extend_from_slice(&self.order.encode_i32(len));
        self.bytes.extend_from_slice(text.as_bytes());
        Ok(())
    }

    fn position(&self) -> usize {
        self.bytes.len()
    }
}
