//! Low-level wire types and constants.
//!
//! This module defines:
//! - Field widths of the exception framing.
//! - The byte order both sides of the boundary agree on.
//! - Default sizing of the shared exception buffer.
//!
//! The actual encode/decode logic lives in `exception_codec`.

use std::fmt;
use std::str::FromStr;

/// Width of the discriminant field.
pub const DISCRIMINANT_WIDTH: usize = 4;

/// Width of the length prefix in front of the message bytes.
pub const LENGTH_PREFIX_WIDTH: usize = 4;

/// Width of the region length written ahead of a serialized exception.
pub const REGION_HEADER_WIDTH: usize = 4;

/// Smallest well-formed payload: discriminant + empty message.
pub const MIN_EXCEPTION_LEN: usize = DISCRIMINANT_WIDTH + LENGTH_PREFIX_WIDTH;

/// Default capacity of the shared exception buffer (5 MiB).
pub const DEFAULT_EXCEPTION_BUFFER_CAPACITY: usize = 5 * 1024 * 1024;

/// Byte order of every int32 on the wire.
///
/// The host reads the buffer in big-endian unless told otherwise.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum WireByteOrder {
    #[default]
    Big,
    Little,
}

impl WireByteOrder {
    pub fn encode_i32(self, v: i32) -> [u8; 4] {
        match self {
            WireByteOrder::Big => v.to_be_bytes(),
            WireByteOrder::Little => v.to_le_bytes(),
        }
    }

    pub fn decode_i32(self, bytes: [u8; 4]) -> i32 {
        match self {
            WireByteOrder::Big => i32::from_be_bytes(bytes),
            WireByteOrder::Little => i32::from_le_bytes(bytes),
        }
    }
}

/// Unrecognised byte order name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown byte order {0:?} (expected \"big\" or \"little\")")]
pub struct ParseByteOrderError(pub String);

impl FromStr for WireByteOrder {
    type Err = ParseByteOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "big" | "be" => Ok(WireByteOrder::Big),
            "little" | "le" => Ok(WireByteOrder::Little),
            _ => Err(ParseByteOrderError(s.to_string())),
        }
    }
}

impl fmt::Display for WireByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireByteOrder::Big => f.write_str("big"),
            WireByteOrder::Little => f.write_str("little"),
        }
    }
}
