//! engine-protocol
//!
//! Wire-level encoding/decoding of engine exceptions.
//!
//! This crate is responsible for turning `engine_core::SerializableException`
//! values into the bytes the host reads from the shared exception buffer,
//! and back again.
//!
//! - [`buffer`]          : bounded byte sink handed to the engine
//! - [`exception_codec`] : exception framing, region framing, reference decoder

pub mod wire_types;
pub mod buffer;
pub mod exception_codec;

pub use buffer::ExceptionBuffer;
pub use wire_types::WireByteOrder;

pub use exception_codec::{
    DecodedException,
    ProtocolError,
    decode_exception,
    encode_exception,
    read_exception_region,
    reset_exception_region,
    write_exception_region,
};
