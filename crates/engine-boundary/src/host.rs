//! Host-side reconstruction of a failed engine call.

use engine_protocol::{read_exception_region, ProtocolError, WireByteOrder};

use crate::types::HostFailure;

/// Turn the exception region plus the call's error code into a failure.
///
/// An empty region yields [`HostFailure::Unspecified`] carrying the code;
/// the code's value only matters in that case.
pub fn raise_serialized(
    region: &[u8],
    order: WireByteOrder,
    error_code: i32,
) -> Result<HostFailure, ProtocolError> {
    match read_exception_region(region, order)? {
        None => Ok(HostFailure::Unspecified { error_code }),
        Some(decoded) => Ok(HostFailure::Serialized(decoded.into_exception()?)),
    }
}
