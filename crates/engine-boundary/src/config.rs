//! Configuration for the engine call boundary.
//!
//! You can either use defaults or override via environment variables:
//!
//! - `ENGINE_EXCEPTION_BUFFER_BYTES` (default: 5242880)
//! - `ENGINE_WIRE_BYTE_ORDER`        (default: "big", or "little")

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use engine_core::SinkError;
use engine_protocol::wire_types::{DEFAULT_EXCEPTION_BUFFER_CAPACITY, REGION_HEADER_WIDTH};
use engine_protocol::WireByteOrder;
use thiserror::Error;

pub const ENV_EXCEPTION_BUFFER_BYTES: &str = "ENGINE_EXCEPTION_BUFFER_BYTES";
pub const ENV_WIRE_BYTE_ORDER: &str = "ENGINE_WIRE_BYTE_ORDER";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// Not even room for the region header.
    #[error("exception buffer of {0} bytes is too small (minimum 4)")]
    BufferTooSmall(usize),

    /// The exception buffer could not be prepared for the first call.
    #[error("exception buffer unusable: {0}")]
    Buffer(#[from] SinkError),
}

/// Boundary configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryConfig {
    /// Capacity of the shared exception buffer, in bytes.
    pub exception_buffer_capacity: usize,

    /// Byte order shared with the host decoder.
    pub byte_order: WireByteOrder,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        BoundaryConfig {
            exception_buffer_capacity: DEFAULT_EXCEPTION_BUFFER_CAPACITY,
            byte_order: WireByteOrder::default(),
        }
    }
}

impl BoundaryConfig {
    /// Construct a `BoundaryConfig` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = BoundaryConfig::default();
        let exception_buffer_capacity = read_or_default(
            &lookup,
            ENV_EXCEPTION_BUFFER_BYTES,
            defaults.exception_buffer_capacity,
        )?;
        let byte_order = read_or_default(&lookup, ENV_WIRE_BYTE_ORDER, defaults.byte_order)?;

        let config = BoundaryConfig {
            exception_buffer_capacity,
            byte_order,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exception_buffer_capacity < REGION_HEADER_WIDTH {
            return Err(ConfigError::BufferTooSmall(self.exception_buffer_capacity));
        }
        Ok(())
    }
}

fn read_or_default<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(val) => val.parse::<T>().map_err(|e| ConfigError::InvalidValue {
            key,
            value: val.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
