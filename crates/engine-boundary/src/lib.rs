//! engine-boundary
//!
//! The engine's outermost call wrapper: runs engine operations, turns
//! their failures into bytes in the shared exception buffer, and lets
//! the host side rebuild them.

pub mod boundary;
pub mod config;
pub mod host;
pub mod logging;
pub mod types;

pub use boundary::EngineBoundary;
pub use config::{BoundaryConfig, ConfigError};
pub use types::{CallOutcome, ErrorCode, HostFailure};
