// crates/engine-boundary/tests/config.rs
use std::collections::HashMap;

use engine_boundary::config::{ENV_EXCEPTION_BUFFER_BYTES, ENV_WIRE_BYTE_ORDER};
use engine_boundary::{BoundaryConfig, ConfigError, EngineBoundary};
use engine_core::SinkError;
use engine_protocol::WireByteOrder;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_environment_gives_defaults() {
    let config = BoundaryConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, BoundaryConfig::default());
    assert_eq!(config.exception_buffer_capacity, 5 * 1024 * 1024);
    assert_eq!(config.byte_order, WireByteOrder::Big);
}

#[test]
fn variables_override_defaults() {
    let config = BoundaryConfig::from_lookup(lookup(&[
        (ENV_EXCEPTION_BUFFER_BYTES, "4096"),
        (ENV_WIRE_BYTE_ORDER, "little"),
    ]))
    .unwrap();

    assert_eq!(config.exception_buffer_capacity, 4096);
    assert_eq!(config.byte_order, WireByteOrder::Little);
}

#[test]
fn bad_values_are_reported() {
    let err = BoundaryConfig::from_lookup(lookup(&[(ENV_EXCEPTION_BUFFER_BYTES, "lots")]))
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue { key, .. } if key == ENV_EXCEPTION_BUFFER_BYTES
    ));

    let err = BoundaryConfig::from_lookup(lookup(&[(ENV_WIRE_BYTE_ORDER, "middle")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn buffer_must_hold_region_header() {
    let err = BoundaryConfig::from_lookup(lookup(&[(ENV_EXCEPTION_BUFFER_BYTES, "3")]))
        .unwrap_err();
    assert_eq!(err, ConfigError::BufferTooSmall(3));

    let config = BoundaryConfig {
        exception_buffer_capacity: 2,
        byte_order: WireByteOrder::Big,
    };
    assert!(EngineBoundary::new(&config).is_err());
}

#[test]
fn smallest_buffer_starts_with_empty_region() {
    let config = BoundaryConfig {
        exception_buffer_capacity: 4,
        byte_order: WireByteOrder::Big,
    };
    let ee = EngineBoundary::new(&config).unwrap();
    assert_eq!(ee.exception_region(), &[0, 0, 0, 0]);
}

#[test]
fn sink_errors_surface_as_config_errors() {
    let err = ConfigError::from(SinkError::Overflow {
        needed: 4,
        remaining: 0,
    });
    assert!(matches!(err, ConfigError::Buffer(SinkError::Overflow { .. })));
    assert!(err.to_string().starts_with("exception buffer unusable"));
}
