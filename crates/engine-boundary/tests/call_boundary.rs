// crates/engine-boundary/tests/call_boundary.rs
use engine_boundary::{logging, BoundaryConfig, CallOutcome, EngineBoundary, ErrorCode, HostFailure};
use engine_core::{
    raise_unexpected, raise_unexpected_streamed, ConstraintViolationException, ExceptionContext,
    ExceptionDiscriminant, InterruptedException, SerializableException, SinkError,
    UnexpectedEngineException,
};
use engine_protocol::WireByteOrder;
use pretty_assertions::assert_eq;

fn boundary() -> EngineBoundary {
    logging::init();
    EngineBoundary::new(&BoundaryConfig::default()).unwrap()
}

fn divide(a: i64, b: i64) -> Result<i64, SerializableException> {
    if b == 0 {
        raise_unexpected!("divide by zero");
    }
    Ok(a / b)
}

#[test]
fn successful_call_leaves_region_unused() {
    let mut ee = boundary();

    let outcome = ee.invoke("divide", || divide(84, 2));

    assert_eq!(outcome.error_code(), ErrorCode::Success);
    assert_eq!(outcome.into_value(), Some(42));
    assert_eq!(ee.exception_region(), &[0, 0, 0, 0]);
}

#[test]
fn failed_call_serializes_the_exception_with_context() {
    let mut ee = boundary();

    let outcome = ee.invoke("scan", || divide(1, 0).exception_context(" at row 42"));

    assert_eq!(outcome.error_code(), ErrorCode::Error);
    assert!(matches!(
        outcome,
        CallOutcome::Failed(ExceptionDiscriminant::UnexpectedEngine)
    ));

    let e = match ee.raise_serialized(ErrorCode::Error).unwrap() {
        HostFailure::Serialized(e) => e,
        other => panic!("expected a serialized exception, got {:?}", other),
    };
    assert_eq!(e.discriminant(), ExceptionDiscriminant::UnexpectedEngine);
    assert_eq!(e.message(), "divide by zero at row 42");
}

#[test]
fn every_kind_is_caught_through_the_sum_type() {
    let mut ee = boundary();
    let kinds: Vec<SerializableException> = vec![
        ConstraintViolationException::new("unique key violated").into(),
        InterruptedException::new("cancelled by host").into(),
    ];

    for kind in kinds {
        let expected = kind.clone();
        let outcome = ee.invoke("step", move || -> Result<(), SerializableException> { Err(kind) });
        assert!(matches!(outcome, CallOutcome::Failed(d) if d == expected.discriminant()));
        assert_eq!(
            ee.raise_serialized(ErrorCode::Error).unwrap(),
            HostFailure::Serialized(expected)
        );
    }
}

#[test]
fn region_is_reset_between_calls() {
    let mut ee = boundary();

    let _ = ee.invoke("first", || divide(1, 0));
    assert_ne!(ee.exception_region(), &[0, 0, 0, 0]);

    let outcome = ee.invoke("second", || divide(4, 2));
    assert!(outcome.is_completed());
    assert_eq!(
        ee.raise_serialized(ErrorCode::Error).unwrap(),
        HostFailure::Unspecified { error_code: 1 }
    );
}

#[test]
fn panic_becomes_unexpected_engine_exception() {
    let mut ee = boundary();

    let outcome: CallOutcome<()> = ee.invoke("explode", || panic!("index out of range"));
    assert!(matches!(
        outcome,
        CallOutcome::Failed(ExceptionDiscriminant::UnexpectedEngine)
    ));

    let HostFailure::Serialized(e) = ee.raise_serialized(ErrorCode::Error).unwrap() else {
        panic!("expected a serialized exception");
    };
    assert_eq!(e.message(), "unexpected panic in explode: index out of range");
}

#[test]
fn sink_overflow_is_fatal_and_leaves_region_empty() {
    logging::init();
    let config = BoundaryConfig {
        exception_buffer_capacity: 16,
        byte_order: WireByteOrder::Big,
    };
    let mut ee = EngineBoundary::new(&config).unwrap();

    let outcome = ee.invoke("huge", || -> Result<(), SerializableException> {
        Err(UnexpectedEngineException::new("x".repeat(64)).into())
    });

    assert_eq!(outcome.error_code(), ErrorCode::Error);
    assert!(matches!(outcome, CallOutcome::Fatal(SinkError::Overflow { .. })));
    assert_eq!(ee.exception_region(), &[0, 0, 0, 0]);
    assert_eq!(
        ee.raise_serialized(ErrorCode::Error).unwrap(),
        HostFailure::Unspecified { error_code: 1 }
    );
}

#[test]
fn little_endian_boundary_round_trips() {
    logging::init();
    let config = BoundaryConfig {
        exception_buffer_capacity: 1024,
        byte_order: WireByteOrder::Little,
    };
    let mut ee = EngineBoundary::new(&config).unwrap();

    let _ = ee.invoke("plan", || -> Result<(), SerializableException> {
        raise_unexpected_streamed!("bad plan id", 7);
    });

    assert_eq!(&ee.exception_region()[4..8], &[1, 0, 0, 0]);
    let HostFailure::Serialized(e) = ee.raise_serialized(ErrorCode::Error).unwrap() else {
        panic!("expected a serialized exception");
    };
    assert!(e.message().starts_with("bad plan id 7 "));
    assert!(e.message().contains("call_boundary.rs:"));
}

#[test]
fn error_codes_match_host_values() {
    assert_eq!(ErrorCode::Success.as_i32(), 0);
    assert_eq!(ErrorCode::Error.as_i32(), 1);
    assert_eq!(ErrorCode::from_i32(1), Some(ErrorCode::Error));
    assert_eq!(ErrorCode::from_i32(7), None);
}
