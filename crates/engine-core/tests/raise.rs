// crates/engine-core/tests/raise.rs
use engine_core::raise::BoundedWriter;
use engine_core::{
    format_bounded, raise_unexpected, raise_unexpected_streamed, ExceptionDiscriminant,
    SerializableException, UnexpectedEngineException, FORMAT_BUFFER_SIZE,
    MAX_FORMATTED_MESSAGE_LEN,
};
use std::fmt::Write;

fn fails_formatted(plan: u32) -> Result<(), SerializableException> {
    raise_unexpected!("unknown plan fragment {} (of {})", plan, 3);
}

fn fails_with_long_message(len: usize) -> Result<(), SerializableException> {
    raise_unexpected!("row {}: {}", 42, "z".repeat(len));
}

fn fails_streamed() -> Result<(), SerializableException> {
    raise_unexpected_streamed!("bad plan id", 7);
}

#[test]
fn formatted_raise_renders_arguments() {
    let err = fails_formatted(9).unwrap_err();
    assert_eq!(err.discriminant(), ExceptionDiscriminant::UnexpectedEngine);
    assert_eq!(err.message(), "unknown plan fragment 9 (of 3)");
}

#[test]
fn formatted_raise_truncates_at_bound() {
    assert_eq!(FORMAT_BUFFER_SIZE, 8192);

    let long = "x".repeat(20_000);
    let first = format_bounded(format_args!("{}{}", long, "tail"));
    let second = format_bounded(format_args!("{}{}", long, "tail"));

    assert_eq!(first.len(), MAX_FORMATTED_MESSAGE_LEN);
    assert_eq!(first, second);
    assert!(long.starts_with(&first));
}

#[test]
fn formatted_raise_keeps_short_messages_whole() {
    let e = UnexpectedEngineException::formatted(format_args!("table {} missing", "T1"));
    assert_eq!(e.to_string(), "table T1 missing");
}

#[test]
fn truncation_respects_char_boundaries() {
    // 'é' is two bytes; 3 bytes of capacity fits only one of them.
    let mut w = BoundedWriter::with_capacity(3);
    w.write_str("éé").unwrap();
    w.write_str("a").unwrap();
    assert!(w.is_truncated());
    assert_eq!(w.into_string(), "é");
}

#[test]
fn truncation_at_exact_bound_is_not_truncated() {
    let exact = "y".repeat(MAX_FORMATTED_MESSAGE_LEN);
    let out = format_bounded(format_args!("{}", exact));
    assert_eq!(out, exact);
}

#[test]
fn streamed_helper_joins_values_and_appends_origin() {
    let e = UnexpectedEngineException::streamed(&[&"bad plan id", &7], "plan.cc:88");
    assert_eq!(e.to_string(), "bad plan id 7 plan.cc:88");
}

#[test]
fn streamed_macro_tags_the_raise_site() {
    let err = fails_streamed().unwrap_err();
    let msg = err.message();

    assert!(msg.starts_with("bad plan id 7 "), "got {:?}", msg);
    assert!(msg.contains("raise.rs:"), "got {:?}", msg);
    let line = msg.rsplit(':').next().unwrap();
    assert!(line.parse::<u32>().is_ok(), "got {:?}", msg);
}

#[test]
fn formatted_raise_site_truncates_overlong_messages() {
    let err = fails_with_long_message(3 * FORMAT_BUFFER_SIZE).unwrap_err();
    let msg = err.message();

    assert_eq!(err.discriminant(), ExceptionDiscriminant::UnexpectedEngine);
    assert_eq!(msg.len(), MAX_FORMATTED_MESSAGE_LEN);
    assert!(msg.starts_with("row 42: zzz"));
    assert_eq!(msg, fails_with_long_message(3 * FORMAT_BUFFER_SIZE).unwrap_err().message());
}

#[test]
fn huge_writer_capacity_only_holds_what_is_written() {
    let mut w = BoundedWriter::with_capacity(usize::MAX);
    w.write_str("abc").unwrap();
    assert!(!w.is_truncated());
    assert_eq!(w.into_string(), "abc");
}
