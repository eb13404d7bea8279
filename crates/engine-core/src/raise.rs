//! Raise-site helpers for unexpected engine failures.
//!
//! Two flavours:
//! - formatted: `format!`-style arguments rendered into a fixed-size
//!   buffer ([`FORMAT_BUFFER_SIZE`]). Output that does not fit is cut
//!   off. This is a known limitation of the bounded buffer, not an error.
//! - streamed: a list of displayable values joined by single spaces and
//!   suffixed with the `file:line` of the raise site.
//!
//! The [`raise_unexpected!`](crate::raise_unexpected) and
//! [`raise_unexpected_streamed!`](crate::raise_unexpected_streamed) macros
//! return early from the enclosing function with the built exception.

use std::fmt::{self, Write};

use crate::exception::UnexpectedEngineException;

/// Size of the formatting buffer, terminator slot included.
pub const FORMAT_BUFFER_SIZE: usize = 8192;

/// Longest message the formatted raise can produce, in bytes.
pub const MAX_FORMATTED_MESSAGE_LEN: usize = FORMAT_BUFFER_SIZE - 1;

/// `fmt::Write` over a fixed-capacity string.
///
/// Once a write does not fit, the longest prefix that ends on a char
/// boundary is kept and every later write is dropped, so the result is
/// always a prefix of the untruncated rendering. Memory grows with what
/// is written, not with `capacity`.
#[derive(Debug)]
pub struct BoundedWriter {
    buf: String,
    capacity: usize,
    truncated: bool,
}

impl BoundedWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        BoundedWriter {
            buf: String::new(),
            capacity,
            truncated: false,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl Write for BoundedWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }

        let remaining = self.capacity - self.buf.len();
        if s.len() <= remaining {
            self.buf.push_str(s);
            return Ok(());
        }

        let mut cut = remaining;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.buf.push_str(&s[..cut]);
        self.truncated = true;
        Ok(())
    }
}

/// Render `args` into at most [`MAX_FORMATTED_MESSAGE_LEN`] bytes.
pub fn format_bounded(args: fmt::Arguments<'_>) -> String {
    let mut writer = BoundedWriter::with_capacity(MAX_FORMATTED_MESSAGE_LEN);
    // BoundedWriter never fails; a Display impl that errors just ends the text early.
    let _ = writer.write_fmt(args);
    writer.into_string()
}

/// Join `values` with single spaces, then append `" " + origin`.
pub fn format_streamed(values: &[&dyn fmt::Display], origin: &str) -> String {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{}", value);
    }
    out.push(' ');
    out.push_str(origin);
    out
}

impl UnexpectedEngineException {
    /// Formatted raise: bounded rendering of `args`.
    pub fn formatted(args: fmt::Arguments<'_>) -> Self {
        UnexpectedEngineException::new(format_bounded(args))
    }

    /// Streamed raise: space-joined `values` plus the origin tag.
    pub fn streamed(values: &[&dyn fmt::Display], origin: &str) -> Self {
        UnexpectedEngineException::new(format_streamed(values, origin))
    }
}

/// Return early with an [`UnexpectedEngineException`] built from
/// `format!`-style arguments (bounded, see [`format_bounded`]).
///
/// The enclosing function's error type must implement
/// `From<UnexpectedEngineException>`.
#[macro_export]
macro_rules! raise_unexpected {
    ($($arg:tt)+) => {
        return ::core::result::Result::Err(::core::convert::Into::into(
            $crate::UnexpectedEngineException::formatted(::core::format_args!($($arg)+)),
        ))
    };
}

/// Return early with an [`UnexpectedEngineException`] whose message is
/// the given values joined by spaces, followed by `file:line`.
#[macro_export]
macro_rules! raise_unexpected_streamed {
    ($($value:expr),+ $(,)?) => {
        return ::core::result::Result::Err(::core::convert::Into::into(
            $crate::UnexpectedEngineException::streamed(
                &[$(&$value as &dyn ::core::fmt::Display),+],
                ::core::concat!(::core::file!(), ":", ::core::line!()),
            ),
        ))
    };
}
