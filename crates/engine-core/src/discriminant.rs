//! Exception discriminant (which concrete exception kind a payload encodes).
//!
//! The ordinal is part of the wire format shared with the host decoder:
//! ```text
//! 0 = none
//! 1 = unexpected engine exception
//! 2 = query execution exception
//! 3 = constraint violation
//! 4 = interrupted
//! ```
//! Never renumber these.

/// Identity tag of a serialized exception.
///
/// Deliberately not `Ord`: this is a tag, not a severity.
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ExceptionDiscriminant {
    /// No exception pending. Only meaningful on the decoding side.
    None = 0,

    /// Generic / unexpected engine failure.
    UnexpectedEngine = 1,

    /// Query (SQL) execution failure.
    Query = 2,

    /// Constraint violation.
    ConstraintViolation = 3,

    /// Cooperative interruption of the running operation.
    Interrupted = 4,
}

impl ExceptionDiscriminant {
    /// Wire ordinal of this discriminant.
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    pub fn from_ordinal(v: i32) -> Option<Self> {
        match v {
            0 => Some(ExceptionDiscriminant::None),
            1 => Some(ExceptionDiscriminant::UnexpectedEngine),
            2 => Some(ExceptionDiscriminant::Query),
            3 => Some(ExceptionDiscriminant::ConstraintViolation),
            4 => Some(ExceptionDiscriminant::Interrupted),
            _ => None,
        }
    }

    /// Short label, handy in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ExceptionDiscriminant::None => "none",
            ExceptionDiscriminant::UnexpectedEngine => "unexpected",
            ExceptionDiscriminant::Query => "query",
            ExceptionDiscriminant::ConstraintViolation => "constraint_violation",
            ExceptionDiscriminant::Interrupted => "interrupted",
        }
    }
}

impl TryFrom<i32> for ExceptionDiscriminant {
    type Error = i32;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        ExceptionDiscriminant::from_ordinal(v).ok_or(v)
    }
}

impl From<ExceptionDiscriminant> for i32 {
    fn from(d: ExceptionDiscriminant) -> i32 {
        d.ordinal()
    }
}
