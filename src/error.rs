//! Error types

use crate::binary::read::ReadEof;
use std::fmt;

/// Errors that originate when parsing binary data
///
/// Parsing is fail-fast: the first error encountered aborts the read of the enclosing
/// structure, and for a `kerx` table the whole table is rejected.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ParseError {
    /// A read or resolved range extends past the end of the available data.
    BadEof,
    /// A value is outside the set of values the format permits.
    BadValue,
    /// A table header carries a version that is not supported.
    BadVersion,
    /// An offset does not point inside the data it is relative to.
    BadOffset,
    /// An index is past the end of an array.
    BadIndex,
    /// A declared length or count does not fit in the space its structure occupies.
    BadLength,
    /// A size computation overflowed.
    LimitExceeded,
}

impl From<ReadEof> for ParseError {
    fn from(_error: ReadEof) -> Self {
        ParseError::BadEof
    }
}

impl From<std::num::TryFromIntError> for ParseError {
    fn from(_error: std::num::TryFromIntError) -> Self {
        ParseError::BadValue
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::BadEof => write!(f, "end of data reached unexpectedly"),
            ParseError::BadValue => write!(f, "invalid value"),
            ParseError::BadVersion => write!(f, "unexpected data version"),
            ParseError::BadOffset => write!(f, "invalid data offset"),
            ParseError::BadIndex => write!(f, "invalid data index"),
            ParseError::BadLength => write!(f, "declared length is inconsistent with data"),
            ParseError::LimitExceeded => write!(f, "limit exceeded"),
        }
    }
}

impl std::error::Error for ParseError {}
