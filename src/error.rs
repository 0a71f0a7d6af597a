//
// Copyright 2020 GTO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std;
use std::fmt::{self, Display};

pub type Result<T> = std::result::Result<T, Error>;

/// A single source location a diagnostic is anchored to.
///
/// Binary input is located by byte offset from the start of the buffer;
/// text input is located by 1-based line and column.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Location {
    Offset(usize),
    LineCol(usize, usize),
    Unknown,
}

impl Display for Location {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Location::Offset(offset) => write!(formatter, "offset {}", offset),
            Location::LineCol(line, column) => write!(formatter, "line {}, column {}", line, column),
            Location::Unknown => formatter.write_str("unknown location"),
        }
    }
}

/// GTO codec error, carrying exactly one source location.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Error {
    /// Binary input's first four bytes match neither the little- nor big-endian magic.
    BadMagic,
    /// The header `version` field is not a version this codec understands.
    UnsupportedVersion { found: u32 },
    /// Input ended in the middle of a header or a payload.
    Truncated { location: Location },
    /// A property header's `kind` byte is outside the 0..=8 ordinal range.
    UnknownKind { ordinal: u8 },
    /// A string id referenced by a header or a string-kind payload is `>= pool.size()`.
    StringIdOutOfRange { id: u32, size: u32 },
    /// Text tokenization failed to recognize a character sequence.
    SyntaxError { location: Location },
    /// Text parsing encountered a token it did not expect.
    UnexpectedToken { location: Location, expected: Vec<String> },
    /// A text type keyword named something other than one of the nine primitive kinds.
    UnknownType { location: Location, name: String },
    /// A bracketed value's group size did not match the property's declared width.
    WidthMismatch { location: Location, width: u32, found: usize },
    /// A quoted string literal was not closed before end of input.
    UnterminatedString { location: Location },
    /// An incremental writer method was called outside the phase it is valid in.
    StateViolation { attempted: &'static str, state: &'static str },
    /// A value presented for half encoding overflows binary16 range and the
    /// overflow policy in effect is "report" rather than the default "saturate".
    OverflowHalf { value: f64 },
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::BadMagic =>
                formatter.write_str("input is not a GTO binary document (bad magic)"),
            Error::UnsupportedVersion { found } =>
                write!(formatter, "unsupported GTO version {} (expected {})", found, crate::document::CURRENT_VERSION),
            Error::Truncated { location } =>
                write!(formatter, "truncated input at {}", location),
            Error::UnknownKind { ordinal } =>
                write!(formatter, "unknown property data type ordinal {}", ordinal),
            Error::StringIdOutOfRange { id, size } =>
                write!(formatter, "string id {} out of range (pool has {} strings)", id, size),
            Error::SyntaxError { location } =>
                write!(formatter, "syntax error at {}", location),
            Error::UnexpectedToken { location, expected } =>
                write!(formatter, "unexpected token at {} (expected one of: {})", location, expected.join(", ")),
            Error::UnknownType { location, name } =>
                write!(formatter, "unknown type '{}' at {}", name, location),
            Error::WidthMismatch { location, width, found } =>
                write!(formatter, "value group of {} elements does not match declared width {} at {}", found, width, location),
            Error::UnterminatedString { location } =>
                write!(formatter, "unterminated string literal at {}", location),
            Error::StateViolation { attempted, state } =>
                write!(formatter, "cannot {} while writer is in state {}", attempted, state),
            Error::OverflowHalf { value } =>
                write!(formatter, "value {} overflows half-precision range", value),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// The single source location this error is anchored to, if any.
    pub fn location(&self) -> Location {
        match self {
            Error::Truncated { location }
            | Error::SyntaxError { location }
            | Error::UnexpectedToken { location, .. }
            | Error::UnknownType { location, .. }
            | Error::WidthMismatch { location, .. }
            | Error::UnterminatedString { location } => *location,
            _ => Location::Unknown,
        }
    }
}
