//! URI parse errors.

use core::fmt;
use std::error;

/// What went wrong while parsing.
///
/// Each kind corresponds to one grammar production failing; the parser stops
/// at the first error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum UriErrorKind {
    /// The scheme is missing or does not begin with `ALPHA`.
    SchemeStart,
    /// A `:` (or the second `:` of an IPv6 `::`) was expected.
    ExpectedColon,
    /// At least one `HEXDIG` was expected.
    ExpectedHexDigit,
    /// A `.` separating IPv4 octets was expected.
    ExpectedDot,
    /// The path following an authority neither is empty nor starts with `/`.
    PathAfterAuthority,
    /// A bracketed IP literal is malformed or unterminated.
    InvalidIpLiteral,
    /// The port is not a decimal number in `0..=65535`.
    InvalidPort,
    /// An IPv4 octet is out of range, empty, or has a leading zero.
    InvalidIpv4Octet,
    /// A `%` is not followed by two `HEXDIG`s.
    InvalidPctEncoding,
    /// A character outside the component's class (or trailing input).
    UnexpectedChar,
}

impl UriErrorKind {
    /// Returns the human-readable message for this kind.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::SchemeStart => "scheme must start with a letter",
            Self::ExpectedColon => "expected colon",
            Self::ExpectedHexDigit => "expected hex digit",
            Self::ExpectedDot => "expected '.'",
            Self::PathAfterAuthority => "path after authority must be empty or start with '/'",
            Self::InvalidIpLiteral => "invalid IP literal",
            Self::InvalidPort => "invalid port",
            Self::InvalidIpv4Octet => "invalid IPv4 octet",
            Self::InvalidPctEncoding => "invalid percent-encoding",
            Self::UnexpectedChar => "unexpected character",
        }
    }
}

/// Error on parsing a URI / IRI string.
///
/// Carries the offending input and the byte offset at which the parser
/// stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriError {
    /// Error kind.
    kind: UriErrorKind,
    /// The input that failed to parse.
    input: String,
    /// Byte offset at which the parser stopped.
    offset: usize,
}

impl UriError {
    /// Creates a new error.
    #[inline]
    #[must_use]
    pub(crate) fn new(kind: UriErrorKind, input: &str, offset: usize) -> Self {
        Self {
            kind,
            input: input.into(),
            offset,
        }
    }

    /// Returns the error kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> UriErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }

    /// Returns the input that failed to parse.
    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the byte offset at which the parser stopped.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for UriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at offset {} in {:?}",
            self.kind.message(),
            self.offset,
            self.input
        )
    }
}

impl error::Error for UriError {}
