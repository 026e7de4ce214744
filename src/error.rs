//! This module implements `DurationError`.

use alloc::borrow::Cow;

/// The category of a [`DurationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input string does not conform to the duration grammar.
    MalformedDuration,
    /// The grammar was well-formed, but a component value fell outside its
    /// allowed range.
    OutOfRange,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::MalformedDuration => "MalformedDuration",
            Self::OutOfRange => "OutOfRange",
        })
    }
}

/// The error type returned by every fallible operation in this crate.
///
/// Errors carry a kind and a message naming the offending character,
/// substring, or field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
}

impl DurationError {
    /// Creates a new `DurationError` with the provided kind.
    #[inline]
    #[must_use]
    const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
        }
    }

    /// Creates a grammar error.
    #[inline]
    #[must_use]
    pub const fn malformed() -> Self {
        Self::new(ErrorKind::MalformedDuration)
    }

    /// Creates a range error.
    #[inline]
    #[must_use]
    pub const fn out_of_range() -> Self {
        Self::new(ErrorKind::OutOfRange)
    }

    /// Creates an error for an internal invariant violation.
    ///
    /// Surfaced as a `MalformedDuration` rather than a panic so that a
    /// scanner bug on adversarial input stays a recoverable failure.
    #[inline]
    #[must_use]
    pub const fn assert() -> Self {
        Self {
            kind: ErrorKind::MalformedDuration,
            msg: Cow::Borrowed("internal parser invariant violated"),
        }
    }

    /// Attaches a message to this error.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<Cow<'static, str>>) -> Self {
        self.msg = msg.into();
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns this error's message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl core::fmt::Display for DurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.kind.fmt(f)?;
        if !self.msg.is_empty() {
            f.write_str(": ")?;
            f.write_str(&self.msg)?;
        }
        Ok(())
    }
}

impl core::error::Error for DurationError {}
