//! The `duration_isoformat` crate parses and formats [ISO 8601 duration
//! strings][iso8601] for [`core::time::Duration`].
//!
//! ```rust
//! use core::time::Duration;
//!
//! let elapsed = duration_isoformat::parse("P56DT14H").unwrap();
//! assert_eq!(elapsed, Duration::from_secs(56 * 86_400 + 14 * 3_600));
//! assert_eq!(duration_isoformat::format(elapsed), "P56DT14H");
//! ```
//!
//! The designator grammar (`P1DT2H30M`, `P3W`) and the colon-segmented time
//! grammar (`PT04:05:06.5`) are both accepted on input; output is always the
//! shortest canonical designator form. Negative durations are not
//! representable, which matches `core::time::Duration` exactly.
//!
//! Component magnitudes are interpreted as `f64`. This is a deliberate
//! portability trade-off: extremely large components lose precision to
//! floating-point rounding rather than failing.
//!
//! [iso8601]: https://en.wikipedia.org/wiki/ISO_8601#Durations
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

extern crate alloc;
extern crate core;

pub mod error;
pub mod parsers;
pub mod primitive;

mod duration;

use alloc::string::String;
use core::str::FromStr;

#[doc(inline)]
pub use error::{DurationError, ErrorKind};

#[doc(inline)]
pub use duration::DurationComponents;

/// The `duration_isoformat` result type.
pub type DurationResult<T> = Result<T, DurationError>;

#[doc(hidden)]
#[macro_export]
macro_rules! duration_assert {
    ($condition:expr $(,)*) => {
        if !$condition {
            return Err($crate::DurationError::assert());
        }
    };
    ($condition:expr, $($args:tt)+) => {
        if !$condition {
            #[cfg(feature = "log")]
            log::error!($($args)+);
            return Err($crate::DurationError::assert());
        }
    };
}

/// Parses an ISO 8601 duration string into a [`core::time::Duration`].
///
/// Accepts the designator grammar and the colon-segmented time grammar.
/// Calendar-relative units fold into seconds with fixed approximations of
/// 365.2425-day years and 30.4369-day months.
///
/// # Errors
///
/// Returns a [`DurationError`] of kind [`ErrorKind::MalformedDuration`] when
/// the input does not conform to either grammar, and of kind
/// [`ErrorKind::OutOfRange`] when a colon-segmented field exceeds its
/// positional bound.
pub fn parse(text: &str) -> DurationResult<core::time::Duration> {
    DurationComponents::from_str(text)?.to_duration()
}

/// Formats a [`core::time::Duration`] as its canonical ISO 8601 string.
///
/// The output omits zero-valued components and uses the designator grammar
/// only; the zero duration formats as `"P0D"`.
pub fn format(duration: core::time::Duration) -> String {
    use writeable::Writeable;
    DurationComponents::from_duration(duration)
        .write_to_string()
        .into_owned()
}
