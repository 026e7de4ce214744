//! This module implements `DurationComponents` along with its conversions.

use crate::parsers::{DurationParseRecord, IsoDurationScanner, SegmentedTime, TimeRecord, Unit};
use crate::primitive::NonNegativeF64;
use crate::{duration_assert, DurationError, DurationResult};
use alloc::borrow::Cow;
use alloc::format;
use core_maths::CoreFloat;
use core::str::FromStr;
use core::time::Duration;
use writeable::{impl_display_with_writeable, LengthHint, Writeable};


const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_WEEK: f64 = 7.0 * SECONDS_PER_DAY;
/// Gregorian mean year of 365.2425 days. Years have no fixed length; this
/// approximation is part of the crate's contract.
const SECONDS_PER_YEAR: f64 = 365.2425 * SECONDS_PER_DAY;
/// Mean month of 30.4369 days, fixed for the same reason as [`SECONDS_PER_YEAR`].
const SECONDS_PER_MONTH: f64 = 30.4369 * SECONDS_PER_DAY;

/// The exclusive upper bound of the positional minutes and seconds fields in
/// the colon-segmented grammar.
const SEGMENTED_FIELD_LIMIT: f64 = 60.0;

/// The smallest `f64` above every representable total: `u64::MAX` seconds
/// rounds up to exactly 2^64.
const MAX_FOLD_SECONDS: f64 = u64::MAX as f64;

/// The structured components of one ISO 8601 duration.
///
/// Every field is non-negative; a `DurationComponents` is immutable after
/// construction. Values fold into a [`core::time::Duration`] with
/// [`to_duration`][Self::to_duration] and are recovered from one with
/// [`from_duration`][Self::from_duration].
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct DurationComponents {
    years: NonNegativeF64,
    months: NonNegativeF64,
    weeks: NonNegativeF64,
    days: NonNegativeF64,
    hours: NonNegativeF64,
    minutes: NonNegativeF64,
    seconds: NonNegativeF64,
}

// ==== Creation methods ====

impl DurationComponents {
    /// Creates a new `DurationComponents` without validating any field.
    ///
    /// This is the explicit opt-out of the defensive checks performed by
    /// [`new`][Self::new]: when a value is negative or non-finite the
    /// resulting components fold and format to unspecified results rather
    /// than a guaranteed error.
    #[inline]
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new_unchecked(
        years: f64,
        months: f64,
        weeks: f64,
        days: f64,
        hours: f64,
        minutes: f64,
        seconds: f64,
    ) -> Self {
        Self {
            years: NonNegativeF64(years),
            months: NonNegativeF64(months),
            weeks: NonNegativeF64(weeks),
            days: NonNegativeF64(days),
            hours: NonNegativeF64(hours),
            minutes: NonNegativeF64(minutes),
            seconds: NonNegativeF64(seconds),
        }
    }

    /// Creates a new validated `DurationComponents`.
    ///
    /// # Errors
    ///
    /// `OutOfRange` when any field is negative or non-finite;
    /// `MalformedDuration` when a non-zero `weeks` is combined with any other
    /// non-zero field (the week form is an alternative to every other
    /// measurement, so the combination has no parseable canonical string).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        years: f64,
        months: f64,
        weeks: f64,
        days: f64,
        hours: f64,
        minutes: f64,
        seconds: f64,
    ) -> DurationResult<Self> {
        let components = Self {
            years: NonNegativeF64::try_from(years)?,
            months: NonNegativeF64::try_from(months)?,
            weeks: NonNegativeF64::try_from(weeks)?,
            days: NonNegativeF64::try_from(days)?,
            hours: NonNegativeF64::try_from(hours)?,
            minutes: NonNegativeF64::try_from(minutes)?,
            seconds: NonNegativeF64::try_from(seconds)?,
        };
        let others_zero = components.years.is_zero()
            && components.months.is_zero()
            && components.days.is_zero()
            && components.hours.is_zero()
            && components.minutes.is_zero()
            && components.seconds.is_zero();
        if !components.weeks.is_zero() && !others_zero {
            return Err(
                DurationError::malformed().with_message("cannot mix weeks with other units")
            );
        }
        Ok(components)
    }

    /// Builds components from a scanned parse record, interpreting each raw
    /// numeric span and enforcing the positional range limits of the
    /// colon-segmented grammar.
    pub(crate) fn from_parse_record(record: &DurationParseRecord<'_>) -> DurationResult<Self> {
        let mut fields = [0.0_f64; 7];
        for measure in &record.date {
            fields[field_index(measure.unit)] = parse_decimal(measure.text)?;
        }
        match &record.time {
            Some(TimeRecord::Designators(measures)) => {
                for measure in measures {
                    fields[field_index(measure.unit)] = parse_decimal(measure.text)?;
                }
            }
            Some(TimeRecord::Segmented(segment)) => {
                let (hours, minutes, seconds) = convert_segmented_time(segment)?;
                fields[field_index(Unit::Hours)] = hours;
                fields[field_index(Unit::Minutes)] = minutes;
                fields[field_index(Unit::Seconds)] = seconds;
            }
            None => {}
        }
        let [years, months, weeks, days, hours, minutes, seconds] = fields;
        Self::new(years, months, weeks, days, hours, minutes, seconds)
    }

    /// Decomposes a [`core::time::Duration`] into canonical components,
    /// greedily from days down to seconds. Sub-second nanoseconds become the
    /// fractional part of the seconds field.
    #[must_use]
    pub fn from_duration(duration: Duration) -> Self {
        let total = duration.as_secs();
        let days = total / 86_400;
        let mut remainder = total % 86_400;
        let hours = remainder / 3_600;
        remainder %= 3_600;
        let minutes = remainder / 60;
        // Whole seconds stay below 2^53 after the day split, so the casts
        // here are exact.
        let seconds = (remainder % 60) as f64 + f64::from(duration.subsec_nanos()) * 1e-9;
        Self::new_unchecked(
            0.0,
            0.0,
            0.0,
            days as f64,
            hours as f64,
            minutes as f64,
            seconds,
        )
    }
}

// ==== Getters ====

impl DurationComponents {
    /// Returns the `years` field.
    #[inline]
    #[must_use]
    pub const fn years(&self) -> NonNegativeF64 {
        self.years
    }

    /// Returns the `months` field.
    #[inline]
    #[must_use]
    pub const fn months(&self) -> NonNegativeF64 {
        self.months
    }

    /// Returns the `weeks` field.
    #[inline]
    #[must_use]
    pub const fn weeks(&self) -> NonNegativeF64 {
        self.weeks
    }

    /// Returns the `days` field.
    #[inline]
    #[must_use]
    pub const fn days(&self) -> NonNegativeF64 {
        self.days
    }

    /// Returns the `hours` field.
    #[inline]
    #[must_use]
    pub const fn hours(&self) -> NonNegativeF64 {
        self.hours
    }

    /// Returns the `minutes` field.
    #[inline]
    #[must_use]
    pub const fn minutes(&self) -> NonNegativeF64 {
        self.minutes
    }

    /// Returns the `seconds` field.
    #[inline]
    #[must_use]
    pub const fn seconds(&self) -> NonNegativeF64 {
        self.seconds
    }

    /// Returns whether every field is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.fields().iter().all(NonNegativeF64::is_zero)
    }

    #[inline]
    fn fields(&self) -> [NonNegativeF64; 7] {
        [
            self.years,
            self.months,
            self.weeks,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
        ]
    }
}

// ==== Conversion to the host duration type ====

impl DurationComponents {
    /// Folds all components into a single [`core::time::Duration`].
    ///
    /// Weeks, days, hours, minutes, and seconds convert exactly; years and
    /// months use the fixed 365.2425-day and 30.4369-day approximations.
    ///
    /// # Errors
    ///
    /// `OutOfRange` when the total seconds overflow the representable range
    /// of `Duration`. The canonical components of [`Duration::MAX`] itself
    /// fold one rounding step past that range; that single step saturates to
    /// `Duration::MAX` instead.
    pub fn to_duration(&self) -> DurationResult<Duration> {
        let total = self.minutes.checked_mul_add(SECONDS_PER_MINUTE, self.seconds)?;
        let total = self.hours.checked_mul_add(SECONDS_PER_HOUR, total)?;
        let total = self.days.checked_mul_add(SECONDS_PER_DAY, total)?;
        let total = self.weeks.checked_mul_add(SECONDS_PER_WEEK, total)?;
        let total = self.months.checked_mul_add(SECONDS_PER_MONTH, total)?;
        let total = self.years.checked_mul_add(SECONDS_PER_YEAR, total)?;
        let total = total.as_inner();
        match Duration::try_from_secs_f64(total) {
            Ok(duration) => Ok(duration),
            Err(_) if (0.0..=MAX_FOLD_SECONDS).contains(&total) => Ok(Duration::MAX),
            Err(_) => Err(DurationError::out_of_range()
                .with_message("total seconds exceed the representable duration range")),
        }
    }
}

fn field_index(unit: Unit) -> usize {
    match unit {
        Unit::Years => 0,
        Unit::Months => 1,
        Unit::Weeks => 2,
        Unit::Days => 3,
        Unit::Hours => 4,
        Unit::Minutes => 5,
        Unit::Seconds => 6,
    }
}

/// Interprets one scanned numeric span as an `f64` magnitude.
///
/// The scanner admits `,` as a decimal separator; it is normalized here.
fn parse_decimal(text: &str) -> DurationResult<f64> {
    let normalized: Cow<'_, str> = if text.contains(',') {
        Cow::Owned(text.replace(',', "."))
    } else {
        Cow::Borrowed(text)
    };
    let parsed = normalized.parse::<f64>();
    duration_assert!(
        parsed.is_ok(),
        "scanner admitted an unparsable numeric span {text:?}"
    );
    Ok(parsed.unwrap_or_default())
}

/// Applies the positional range limits of the colon-segmented grammar:
/// hours are unbounded, minutes and seconds must stay below 60.
fn convert_segmented_time(segment: &SegmentedTime<'_>) -> DurationResult<(f64, f64, f64)> {
    let hours = parse_decimal(segment.hours)?;
    let minutes = parse_decimal(segment.minutes)?;
    if minutes >= SEGMENTED_FIELD_LIMIT {
        return Err(DurationError::out_of_range()
            .with_message(format!("minutes value of {minutes} exceeds range [0..60)")));
    }
    let seconds = parse_decimal(segment.seconds)?;
    if seconds >= SEGMENTED_FIELD_LIMIT {
        return Err(DurationError::out_of_range()
            .with_message(format!("seconds value of {seconds} exceeds range [0..60)")));
    }
    Ok((hours, minutes, seconds))
}

// ==== Canonical string assembly ====

impl Writeable for DurationComponents {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_char('P')?;
        if self.is_zero() {
            // The zero duration still needs one measurement to be a valid
            // duration string.
            return sink.write_str("0D");
        }
        write_value_with_suffix(self.years, 'Y', sink)?;
        write_value_with_suffix(self.months, 'M', sink)?;
        write_value_with_suffix(self.weeks, 'W', sink)?;
        write_value_with_suffix(self.days, 'D', sink)?;
        if !(self.hours.is_zero() && self.minutes.is_zero() && self.seconds.is_zero()) {
            sink.write_char('T')?;
            write_value_with_suffix(self.hours, 'H', sink)?;
            write_value_with_suffix(self.minutes, 'M', sink)?;
            write_value_with_suffix(self.seconds, 'S', sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::at_least(3)
    }
}

impl_display_with_writeable!(DurationComponents);

/// Writes one non-zero component as its minimal decimal text plus designator.
///
/// The fractional part is rendered to nanosecond precision with trailing
/// zeros trimmed, which is exact for every value produced by
/// [`DurationComponents::from_duration`].
fn write_value_with_suffix<W: core::fmt::Write + ?Sized>(
    value: NonNegativeF64,
    suffix: char,
    sink: &mut W,
) -> core::fmt::Result {
    if value.is_zero() {
        return Ok(());
    }
    let mut integer = value.as_inner() as u64;
    let mut fraction = CoreFloat::round((value.as_inner() - integer as f64) * 1e9) as u32;
    if fraction >= 1_000_000_000 {
        integer += 1;
        fraction = 0;
    }
    integer.write_to(sink)?;
    if fraction != 0 {
        sink.write_char('.')?;
        let (digits, precision) = u32_to_digits(fraction);
        for digit in digits.iter().take(precision) {
            digit.write_to(sink)?;
        }
    }
    sink.write_char(suffix)
}

/// Splits a nanosecond count into nine decimal digits plus the index after
/// the last non-zero digit.
fn u32_to_digits(mut value: u32) -> ([u8; 9], usize) {
    let mut output = [0; 9];
    let mut precision = 0;
    let mut i = 9;
    while i != 0 {
        let v = (value % 10) as u8;
        value /= 10;
        if precision == 0 && v != 0 {
            precision = i;
        }
        output[i - 1] = v;
        i -= 1;
    }

    (output, precision)
}

// ==== FromStr trait impl ====

impl FromStr for DurationComponents {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let record = IsoDurationScanner::from_str(s).scan()?;
        Self::from_parse_record(&record)
    }
}
