//! This module implements duration-string scanning.
//!
//! [`IsoDurationScanner`] splits an ISO 8601 duration string into ordered raw
//! `(unit, numeric-text)` measures without interpreting any numbers. Two
//! grammars are recognized: the designator form (`P1DT2H`, `P3W`) and the
//! colon-segmented time form (`PT04:05:06.5`). Numeric interpretation and
//! range validation happen later, in `DurationComponents`.

use crate::{DurationError, DurationResult};
use alloc::format;
use alloc::vec::Vec;

/// The unit designated by a raw measurement.
///
/// `M` is disambiguated by which side of the `T` separator it occurs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

/// A single scanned measurement: a unit and the numeric text preceding its
/// designator, exactly as it appeared in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMeasure<'a> {
    pub unit: Unit,
    pub text: &'a str,
}

/// The three positional fields of a colon-segmented time segment.
///
/// `seconds` retains its fractional part, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentedTime<'a> {
    pub hours: &'a str,
    pub minutes: &'a str,
    pub seconds: &'a str,
}

/// The scanned time segment, flagged by which grammar produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeRecord<'a> {
    /// Designator-form measures, in source order. Empty for a trailing `T`.
    Designators(Vec<RawMeasure<'a>>),
    /// A colon-segmented `H:MM:SS[.f]` segment.
    Segmented(SegmentedTime<'a>),
}

/// The raw result of scanning one duration string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationParseRecord<'a> {
    /// Date-segment measures in source order; weeks appear here.
    pub date: Vec<RawMeasure<'a>>,
    /// The time segment, when a `T` separator was present.
    pub time: Option<TimeRecord<'a>>,
}

/// A character-by-character scanner over a single duration string.
#[derive(Debug)]
pub struct IsoDurationScanner<'a> {
    source: &'a str,
}

impl<'a> IsoDurationScanner<'a> {
    /// Creates a scanner from a `&str`.
    #[inline]
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub const fn from_str(source: &'a str) -> Self {
        Self { source }
    }

    /// Scans the source into a [`DurationParseRecord`].
    ///
    /// # Errors
    ///
    /// Every failure is a `MalformedDuration` naming the offending character
    /// or substring; no numeric interpretation happens here.
    pub fn scan(&self) -> DurationResult<DurationParseRecord<'a>> {
        let bytes = self.source.as_bytes();
        if bytes.first() != Some(&b'P') {
            return Err(DurationError::malformed()
                .with_message("durations must begin with the character 'P'"));
        }

        let mut date = Vec::new();
        let mut time = Vec::new();
        let mut in_time = false;
        // Positions already consumed in each segment's designator order;
        // strictly ascending order and no repeats fall out of these.
        let mut next_date = DATE_ORDER_YEARS;
        let mut next_time = TIME_ORDER_HOURS;
        let mut week_seen = false;
        let mut ymd_seen = false;

        let mut span_start = 1;
        let mut i = 1;
        while i < bytes.len() {
            let byte = bytes[i];
            match byte {
                b'0'..=b'9' | b'.' | b',' => {}
                b'T' => {
                    if in_time {
                        return Err(unexpected_character('T'));
                    }
                    if i > span_start {
                        return Err(DurationError::malformed().with_message(format!(
                            "expected a unit designator after '{}'",
                            &self.source[span_start..i]
                        )));
                    }
                    in_time = true;
                    span_start = i + 1;
                }
                b':' => {
                    if !in_time {
                        return Err(DurationError::malformed().with_message(
                            "colon-segmented fields must follow the 'T' separator",
                        ));
                    }
                    if !date.is_empty() || !time.is_empty() {
                        return Err(DurationError::malformed().with_message(
                            "cannot mix unit designators with colon-segmented time",
                        ));
                    }
                    let segmented = Self::scan_segmented_time(&self.source[span_start..])?;
                    return Ok(DurationParseRecord {
                        date,
                        time: Some(TimeRecord::Segmented(segmented)),
                    });
                }
                b'Y' | b'M' | b'W' | b'D' | b'H' | b'S' => {
                    let text = self.validated_span(span_start, i, byte as char)?;
                    let unit = match (byte, in_time) {
                        (b'Y', false) if next_date <= DATE_ORDER_YEARS => {
                            next_date = DATE_ORDER_MONTHS;
                            Unit::Years
                        }
                        (b'M', false) if next_date <= DATE_ORDER_MONTHS => {
                            next_date = DATE_ORDER_DAYS;
                            Unit::Months
                        }
                        (b'W', false) if !week_seen => Unit::Weeks,
                        (b'D', false) if next_date <= DATE_ORDER_DAYS => {
                            next_date = DATE_ORDER_DAYS + 1;
                            Unit::Days
                        }
                        (b'H', true) if next_time <= TIME_ORDER_HOURS => {
                            next_time = TIME_ORDER_MINUTES;
                            Unit::Hours
                        }
                        (b'M', true) if next_time <= TIME_ORDER_MINUTES => {
                            next_time = TIME_ORDER_SECONDS;
                            Unit::Minutes
                        }
                        (b'S', true) if next_time <= TIME_ORDER_SECONDS => {
                            next_time = TIME_ORDER_SECONDS + 1;
                            Unit::Seconds
                        }
                        _ => return Err(unexpected_character(byte as char)),
                    };
                    // The week form is an alternative to every other
                    // measurement, not a combination with them.
                    if (unit == Unit::Weeks && ymd_seen) || (unit != Unit::Weeks && week_seen) {
                        return Err(DurationError::malformed()
                            .with_message("cannot mix weeks with other units"));
                    }
                    match unit {
                        Unit::Weeks => week_seen = true,
                        Unit::Years | Unit::Months | Unit::Days => ymd_seen = true,
                        _ => {}
                    }
                    let measure = RawMeasure { unit, text };
                    if in_time {
                        time.push(measure);
                    } else {
                        date.push(measure);
                    }
                    span_start = i + 1;
                }
                _ => return Err(unexpected_character(char::from(byte))),
            }
            i += 1;
        }

        if i > span_start {
            return Err(DurationError::malformed().with_message(format!(
                "expected a unit designator after '{}'",
                &self.source[span_start..i]
            )));
        }
        // A trailing `T` is allowed, but only after at least one date
        // measurement; `P` and `PT` alone designate nothing.
        if date.is_empty() && time.is_empty() {
            return Err(DurationError::malformed().with_message("no measurements found"));
        }

        Ok(DurationParseRecord {
            date,
            time: in_time.then_some(TimeRecord::Designators(time)),
        })
    }

    /// Scans a full colon-segmented time segment (everything after `PT`).
    ///
    /// The segment is exactly three fields: hours with one or more digits,
    /// minutes and seconds with exactly two, and an optional fraction on the
    /// seconds field only.
    fn scan_segmented_time(segment: &str) -> DurationResult<SegmentedTime<'_>> {
        let unparsable = || {
            DurationError::malformed()
                .with_message(format!("unable to parse '{segment}' into time components"))
        };

        let mut fields = segment.split(':');
        let (Some(hours), Some(minutes), Some(seconds), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(unparsable());
        };

        if hours.is_empty() || !hours.bytes().all(|b| b.is_ascii_digit()) {
            return Err(unparsable());
        }
        if minutes.len() != 2 || !minutes.bytes().all(|b| b.is_ascii_digit()) {
            return Err(unparsable());
        }
        let seconds_bytes = seconds.as_bytes();
        if seconds_bytes.len() < 2 || !seconds_bytes[..2].iter().all(u8::is_ascii_digit) {
            return Err(unparsable());
        }
        if seconds_bytes.len() > 2 {
            let fraction = &seconds_bytes[3..];
            if !matches!(seconds_bytes[2], b'.' | b',')
                || fraction.is_empty()
                || !fraction.iter().all(u8::is_ascii_digit)
            {
                return Err(unparsable());
            }
        }

        Ok(SegmentedTime {
            hours,
            minutes,
            seconds,
        })
    }

    /// Checks the numeric text between two designators: non-empty, led by a
    /// digit, and holding at most one decimal separator.
    fn validated_span(&self, start: usize, end: usize, next: char) -> DurationResult<&'a str> {
        let span = &self.source[start..end];
        if span.is_empty() {
            return Err(DurationError::malformed()
                .with_message(format!("incomplete measurement before character '{next}'")));
        }
        let separators = span.bytes().filter(|b| matches!(b, b'.' | b',')).count();
        if separators > 1 || !span.as_bytes()[0].is_ascii_digit() {
            return Err(DurationError::malformed()
                .with_message(format!("unable to parse '{span}' as a positive decimal")));
        }
        Ok(span)
    }
}

const DATE_ORDER_YEARS: u8 = 0;
const DATE_ORDER_MONTHS: u8 = 1;
const DATE_ORDER_DAYS: u8 = 2;
const TIME_ORDER_HOURS: u8 = 0;
const TIME_ORDER_MINUTES: u8 = 1;
const TIME_ORDER_SECONDS: u8 = 2;

fn unexpected_character(c: char) -> DurationError {
    DurationError::malformed().with_message(format!("unexpected character '{c}'"))
}

#[cfg(test)]
mod tests {
    use super::{IsoDurationScanner, TimeRecord, Unit};

    fn scan(s: &str) -> super::DurationParseRecord<'_> {
        IsoDurationScanner::from_str(s).scan().unwrap()
    }

    #[test]
    fn designator_measures_in_order() {
        let record = scan("P1Y2M3DT4H5M6.5S");
        let date: alloc::vec::Vec<_> = record.date.iter().map(|m| (m.unit, m.text)).collect();
        assert_eq!(
            date,
            [(Unit::Years, "1"), (Unit::Months, "2"), (Unit::Days, "3")]
        );
        let Some(TimeRecord::Designators(time)) = record.time else {
            panic!("expected designator time segment");
        };
        let time: alloc::vec::Vec<_> = time.iter().map(|m| (m.unit, m.text)).collect();
        assert_eq!(
            time,
            [
                (Unit::Hours, "4"),
                (Unit::Minutes, "5"),
                (Unit::Seconds, "6.5")
            ]
        );
    }

    #[test]
    fn month_disambiguated_by_segment() {
        let record = scan("P1MT1M");
        assert_eq!(record.date[0].unit, Unit::Months);
        let Some(TimeRecord::Designators(time)) = record.time else {
            panic!("expected designator time segment");
        };
        assert_eq!(time[0].unit, Unit::Minutes);
    }

    #[test]
    fn trailing_t_scans_to_empty_time_segment() {
        let record = scan("P1DT");
        assert_eq!(record.date.len(), 1);
        assert_eq!(record.time, Some(TimeRecord::Designators(alloc::vec![])));
    }

    #[test]
    fn segmented_time_fields() {
        let record = scan("PT04:05:06.5");
        assert!(record.date.is_empty());
        let Some(TimeRecord::Segmented(seg)) = record.time else {
            panic!("expected colon-segmented time segment");
        };
        assert_eq!((seg.hours, seg.minutes, seg.seconds), ("04", "05", "06.5"));
    }

    #[test]
    fn segmented_time_rejects_short_fields() {
        for bad in ["PT1:2:3", "PT01:0203", "PT01:02:3.4", "PT.5:00:00", "PT5.:00:00"] {
            let err = IsoDurationScanner::from_str(bad).scan().unwrap_err();
            assert_eq!(
                err.kind(),
                crate::ErrorKind::MalformedDuration,
                "{bad} should be malformed"
            );
        }
    }

    #[test]
    fn designators_out_of_order() {
        for bad in ["PT5S1M", "P0DT5M1H", "P1DT1H3H1M", "P1D3D", "P1DT5S2W"] {
            assert!(IsoDurationScanner::from_str(bad).scan().is_err(), "{bad}");
        }
    }

    #[test]
    fn weeks_do_not_combine() {
        for bad in ["P1WT1H", "P0Y1W", "P1W1D", "P1W2W"] {
            let err = IsoDurationScanner::from_str(bad).scan().unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::MalformedDuration, "{bad}");
        }
        assert!(IsoDurationScanner::from_str("P1W").scan().is_ok());
        // an empty trailing time segment designates nothing, so the week
        // exclusivity rule is not violated
        assert!(IsoDurationScanner::from_str("P1WT").scan().is_ok());
    }

    #[test]
    fn empty_and_misleading_strings() {
        for bad in ["", "T", "P", "PT", "PPT", "PTT", "PTP", "P0YD", "P123", "PT5MT5S"] {
            assert!(IsoDurationScanner::from_str(bad).scan().is_err(), "{bad}");
        }
    }

    #[test]
    fn sign_characters_rejected() {
        for bad in ["P-1DT0S", "P0M-2D", "P0DT1M-3S", "PT01:-2:03"] {
            let err = IsoDurationScanner::from_str(bad).scan().unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::MalformedDuration, "{bad}");
        }
    }

    #[test]
    fn decimal_separator_rules() {
        assert!(IsoDurationScanner::from_str("PT0,01S").scan().is_ok());
        for bad in ["PT0.0.0S", "P1.,0D", "PT.5S", "P1M.1D"] {
            assert!(IsoDurationScanner::from_str(bad).scan().is_err(), "{bad}");
        }
    }

    #[test]
    fn mixed_grammars_rejected() {
        for bad in ["P1DT00:00:00", "PT1H00:00", "P1WT00:00:00"] {
            let err = IsoDurationScanner::from_str(bad).scan().unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::MalformedDuration, "{bad}");
        }
    }
}
