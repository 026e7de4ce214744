//! Implementation of the NonNegativeF64 primitive

use crate::{DurationError, DurationResult};
use core_maths::CoreFloat;

/// An `f64` that is finite and non-negative by construction.
///
/// Every `DurationComponents` field is a `NonNegativeF64`, so a negative
/// component magnitude is a construction error rather than a representable
/// state.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct NonNegativeF64(pub(crate) f64);

impl NonNegativeF64 {
    #[inline]
    #[must_use]
    pub fn as_inner(&self) -> f64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    #[inline]
    pub fn checked_mul_add(&self, a: f64, b: NonNegativeF64) -> DurationResult<Self> {
        let result = Self(CoreFloat::mul_add(self.0, a, b.0));
        if !result.0.is_finite() {
            return Err(DurationError::out_of_range()
                .with_message("number value is not a finite value."));
        }
        Ok(result)
    }
}

impl TryFrom<f64> for NonNegativeF64 {
    type Error = DurationError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(DurationError::out_of_range()
                .with_message("number value is not a finite value."));
        }
        if value.is_sign_negative() && value != 0.0 {
            return Err(
                DurationError::out_of_range().with_message("number value is a negative value.")
            );
        }
        Ok(Self(value))
    }
}

impl PartialEq<f64> for NonNegativeF64 {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::NonNegativeF64;

    #[test]
    fn rejects_non_finite_and_negative() {
        assert!(NonNegativeF64::try_from(f64::NAN).is_err());
        assert!(NonNegativeF64::try_from(f64::INFINITY).is_err());
        assert!(NonNegativeF64::try_from(-1.0).is_err());
        assert!(NonNegativeF64::try_from(0.0).is_ok());
        assert!(NonNegativeF64::try_from(1.5).is_ok());
    }

    #[test]
    fn checked_arithmetic_stays_finite() {
        let big = NonNegativeF64::try_from(f64::MAX).unwrap();
        assert!(big.checked_mul_add(2.0, NonNegativeF64::default()).is_err());
        let small = NonNegativeF64::try_from(1.5).unwrap();
        assert_eq!(small.checked_mul_add(60.0, small).unwrap(), 91.5);
    }
}
