//! Date and time types.

use chrono::{DateTime as ChronoDateTime, FixedOffset, NaiveDate as ChronoNaiveDate};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationErrorKind};

/// The `date-time` of IMAP, e.g., `"01-Jul-2003 10:52:37 +0200"`.
///
/// A validated wrapper over chrono's `DateTime<FixedOffset>`: the year must
/// be representable in four digits and the zone must be a whole number of
/// minutes no more than 959 minutes east or west of Greenwich (the wire
/// format is `("+" / "-") 4DIGIT` with a two-digit minute field).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DateTime(pub(crate) ChronoDateTime<FixedOffset>);

impl DateTime {
    pub fn verify(value: &ChronoDateTime<FixedOffset>) -> Result<(), ValidationError> {
        use chrono::Datelike;

        if !(0..=9999).contains(&value.year()) {
            return Err(ValidationError::new(ValidationErrorKind::OutOfRange));
        }

        let offset = value.offset().local_minus_utc();

        if offset % 60 != 0 {
            return Err(ValidationError::new(ValidationErrorKind::Invalid));
        }

        // zone = ("+" / "-") 4DIGIT, i.e., at most 15 hours and 59 minutes.
        if (offset / 60).abs() > 959 {
            return Err(ValidationError::new(ValidationErrorKind::OutOfRange));
        }

        Ok(())
    }

    pub fn inner(&self) -> &ChronoDateTime<FixedOffset> {
        &self.0
    }

    pub fn into_inner(self) -> ChronoDateTime<FixedOffset> {
        self.0
    }

    /// Construct without validation.
    ///
    /// The value is still checked in debug builds.
    #[cfg(feature = "unvalidated")]
    #[cfg_attr(docsrs, doc(cfg(feature = "unvalidated")))]
    pub fn unvalidated(inner: ChronoDateTime<FixedOffset>) -> Self {
        #[cfg(debug_assertions)]
        Self::verify(&inner).unwrap();

        Self(inner)
    }
}

impl TryFrom<ChronoDateTime<FixedOffset>> for DateTime {
    type Error = ValidationError;

    fn try_from(value: ChronoDateTime<FixedOffset>) -> Result<Self, Self::Error> {
        Self::verify(&value)?;

        Ok(Self(value))
    }
}

/// The `date` of IMAP, e.g., `25-Jun-1994`.
///
/// A validated wrapper over chrono's `NaiveDate` (four-digit year).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct NaiveDate(pub(crate) ChronoNaiveDate);

impl NaiveDate {
    pub fn verify(value: &ChronoNaiveDate) -> Result<(), ValidationError> {
        use chrono::Datelike;

        if !(0..=9999).contains(&value.year()) {
            return Err(ValidationError::new(ValidationErrorKind::OutOfRange));
        }

        Ok(())
    }

    pub fn inner(&self) -> &ChronoNaiveDate {
        &self.0
    }

    pub fn into_inner(self) -> ChronoNaiveDate {
        self.0
    }

    /// Construct without validation.
    ///
    /// The value is still checked in debug builds.
    #[cfg(feature = "unvalidated")]
    #[cfg_attr(docsrs, doc(cfg(feature = "unvalidated")))]
    pub fn unvalidated(inner: ChronoNaiveDate) -> Self {
        #[cfg(debug_assertions)]
        Self::verify(&inner).unwrap();

        Self(inner)
    }
}

impl TryFrom<ChronoNaiveDate> for NaiveDate {
    type Error = ValidationError;

    fn try_from(value: ChronoNaiveDate) -> Result<Self, Self::Error> {
        Self::verify(&value)?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_datetime_zone_bounds() {
        let date = ChronoNaiveDate::from_ymd_opt(1994, 6, 25)
            .unwrap()
            .and_hms_opt(1, 2, 3)
            .unwrap();

        let ok = FixedOffset::east_opt(959 * 60)
            .unwrap()
            .from_local_datetime(&date)
            .unwrap();
        assert!(DateTime::try_from(ok).is_ok());

        let too_far = FixedOffset::east_opt(16 * 3600)
            .unwrap()
            .from_local_datetime(&date)
            .unwrap();
        assert!(DateTime::try_from(too_far).is_err());

        let sub_minute = FixedOffset::east_opt(90)
            .unwrap()
            .from_local_datetime(&date)
            .unwrap();
        assert!(DateTime::try_from(sub_minute).is_err());
    }

    #[test]
    fn test_naive_date_year_bounds() {
        assert!(NaiveDate::try_from(ChronoNaiveDate::from_ymd_opt(1994, 6, 25).unwrap()).is_ok());
        assert!(NaiveDate::try_from(ChronoNaiveDate::from_ymd_opt(-1, 1, 1).unwrap()).is_err());
    }
}
