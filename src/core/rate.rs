use chrono::{DateTime, Utc};
use thiserror::Error;

/// Rate used until a cached or live one is available.
pub const FALLBACK_RATE: f64 = 48.0;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum RateError {
    #[error("Exchange rate must be a positive number, got {0}")]
    NonPositive(f64),
}

/// Checks that a raw rate can be used for conversion.
pub fn validate(value: f64) -> Result<f64, RateError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(RateError::NonPositive(value))
    }
}

/// Units of quote currency per one unit of base currency, stamped with the
/// time it was acquired. Replaced wholesale whenever a newer rate arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRate {
    value: f64,
    fetched_at: DateTime<Utc>,
}

impl ExchangeRate {
    pub fn new(value: f64, fetched_at: DateTime<Utc>) -> Result<Self, RateError> {
        Ok(Self {
            value: validate(value)?,
            fetched_at,
        })
    }

    /// A rate that was never acquired. Its timestamp is the epoch so it is
    /// always older than any cached entry.
    pub fn fallback(value: f64) -> Result<Self, RateError> {
        Self::new(value, DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn inverse(&self) -> f64 {
        1.0 / self.value
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Rebuilds a rate from its two stored strings. Anything partial,
    /// unparseable or non-positive is treated as absent.
    pub fn from_stored(value: Option<&str>, timestamp_millis: Option<&str>) -> Option<Self> {
        let value = value?.trim().parse::<f64>().ok()?;
        let millis = timestamp_millis?.trim().parse::<i64>().ok()?;
        let fetched_at = DateTime::<Utc>::from_timestamp_millis(millis)?;
        Self::new(value, fetched_at).ok()
    }

    /// The stored form: value and acquisition time in epoch milliseconds.
    pub fn to_stored(&self) -> (String, String) {
        (
            self.value.to_string(),
            self.fetched_at.timestamp_millis().to_string(),
        )
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self {
            value: FALLBACK_RATE,
            fetched_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rejects_non_positive_rates() {
        let now = Utc::now();
        assert!(ExchangeRate::new(48.0, now).is_ok());
        assert_eq!(
            ExchangeRate::new(0.0, now),
            Err(RateError::NonPositive(0.0))
        );
        assert!(ExchangeRate::new(-1.5, now).is_err());
        assert!(ExchangeRate::new(f64::NAN, now).is_err());
        assert!(ExchangeRate::new(f64::INFINITY, now).is_err());
    }

    #[test]
    fn test_stored_form() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let rate = ExchangeRate::new(41.237, at).unwrap();
        let (value, millis) = rate.to_stored();
        assert_eq!(value, "41.237");
        assert_eq!(millis, at.timestamp_millis().to_string());
        assert_eq!(
            ExchangeRate::from_stored(Some(&value), Some(&millis)),
            Some(rate)
        );
    }

    #[test]
    fn test_partial_or_invalid_stored_entries_are_absent() {
        assert!(ExchangeRate::from_stored(Some("48.1"), None).is_none());
        assert!(ExchangeRate::from_stored(None, Some("1700000000000")).is_none());
        assert!(ExchangeRate::from_stored(Some("abc"), Some("1700000000000")).is_none());
        assert!(ExchangeRate::from_stored(Some("48.1"), Some("yesterday")).is_none());
        assert!(ExchangeRate::from_stored(Some("0"), Some("1700000000000")).is_none());
    }

    #[test]
    fn test_default_is_fallback() {
        let rate = ExchangeRate::default();
        assert_eq!(rate.value(), FALLBACK_RATE);
        assert_eq!(rate, ExchangeRate::fallback(FALLBACK_RATE).unwrap());
        assert!((rate.inverse() - 1.0 / 48.0).abs() < f64::EPSILON);
    }
}
