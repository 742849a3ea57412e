//! Calendar month encoding used as the single regression feature.
//!
//! A year-month is encoded as `year * 12 + month`, so calendar order and
//! integer order agree and consecutive months differ by exactly one. The same
//! transform is applied to historical months during aggregation and to the
//! requested target month, which keeps the two sides of the model aligned.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime};

use crate::error::{ForecastError, Result};

/// Ordinal encoding of a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrdinalMonth(i64);

impl OrdinalMonth {
    /// Encode a year and a 1-based month.
    ///
    /// Returns an error if `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidParameter(format!(
                "month must be in 1..=12, got {month}"
            )));
        }
        Ok(Self(year as i64 * 12 + month as i64))
    }

    /// Month containing the given timestamp (the timestamp truncated to its year-month).
    pub fn from_datetime(ts: &NaiveDateTime) -> Self {
        Self(ts.year() as i64 * 12 + ts.month() as i64)
    }

    /// Parse a strict `YYYY-MM` string.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || ForecastError::InvalidMonthFormat(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let digits = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
        if !digits(0..4) || !digits(5..7) {
            return Err(invalid());
        }

        let year: i32 = s[0..4].parse().map_err(|_| invalid())?;
        let month: u32 = s[5..7].parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    /// Raw ordinal value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Ordinal value as a model feature.
    pub fn feature(&self) -> f64 {
        self.0 as f64
    }

    pub fn year(&self) -> i32 {
        (self.0 - 1).div_euclid(12) as i32
    }

    /// 1-based calendar month.
    pub fn month(&self) -> u32 {
        ((self.0 - 1).rem_euclid(12) + 1) as u32
    }

    /// The month `n` steps later (or earlier for negative `n`).
    pub fn offset(&self, n: i64) -> Self {
        Self(self.0 + n)
    }
}

impl fmt::Display for OrdinalMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for OrdinalMonth {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
