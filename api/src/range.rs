//! Inclusive calendar-date range used by both remote calls.

use std::fmt;

use time::Date;

use crate::{
    error::RangeError,
    model::{format_date_key, parse_date_key},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::StartAfterEnd);
        }
        // Same limit as the backend: the end may be at most one year after the start.
        let limit = start.replace_year(start.year() + 1).unwrap_or_else(|_| {
            // Feb 29 has no counterpart next year.
            start.next_day().and_then(|d| d.replace_year(d.year() + 1).ok()).unwrap_or(Date::MAX)
        });
        if end > limit {
            return Err(RangeError::TooLarge);
        }
        Ok(Self { start, end })
    }

    /// Parse two `YYYY-MM-DD` inputs, as typed into the range form.
    pub fn parse(start: &str, end: &str) -> Result<Self, RangeError> {
        let start = parse_date_key(start).ok_or(RangeError::InvalidFormat)?;
        let end = parse_date_key(end).ok_or(RangeError::InvalidFormat)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn start_key(&self) -> String {
        format_date_key(self.start)
    }

    pub fn end_key(&self) -> String {
        format_date_key(self.end)
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether a `YYYY-MM-DD` key falls inside the range. Unparsable keys do not.
    pub fn contains_key(&self, date_key: &str) -> bool {
        parse_date_key(date_key).is_some_and(|date| self.contains(date))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_key(), self.end_key())
    }
}
