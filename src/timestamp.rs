//! Calendar timestamps in the EXIF `YYYY:MM:DD HH:MM:SS` layout.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use thiserror::Error;

pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

lazy_static! {
    static ref EXIF_DATETIME_LAYOUT: Regex =
        Regex::new(r"^\d{4}:\d{2}:\d{2} \d{2}:\d{2}:\d{2}$").unwrap();
}

/// Error returned when text does not hold a valid EXIF timestamp.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a YYYY:MM:DD HH:MM:SS timestamp: {0:?}")]
pub struct FormatError(pub String);

/// A capture time with whole-second precision and no time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CapturedTimestamp(NaiveDateTime);

impl CapturedTimestamp {
    /// Parses the fixed layout, rejecting dates that cannot exist (e.g. Feb 30).
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        if !EXIF_DATETIME_LAYOUT.is_match(text) {
            return Err(FormatError(text.to_string()));
        }
        NaiveDateTime::parse_from_str(text, EXIF_DATETIME_FORMAT)
            .map(CapturedTimestamp)
            .map_err(|_| FormatError(text.to_string()))
    }

    pub fn format(&self) -> String {
        self.0.format(EXIF_DATETIME_FORMAT).to_string()
    }

    /// Returns `None` if the result would leave the four-digit year range.
    pub fn add_hours(self, hours: i64) -> Option<Self> {
        let shifted = self.0.checked_add_signed(Duration::try_hours(hours)?)?;
        (0..=9999)
            .contains(&shifted.year())
            .then_some(CapturedTimestamp(shifted))
    }

    /// Signed `a - b` in seconds.
    pub fn difference_seconds(a: Self, b: Self) -> i64 {
        (a.0 - b.0).num_seconds()
    }

    /// Same calendar date, with the time of day replaced.
    pub fn with_time_of_day(self, hour: u32, minute: u32, second: u32) -> Option<Self> {
        self.0
            .date()
            .and_hms_opt(hour, minute, second)
            .map(CapturedTimestamp)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }
}

impl fmt::Display for CapturedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}
