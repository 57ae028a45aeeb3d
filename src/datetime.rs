//! A permissive date-string parser for date-range expression values and
//! post metadata. Values written without a time of day are promoted to a
//! full timestamp by zero-filling the missing fields (midnight), so a
//! date literal and a datetime literal always compare at the same
//! precision.

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Formats that carry a full time of day.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only formats. The parsed date is promoted to midnight. None of
/// these may contain a comma: commas separate expression clauses, so a
/// comma-bearing literal can never reach this parser intact.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d %B %Y", "%d %b %Y"];

/// Parses `text` against each supported format in turn and returns the
/// first match.
pub fn parse(text: &str) -> Result<NaiveDateTime, Error> {
    for format in &DATETIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(timestamp);
        }
    }
    for format in &DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date.and_hms(0, 0, 0));
        }
    }
    Err(Error {
        text: text.to_owned(),
    })
}

/// Returned when a value matches none of the supported formats.
#[derive(Debug)]
pub struct Error {
    text: String,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unrecognized date `{}`", &self.text)
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn wanted(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd(y, mo, d).and_hms(h, mi, s)
    }

    #[test]
    fn test_parse_datetime() -> Result<(), Error> {
        assert_eq!(wanted(2020, 6, 15, 13, 5, 30), parse("2020-06-15T13:05:30")?);
        assert_eq!(wanted(2020, 6, 15, 13, 5, 30), parse("2020-06-15 13:05:30")?);
        Ok(())
    }

    #[test]
    fn test_parse_datetime_without_seconds() -> Result<(), Error> {
        assert_eq!(wanted(2020, 6, 15, 13, 5, 0), parse("2020-06-15T13:05")?);
        assert_eq!(wanted(2020, 6, 15, 13, 5, 0), parse("2020-06-15 13:05")?);
        Ok(())
    }

    #[test]
    fn test_parse_date_promotes_to_midnight() -> Result<(), Error> {
        assert_eq!(wanted(2020, 6, 15, 0, 0, 0), parse("2020-06-15")?);
        assert_eq!(wanted(2020, 6, 15, 0, 0, 0), parse("2020/06/15")?);
        assert_eq!(wanted(2020, 6, 15, 0, 0, 0), parse("15 June 2020")?);
        assert_eq!(wanted(2020, 6, 15, 0, 0, 0), parse("15 Jun 2020")?);
        Ok(())
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("banana").is_err());
        assert!(parse("2020-13-45").is_err());
        assert!(parse("").is_err());
    }
}
