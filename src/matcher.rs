//! Exports the [`Matcher`] type, the public entry point for deciding
//! whether a timestamp satisfies a date-range expression. The expression
//! is parsed fresh on every call and discarded afterwards; the matcher
//! itself holds no state beyond its clock.

use crate::clock::{Clock, SystemClock};
use crate::expr::{Expr, Result};
use chrono::NaiveDateTime;

/// Evaluates date-range expressions against timestamps.
pub struct Matcher<'a> {
    /// The current-time source used to resolve the `now` token when the
    /// caller does not supply a reference instant.
    clock: &'a dyn Clock,
}

impl<'a> Matcher<'a> {
    /// Constructs a matcher over the given clock.
    pub fn new(clock: &'a dyn Clock) -> Matcher<'a> {
        Matcher { clock }
    }

    /// Decides whether `when` satisfies every clause of `range`.
    ///
    /// `now` is the reference instant for the `now` token; when `None`,
    /// the matcher's clock is consulted. Either way the instant is
    /// resolved exactly once per call, so every `now` token in the
    /// expression sees the same value even though wall-clock time keeps
    /// advancing.
    pub fn matches(
        &self,
        range: &str,
        when: &NaiveDateTime,
        now: Option<NaiveDateTime>,
    ) -> Result<bool> {
        let expr: Expr = range.parse()?;
        let now = now.unwrap_or_else(|| self.clock.now());
        Ok(expr.eval(when, &now))
    }
}

/// Convenience wrapper over a [`Matcher`] backed by the system clock.
pub fn date_in_range(
    range: &str,
    when: &NaiveDateTime,
    now: Option<NaiveDateTime>,
) -> Result<bool> {
    Matcher::new(&SystemClock).matches(range, when, now)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd(y, mo, d).and_hms(h, mi, s)
    }

    #[test]
    fn test_matches_with_explicit_now() -> Result<()> {
        let now = at(2020, 6, 15, 13, 5, 30);
        let clock = FixedClock(at(1970, 1, 1, 0, 0, 0));
        let matcher = Matcher::new(&clock);
        // The explicit `now` wins over the clock.
        assert!(matcher.matches("==now", &now, Some(now))?);
        assert!(!matcher.matches("==now", &now, None)?);
        Ok(())
    }

    #[test]
    fn test_matches_falls_back_to_clock() -> Result<()> {
        let instant = at(2020, 6, 15, 13, 5, 30);
        let clock = FixedClock(instant);
        let matcher = Matcher::new(&clock);
        assert!(matcher.matches("==now", &instant, None)?);
        assert!(matcher.matches("<=now", &at(2020, 1, 1, 0, 0, 0), None)?);
        Ok(())
    }

    #[test]
    fn test_date_in_range() -> Result<()> {
        let when = at(2020, 6, 15, 0, 0, 0);
        assert!(date_in_range("year==2020", &when, None)?);
        assert!(!date_in_range("year==2021", &when, None)?);
        assert!(date_in_range("month<=6,day>=1", &at(2020, 3, 15, 0, 0, 0), None)?);
        assert!(!date_in_range("month<=6,day>=1", &at(2020, 7, 15, 0, 0, 0), None)?);
        Ok(())
    }

    #[test]
    fn test_errors_propagate() {
        let when = at(2020, 6, 15, 0, 0, 0);
        assert!(date_in_range("banana", &when, None).is_err());
        assert!(date_in_range("year==abc", &when, None).is_err());
    }
}
