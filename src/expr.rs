//! Defines the date-range expression grammar and its evaluation. An
//! expression is a comma-separated sequence of clauses combined with
//! logical AND:
//!
//! ```text
//! expr   := clause ("," clause)*
//! clause := [attribute] operator value
//! ```
//!
//! A clause with an attribute (`year`, `month`, `day`, `hour`, `minute`,
//! `second`, `weekday`, `isoweekday`) compares that numeric field of the
//! tested timestamp against an integer. A clause without an attribute
//! compares the entire timestamp against either the literal `now` or a
//! date literal (see [`crate::datetime`] for the accepted forms).
//! Whitespace around clauses, operators, and values is insignificant.
//!
//! Weekday numbering follows chrono's from-Monday convention: `weekday`
//! runs 0 (Monday) through 6 (Sunday) and `isoweekday` runs 1 (Monday)
//! through 7 (Sunday).

use crate::datetime;
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::fmt;

/// A date/time field a clause may restrict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribute {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Weekday,
    IsoWeekday,
}

impl Attribute {
    /// Maps an attribute keyword to its [`Attribute`]. Keywords are
    /// lowercase only.
    fn from_token(token: &str) -> Option<Attribute> {
        match token {
            "year" => Some(Attribute::Year),
            "month" => Some(Attribute::Month),
            "day" => Some(Attribute::Day),
            "hour" => Some(Attribute::Hour),
            "minute" => Some(Attribute::Minute),
            "second" => Some(Attribute::Second),
            "weekday" => Some(Attribute::Weekday),
            "isoweekday" => Some(Attribute::IsoWeekday),
            _ => None,
        }
    }

    /// Extracts the attribute's numeric value from a timestamp.
    pub fn of(&self, when: &NaiveDateTime) -> i64 {
        match self {
            Attribute::Year => i64::from(when.year()),
            Attribute::Month => i64::from(when.month()),
            Attribute::Day => i64::from(when.day()),
            Attribute::Hour => i64::from(when.hour()),
            Attribute::Minute => i64::from(when.minute()),
            Attribute::Second => i64::from(when.second()),
            Attribute::Weekday => i64::from(when.weekday().num_days_from_monday()),
            Attribute::IsoWeekday => i64::from(when.weekday().number_from_monday()),
        }
    }
}

/// A comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
}

impl Op {
    /// Operator tokens, longest first so `<=` and `>=` win over `<` and
    /// `>`.
    const TOKENS: [(&'static str, Op); 6] = [
        ("==", Op::Eq),
        ("!=", Op::Ne),
        ("<=", Op::Le),
        (">=", Op::Ge),
        ("<", Op::Lt),
        (">", Op::Gt),
    ];

    /// Strips a leading operator token off `s`, returning the operator
    /// and the rest of the input.
    fn strip(s: &str) -> Option<(Op, &str)> {
        for (token, op) in &Self::TOKENS {
            if s.starts_with(token) {
                return Some((*op, &s[token.len()..]));
            }
        }
        None
    }

    /// Applies the operator to a pair of ordered values.
    pub fn apply<T: PartialOrd>(&self, left: &T, right: &T) -> bool {
        match self {
            Op::Eq => left == right,
            Op::Ne => left != right,
            Op::Le => left <= right,
            Op::Ge => left >= right,
            Op::Lt => left < right,
            Op::Gt => left > right,
        }
    }
}

/// The value of a whole-timestamp clause: either the reference current
/// time or a literal timestamp fixed at parse time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimeValue {
    Now,
    Literal(NaiveDateTime),
}

/// One `[attribute] operator value` filter term. Values are converted to
/// their required type when the clause is parsed, so evaluation cannot
/// fail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Clause {
    /// Compares a numeric field of the tested timestamp against an
    /// integer.
    Field {
        attribute: Attribute,
        op: Op,
        value: i64,
    },

    /// Compares the entire tested timestamp, at full precision, against
    /// a [`TimeValue`].
    Timestamp { op: Op, value: TimeValue },
}

impl Clause {
    /// Evaluates the clause against `when`, resolving the `now` token
    /// with the supplied reference instant.
    pub fn eval(&self, when: &NaiveDateTime, now: &NaiveDateTime) -> bool {
        match self {
            Clause::Field {
                attribute,
                op,
                value,
            } => op.apply(&attribute.of(when), value),
            Clause::Timestamp { op, value } => match value {
                TimeValue::Now => op.apply(when, now),
                TimeValue::Literal(timestamp) => op.apply(when, timestamp),
            },
        }
    }
}

impl std::str::FromStr for Clause {
    type Err = Error;

    fn from_str(s: &str) -> Result<Clause> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseError::EmptyClause.into());
        }

        // A leading run of letters is always an attribute keyword;
        // letters can only appear in the value position after the
        // operator.
        let ident_len = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or_else(|| s.len());
        let (ident, rest) = s.split_at(ident_len);

        let (op, rest) =
            Op::strip(rest.trim_start()).ok_or_else(|| ParseError::MissingOperator {
                clause: s.to_owned(),
            })?;
        let value = rest.trim();

        if ident.is_empty() {
            if value == "now" {
                return Ok(Clause::Timestamp {
                    op,
                    value: TimeValue::Now,
                });
            }
            let timestamp = datetime::parse(value).map_err(ValueError::Date)?;
            Ok(Clause::Timestamp {
                op,
                value: TimeValue::Literal(timestamp),
            })
        } else {
            let attribute =
                Attribute::from_token(ident).ok_or_else(|| ParseError::UnknownAttribute {
                    token: ident.to_owned(),
                })?;
            let value = value.parse::<i64>().map_err(|err| ValueError::Int {
                value: value.to_owned(),
                err,
            })?;
            Ok(Clause::Field {
                attribute,
                op,
                value,
            })
        }
    }
}

/// An ordered, AND-combined sequence of [`Clause`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    clauses: Vec<Clause>,
}

impl Expr {
    /// Evaluates every clause against `when` under the shared reference
    /// instant `now`. Clauses are evaluated in textual order and
    /// evaluation stops at the first false clause; clauses have no side
    /// effects, so the result is the same as evaluating all of them.
    pub fn eval(&self, when: &NaiveDateTime, now: &NaiveDateTime) -> bool {
        self.clauses.iter().all(|clause| clause.eval(when, now))
    }
}

impl std::str::FromStr for Expr {
    type Err = Error;

    /// Parses a full comma-separated expression. The whole expression is
    /// parsed before anything is evaluated, so a malformed clause
    /// surfaces even when an earlier clause would already have decided
    /// the outcome.
    fn from_str(s: &str) -> Result<Expr> {
        let mut clauses = Vec::new();
        for item in s.split(',') {
            clauses.push(item.parse()?);
        }
        Ok(Expr { clauses })
    }
}

/// Represents the result of parsing or evaluating an expression.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an invalid date-range expression. Grammar problems and
/// value problems are distinct variants so callers can tell a garbled
/// clause from a well-formed clause with a bad value.
#[derive(Debug)]
pub enum Error {
    /// The expression or a clause does not conform to the grammar.
    Parse(ParseError),

    /// A value token cannot be converted to the type its clause
    /// requires.
    Value(ValueError),
}

/// Represents a clause that does not conform to the grammar.
#[derive(Debug)]
pub enum ParseError {
    /// Returned for an empty clause (including the empty expression).
    EmptyClause,

    /// Returned when a clause has no comparison operator.
    MissingOperator { clause: String },

    /// Returned when a clause's attribute keyword is not recognized.
    UnknownAttribute { token: String },
}

/// Represents a value token that cannot be converted to the type its
/// clause requires.
#[derive(Debug)]
pub enum ValueError {
    /// Returned when a field attribute's value is not an integer.
    Int {
        value: String,
        err: std::num::ParseIntError,
    },

    /// Returned when a whole-timestamp clause's value is not a
    /// recognized date.
    Date(datetime::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Value(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Value(err) => Some(err),
        }
    }
}

impl fmt::Display for ParseError {
    /// Displays a [`ParseError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::EmptyClause => write!(f, "empty clause"),
            ParseError::MissingOperator { clause } => {
                write!(f, "missing comparison operator in clause `{}`", clause)
            }
            ParseError::UnknownAttribute { token } => {
                write!(f, "unknown date attribute `{}`", token)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl fmt::Display for ValueError {
    /// Displays a [`ValueError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValueError::Int { value, err } => {
                write!(f, "invalid integer `{}`: {}", value, err)
            }
            ValueError::Date(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ValueError {
    /// Implements the [`std::error::Error`] trait for [`ValueError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ValueError::Int { value: _, err } => Some(err),
            ValueError::Date(err) => Some(err),
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator while parsing clauses.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<ValueError> for Error {
    /// Converts [`ValueError`]s into [`Error`]. This allows us to use
    /// the `?` operator while parsing clauses.
    fn from(err: ValueError) -> Error {
        Error::Value(err)
    }
}
