//! The library code for the `daterange` post-filtering engine. The
//! architecture can be generally broken down into two distinct steps:
//!
//! 1. Parsing date-range expressions into typed clauses ([`crate::expr`])
//! 2. Evaluating those clauses against timestamps ([`crate::matcher`])
//!
//! An expression is a comma-separated sequence of clauses combined with
//! logical AND. Each clause either restricts one numeric field of the
//! tested timestamp (`year==2020`, `weekday==0`) or compares the whole
//! timestamp against a date literal or the reference current time
//! (`<=now`). Expressions are parsed fresh on every evaluation and carry
//! no state between calls.
//!
//! On top of the matcher sits a post-selection layer ([`crate::filter`]):
//! a [`crate::filter::Query`] of optional criteria (kind, tags,
//! categories, sections, slugs, a date-range expression, sorting, and a
//! slicing window) applied to a timeline of [`crate::post::Post`]
//! metadata records by a [`crate::filter::Filter`]. The current time is
//! never read ambiently; it enters through the [`crate::clock::Clock`]
//! capability so that evaluation is deterministic under test.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod clock;
pub mod datetime;
pub mod expr;
pub mod filter;
pub mod matcher;
pub mod post;
