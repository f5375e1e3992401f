//! # Engine Limits
//!
//! Fixed constants and bounds for the catalogue engine.
//!
//! All limits live here so the boundary rules are auditable in one place.

use chrono::NaiveDate;

/// Maximum film description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Number of films returned by the popularity ranking when the caller
/// passes a non-positive count.
pub const DEFAULT_POPULAR_COUNT: usize = 10;

/// Earliest admissible film release date: the first public film screening
/// (Lumiere brothers, 1895-12-28). Release dates before this are rejected.
#[must_use]
pub fn min_release_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1895, 12, 28).unwrap_or(NaiveDate::MIN)
}
