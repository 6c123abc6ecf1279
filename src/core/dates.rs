//! Fail-closed date parsing.
//!
//! Accepts ISO 8601 (`YYYY-MM-DD`) and the unambiguous German form
//! (`DD.MM.YYYY`). Slash-delimited dates are rejected outright: the
//! month/day order of `03/04/2025` cannot be determined, and guessing
//! wrong on a legal document is worse than failing.

use chrono::NaiveDate;

use super::error::ConvertError;

/// Parse an external date string into a [`NaiveDate`].
pub fn parse_date(input: &str) -> Result<NaiveDate, ConvertError> {
    let trimmed = input.trim();

    if trimmed.contains('/') {
        return Err(ConvertError::AmbiguousDate(trimmed.to_string()));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d.%m.%Y"))
        .map_err(|_| ConvertError::InvalidDate(trimmed.to_string()))
}
