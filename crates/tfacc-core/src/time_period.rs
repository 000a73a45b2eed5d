// crates/tfacc-core/src/time_period.rs
// ============================================================================
// Module: Budget Time Periods
// Description: Minute-precision timestamp format used by budget periods.
// Purpose: Format, parse, and compare budget start and end timestamps.
// Dependencies: time, thiserror
// ============================================================================

//! ## Overview
//! Budget periods are persisted as `YYYY-MM-DD_HH:MM` in UTC. The API keeps
//! sub-minute precision, so comparisons go through the persisted form.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::UtcOffset;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Persisted budget period layout.
const TIME_PERIOD_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]_[hour]:[minute]");

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Time period formatting and parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimePeriodError {
    /// Timestamp could not be rendered.
    #[error("time period format error: {0}")]
    Format(String),
    /// Text is not `YYYY-MM-DD_HH:MM`.
    #[error("time period parse error ({value}): {reason}")]
    Parse {
        /// Offending text.
        value: String,
        /// Parser message.
        reason: String,
    },
}

// ============================================================================
// SECTION: Format
// ============================================================================

/// Formats a timestamp as `YYYY-MM-DD_HH:MM` in UTC.
///
/// # Errors
///
/// Returns [`TimePeriodError::Format`] when the timestamp cannot be rendered.
pub fn format_time_period(value: OffsetDateTime) -> Result<String, TimePeriodError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(TIME_PERIOD_FORMAT)
        .map_err(|err| TimePeriodError::Format(err.to_string()))
}

/// Parses a `YYYY-MM-DD_HH:MM` timestamp as UTC.
///
/// # Errors
///
/// Returns [`TimePeriodError::Parse`] when the text does not match.
pub fn parse_time_period(value: &str) -> Result<OffsetDateTime, TimePeriodError> {
    PrimitiveDateTime::parse(value, TIME_PERIOD_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|err| TimePeriodError::Parse {
            value: value.to_string(),
            reason: err.to_string(),
        })
}

/// Returns true when both timestamps share the same persisted minute.
///
/// # Errors
///
/// Returns [`TimePeriodError::Format`] when either timestamp cannot be rendered.
pub fn same_period_minute(a: OffsetDateTime, b: OffsetDateTime) -> Result<bool, TimePeriodError> {
    Ok(format_time_period(a)? == format_time_period(b)?)
}
