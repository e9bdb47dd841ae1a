//! Timestamp parsing and the operator display zone.
//!
//! SDK clients send either RFC 3339 strings or naive local-less strings
//! (`2024-05-01T10:00:00`). Naive values are taken as UTC, matching how a
//! `TIMESTAMPTZ` column interprets them in a UTC session.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Accepted naive formats, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a client-supplied timestamp.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<Timestamp, CoreError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    Err(CoreError::Validation(format!(
        "{field} is not a valid timestamp: '{raw}'"
    )))
}

/// Parse an optional timestamp; absent or blank input is `None`.
pub fn parse_optional_timestamp(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<Timestamp>, CoreError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_timestamp(field, raw).map(Some),
        None => Ok(None),
    }
}

/// Fixed UTC offset used to render timestamps and bucket days/weeks/months
/// for operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayZone(FixedOffset);

/// Default display offset (UTC+9).
pub const DEFAULT_DISPLAY_OFFSET_HOURS: i32 = 9;

impl DisplayZone {
    /// Build a zone from a whole-hour offset. Out-of-range offsets fall back
    /// to UTC.
    pub fn from_hours(hours: i32) -> Self {
        let offset = hours.checked_mul(3600).and_then(FixedOffset::east_opt);
        Self(offset.unwrap_or_else(|| Utc.fix()))
    }

    pub fn offset(&self) -> FixedOffset {
        self.0
    }

    /// Convert a UTC timestamp into the display zone.
    pub fn localize(&self, ts: Timestamp) -> DateTime<FixedOffset> {
        ts.with_timezone(&self.0)
    }

    /// Render as `YYYY-MM-DD HH:MM:SS` in the display zone.
    pub fn format(&self, ts: Timestamp) -> String {
        self.localize(ts).format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Calendar date of `ts` in the display zone.
    pub fn date_of(&self, ts: Timestamp) -> NaiveDate {
        self.localize(ts).date_naive()
    }

    /// UTC instant at which `date` begins in the display zone.
    pub fn start_of_day(&self, date: NaiveDate) -> Timestamp {
        let midnight = date.and_time(NaiveTime::MIN);
        let shift = chrono::Duration::seconds(i64::from(self.0.local_minus_utc()));
        Utc.from_utc_datetime(&(midnight - shift))
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self::from_hours(DEFAULT_DISPLAY_OFFSET_HOURS)
    }
}

/// Parse a `YYYY-MM` month filter into `[start, end)` UTC bounds in `zone`.
pub fn month_bounds(raw: &str, zone: DisplayZone) -> Result<(Timestamp, Timestamp), CoreError> {
    let invalid = || CoreError::Validation(format!("month must be YYYY-MM, got '{raw}'"));
    let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;

    Ok((zone.start_of_day(first), zone.start_of_day(next)))
}
