use esg_client::domain::MetricCategory;
use time::{
    format_description::well_known::Rfc3339,
    macros::{datetime, format_description, time},
    Date, OffsetDateTime,
};

use crate::pipeline::PipelineError;

/// Longest trailing analysis window; a century covers the whole sanity range.
pub const MAX_TRAILING_DAYS: i64 = 36_500;

/// Closed time interval `[start, end]`, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl TimeWindow {
    /// Rules:
    /// - start must not be after end.
    /// - both bounds must be within the sanity window [2000-01-01, 2100-01-01].
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Result<Self, PipelineError> {
        if start > end {
            return Err(PipelineError::Validation(format!(
                "window start {start} is after end {end}"
            )));
        }

        let min_ts = datetime!(2000-01-01 00:00:00 UTC);
        let max_ts = datetime!(2100-01-01 00:00:00 UTC);

        if start < min_ts || end > max_ts {
            return Err(PipelineError::Validation("timestamp out of allowed range".to_string()));
        }

        Ok(Self { start, end })
    }

    /// Window of `days` ending at `end`, `days` in `1..=MAX_TRAILING_DAYS`.
    pub fn trailing(end: OffsetDateTime, days: i64) -> Result<Self, PipelineError> {
        if !(1..=MAX_TRAILING_DAYS).contains(&days) {
            return Err(PipelineError::Validation(format!(
                "analysis window must be between 1 and {MAX_TRAILING_DAYS} days, got {days}"
            )));
        }
        let start = end
            .checked_sub(time::Duration::days(days))
            .ok_or_else(|| PipelineError::Validation("timestamp out of allowed range".to_string()))?;
        Self::new(start, end)
    }

    /// `"<start> to <end>"` in RFC 3339.
    pub fn describe(&self) -> String {
        let fmt = |ts: OffsetDateTime| ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string());
        format!("{} to {}", fmt(self.start), fmt(self.end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
///
/// A date-only end bound covers the whole day.
pub fn parse_bound(raw: &str, bound: Bound) -> Result<OffsetDateTime, PipelineError> {
    let raw = raw.trim();

    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(ts);
    }

    let date = Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|e| PipelineError::Validation(format!("invalid date '{raw}': {e}")))?;

    let at = match bound {
        Bound::Start => time!(00:00:00),
        Bound::End => time!(23:59:59.999999999),
    };
    Ok(date.with_time(at).assume_utc())
}

pub fn parse_window(start: &str, end: &str) -> Result<TimeWindow, PipelineError> {
    TimeWindow::new(parse_bound(start, Bound::Start)?, parse_bound(end, Bound::End)?)
}

pub fn parse_category(raw: &str) -> Result<MetricCategory, PipelineError> {
    raw.parse::<MetricCategory>()
        .map_err(|e| PipelineError::Validation(e.to_string()))
}
