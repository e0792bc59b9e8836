//! ISO 8601 time intervals.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use super::error::{QueryError, QueryResult};

/// A half-open `[start, end)` time range.
///
/// Construction guarantees `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> QueryResult<Self> {
        if start >= end {
            return Err(QueryError::InvalidInterval {
                start: format_instant(&start),
                end: format_instant(&end),
            });
        }
        Ok(Self { start, end })
    }

    /// Build an interval from two timestamp strings.
    ///
    /// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
    pub fn between(start: &str, end: &str) -> QueryResult<Self> {
        Self::new(parse_instant(start)?, parse_instant(end)?)
    }

    /// Parse the `start/end` form used on the wire.
    pub fn parse(s: &str) -> QueryResult<Self> {
        let (start, end) = s.split_once('/').ok_or_else(|| QueryError::IntervalParse {
            input: s.to_string(),
            reason: "expected '<start>/<end>'".to_string(),
        })?;
        Self::between(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Wire form, e.g. `2020-01-01T00:00:00.000Z/2020-01-02T00:00:00.000Z`.
    pub fn to_iso(&self) -> String {
        format!("{}/{}", format_instant(&self.start), format_instant(&self.end))
    }
}

fn format_instant(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_instant(s: &str) -> QueryResult<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(t) = d.and_hms_opt(0, 0, 0) {
            return Ok(t.and_utc());
        }
    }
    Err(QueryError::IntervalParse {
        input: s.to_string(),
        reason: "not an ISO 8601 timestamp or date".to_string(),
    })
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

impl FromStr for Interval {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::parse(s)
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso())
    }
}
