use chrono::offset::LocalResult;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Why a raw timestamp could not be resolved to a local instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// The text matches none of the accepted ISO-8601 layouts.
    #[error("unrecognized timestamp format")]
    Malformed,
    /// A naive wall-clock time that occurs twice (DST fall-back overlap).
    #[error("ambiguous local time")]
    Ambiguous,
    /// A naive wall-clock time skipped by a DST spring-forward gap.
    #[error("nonexistent local time")]
    Nonexistent,
}

/// A syntactically valid timestamp, before localization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    /// Carries its own UTC offset.
    Aware(DateTime<FixedOffset>),
    /// Wall-clock time with no zone; interpreted in the canonical zone.
    Naive(NaiveDateTime),
}

const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse raw timestamp text without resolving it against a zone.
///
/// Accepts RFC 3339 (`Z` or numeric offsets), ISO-8601 with `T` or space
/// separators, optional fractional seconds, and bare dates (midnight).
///
/// # Errors
/// Returns `TimestampError::Malformed` when no layout matches.
pub fn parse_timestamp(raw: &str) -> Result<ParsedTimestamp, TimestampError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(TimestampError::Malformed);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(ParsedTimestamp::Aware(dt));
    }
    for fmt in AWARE_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(ParsedTimestamp::Aware(dt));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ParsedTimestamp::Naive(dt));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(ParsedTimestamp::Naive)
        .ok_or(TimestampError::Malformed)
}

impl ParsedTimestamp {
    /// Wall-clock time in `tz` with the offset stripped.
    ///
    /// Aware values are converted; naive values are taken as already local and
    /// rejected when `tz` has no unique mapping for them.
    ///
    /// # Errors
    /// `Ambiguous` or `Nonexistent` for naive times inside a DST transition.
    pub fn to_local(self, tz: Tz) -> Result<NaiveDateTime, TimestampError> {
        match self {
            Self::Aware(dt) => Ok(dt.with_timezone(&tz).naive_local()),
            Self::Naive(naive) => match tz.from_local_datetime(&naive) {
                LocalResult::Single(_) => Ok(naive),
                LocalResult::Ambiguous(..) => Err(TimestampError::Ambiguous),
                LocalResult::None => Err(TimestampError::Nonexistent),
            },
        }
    }

    /// Absolute instant, resolving naive values in `tz`.
    ///
    /// # Errors
    /// `Ambiguous` or `Nonexistent` for naive times inside a DST transition.
    pub fn to_utc(self, tz: Tz) -> Result<DateTime<Utc>, TimestampError> {
        match self {
            Self::Aware(dt) => Ok(dt.with_timezone(&Utc)),
            Self::Naive(naive) => match tz.from_local_datetime(&naive) {
                LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
                LocalResult::Ambiguous(..) => Err(TimestampError::Ambiguous),
                LocalResult::None => Err(TimestampError::Nonexistent),
            },
        }
    }
}

/// Resolve raw timestamp text to naive wall-clock time in the canonical zone.
///
/// This is the single entry point used by the normalizer; every failure is an
/// explicit `TimestampError`, never a panic.
///
/// # Errors
/// See [`parse_timestamp`] and [`ParsedTimestamp::to_local`].
pub fn localize(raw: &str, tz: Tz) -> Result<NaiveDateTime, TimestampError> {
    parse_timestamp(raw)?.to_local(tz)
}

/// Resolve raw timestamp text to an absolute UTC instant.
///
/// # Errors
/// See [`parse_timestamp`] and [`ParsedTimestamp::to_utc`].
pub fn resolve_utc(raw: &str, tz: Tz) -> Result<DateTime<Utc>, TimestampError> {
    parse_timestamp(raw)?.to_utc(tz)
}
