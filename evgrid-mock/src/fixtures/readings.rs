use chrono::{NaiveDateTime, TimeDelta};
use evgrid_core::{ConnectorReading, StationId};

/// Naive local start of every generated series.
pub const DEFAULT_START: &str = "2024-05-01T00:00:00";

/// Build a station id, panicking on an invalid literal.
///
/// # Panics
/// When `id` is not a valid station identifier.
#[must_use]
pub fn station(id: &str) -> StationId {
    match StationId::new(id) {
        Ok(s) => s,
        Err(e) => panic!("fixture station id {id:?}: {e}"),
    }
}

/// `n` readings of one connector spaced `step_minutes` apart from
/// [`DEFAULT_START`], with availability cycling through `0..=total`.
///
/// Indices listed in `gaps` are left out.
///
/// # Panics
/// If [`DEFAULT_START`] does not parse.
#[must_use]
pub fn regular_series(
    n: usize,
    step_minutes: i64,
    connector: &str,
    total: u32,
    gaps: &[usize],
) -> Vec<ConnectorReading> {
    let start = match NaiveDateTime::parse_from_str(DEFAULT_START, "%Y-%m-%dT%H:%M:%S") {
        Ok(t) => t,
        Err(e) => panic!("fixture start: {e}"),
    };
    (0..n)
        .filter(|i| !gaps.contains(i))
        .map(|i| {
            let offset = TimeDelta::minutes(step_minutes * i64::try_from(i).unwrap_or(i64::MAX));
            let ts = (start + offset).format("%Y-%m-%dT%H:%M:%S").to_string();
            let available = u32::try_from(i).map_or(0, |i| i % (total + 1));
            let mut r = ConnectorReading::new(ts, connector).with_counts(
                total,
                available,
                total - available,
                0,
            );
            r.name = "Fixture station".into();
            r.address = "Trg republike 1, Ljubljana".into();
            r.lat = Some(46.0511);
            r.lon = Some(14.5051);
            r
        })
        .collect()
}
