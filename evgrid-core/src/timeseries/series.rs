use chrono_tz::Tz;
use evgrid_types::{ConnectorReading, MergeSummary};

use super::merge::merge_readings;

/// Ordered, key-unique readings of one station.
///
/// Only constructible through a merge, so every value upholds the series
/// invariants: unique `(timestamp, connector_type)` and ascending timestamps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationSeries {
    readings: Vec<ConnectorReading>,
}

impl StationSeries {
    /// An empty series.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            readings: Vec::new(),
        }
    }

    /// Build a series from readings in arbitrary order (later duplicates win).
    pub fn from_readings<I>(readings: I, tz: Tz) -> Self
    where
        I: IntoIterator<Item = ConnectorReading>,
    {
        Self::new().merge(readings, tz).0
    }

    /// Absorb a batch of readings; see [`merge_readings`].
    #[must_use]
    pub fn merge<I>(self, incoming: I, tz: Tz) -> (Self, MergeSummary)
    where
        I: IntoIterator<Item = ConnectorReading>,
    {
        let (readings, summary) = merge_readings(self.readings, incoming, tz);
        (Self { readings }, summary)
    }

    /// Readings in series order.
    #[must_use]
    pub fn readings(&self) -> &[ConnectorReading] {
        &self.readings
    }

    /// Consume the series, yielding its readings.
    #[must_use]
    pub fn into_readings(self) -> Vec<ConnectorReading> {
        self.readings
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// `true` when the series holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
