//! Persistence seam for station series.
//!
//! A store holds one addressable series per [`StationId`]. Writes replace the
//! whole series and must be atomic: a failed `save` leaves the previously
//! committed series readable and intact.

mod csv_store;
mod reference;

pub use csv_store::CsvSeriesStore;
pub use reference::promote_reference;

use evgrid_types::{ConnectorReading, EvError, StationId};

/// Persisted column order.
pub const SERIES_COLUMNS: [&str; 10] = [
    "timestamp",
    "name",
    "address",
    "lat",
    "lon",
    "type",
    "total",
    "available",
    "occupied",
    "unknown",
];

/// A series as read back from a store, with the columns it actually carried.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSeries {
    /// Column names present in the persisted resource.
    pub columns: Vec<String>,
    /// Rows in persisted order.
    pub readings: Vec<ConnectorReading>,
}

impl StoredSeries {
    /// A series carrying every standard column.
    #[must_use]
    pub fn with_all_columns(readings: Vec<ConnectorReading>) -> Self {
        Self {
            columns: SERIES_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            readings,
        }
    }

    /// Whether `column` was present.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Ensure every listed column was present.
    ///
    /// # Errors
    /// `MissingColumn` naming the first absent column.
    pub fn require_columns(&self, columns: &[&str]) -> Result<(), EvError> {
        match columns.iter().find(|c| !self.has_column(c)) {
            Some(missing) => Err(EvError::missing_column(*missing)),
            None => Ok(()),
        }
    }
}

/// Storage of per-station series.
///
/// Implementations are synchronous; callers run them on blocking threads and
/// guarantee a single writer per station.
pub trait SeriesStore: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Read the series of `station`; `Ok(None)` when nothing was persisted yet.
    ///
    /// # Errors
    /// I/O or decoding failures.
    fn load(&self, station: &StationId) -> Result<Option<StoredSeries>, EvError>;

    /// Atomically replace the series of `station` with `readings`.
    ///
    /// # Errors
    /// I/O or encoding failures; the previous series must survive them.
    fn save(&self, station: &StationId, readings: &[ConnectorReading]) -> Result<(), EvError>;

    /// Stations with a persisted series, sorted.
    ///
    /// # Errors
    /// I/O failures while enumerating.
    fn stations(&self) -> Result<Vec<StationId>, EvError>;
}
