//! Test doubles for the evgrid pipeline.
//!
//! Stores here are synchronous like every `SeriesStore`; the pipeline calls
//! them from blocking threads.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use evgrid_core::store::{SeriesStore, StoredSeries};
use evgrid_core::{ConnectorReading, EvError, StationId};

mod dynamic;
pub mod fixtures;

pub use dynamic::{ScriptedStore, StoreBehavior};

/// Lock a mutex, recovering the data if another test thread panicked.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Series store backed by a map; `save` replaces a station's entry in one step.
#[derive(Debug, Default)]
pub struct MemoryStore {
    series: Mutex<BTreeMap<StationId, StoredSeries>>,
    saves: Mutex<Vec<StationId>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a station with a series carrying every standard column.
    #[must_use]
    pub fn with_series(self, station: &StationId, readings: Vec<ConnectorReading>) -> Self {
        lock(&self.series).insert(station.clone(), StoredSeries::with_all_columns(readings));
        self
    }

    /// Seed a station with a series that only carried `columns`.
    #[must_use]
    pub fn with_columns(
        self,
        station: &StationId,
        columns: &[&str],
        readings: Vec<ConnectorReading>,
    ) -> Self {
        let stored = StoredSeries {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            readings,
        };
        lock(&self.series).insert(station.clone(), stored);
        self
    }

    /// Current rows of a station.
    #[must_use]
    pub fn readings(&self, station: &StationId) -> Option<Vec<ConnectorReading>> {
        lock(&self.series).get(station).map(|s| s.readings.clone())
    }

    /// Stations in the order their saves were committed.
    #[must_use]
    pub fn saved(&self) -> Vec<StationId> {
        lock(&self.saves).clone()
    }
}

impl SeriesStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self, station: &StationId) -> Result<Option<StoredSeries>, EvError> {
        Ok(lock(&self.series).get(station).cloned())
    }

    fn save(&self, station: &StationId, readings: &[ConnectorReading]) -> Result<(), EvError> {
        lock(&self.series).insert(
            station.clone(),
            StoredSeries::with_all_columns(readings.to_vec()),
        );
        lock(&self.saves).push(station.clone());
        Ok(())
    }

    fn stations(&self) -> Result<Vec<StationId>, EvError> {
        Ok(lock(&self.series).keys().cloned().collect())
    }
}
