use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use evgrid_core::store::{SeriesStore, StoredSeries};
use evgrid_core::{ConnectorReading, EvError, StationId};

use crate::{MemoryStore, lock};

/// Instruction for how the store should treat one station.
#[derive(Debug, Clone)]
pub enum StoreBehavior {
    /// Fail every `save`; the committed series stays as it was.
    FailSave(EvError),
    /// Fail every `load`.
    FailLoad(EvError),
    /// Sleep before committing a `save`, widening the write window.
    SlowSave(Duration),
}

#[derive(Debug, Default)]
struct InFlight {
    current: HashMap<StationId, usize>,
    peak: HashMap<StationId, usize>,
}

/// A [`MemoryStore`] with per-station scripted failures and latency.
///
/// Also records how many saves for the same station overlapped, which lets
/// tests check the single-writer guarantee.
#[derive(Debug, Default)]
pub struct ScriptedStore {
    inner: MemoryStore,
    rules: Mutex<HashMap<StationId, StoreBehavior>>,
    in_flight: Mutex<InFlight>,
}

impl ScriptedStore {
    /// Wrap an existing store.
    #[must_use]
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            rules: Mutex::default(),
            in_flight: Mutex::default(),
        }
    }

    /// Set the behavior for a station, replacing any previous rule.
    pub fn set_behavior(&self, station: &StationId, behavior: StoreBehavior) {
        lock(&self.rules).insert(station.clone(), behavior);
    }

    /// The wrapped store.
    #[must_use]
    pub const fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Largest number of simultaneous saves observed for a station.
    #[must_use]
    pub fn peak_concurrent_saves(&self, station: &StationId) -> usize {
        lock(&self.in_flight).peak.get(station).copied().unwrap_or(0)
    }

    fn rule(&self, station: &StationId) -> Option<StoreBehavior> {
        lock(&self.rules).get(station).cloned()
    }

    fn enter(&self, station: &StationId) {
        let mut f = lock(&self.in_flight);
        let n = {
            let c = f.current.entry(station.clone()).or_insert(0);
            *c += 1;
            *c
        };
        let peak = f.peak.entry(station.clone()).or_insert(0);
        *peak = (*peak).max(n);
    }

    fn leave(&self, station: &StationId) {
        if let Some(c) = lock(&self.in_flight).current.get_mut(station) {
            *c = c.saturating_sub(1);
        }
    }
}

impl SeriesStore for ScriptedStore {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn load(&self, station: &StationId) -> Result<Option<StoredSeries>, EvError> {
        if let Some(StoreBehavior::FailLoad(e)) = self.rule(station) {
            return Err(e);
        }
        self.inner.load(station)
    }

    fn save(&self, station: &StationId, readings: &[ConnectorReading]) -> Result<(), EvError> {
        self.enter(station);
        let result = match self.rule(station) {
            Some(StoreBehavior::FailSave(e)) => Err(e),
            Some(StoreBehavior::SlowSave(d)) => {
                std::thread::sleep(d);
                self.inner.save(station, readings)
            }
            _ => self.inner.save(station, readings),
        };
        self.leave(station);
        result
    }

    fn stations(&self) -> Result<Vec<StationId>, EvError> {
        self.inner.stations()
    }
}
