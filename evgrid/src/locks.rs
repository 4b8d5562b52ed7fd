use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use evgrid_core::StationId;
use tokio::sync::OwnedMutexGuard;

type LockMap = Mutex<HashMap<StationId, Arc<tokio::sync::Mutex<()>>>>;

fn lock_map(map: &LockMap) -> MutexGuard<'_, HashMap<StationId, Arc<tokio::sync::Mutex<()>>>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive locks keyed by station identifier, created on first use.
///
/// Distinct stations never contend. The guard is owned so it can move into the
/// blocking task doing the write and outlive a cancelled caller. An entry is
/// dropped from the map once its last holder releases it and nobody waits.
#[derive(Debug, Default)]
pub(crate) struct StationLocks {
    inner: Arc<LockMap>,
}

/// Held lock for one station; releasing it prunes the idle map entry.
pub(crate) struct StationGuard {
    guard: Option<OwnedMutexGuard<()>>,
    station: StationId,
    map: Arc<LockMap>,
}

impl Drop for StationGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut map = lock_map(&self.map);
        // Waiters and holders clone the Arc under this map lock, so a count of
        // one means the map's own handle is the last.
        if map
            .get(&self.station)
            .is_some_and(|l| Arc::strong_count(l) == 1)
        {
            map.remove(&self.station);
        }
    }
}

impl StationLocks {
    pub(crate) async fn acquire(&self, station: &StationId) -> StationGuard {
        let lock = {
            let mut map = lock_map(&self.inner);
            Arc::clone(map.entry(station.clone()).or_default())
        };
        StationGuard {
            guard: Some(lock.lock_owned().await),
            station: station.clone(),
            map: Arc::clone(&self.inner),
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        lock_map(&self.inner).len()
    }
}
