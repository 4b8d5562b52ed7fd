use evgrid_core::{EvError, StationEntry, StationId, StationReport};

/// Fold per-station results into a report, keeping request order.
///
/// Errors are expected to be station-tagged already; skips and hard failures
/// both land in `warnings` and never remove another station's entry.
pub fn collect_report<T>(results: Vec<(StationId, Result<T, EvError>)>) -> StationReport<T> {
    let mut report = StationReport::default();
    for (station, result) in results {
        match result {
            Ok(outcome) => report.entries.push(StationEntry { station, outcome }),
            Err(e) => report.warnings.push(EvError::for_station(station.as_str(), e)),
        }
    }
    report
}

/// Tag a station failure and log it at a level matching its kind.
pub(crate) fn station_failure(station: &StationId, op: &'static str, e: EvError) -> EvError {
    if e.is_skip() {
        #[cfg(feature = "tracing")]
        tracing::warn!(station = %station, op, error = %e, "station skipped");
    } else {
        #[cfg(feature = "tracing")]
        tracing::error!(station = %station, op, error = %e, "station failed");
    }
    #[cfg(not(feature = "tracing"))]
    let _ = op;
    EvError::for_station(station.as_str(), e)
}
