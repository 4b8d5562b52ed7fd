use std::collections::HashMap;
use std::sync::Arc;

use chrono_tz::Tz;
use evgrid_core::store::SeriesStore;
use evgrid_core::{
    ConnectorReading, EvError, IngestReport, MergeSummary, StationBatch, StationId,
    decode_snapshot, merge_readings,
};

use crate::Pipeline;
use crate::core::run_blocking;
use crate::run::util::{collect_report, station_failure};

/// Load, merge and atomically replace one station's series.
fn merge_into_store(
    store: &dyn SeriesStore,
    station: &StationId,
    readings: Vec<ConnectorReading>,
    tz: Tz,
) -> Result<MergeSummary, EvError> {
    let existing = store
        .load(station)?
        .map(|s| s.readings)
        .unwrap_or_default();
    let (merged, summary) = merge_readings(existing, readings, tz);
    store.save(station, &merged)?;
    Ok(summary)
}

/// Concatenate batches addressed to the same station, keeping request order.
fn coalesce(batches: Vec<StationBatch>) -> Vec<StationBatch> {
    let mut out: Vec<StationBatch> = Vec::with_capacity(batches.len());
    let mut index: HashMap<StationId, usize> = HashMap::new();
    for b in batches {
        match index.get(&b.station) {
            Some(&i) => out[i].readings.extend(b.readings),
            None => {
                index.insert(b.station.clone(), out.len());
                out.push(b);
            }
        }
    }
    out
}

impl Pipeline {
    /// Merge a batch into its station's persisted series.
    ///
    /// Behavior:
    /// - Holds the station's lock from load to commit; other stations proceed.
    /// - The series is replaced atomically; on a write failure the previously
    ///   committed series stays readable and the error is returned.
    /// - Dropping the returned future does not interrupt a write in progress.
    ///
    /// # Errors
    /// Station-tagged store failures (`Io`, `Codec`, `MissingColumn` for a
    /// stored series without a timestamp column).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "evgrid::ingest",
            skip(self, batch),
            fields(station = %batch.station, rows = batch.readings.len()),
        )
    )]
    pub async fn ingest(&self, batch: StationBatch) -> Result<MergeSummary, EvError> {
        let StationBatch { station, readings } = batch;
        let guard = self.locks.acquire(&station).await;
        let store = Arc::clone(&self.store);
        let tz = self.cfg.timezone;
        let st = station.clone();

        let result = run_blocking(&station, move || {
            let _guard = guard;
            merge_into_store(store.as_ref(), &st, readings, tz)
        })
        .await;

        match result {
            Ok(summary) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    existing = summary.existing,
                    incoming = summary.incoming,
                    replaced = summary.replaced,
                    merged = summary.merged,
                    "merged batch"
                );
                Ok(summary)
            }
            Err(e) => Err(station_failure(&station, "ingest", e)),
        }
    }

    /// Merge many batches concurrently, one unit of work per station.
    ///
    /// Batches for the same station are concatenated in request order first, so
    /// a later batch wins on a repeated `(timestamp, connector_type)`.
    /// Failures are reported per station and never abort the others.
    pub async fn ingest_all(&self, batches: Vec<StationBatch>) -> IngestReport {
        let tasks = coalesce(batches).into_iter().map(|batch| async move {
            let station = batch.station.clone();
            (station, self.ingest(batch).await)
        });
        collect_report(futures::future::join_all(tasks).await)
    }

    /// Decode an upstream availability payload and ingest every station in it.
    ///
    /// Entries with an invalid station identifier or a malformed field are
    /// reported as warnings and the rest of the payload is still ingested.
    /// Entries lacking an id, a timestamp or connectors are skipped silently.
    ///
    /// # Errors
    /// Returns `Codec` only when the payload itself cannot be decoded.
    pub async fn ingest_snapshot(&self, payload: &str) -> Result<IngestReport, EvError> {
        let decoded = decode_snapshot(payload)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            stations = decoded.batches.len(),
            skipped_entries = decoded.skipped_entries,
            skipped_connectors = decoded.skipped_connectors,
            malformed_entries = decoded.malformed_entries.len(),
            "decoded snapshot"
        );

        let mut report = self.ingest_all(decoded.batches).await;
        report.warnings.extend(decoded.invalid_stations);
        report.warnings.extend(decoded.malformed_entries);
        Ok(report)
    }
}
