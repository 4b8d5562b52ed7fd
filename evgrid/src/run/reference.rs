use std::sync::Arc;

use evgrid_core::{EvError, PromoteOutcome, PromoteReport, StationId, Verdict};

use crate::Pipeline;
use crate::core::run_blocking;
use crate::run::util::{collect_report, station_failure};

impl Pipeline {
    /// Promote a station's current series to its reference baseline.
    ///
    /// Behavior:
    /// - A station without a reference is seeded whatever the verdict.
    /// - Otherwise the configured [`ReferencePolicy`](evgrid_core::ReferencePolicy)
    ///   decides: `OnPass` replaces only on [`Verdict::Pass`], `Always` replaces
    ///   unconditionally.
    /// - Holds the station's lock so the copied series is a committed one.
    ///
    /// # Errors
    /// `InvalidArg` without a reference store; station-tagged `NotFound` without
    /// a current series, `InsufficientData` below `min_reference_rows`, and
    /// store failures.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "evgrid::promote_reference",
            skip(self),
            fields(station = %station, verdict = ?verdict),
        )
    )]
    pub async fn promote_reference(
        &self,
        station: &StationId,
        verdict: Verdict,
    ) -> Result<PromoteOutcome, EvError> {
        let reference = Arc::clone(self.reference_store()?);
        let current = Arc::clone(&self.store);
        let policy = self.cfg.reference_policy;
        let min_rows = self.cfg.min_reference_rows;

        let guard = self.locks.acquire(station).await;
        let st = station.clone();
        let result = run_blocking(station, move || {
            let _guard = guard;
            evgrid_core::promote_reference(
                current.as_ref(),
                reference.as_ref(),
                &st,
                verdict,
                policy,
                min_rows,
            )
        })
        .await;

        match result {
            Ok(outcome) => {
                #[cfg(feature = "tracing")]
                tracing::info!(?outcome, "reference promotion");
                Ok(outcome)
            }
            Err(e) => Err(station_failure(station, "promote_reference", e)),
        }
    }

    /// Promote many stations concurrently, each with its own verdict.
    ///
    /// Without a reference store every station is reported with `InvalidArg`.
    pub async fn promote_all(&self, verdicts: &[(StationId, Verdict)]) -> PromoteReport {
        let tasks = verdicts.iter().map(|(station, verdict)| async move {
            (
                station.clone(),
                self.promote_reference(station, *verdict).await,
            )
        });
        collect_report(futures::future::join_all(tasks).await)
    }
}
