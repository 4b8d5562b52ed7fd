//! Report envelopes produced by the engine and the orchestrator.

use serde::{Deserialize, Serialize};

use crate::error::EvError;
use crate::reading::StationId;

/// Row accounting for one merge of a batch into a station series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergeSummary {
    /// Rows in the series before the merge.
    pub existing: usize,
    /// Rows in the incoming batch.
    pub incoming: usize,
    /// Existing rows whose natural key was redefined by the batch.
    pub replaced: usize,
    /// Rows in the merged series.
    pub merged: usize,
}

impl MergeSummary {
    /// Number of natural keys the batch introduced.
    #[must_use]
    pub const fn added(&self) -> usize {
        self.merged.saturating_sub(self.existing)
    }
}

/// Row accounting for one regularization pass.
///
/// `dropped_unparseable` is the non-fatal count of rows whose timestamp could
/// not be resolved to a local instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizeReport {
    /// Rows handed to the normalizer.
    pub input_rows: usize,
    /// Rows excluded by the connector-type filter.
    pub filtered_out: usize,
    /// Rows dropped because the timestamp could not be parsed or localized.
    pub dropped_unparseable: usize,
    /// Rows discarded because a later row localized to the same instant.
    pub collapsed_duplicates: usize,
    /// Surviving rows that do not fall exactly on a grid slot.
    pub off_grid: usize,
    /// Grid slots produced.
    pub slots: usize,
    /// Grid slots holding an observation.
    pub observed: usize,
}

impl NormalizeReport {
    /// Grid slots holding the missing marker.
    #[must_use]
    pub const fn missing(&self) -> usize {
        self.slots.saturating_sub(self.observed)
    }
}

/// Successful outcome for one station inside a multi-station report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationEntry<T> {
    /// Station the outcome belongs to.
    pub station: StationId,
    /// Operation-specific payload.
    pub outcome: T,
}

/// Summary of a multi-station operation.
///
/// Carries the stations that completed and any per-station failures or skips.
/// One station's failure never removes another station's entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport<T> {
    /// Stations that completed, in request order.
    pub entries: Vec<StationEntry<T>>,
    /// Station-tagged skips and failures, in request order.
    pub warnings: Vec<EvError>,
}

impl<T> Default for StationReport<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl<T> StationReport<T> {
    /// Look up the outcome for a station.
    #[must_use]
    pub fn get(&self, station: &StationId) -> Option<&T> {
        self.entries
            .iter()
            .find(|e| &e.station == station)
            .map(|e| &e.outcome)
    }

    /// Warnings that mean "station skipped" (missing columns, too few rows, no series).
    pub fn skipped(&self) -> impl Iterator<Item = &EvError> {
        self.warnings.iter().filter(|e| e.is_skip())
    }

    /// Warnings that are hard failures for their station.
    pub fn failed(&self) -> impl Iterator<Item = &EvError> {
        self.warnings.iter().filter(|e| !e.is_skip())
    }
}

/// What reference promotion did for one station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromoteOutcome {
    /// No reference existed; current data became the reference.
    Seeded,
    /// The reference was overwritten with current data.
    Replaced,
    /// The reference was kept because the policy required a pass verdict.
    Retained,
}

/// Multi-station ingest summary.
pub type IngestReport = StationReport<MergeSummary>;

/// Multi-station reference promotion summary.
pub type PromoteReport = StationReport<PromoteOutcome>;
