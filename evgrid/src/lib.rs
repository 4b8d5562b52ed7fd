//! evgrid runs the per-station pipeline for EV-charger availability data.
//!
//! Overview
//! - Ingests availability batches, or a raw upstream snapshot payload, and merges
//!   them into each station's persisted series (last write wins per
//!   `(timestamp, connector_type)`).
//! - Regularizes a series onto a fixed-step grid in the configured civil time
//!   zone and turns the target column into supervised lookback windows.
//! - Promotes current data to a reference baseline under a pass/fail policy.
//!
//! Key behaviors and trade-offs
//! - Stations are independent: multi-station calls fan out concurrently and
//!   return a [`StationReport`] whose `warnings` carry station-tagged skips and
//!   failures. One station never aborts another.
//! - Writes to one station are serialized by a lock keyed by its identifier;
//!   reads take no lock because stores replace a series atomically.
//! - Store work is synchronous and runs on Tokio's blocking pool.
//! - Unparseable timestamps are dropped and counted, never fatal.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use evgrid::{CsvSeriesStore, Pipeline, Verdict};
//!
//! let pipeline = Pipeline::builder()
//!     .with_store(Arc::new(CsvSeriesStore::new("data/current")))
//!     .with_reference_store(Arc::new(CsvSeriesStore::new("data/reference")))
//!     .window_size(24)
//!     .test_size(12)
//!     .build()?;
//!
//! let ingest = pipeline.ingest_snapshot(&payload).await?;
//! let prepared = pipeline.prepare_every_station().await?;
//! for entry in &prepared.entries {
//!     let (x, y) = entry.outcome.training.train.to_f32();
//!     // hand x / y to the trainer
//! }
//! let promoted = pipeline.promote_all(&[(station, Verdict::Pass)]).await;
//! ```
//!
//! See `evgrid/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod locks;
mod run;

pub use core::{Pipeline, PipelineBuilder};
pub use run::prepare::{PrepareReport, StationDataset};
pub use run::util::collect_report;

// Re-export engine types for convenience
pub use evgrid_core::{
    Column, ConnectorReading, CsvSeriesStore, EvError, FrequencySource, IngestReport,
    MeanImputer, MergeSummary, MinMaxScaler, NormalizeReport, PipelineConfig, PromoteOutcome,
    PromoteReport, ReferencePolicy, RegularizedSeries, SeriesStore, StationBatch, StationEntry,
    StationId, StationReport, StoredSeries, TrainingSet, Verdict, WindowedDataset,
};
