//! Re-export of the shared data types from `evgrid-types`.
// Consolidated so downstream crates can depend on `evgrid-core` only.

pub use evgrid_types::{
    Column, ConnectorReading, EvError, FrequencySource, IngestReport, MergeSummary,
    NormalizeReport, PipelineConfig, PromoteOutcome, PromoteReport, ReferencePolicy,
    StationBatch, StationEntry, StationId, StationReport, Verdict, WindowedDataset,
};
