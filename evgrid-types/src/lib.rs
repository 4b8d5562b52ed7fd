//! evgrid-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod dataset;
mod error;
mod reading;
mod reports;

pub use config::{FrequencySource, PipelineConfig, ReferencePolicy, Verdict};
pub use dataset::WindowedDataset;
pub use error::EvError;
pub use reading::{Column, ConnectorReading, StationBatch, StationId};
pub use reports::{
    IngestReport, MergeSummary, NormalizeReport, PromoteOutcome, PromoteReport, StationEntry,
    StationReport,
};
