//! evgrid-core
//!
//! Engine for per-station EV-charger availability series.
//!
//! - `timeseries`: timestamp resolution, merge by natural key, grid
//!   regularization and lookback windowing.
//! - `prepare`: held-out split, imputation and scaling ahead of windowing.
//! - `snapshot`: decoder for the upstream availability payload.
//! - `store`: the `SeriesStore` persistence seam and its CSV implementation.
//!
//! Everything here is synchronous and free of shared state; the `evgrid`
//! crate schedules it across stations.
#![warn(missing_docs)]

/// Training preparation for a regularized target column.
pub mod prepare;
/// Upstream snapshot decoding.
pub mod snapshot;
pub mod store;
/// Time-series engine.
pub mod timeseries;
pub mod types;

pub use prepare::{MeanImputer, MinMaxScaler, TrainingSet, prepare_training};
pub use snapshot::{DecodedSnapshot, decode_snapshot};
pub use store::{CsvSeriesStore, SERIES_COLUMNS, SeriesStore, StoredSeries, promote_reference};
pub use timeseries::infer::estimate_step;
pub use timeseries::merge::merge_readings;
pub use timeseries::normalize::{
    GridSlot, MAX_GRID_SLOTS, NormalizeOptions, RegularizedSeries, normalize,
};
pub use timeseries::parse::{ParsedTimestamp, TimestampError, localize, parse_timestamp, resolve_utc};
pub use timeseries::series::StationSeries;
pub use timeseries::window::make_windows;
pub use types::*;
