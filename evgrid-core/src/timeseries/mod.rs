//! Time-series engine for station availability data.
//!
//! Modules include:
//! - `parse`: resolve raw timestamps to local or absolute instants
//! - `merge`: absorb new readings into a station series by natural key
//! - `normalize`: reindex a series onto a fixed-step local-time grid
//! - `window`: lookback windows and one-step-ahead targets
//! - `infer`: estimate the sampling step of a series
/// Sampling-step inference.
pub mod infer;
/// Last-write-wins merge keyed by `(timestamp, connector_type)`.
pub mod merge;
/// Grid regularization.
pub mod normalize;
/// Timestamp parsing and localization.
pub mod parse;
/// The `StationSeries` container.
pub mod series;
/// Sliding-window generation.
pub mod window;
