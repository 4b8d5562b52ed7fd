//! Deterministic fixture data.

mod readings;
mod snapshot;

pub use readings::{DEFAULT_START, regular_series, station};
pub use snapshot::{SNAPSHOT, snapshot_payload};
