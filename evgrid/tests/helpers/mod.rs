// Shared fixtures for the pipeline integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use evgrid::{Pipeline, PipelineBuilder, SeriesStore, StationId};
use evgrid_mock::{MemoryStore, ScriptedStore};

pub use evgrid_mock::fixtures::{SNAPSHOT, regular_series, snapshot_payload, station};

pub const ST_A: &str = "st-a";
pub const ST_B: &str = "st-b";
pub const ST_C: &str = "st-c";

/// Builder with a small window so short fixtures produce windows.
pub fn small_builder(store: Arc<dyn SeriesStore>) -> PipelineBuilder {
    Pipeline::builder()
        .with_store(store)
        .frequency(Duration::from_secs(300))
        .window_size(3)
        .test_size(2)
}

pub fn memory_pipeline(store: Arc<MemoryStore>) -> Pipeline {
    small_builder(store).build().unwrap()
}

pub fn scripted_pipeline(store: Arc<ScriptedStore>) -> Pipeline {
    small_builder(store).build().unwrap()
}

pub fn ids(names: &[&str]) -> Vec<StationId> {
    names.iter().map(|n| station(n)).collect()
}
