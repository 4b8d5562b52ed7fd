use std::sync::Arc;

use evgrid::{CsvSeriesStore, Pipeline, SeriesStore};
use evgrid_mock::fixtures::{SNAPSHOT, snapshot_payload};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Logs: RUST_LOG=evgrid=debug (build with --features tracing for events).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 2. Persist series under EVGRID_DATA_DIR, or a throwaway directory.
    let tmp = tempfile::tempdir()?;
    let root = std::env::var_os("EVGRID_DATA_DIR").map_or_else(|| tmp.path().to_path_buf(), Into::into);
    let store = Arc::new(CsvSeriesStore::new(&root));
    let pipeline = Pipeline::builder().with_store(store.clone()).build()?;

    // 3. Ingest a captured payload, then a later fetch of one station.
    let report = pipeline.ingest_snapshot(SNAPSHOT).await?;
    for entry in &report.entries {
        println!("{}: {:?}", entry.station, entry.outcome);
    }
    for w in &report.warnings {
        println!("warning: {w}");
    }
    let later = snapshot_payload("2024-05-01T10:05:00", &[("lj-tivoli", 2)]);
    pipeline.ingest_snapshot(&later).await?;

    // 4. Show what was persisted.
    for station in store.stations()? {
        println!("{} -> {}", station, store.path_for(&station).display());
    }
    Ok(())
}
