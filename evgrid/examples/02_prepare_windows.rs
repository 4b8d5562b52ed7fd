use std::sync::Arc;

use evgrid::{Pipeline, StationId};
use evgrid_mock::MemoryStore;
use evgrid_mock::fixtures::regular_series;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 1. Two days of five-minute readings with a few missed fetches.
    let station = StationId::new("lj-tivoli")?;
    let rows = regular_series(576, 5, "IEC62196Type2Outlet", 2, &[10, 11, 300]);
    let store = Arc::new(MemoryStore::new().with_series(&station, rows));

    // 2. Default window (24) and hold-out (12).
    let pipeline = Pipeline::builder().with_store(store).build()?;

    // 3. Regularize and window the `available` column.
    let ds = pipeline.prepare(&station).await?;
    println!(
        "grid: {} slots every {} min, {} missing",
        ds.normalize.slots,
        ds.step.num_minutes(),
        ds.normalize.missing()
    );
    println!("train shape: {:?}", ds.training.train.shape());
    println!("test shape:  {:?}", ds.training.test.shape());
    println!(
        "imputer mean {:.3}, scaler [{}, {}], seed {}",
        ds.training.imputer.mean, ds.training.scaler.min, ds.training.scaler.max, ds.random_state
    );

    // 4. Buffers for the trainer.
    let (x, y) = ds.training.train.to_f32();
    println!("x: {} values, y: {} values", x.len(), y.len());
    Ok(())
}
