use std::sync::Arc;

use evgrid::{CsvSeriesStore, PromoteOutcome, SeriesStore, Verdict};

use crate::helpers::{small_builder, snapshot_payload, station};

#[tokio::test]
async fn snapshots_accumulate_into_csv_series_and_prepare() {
    let dir = tempfile::tempdir().unwrap();
    let current = Arc::new(CsvSeriesStore::new(dir.path().join("current")));
    let reference = Arc::new(CsvSeriesStore::new(dir.path().join("reference")));
    let p = small_builder(current.clone())
        .with_reference_store(reference.clone())
        .min_reference_rows(1)
        .build()
        .unwrap();

    for i in 0..12u32 {
        let minutes = i * 5;
        let fetched_at = format!("2024-05-01T10:{minutes:02}:00");
        let payload = snapshot_payload(&fetched_at, &[("lj-1", i % 3), ("mb-2", 2)]);
        let report = p.ingest_snapshot(&payload).await.unwrap();
        assert_eq!(report.entries.len(), 2);
    }
    // Re-delivering a snapshot is absorbed by the merge.
    let again = snapshot_payload("2024-05-01T10:00:00", &[("lj-1", 0)]);
    p.ingest_snapshot(&again).await.unwrap();

    assert_eq!(current.stations().unwrap(), vec![station("lj-1"), station("mb-2")]);
    let lj = current.load(&station("lj-1")).unwrap().unwrap();
    assert_eq!(lj.readings.len(), 12);

    let prepared = p.prepare_every_station().await.unwrap();
    assert_eq!(prepared.entries.len(), 2);
    assert!(prepared.warnings.is_empty());
    let lj_ds = prepared.get(&station("lj-1")).unwrap();
    assert_eq!(lj_ds.normalize.slots, 12);
    assert_eq!(lj_ds.training.train.len(), 7);

    let promoted = p
        .promote_all(&[(station("lj-1"), Verdict::Pass), (station("mb-2"), Verdict::Fail)])
        .await;
    assert_eq!(promoted.get(&station("lj-1")), Some(&PromoteOutcome::Seeded));
    assert_eq!(promoted.get(&station("mb-2")), Some(&PromoteOutcome::Seeded));
    assert_eq!(reference.load(&station("lj-1")).unwrap().unwrap().readings, lj.readings);
}
