use std::sync::Arc;
use std::time::Duration;

use evgrid::{ConnectorReading, EvError, StationBatch};
use evgrid_mock::{MemoryStore, ScriptedStore, StoreBehavior};

use crate::helpers::{
    SNAPSHOT, ST_A, ST_B, ST_C, memory_pipeline, scripted_pipeline, snapshot_payload, station,
};

fn reading(ts: &str, avail: u32) -> ConnectorReading {
    ConnectorReading::new(ts, "CHAdeMO").with_counts(2, avail, 2 - avail, 0)
}

fn batch(id: &str, rows: Vec<ConnectorReading>) -> StationBatch {
    StationBatch {
        station: station(id),
        readings: rows,
    }
}

#[tokio::test]
async fn later_batch_redefines_overlapping_key() {
    let store = Arc::new(MemoryStore::new());
    let p = memory_pipeline(store.clone());

    p.ingest(batch(
        ST_A,
        vec![reading("2024-05-01T10:00:00", 1), reading("2024-05-01T10:05:00", 2)],
    ))
    .await
    .unwrap();
    let summary = p
        .ingest(batch(
            ST_A,
            vec![reading("2024-05-01T10:05:00", 0), reading("2024-05-01T10:10:00", 1)],
        ))
        .await
        .unwrap();

    assert_eq!(summary.existing, 2);
    assert_eq!(summary.replaced, 1);
    assert_eq!(summary.added(), 1);
    let rows = store.readings(&station(ST_A)).unwrap();
    let avail: Vec<_> = rows.iter().map(|r| r.available).collect();
    assert_eq!(avail, vec![Some(1), Some(0), Some(1)]);
}

#[tokio::test]
async fn reingesting_a_batch_changes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let p = memory_pipeline(store.clone());
    let b = batch(ST_A, vec![reading("2024-05-01T10:00:00", 1)]);

    p.ingest(b.clone()).await.unwrap();
    let before = store.readings(&station(ST_A));
    let again = p.ingest(b).await.unwrap();
    assert_eq!(again.added(), 0);
    assert_eq!(store.readings(&station(ST_A)), before);
}

#[tokio::test]
async fn one_failing_station_does_not_abort_the_run() {
    let seeded = MemoryStore::new().with_series(&station(ST_B), vec![reading("2024-05-01T09:55:00", 2)]);
    let store = Arc::new(ScriptedStore::new(seeded));
    store.set_behavior(
        &station(ST_B),
        StoreBehavior::FailSave(EvError::Io {
            path: "st-b.csv".into(),
            msg: "disk full".into(),
        }),
    );
    let p = scripted_pipeline(store.clone());

    let report = p
        .ingest_all(vec![
            batch(ST_A, vec![reading("2024-05-01T10:00:00", 1)]),
            batch(ST_B, vec![reading("2024-05-01T10:00:00", 1)]),
            batch(ST_C, vec![reading("2024-05-01T10:00:00", 0)]),
        ])
        .await;

    assert!(report.get(&station(ST_A)).is_some());
    assert!(report.get(&station(ST_C)).is_some());
    assert!(report.get(&station(ST_B)).is_none());
    assert_eq!(report.failed().count(), 1);
    match &report.warnings[0] {
        EvError::Station { station, source } => {
            assert_eq!(station, ST_B);
            assert!(matches!(**source, EvError::Io { .. }));
        }
        other => panic!("unexpected: {other:?}"),
    }
    // The committed series survives the failed write.
    assert_eq!(
        store.inner().readings(&station(ST_B)),
        Some(vec![reading("2024-05-01T09:55:00", 2)])
    );
}

#[tokio::test]
async fn repeated_station_batches_apply_in_request_order() {
    let store = Arc::new(MemoryStore::new());
    let p = memory_pipeline(store.clone());
    let report = p
        .ingest_all(vec![
            batch(ST_A, vec![reading("2024-05-01T10:00:00", 2)]),
            batch(ST_A, vec![reading("2024-05-01T10:00:00", 0)]),
        ])
        .await;
    assert_eq!(report.entries.len(), 1);
    assert_eq!(
        store.readings(&station(ST_A)).unwrap()[0].available,
        Some(0)
    );
    assert_eq!(store.saved(), vec![station(ST_A)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_ingests_for_one_station_are_serialized() {
    let store = Arc::new(ScriptedStore::new(MemoryStore::new()));
    store.set_behavior(&station(ST_A), StoreBehavior::SlowSave(Duration::from_millis(10)));
    let p = scripted_pipeline(store.clone());

    let calls = (0..8u32).map(|i| {
        let ts = format!("2024-05-01T10:{:02}:00", i * 5);
        p.ingest(batch(ST_A, vec![reading(&ts, i % 3)]))
    });
    for r in futures::future::join_all(calls).await {
        r.unwrap();
    }

    assert_eq!(store.peak_concurrent_saves(&station(ST_A)), 1);
    // No update was lost to an interleaved read-modify-write.
    assert_eq!(store.inner().readings(&station(ST_A)).unwrap().len(), 8);
}

#[tokio::test]
async fn snapshot_ingest_fans_out_per_station() {
    let store = Arc::new(MemoryStore::new());
    let p = memory_pipeline(store.clone());

    let report = p.ingest_snapshot(SNAPSHOT).await.unwrap();
    assert_eq!(report.entries.len(), 2);
    assert!(report.warnings.is_empty());

    let tivoli = store.readings(&station("lj-tivoli")).unwrap();
    assert_eq!(tivoli.len(), 2);
    assert!(tivoli.iter().all(|r| r.timestamp == "2024-05-01T10:00:00"));
    let maribor = store.readings(&station("mb-center")).unwrap();
    assert_eq!(maribor[0].name, "Unnamed");
    assert_eq!(maribor[0].address, "Unknown");
    assert_eq!(maribor[0].unknown, Some(1));
}

#[tokio::test]
async fn snapshot_reports_invalid_station_ids() {
    let p = memory_pipeline(Arc::new(MemoryStore::new()));
    let payload = snapshot_payload("2024-05-01T10:00:00", &[("ok-1", 1), ("bad/id", 0)]);
    let report = p.ingest_snapshot(&payload).await.unwrap();
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(report.warnings[0], EvError::InvalidStation(_)));
}

#[tokio::test]
async fn undecodable_snapshot_fails_the_call() {
    let p = memory_pipeline(Arc::new(MemoryStore::new()));
    let err = p.ingest_snapshot("{\"results\": 5}").await.unwrap_err();
    assert!(matches!(err, EvError::Codec(_)));
}

#[tokio::test]
async fn load_failure_leaves_the_committed_series_alone() {
    let store = Arc::new(ScriptedStore::new(
        MemoryStore::new().with_series(&station(ST_A), vec![reading("2024-05-01T09:55:00", 1)]),
    ));
    store.set_behavior(
        &station(ST_A),
        StoreBehavior::FailLoad(EvError::Codec("truncated row".into())),
    );
    let p = scripted_pipeline(store.clone());

    let report = p
        .ingest_all(vec![
            batch(ST_A, vec![reading("2024-05-01T10:00:00", 2)]),
            batch(ST_B, vec![reading("2024-05-01T10:00:00", 2)]),
        ])
        .await;
    assert!(report.get(&station(ST_B)).is_some());
    assert_eq!(report.failed().count(), 1);
    assert!(!report.warnings[0].is_skip());
    assert_eq!(
        store.inner().readings(&station(ST_A)),
        Some(vec![reading("2024-05-01T09:55:00", 1)])
    );
}

#[tokio::test]
async fn malformed_snapshot_entry_is_a_warning() {
    let store = Arc::new(MemoryStore::new());
    let p = memory_pipeline(store.clone());
    let payload = r#"{"results": [
        {"id": "ok-1", "fetched_at": "2024-05-01T10:00:00",
         "availability": [{"type": "CCS", "total": 2}]},
        {"id": "ok-2", "fetched_at": "2024-05-01T10:00:00",
         "availability": [{"type": "CCS", "total": "two"}]}
    ]}"#;
    let report = p.ingest_snapshot(payload).await.unwrap();
    assert_eq!(report.entries.len(), 1);
    assert!(store.readings(&station("ok-1")).is_some());
    assert_eq!(report.warnings.len(), 1);
    match &report.warnings[0] {
        EvError::Station { station, source } => {
            assert_eq!(station, "ok-2");
            assert!(matches!(**source, EvError::Codec(_)));
        }
        other => panic!("unexpected: {other:?}"),
    }
}
