use std::sync::Arc;

use chrono::TimeDelta;
use evgrid::{Column, ConnectorReading, EvError, Pipeline};
use evgrid_mock::{MemoryStore, ScriptedStore, StoreBehavior};

use crate::helpers::{
    ST_A, ST_B, ST_C, ids, memory_pipeline, regular_series, scripted_pipeline, small_builder,
    station,
};

#[tokio::test]
async fn prepares_windows_from_a_gappy_series() {
    let store = Arc::new(
        MemoryStore::new().with_series(&station(ST_A), regular_series(12, 5, "CHAdeMO", 2, &[4])),
    );
    let p = memory_pipeline(store);

    let ds = p.prepare(&station(ST_A)).await.unwrap();
    assert_eq!(ds.target, Column::Available);
    assert_eq!(ds.step, TimeDelta::minutes(5));
    assert_eq!(ds.random_state, 42);
    assert_eq!(ds.normalize.slots, 12);
    assert_eq!(ds.normalize.missing(), 1);

    // Ten training slots, window of three.
    assert_eq!(ds.training.train.len(), 7);
    assert_eq!(ds.training.train.shape(), ((7, 3, 1), (7, 1)));
    // Two held-out slots cannot fill a window of three.
    assert!(ds.training.test.is_empty());
    assert!((ds.training.imputer.mean - 8.0 / 9.0).abs() < 1e-12);
    assert_eq!(ds.training.scaler.min, 0.0);
    assert_eq!(ds.training.scaler.max, 2.0);
    assert!(
        ds.training
            .train
            .x
            .iter()
            .flatten()
            .all(|v| (0.0..=1.0).contains(v))
    );
}

#[tokio::test]
async fn gap_becomes_missing_slot_in_normalize() {
    let rows = vec![
        ConnectorReading::new("2024-05-01T10:00:00", "CHAdeMO").with_counts(2, 1, 1, 0),
        ConnectorReading::new("2024-05-01T10:10:00", "CHAdeMO").with_counts(2, 2, 0, 0),
    ];
    let p = memory_pipeline(Arc::new(MemoryStore::new().with_series(&station(ST_A), rows)));

    let (grid, report) = p.normalize(&station(ST_A)).await.unwrap();
    assert_eq!(grid.len(), 3);
    assert_eq!(grid.column(Column::Available), vec![Some(1.0), None, Some(2.0)]);
    assert_eq!(report.missing(), 1);
}

#[tokio::test]
async fn missing_target_column_is_a_skip() {
    let store = MemoryStore::new().with_columns(
        &station(ST_A),
        &["timestamp", "type", "total"],
        regular_series(20, 5, "CCS", 1, &[]),
    );
    let p = memory_pipeline(Arc::new(store));

    let err = p.prepare(&station(ST_A)).await.unwrap_err();
    assert!(err.is_skip());
    assert_eq!(err.root(), &EvError::missing_column("available"));
    // Normalizing needs only the timestamp.
    assert!(p.normalize(&station(ST_A)).await.is_ok());
}

#[tokio::test]
async fn short_series_is_insufficient() {
    let store = MemoryStore::new().with_series(&station(ST_A), regular_series(5, 5, "CCS", 1, &[]));
    let p = memory_pipeline(Arc::new(store));
    let err = p.prepare(&station(ST_A)).await.unwrap_err();
    assert_eq!(err.root(), &EvError::InsufficientData { needed: 5, got: 5 });
}

#[tokio::test]
async fn unknown_station_is_not_found() {
    let p = memory_pipeline(Arc::new(MemoryStore::new()));
    let err = p.prepare(&station(ST_A)).await.unwrap_err();
    assert!(matches!(err.root(), EvError::NotFound { .. }));
    match err {
        EvError::Station { station, .. } => assert_eq!(station, ST_A),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn prepare_all_reports_each_station() {
    let store = MemoryStore::new()
        .with_series(&station(ST_A), regular_series(30, 5, "CCS", 2, &[]))
        .with_series(&station(ST_B), regular_series(3, 5, "CCS", 2, &[]));
    let p = memory_pipeline(Arc::new(store));

    let report = p.prepare_all(&ids(&[ST_A, ST_B, ST_C])).await;
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].station, station(ST_A));
    assert_eq!(report.skipped().count(), 2);
    assert_eq!(report.failed().count(), 0);
}

#[tokio::test]
async fn prepare_every_station_uses_store_listing() {
    let store = MemoryStore::new()
        .with_series(&station(ST_B), regular_series(30, 5, "CCS", 2, &[]))
        .with_series(&station(ST_A), regular_series(30, 5, "CCS", 2, &[]));
    let p = memory_pipeline(Arc::new(store));

    let report = p.prepare_every_station().await.unwrap();
    let order: Vec<_> = report.entries.iter().map(|e| e.station.clone()).collect();
    assert_eq!(order, ids(&[ST_A, ST_B]));
}

#[tokio::test]
async fn connector_filter_selects_one_plug_type() {
    let mut rows = regular_series(20, 5, "CCS", 1, &[]);
    rows.extend(regular_series(20, 5, "CHAdeMO", 4, &[]));
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new().with_series(&station(ST_A), rows));

    let p: Pipeline = small_builder(store).connector("CHAdeMO").build().unwrap();
    let ds = p.prepare(&station(ST_A)).await.unwrap();
    assert_eq!(ds.normalize.filtered_out, 20);
    // CHAdeMO availability cycles through 0..=4.
    assert_eq!(ds.training.scaler.max, 4.0);
}

#[tokio::test]
async fn unparseable_rows_are_counted_not_fatal() {
    let mut rows = regular_series(20, 5, "CCS", 1, &[]);
    rows.push(ConnectorReading::new("not a time", "CCS").with_counts(1, 1, 0, 0));
    let p = memory_pipeline(Arc::new(MemoryStore::new().with_series(&station(ST_A), rows)));

    let ds = p.prepare(&station(ST_A)).await.unwrap();
    assert_eq!(ds.normalize.dropped_unparseable, 1);
    assert_eq!(ds.normalize.slots, 20);
}

#[tokio::test]
async fn inferred_frequency_follows_station_sampling() {
    let store = MemoryStore::new().with_series(&station(ST_A), regular_series(20, 15, "CCS", 1, &[3]));
    let store: Arc<MemoryStore> = Arc::new(store);
    let p = small_builder(store).infer_frequency().build().unwrap();
    let ds = p.prepare(&station(ST_A)).await.unwrap();
    assert_eq!(ds.step, TimeDelta::minutes(15));
    assert_eq!(ds.normalize.slots, 20);
}

#[tokio::test]
async fn load_failure_is_a_hard_failure_for_that_station_only() {
    let store = Arc::new(ScriptedStore::new(
        MemoryStore::new()
            .with_series(&station(ST_A), regular_series(30, 5, "CCS", 2, &[]))
            .with_series(&station(ST_B), regular_series(30, 5, "CCS", 2, &[])),
    ));
    store.set_behavior(
        &station(ST_B),
        StoreBehavior::FailLoad(EvError::Io {
            path: "st-b.csv".into(),
            msg: "permission denied".into(),
        }),
    );
    let p = scripted_pipeline(store);

    let report = p.prepare_all(&ids(&[ST_A, ST_B])).await;
    assert!(report.get(&station(ST_A)).is_some());
    assert!(report.get(&station(ST_B)).is_none());
    assert_eq!(report.failed().count(), 1);
    assert_eq!(report.skipped().count(), 0);
    assert!(matches!(report.warnings[0].root(), EvError::Io { .. }));
}
