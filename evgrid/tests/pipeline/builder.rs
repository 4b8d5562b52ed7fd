use std::sync::Arc;
use std::time::Duration;

use evgrid::{Column, EvError, FrequencySource, Pipeline, PipelineConfig, ReferencePolicy};
use evgrid_mock::MemoryStore;

#[test]
fn build_requires_a_store() {
    let err = Pipeline::builder().build().err().unwrap();
    assert!(matches!(err, EvError::InvalidArg(_)));
}

#[test]
fn build_rejects_zero_window_and_zero_frequency() {
    let store = Arc::new(MemoryStore::new());
    let zero_window = Pipeline::builder()
        .with_store(store.clone())
        .window_size(0)
        .build()
        .err()
        .unwrap();
    assert!(matches!(zero_window, EvError::InvalidArg(_)));

    let zero_step = Pipeline::builder()
        .with_store(store)
        .frequency(Duration::ZERO)
        .build()
        .err()
        .unwrap();
    assert!(matches!(zero_step, EvError::InvalidArg(_)));
}

#[test]
fn defaults_and_setters_land_in_config() {
    let p = Pipeline::builder()
        .with_store(Arc::new(MemoryStore::new()))
        .build()
        .unwrap();
    let cfg = p.config();
    assert_eq!(cfg.timezone, chrono_tz::Europe::Ljubljana);
    assert_eq!(cfg.frequency, FrequencySource::Fixed(Duration::from_secs(300)));
    assert_eq!(cfg.window_size, 24);
    assert_eq!(cfg.test_size, 12);
    assert_eq!(cfg.target, Column::Available);
    assert_eq!(cfg.random_state, 42);
    assert_eq!(cfg.reference_policy, ReferencePolicy::OnPass);

    let p = Pipeline::builder()
        .with_store(Arc::new(MemoryStore::new()))
        .config(PipelineConfig::default())
        .infer_frequency()
        .target(Column::Occupied)
        .connector("CCS")
        .random_state(7)
        .reference_policy(ReferencePolicy::Always)
        .min_reference_rows(1)
        .timezone(chrono_tz::UTC)
        .build()
        .unwrap();
    let cfg = p.config();
    assert_eq!(cfg.frequency, FrequencySource::Inferred);
    assert_eq!(cfg.target, Column::Occupied);
    assert_eq!(cfg.connector.as_deref(), Some("CCS"));
    assert_eq!(cfg.random_state, 7);
    assert_eq!(cfg.reference_policy, ReferencePolicy::Always);
    assert_eq!(cfg.min_reference_rows, 1);
    assert_eq!(cfg.timezone, chrono_tz::UTC);
}

#[test]
fn config_enums_match_exhaustively_downstream() {
    fn step_kind(f: FrequencySource) -> &'static str {
        match f {
            FrequencySource::Fixed(_) => "fixed",
            FrequencySource::Inferred => "inferred",
        }
    }
    fn overwrites_on_fail(p: ReferencePolicy) -> bool {
        match p {
            ReferencePolicy::OnPass => false,
            ReferencePolicy::Always => true,
        }
    }
    let cfg = PipelineConfig::default();
    assert_eq!(step_kind(cfg.frequency), "fixed");
    assert_eq!(step_kind(FrequencySource::Inferred), "inferred");
    assert!(!overwrites_on_fail(cfg.reference_policy));
    assert!(overwrites_on_fail(ReferencePolicy::Always));
}

#[test]
fn sub_millisecond_frequency_is_accepted() {
    let p = Pipeline::builder()
        .with_store(Arc::new(MemoryStore::new()))
        .frequency(Duration::from_micros(1500))
        .build()
        .unwrap();
    assert_eq!(
        p.config().frequency,
        FrequencySource::Fixed(Duration::from_micros(1500))
    );
}
