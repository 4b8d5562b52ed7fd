//! Configuration types passed explicitly into the pipeline entry point.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::reading::Column;

/// How the grid step for regularization is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrequencySource {
    /// Use a fixed step.
    Fixed(Duration),
    /// Estimate the step from the observed timestamps (unique mode, else lower
    /// median of positive deltas).
    Inferred,
}

impl Default for FrequencySource {
    fn default() -> Self {
        Self::Fixed(Duration::from_secs(5 * 60))
    }
}

/// When the reference baseline of a station may be overwritten by current data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReferencePolicy {
    /// Overwrite only after the external comparison reported a pass.
    #[default]
    OnPass,
    /// Overwrite regardless of the verdict.
    Always,
}

/// Outcome of an external comparison (quality or drift check) for one station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Current data was accepted.
    Pass,
    /// Current data was rejected.
    Fail,
}

/// Global configuration for the evgrid `Pipeline`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Canonical civil time zone all timestamps are localized into.
    pub timezone: chrono_tz::Tz,
    /// Grid step used by the normalizer.
    pub frequency: FrequencySource,
    /// Lookback window length.
    pub window_size: usize,
    /// Number of trailing grid slots held out for evaluation.
    pub test_size: usize,
    /// Numeric column used as the model target.
    pub target: Column,
    /// Restrict regularization to one connector type; `None` uses every row.
    pub connector: Option<String>,
    /// Seed handed through to the external trainer.
    pub random_state: u64,
    /// Overwrite rule for reference baselines.
    pub reference_policy: ReferencePolicy,
    /// Minimum persisted rows before a station takes part in reference promotion.
    pub min_reference_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Ljubljana,
            frequency: FrequencySource::default(),
            window_size: 24,
            test_size: 12,
            target: Column::Available,
            connector: None,
            random_state: 42,
            reference_policy: ReferencePolicy::OnPass,
            min_reference_rows: 10,
        }
    }
}
