use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use evgrid_core::store::SeriesStore;
use evgrid_core::{
    Column, EvError, FrequencySource, PipelineConfig, ReferencePolicy, StationId,
};

use crate::locks::StationLocks;

/// Orchestrator running per-station ingest, preparation and promotion.
///
/// Stations are independent units of work: multi-station calls fan out
/// concurrently and report per-station outcomes. Writes to one station are
/// serialized through a lock keyed by its identifier.
pub struct Pipeline {
    pub(crate) store: Arc<dyn SeriesStore>,
    pub(crate) reference: Option<Arc<dyn SeriesStore>>,
    pub(crate) cfg: PipelineConfig,
    pub(crate) window: NonZeroUsize,
    pub(crate) locks: StationLocks,
}

/// Builder for constructing a [`Pipeline`] with custom configuration.
pub struct PipelineBuilder {
    store: Option<Arc<dyn SeriesStore>>,
    reference: Option<Arc<dyn SeriesStore>>,
    cfg: PipelineConfig,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder {
    /// Create a builder with [`PipelineConfig::default`] and no stores.
    ///
    /// A current-series store is required; see [`with_store`](Self::with_store).
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: None,
            reference: None,
            cfg: PipelineConfig::default(),
        }
    }

    /// Set the store holding each station's current series.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn SeriesStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the store holding reference baselines.
    ///
    /// Without one, reference promotion fails with `InvalidArg`.
    #[must_use]
    pub fn with_reference_store(mut self, store: Arc<dyn SeriesStore>) -> Self {
        self.reference = Some(store);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: PipelineConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Canonical time zone timestamps are localized into.
    #[must_use]
    pub const fn timezone(mut self, tz: chrono_tz::Tz) -> Self {
        self.cfg.timezone = tz;
        self
    }

    /// Fixed grid step.
    #[must_use]
    pub const fn frequency(mut self, step: Duration) -> Self {
        self.cfg.frequency = FrequencySource::Fixed(step);
        self
    }

    /// Estimate the grid step per station from its timestamps.
    #[must_use]
    pub const fn infer_frequency(mut self) -> Self {
        self.cfg.frequency = FrequencySource::Inferred;
        self
    }

    /// Lookback window length.
    #[must_use]
    pub const fn window_size(mut self, n: usize) -> Self {
        self.cfg.window_size = n;
        self
    }

    /// Trailing grid slots held out for evaluation.
    #[must_use]
    pub const fn test_size(mut self, n: usize) -> Self {
        self.cfg.test_size = n;
        self
    }

    /// Column used as the model target.
    #[must_use]
    pub const fn target(mut self, column: Column) -> Self {
        self.cfg.target = column;
        self
    }

    /// Restrict regularization to one connector type.
    #[must_use]
    pub fn connector(mut self, connector_type: impl Into<String>) -> Self {
        self.cfg.connector = Some(connector_type.into());
        self
    }

    /// Seed handed through to the external trainer.
    #[must_use]
    pub const fn random_state(mut self, seed: u64) -> Self {
        self.cfg.random_state = seed;
        self
    }

    /// When a reference baseline may be overwritten.
    #[must_use]
    pub const fn reference_policy(mut self, policy: ReferencePolicy) -> Self {
        self.cfg.reference_policy = policy;
        self
    }

    /// Minimum persisted rows before a station takes part in promotion.
    #[must_use]
    pub const fn min_reference_rows(mut self, n: usize) -> Self {
        self.cfg.min_reference_rows = n;
        self
    }

    /// Build the [`Pipeline`].
    ///
    /// # Errors
    /// Returns `InvalidArg` if no store was set, the window size is zero or a
    /// fixed frequency is shorter than 1ms.
    pub fn build(self) -> Result<Pipeline, EvError> {
        let store = self.store.ok_or_else(|| {
            EvError::InvalidArg("no series store configured; set one via with_store(...)".into())
        })?;
        let window = NonZeroUsize::new(self.cfg.window_size)
            .ok_or_else(|| EvError::InvalidArg("window_size must be greater than zero".into()))?;
        if let FrequencySource::Fixed(step) = self.cfg.frequency
            && step < Duration::from_millis(1)
        {
            return Err(EvError::InvalidArg(format!(
                "frequency must be at least 1ms, got {step:?}"
            )));
        }

        Ok(Pipeline {
            store,
            reference: self.reference,
            cfg: self.cfg,
            window,
            locks: StationLocks::default(),
        })
    }
}

impl Pipeline {
    /// Start building a new `Pipeline`.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use evgrid::{CsvSeriesStore, Pipeline, ReferencePolicy};
    ///
    /// let pipeline = Pipeline::builder()
    ///     .with_store(Arc::new(CsvSeriesStore::new("data/current")))
    ///     .with_reference_store(Arc::new(CsvSeriesStore::new("data/reference")))
    ///     .reference_policy(ReferencePolicy::OnPass)
    ///     .window_size(24)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Store holding current series.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SeriesStore> {
        &self.store
    }

    pub(crate) fn reference_store(&self) -> Result<&Arc<dyn SeriesStore>, EvError> {
        self.reference.as_ref().ok_or_else(|| {
            EvError::InvalidArg(
                "no reference store configured; set one via with_reference_store(...)".into(),
            )
        })
    }
}

/// Run a station's blocking store work off the async runtime.
///
/// A panicking or cancelled task surfaces as `EvError::Other`.
pub(crate) async fn run_blocking<T, F>(station: &StationId, f: F) -> Result<T, EvError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, EvError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| EvError::Other(format!("blocking task for {station} did not complete: {e}")))?
}
