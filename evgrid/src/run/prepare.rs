use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{NaiveDateTime, TimeDelta};
use evgrid_core::store::SeriesStore;
use evgrid_core::{
    Column, EvError, NormalizeOptions, NormalizeReport, RegularizedSeries, StationId,
    StationReport, StationSeries, TrainingSet, normalize, prepare_training,
};

use crate::Pipeline;
use crate::core::run_blocking;
use crate::run::util::{collect_report, station_failure};

/// Model-ready data for one station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationDataset {
    /// Column the windows were built from.
    pub target: Column,
    /// Grid step after regularization.
    pub step: TimeDelta,
    /// First grid instant, naive local time.
    pub start: Option<NaiveDateTime>,
    /// Row accounting of the regularization pass.
    pub normalize: NormalizeReport,
    /// Seed for the external trainer.
    pub random_state: u64,
    /// Windowed train and held-out parts with their fitted transforms.
    pub training: TrainingSet,
}

/// Multi-station preparation summary.
pub type PrepareReport = StationReport<StationDataset>;

fn load_series(
    store: &dyn SeriesStore,
    station: &StationId,
    required: &[&str],
    tz: chrono_tz::Tz,
) -> Result<StationSeries, EvError> {
    let stored = store
        .load(station)?
        .ok_or_else(|| EvError::not_found(format!("series for station {station}")))?;
    stored.require_columns(required)?;
    // Re-merging restores key uniqueness and order for series written elsewhere.
    Ok(StationSeries::from_readings(stored.readings, tz))
}

struct PrepareJob {
    store: Arc<dyn SeriesStore>,
    station: StationId,
    tz: chrono_tz::Tz,
    frequency: evgrid_core::FrequencySource,
    connector: Option<String>,
    target: Column,
    window: NonZeroUsize,
    test_size: usize,
    random_state: u64,
}

impl PrepareJob {
    fn options(&self) -> NormalizeOptions<'_> {
        NormalizeOptions {
            timezone: self.tz,
            frequency: self.frequency,
            connector: self.connector.as_deref(),
        }
    }

    fn regularize(&self, required: &[&str]) -> Result<(RegularizedSeries, NormalizeReport), EvError> {
        let series = load_series(self.store.as_ref(), &self.station, required, self.tz)?;
        normalize(&series, &self.options())
    }

    fn run(self) -> Result<StationDataset, EvError> {
        let (grid, report) = self.regularize(&["timestamp", self.target.as_str()])?;
        let values = grid.column(self.target);
        let training = prepare_training(&values, self.window, self.test_size)?;
        Ok(StationDataset {
            target: self.target,
            step: grid.step(),
            start: grid.start(),
            normalize: report,
            random_state: self.random_state,
            training,
        })
    }
}

impl Pipeline {
    fn prepare_job(&self, station: &StationId) -> PrepareJob {
        PrepareJob {
            store: Arc::clone(&self.store),
            station: station.clone(),
            tz: self.cfg.timezone,
            frequency: self.cfg.frequency,
            connector: self.cfg.connector.clone(),
            target: self.cfg.target,
            window: self.window,
            test_size: self.cfg.test_size,
            random_state: self.cfg.random_state,
        }
    }

    /// Regularize one station's persisted series onto the configured grid.
    ///
    /// Reads take no lock: stores replace series atomically, so a concurrent
    /// ingest is either fully visible or not at all.
    ///
    /// # Errors
    /// Station-tagged `NotFound` without a persisted series, `MissingColumn`
    /// without a timestamp column, `InvalidArg`/`Data` from the normalizer and
    /// store failures.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "evgrid::normalize", skip(self), fields(station = %station))
    )]
    pub async fn normalize(
        &self,
        station: &StationId,
    ) -> Result<(RegularizedSeries, NormalizeReport), EvError> {
        let job = self.prepare_job(station);
        run_blocking(station, move || job.regularize(&["timestamp"]))
            .await
            .map_err(|e| station_failure(station, "normalize", e))
    }

    /// Regularize, split, impute, scale and window one station's target column.
    ///
    /// # Errors
    /// Station-tagged skips (`NotFound`, `MissingColumn` for the timestamp or
    /// target column, `InsufficientData` when the grid is not longer than
    /// `window_size + test_size`) and hard failures from the store or normalizer.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "evgrid::prepare", skip(self), fields(station = %station))
    )]
    pub async fn prepare(&self, station: &StationId) -> Result<StationDataset, EvError> {
        let job = self.prepare_job(station);
        run_blocking(station, move || job.run())
            .await
            .map_err(|e| station_failure(station, "prepare", e))
    }

    /// Prepare many stations concurrently; skips and failures become warnings.
    pub async fn prepare_all(&self, stations: &[StationId]) -> PrepareReport {
        let tasks = stations
            .iter()
            .map(|station| async move { (station.clone(), self.prepare(station).await) });
        collect_report(futures::future::join_all(tasks).await)
    }

    /// Prepare every station the store holds a series for.
    ///
    /// # Errors
    /// Returns an error only when the store cannot enumerate its stations.
    pub async fn prepare_every_station(&self) -> Result<PrepareReport, EvError> {
        let store = Arc::clone(&self.store);
        let stations = tokio::task::spawn_blocking(move || store.stations())
            .await
            .map_err(|e| EvError::Other(format!("station listing did not complete: {e}")))??;
        Ok(self.prepare_all(&stations).await)
    }
}
