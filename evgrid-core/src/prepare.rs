//! Training preparation: held-out split, mean imputation, min-max scaling and
//! windowing of a regularized target column.
//!
//! Imputer and scaler are fitted on the training part only and then applied
//! unchanged to the held-out part, so no test statistics leak into training.

use std::num::NonZeroUsize;

use evgrid_types::{EvError, WindowedDataset};
use serde::{Deserialize, Serialize};

use crate::timeseries::window::make_windows;

/// Replaces missing values with the mean of the observed training values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanImputer {
    /// Fill value.
    pub mean: f64,
}

impl MeanImputer {
    /// Fit on the observed values of `values`.
    ///
    /// # Errors
    /// `InsufficientData` when no value is observed.
    pub fn fit(values: &[Option<f64>]) -> Result<Self, EvError> {
        let (sum, n) = values
            .iter()
            .flatten()
            .fold((0.0_f64, 0usize), |(s, n), v| (s + v, n + 1));
        if n == 0 {
            return Err(EvError::InsufficientData {
                needed: 0,
                got: 0,
            });
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / n as f64;
        Ok(Self { mean })
    }

    /// Fill missing values.
    #[must_use]
    pub fn transform(&self, values: &[Option<f64>]) -> Vec<f64> {
        values.iter().map(|v| v.unwrap_or(self.mean)).collect()
    }
}

/// Maps the fitted `[min, max]` range onto `[0, 1]`.
///
/// A constant training column has zero range; values are then shifted by
/// `min` without scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    /// Smallest training value.
    pub min: f64,
    /// Largest training value.
    pub max: f64,
}

impl MinMaxScaler {
    /// Fit on `values`; an empty input fits the identity range `[0, 1]`.
    #[must_use]
    pub fn fit(values: &[f64]) -> Self {
        let mut it = values.iter().copied();
        let Some(first) = it.next() else {
            return Self { min: 0.0, max: 1.0 };
        };
        let (min, max) = it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Self { min, max }
    }

    fn scale(&self) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 { 1.0 } else { range }
    }

    /// Scale values into the fitted range.
    #[must_use]
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        let scale = self.scale();
        values.iter().map(|v| (v - self.min) / scale).collect()
    }

    /// Map a scaled value (e.g. a model prediction) back to the original unit.
    #[must_use]
    pub fn inverse(&self, scaled: f64) -> f64 {
        scaled.mul_add(self.scale(), self.min)
    }
}

/// Windowed train and held-out test data plus the fitted transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSet {
    /// Windows over the training part.
    pub train: WindowedDataset<f64>,
    /// Windows over the held-out part; empty when `test_size <= window_size`.
    pub test: WindowedDataset<f64>,
    /// Imputer fitted on the training part.
    pub imputer: MeanImputer,
    /// Scaler fitted on the imputed training part.
    pub scaler: MinMaxScaler,
}

/// Split, impute, scale and window a regularized target column.
///
/// The last `test_size` values form the held-out part.
///
/// # Errors
/// `InsufficientData` when `values.len() <= window_size + test_size`, or when
/// the training part holds no observed value.
pub fn prepare_training(
    values: &[Option<f64>],
    window_size: NonZeroUsize,
    test_size: usize,
) -> Result<TrainingSet, EvError> {
    let needed = window_size.get().saturating_add(test_size);
    if values.len() <= needed {
        return Err(EvError::InsufficientData {
            needed,
            got: values.len(),
        });
    }
    let (train_raw, test_raw) = values.split_at(values.len() - test_size);

    let imputer = MeanImputer::fit(train_raw)?;
    let train_filled = imputer.transform(train_raw);
    let scaler = MinMaxScaler::fit(&train_filled);
    let train = scaler.transform(&train_filled);
    let test = scaler.transform(&imputer.transform(test_raw));

    Ok(TrainingSet {
        train: make_windows(&train, window_size),
        test: make_windows(&test, window_size),
        imputer,
        scaler,
    })
}
