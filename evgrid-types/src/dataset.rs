use serde::{Deserialize, Serialize};

/// Supervised-learning windows: each `x[i]` is the run of `window_size`
/// consecutive values immediately preceding `y[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowedDataset<V> {
    /// Lookback windows.
    pub x: Vec<Vec<V>>,
    /// One-step-ahead targets.
    pub y: Vec<V>,
    /// Window length used to build `x`.
    pub window_size: usize,
}

impl<V> WindowedDataset<V> {
    /// An empty dataset for the given window length.
    #[must_use]
    pub const fn empty(window_size: usize) -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            window_size,
        }
    }

    /// Number of `(window, target)` pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// `true` when the source was too short to yield a single pair.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Iterate `(window, target)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&[V], &V)> {
        self.x.iter().map(Vec::as_slice).zip(self.y.iter())
    }
}

impl WindowedDataset<f64> {
    /// Tensor shapes `((n, window_size, 1), (n, 1))` for a single-feature dataset.
    #[must_use]
    pub fn shape(&self) -> ((usize, usize, usize), (usize, usize)) {
        ((self.len(), self.window_size, 1), (self.len(), 1))
    }

    /// Row-major `f32` buffers for `x` and `y`, ready for a tensor constructor.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_f32(&self) -> (Vec<f32>, Vec<f32>) {
        let x = self.x.iter().flatten().map(|&v| v as f32).collect();
        let y = self.y.iter().map(|&v| v as f32).collect();
        (x, y)
    }
}
