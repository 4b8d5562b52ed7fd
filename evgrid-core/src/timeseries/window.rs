use std::num::NonZeroUsize;

use evgrid_types::WindowedDataset;

/// Slice an ordered sequence into lookback windows and one-step-ahead targets.
///
/// For every `i` in `0..values.len() - window_size`, emits
/// `x[i] = values[i..i + window_size]` and `y[i] = values[i + window_size]`.
/// A sequence no longer than `window_size` yields the empty dataset. Values
/// (including missing markers) are copied through untouched.
///
/// ```
/// use std::num::NonZeroUsize;
/// use evgrid_core::make_windows;
///
/// let ds = make_windows(&[1, 2, 3, 4, 5], NonZeroUsize::new(2).unwrap());
/// assert_eq!(ds.x, vec![vec![1, 2], vec![2, 3], vec![3, 4]]);
/// assert_eq!(ds.y, vec![3, 4, 5]);
///
/// let short = make_windows(&[1, 2], NonZeroUsize::new(5).unwrap());
/// assert!(short.is_empty());
/// ```
#[must_use]
pub fn make_windows<V: Clone>(values: &[V], window_size: NonZeroUsize) -> WindowedDataset<V> {
    let w = window_size.get();
    let Some(n) = values.len().checked_sub(w).filter(|&n| n > 0) else {
        return WindowedDataset::empty(w);
    };
    WindowedDataset {
        x: values.windows(w).take(n).map(<[V]>::to_vec).collect(),
        y: values[w..].to_vec(),
        window_size: w,
    }
}
