use chrono::{NaiveDateTime, TimeDelta};

/// Estimate the sampling step of a series from positive adjacent deltas.
///
/// Prefers the unique most frequent delta; when several deltas tie for most
/// frequent, returns the lower median so the result is always an observed
/// cadence. Order of `timestamps` does not matter and duplicates are ignored.
/// Returns `None` with fewer than two distinct instants.
///
/// ```
/// use chrono::{NaiveDate, TimeDelta};
/// use evgrid_core::estimate_step;
///
/// let t = |m: u32| NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(10, m, 0).unwrap();
/// // Deltas 5,5,5,10 minutes: the mode is 5 minutes.
/// let ts = [t(0), t(5), t(10), t(15), t(25)];
/// assert_eq!(estimate_step(&ts), Some(TimeDelta::minutes(5)));
/// ```
#[must_use]
pub fn estimate_step(timestamps: &[NaiveDateTime]) -> Option<TimeDelta> {
    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut deltas: Vec<TimeDelta> = sorted.windows(2).map(|w| w[1] - w[0]).collect();
    if deltas.is_empty() {
        return None;
    }
    deltas.sort_unstable();

    // Run-length encode the sorted deltas and track the longest run.
    let mut best: Option<(TimeDelta, usize)> = None;
    let mut tied = false;
    let mut i = 0;
    while i < deltas.len() {
        let d = deltas[i];
        let run = deltas[i..].iter().take_while(|&&x| x == d).count();
        match best {
            Some((_, n)) if run == n => tied = true,
            Some((_, n)) if run < n => {}
            _ => {
                best = Some((d, run));
                tied = false;
            }
        }
        i += run;
    }

    match best {
        Some((d, _)) if !tied => Some(d),
        _ => Some(deltas[(deltas.len() - 1) / 2]),
    }
}
