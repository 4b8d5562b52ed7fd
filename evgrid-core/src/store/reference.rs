use evgrid_types::{EvError, PromoteOutcome, ReferencePolicy, StationId, Verdict};

use super::SeriesStore;

/// Promote the current series of `station` to the reference baseline.
///
/// A missing reference is seeded from the current series regardless of the
/// verdict. An existing reference is replaced under [`ReferencePolicy::Always`],
/// or under [`ReferencePolicy::OnPass`] when `verdict` is [`Verdict::Pass`];
/// otherwise it is retained. Rows are copied verbatim.
///
/// # Errors
/// - `NotFound` when the station has no current series.
/// - `InsufficientData` when the current series holds fewer than `min_rows` rows.
/// - Store failures from either side; the reference is then unchanged.
pub fn promote_reference(
    current: &dyn SeriesStore,
    reference: &dyn SeriesStore,
    station: &StationId,
    verdict: Verdict,
    policy: ReferencePolicy,
    min_rows: usize,
) -> Result<PromoteOutcome, EvError> {
    let Some(series) = current.load(station)? else {
        return Err(EvError::not_found(format!("current series for {station}")));
    };
    if series.readings.len() < min_rows {
        // `needed` is the count to exceed, so at least `min_rows` means more than `min_rows - 1`.
        return Err(EvError::InsufficientData {
            needed: min_rows.saturating_sub(1),
            got: series.readings.len(),
        });
    }

    let outcome = if reference.load(station)?.is_none() {
        PromoteOutcome::Seeded
    } else {
        match (policy, verdict) {
            (ReferencePolicy::Always, _) | (ReferencePolicy::OnPass, Verdict::Pass) => {
                PromoteOutcome::Replaced
            }
            (ReferencePolicy::OnPass, Verdict::Fail) => PromoteOutcome::Retained,
        }
    };

    if outcome != PromoteOutcome::Retained {
        reference.save(station, &series.readings)?;
    }
    Ok(outcome)
}
