use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeDelta};
use chrono_tz::Tz;
use evgrid_types::{Column, ConnectorReading, EvError, FrequencySource, NormalizeReport};

use super::infer::estimate_step;
use super::parse::localize;
use super::series::StationSeries;

/// Upper bound on grid slots for one station; guards against a stray
/// timestamp decades away from the rest of the series.
pub const MAX_GRID_SLOTS: i64 = 10_000_000;

/// Step used when inference has fewer than two distinct instants; such a grid
/// has at most one slot, so the value only affects `RegularizedSeries::step`.
const FALLBACK_STEP: TimeDelta = TimeDelta::minutes(5);

/// Parameters of one regularization pass.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions<'a> {
    /// Canonical zone timestamps are localized into.
    pub timezone: Tz,
    /// Grid step, fixed or inferred from the surviving timestamps.
    pub frequency: FrequencySource,
    /// Keep only rows of this connector type.
    pub connector: Option<&'a str>,
}

/// One grid position; `reading` is `None` where no observation landed.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSlot {
    /// Naive wall-clock time in the canonical zone.
    pub ts: NaiveDateTime,
    /// Observation at exactly `ts`, if any.
    pub reading: Option<ConnectorReading>,
}

/// A station series reindexed onto a fixed-step grid in naive local time.
///
/// Slots run from the earliest to the latest surviving timestamp inclusive,
/// `step` apart, without gaps or duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularizedSeries {
    step: TimeDelta,
    slots: Vec<GridSlot>,
}

impl RegularizedSeries {
    /// Grid spacing.
    #[must_use]
    pub const fn step(&self) -> TimeDelta {
        self.step
    }

    /// All slots in time order.
    #[must_use]
    pub fn slots(&self) -> &[GridSlot] {
        &self.slots
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` for a series with no surviving rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// First grid instant.
    #[must_use]
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.slots.first().map(|s| s.ts)
    }

    /// Last grid instant.
    #[must_use]
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.slots.last().map(|s| s.ts)
    }

    /// Grid instants in order.
    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.slots.iter().map(|s| s.ts)
    }

    /// One numeric column along the grid; `None` marks missing slots and
    /// observations whose count was absent.
    #[must_use]
    pub fn column(&self, column: Column) -> Vec<Option<f64>> {
        self.slots
            .iter()
            .map(|s| s.reading.as_ref().and_then(|r| r.value(column)))
            .collect()
    }

}

fn resolve_step(frequency: FrequencySource, observed: &[NaiveDateTime]) -> Result<TimeDelta, EvError> {
    let step = match frequency {
        FrequencySource::Fixed(d) => TimeDelta::from_std(d)
            .map_err(|_| EvError::InvalidArg(format!("grid frequency out of range: {d:?}")))?,
        FrequencySource::Inferred => estimate_step(observed).unwrap_or(FALLBACK_STEP),
    };
    if step < TimeDelta::milliseconds(1) {
        return Err(EvError::InvalidArg(format!(
            "grid frequency must be at least 1ms, got {step}"
        )));
    }
    Ok(step)
}

/// Regularize a station series onto a fixed-step grid.
///
/// 1. Parse every timestamp; unparseable or DST-ambiguous rows are dropped and
///    counted in `dropped_unparseable`.
/// 2. Localize to `opts.timezone` and strip the offset.
/// 3. Order by local time; on an exact collision the row later in series order wins.
/// 4. Build the inclusive grid `min, min + step, …, max`.
/// 5. Place each row on the slot equal to its timestamp; rows between slots are
///    counted in `off_grid` and not placed.
///
/// No imputation happens here: empty slots carry `None`.
///
/// # Errors
/// `InvalidArg` when the step is shorter than 1ms or out of range, `Data` when
/// the grid would exceed [`MAX_GRID_SLOTS`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "evgrid_core::normalize",
        skip(series, opts),
        fields(rows = series.len(), tz = %opts.timezone),
    )
)]
pub fn normalize(
    series: &StationSeries,
    opts: &NormalizeOptions<'_>,
) -> Result<(RegularizedSeries, NormalizeReport), EvError> {
    let mut report = NormalizeReport {
        input_rows: series.len(),
        ..NormalizeReport::default()
    };

    let mut by_local: BTreeMap<NaiveDateTime, &ConnectorReading> = BTreeMap::new();
    let mut survivors = 0usize;
    for r in series.readings() {
        if let Some(want) = opts.connector
            && r.connector_type != want
        {
            report.filtered_out += 1;
            continue;
        }
        match localize(&r.timestamp, opts.timezone) {
            Ok(ts) => {
                survivors += 1;
                by_local.insert(ts, r);
            }
            Err(_) => report.dropped_unparseable += 1,
        }
    }
    report.collapsed_duplicates = survivors - by_local.len();

    if report.dropped_unparseable > 0 {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            dropped = report.dropped_unparseable,
            "dropped rows with unparseable timestamps"
        );
    }

    let observed: Vec<NaiveDateTime> = by_local.keys().copied().collect();
    let step = resolve_step(opts.frequency, &observed)?;

    let (Some(&min), Some(&max)) = (observed.first(), observed.last()) else {
        return Ok((
            RegularizedSeries {
                step,
                slots: Vec::new(),
            },
            report,
        ));
    };

    // Whole nanoseconds, so sub-millisecond steps keep their exact spacing.
    let step_ns = step
        .num_nanoseconds()
        .ok_or_else(|| EvError::InvalidArg(format!("grid frequency out of range: {step}")))?;
    let last_index = (max - min)
        .num_nanoseconds()
        .map_or(i64::MAX, |span_ns| span_ns / step_ns);
    if last_index >= MAX_GRID_SLOTS {
        return Err(EvError::Data(format!(
            "grid from {min} to {max} at step {step} exceeds {MAX_GRID_SLOTS} slots"
        )));
    }

    let mut slots: Vec<GridSlot> = (0..=last_index)
        .map(|k| GridSlot {
            ts: min + TimeDelta::nanoseconds(k * step_ns),
            reading: None,
        })
        .collect();

    for (ts, r) in by_local {
        let slot = (ts - min)
            .num_nanoseconds()
            .and_then(|offset| usize::try_from(offset / step_ns).ok())
            .and_then(|k| slots.get_mut(k));
        match slot {
            Some(slot) if slot.ts == ts => {
                slot.reading = Some(r.clone());
                report.observed += 1;
            }
            _ => report.off_grid += 1,
        }
    }

    if report.off_grid > 0 {
        #[cfg(feature = "tracing")]
        tracing::debug!(off_grid = report.off_grid, %step, "rows between grid slots were not placed");
    }

    report.slots = slots.len();
    Ok((RegularizedSeries { step, slots }, report))
}
