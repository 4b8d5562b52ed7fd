use std::collections::{BTreeMap, btree_map::Entry};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use evgrid_types::{ConnectorReading, MergeSummary};

use super::parse::resolve_utc;

/// Time half of the merge key.
///
/// Timestamps that resolve to an absolute instant are keyed by that instant, so
/// a naive and an offset-carrying spelling of the same moment are one key.
/// Unresolvable ones fall back to their raw text and sort after every instant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum KeyTime {
    Resolved(DateTime<Utc>),
    Unresolved(String),
}

/// Natural key `(instant, connector_type)` in series order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SeriesKey {
    at: KeyTime,
    connector_type: String,
}

impl SeriesKey {
    fn of(r: &ConnectorReading, tz: Tz) -> Self {
        let at = resolve_utc(&r.timestamp, tz)
            .map_or_else(|_| KeyTime::Unresolved(r.timestamp.clone()), KeyTime::Resolved);
        Self {
            at,
            connector_type: r.connector_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Existing,
    Incoming,
}

/// Merge a batch of readings into an existing station series.
///
/// - Rows are keyed by `(timestamp, connector_type)`, where the timestamp is
///   compared as an absolute instant (naive values are read in `tz`). The last
///   write wins, both across `existing` → `incoming` and within `incoming`
///   itself, and the winner keeps its own timestamp spelling.
/// - Output is sorted ascending by instant, ties broken by connector type.
///   Timestamps that cannot be resolved are keyed by their text and sort last.
/// - `merge(merge(s, b), b) == merge(s, b)`.
///
/// The returned summary counts how many existing rows the batch redefined.
pub fn merge_readings<E, I>(existing: E, incoming: I, tz: Tz) -> (Vec<ConnectorReading>, MergeSummary)
where
    E: IntoIterator<Item = ConnectorReading>,
    I: IntoIterator<Item = ConnectorReading>,
{
    let mut map: BTreeMap<SeriesKey, (ConnectorReading, Origin)> = BTreeMap::new();
    let mut summary = MergeSummary::default();

    for r in existing {
        map.insert(SeriesKey::of(&r, tz), (r, Origin::Existing));
    }
    // Counts distinct keys, so a stored series with duplicate keys is repaired here.
    summary.existing = map.len();

    for r in incoming {
        summary.incoming += 1;
        match map.entry(SeriesKey::of(&r, tz)) {
            Entry::Vacant(v) => {
                v.insert((r, Origin::Incoming));
            }
            Entry::Occupied(mut o) => {
                if o.get().1 == Origin::Existing {
                    summary.replaced += 1;
                }
                o.insert((r, Origin::Incoming));
            }
        }
    }

    summary.merged = map.len();
    let merged = map.into_values().map(|(r, _)| r).collect();
    (merged, summary)
}
