//! Decoder for the upstream availability snapshot payload.
//!
//! One payload carries a `results` array with one entry per station; every
//! connector group of an entry becomes one [`ConnectorReading`] stamped with the
//! entry's `fetched_at`.

use std::collections::HashMap;

use evgrid_types::{ConnectorReading, EvError, StationBatch, StationId};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: Option<String>,
    name: Option<String>,
    address: Option<String>,
    #[serde(default)]
    position: Option<Position>,
    #[serde(default)]
    availability: Vec<ConnectorGroup>,
    fetched_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Position {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConnectorGroup {
    #[serde(rename = "type")]
    connector_type: Option<String>,
    total: Option<u32>,
    #[serde(default)]
    availability: Option<GroupAvailability>,
}

#[derive(Debug, Deserialize)]
struct GroupAvailability {
    current: Option<Counts>,
}

#[derive(Debug, Default, Deserialize)]
struct Counts {
    available: Option<u32>,
    occupied: Option<u32>,
    unknown: Option<u32>,
}

/// Per-station batches decoded from one snapshot payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedSnapshot {
    /// One batch per station, in order of first appearance.
    pub batches: Vec<StationBatch>,
    /// Entries lacking an id, a timestamp or any connector group.
    pub skipped_entries: usize,
    /// Connector groups without a connector type.
    pub skipped_connectors: usize,
    /// Entries whose id is not a valid station identifier.
    pub invalid_stations: Vec<EvError>,
    /// Entries whose fields have the wrong shape (negative counts, text
    /// coordinates); tagged with the entry's id when it has one.
    pub malformed_entries: Vec<EvError>,
}

/// Decode one `results` element; a bad field rejects only its own entry.
fn decode_entry(value: serde_json::Value) -> Result<Entry, EvError> {
    let id = value
        .get("id")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned);
    serde_json::from_value(value).map_err(|e| {
        let err = EvError::Codec(format!("snapshot entry: {e}"));
        match id {
            Some(id) => EvError::for_station(id, err),
            None => err,
        }
    })
}

/// Decode an upstream snapshot payload into per-station batches.
///
/// Entries for the same station are concatenated in payload order, so a later
/// entry wins on a repeated `(timestamp, type)` once merged. Missing `name`
/// and `address` default to `"Unnamed"` and `"Unknown"`.
///
/// An entry with a malformed field is set aside in `malformed_entries`; the
/// other entries still decode.
///
/// # Errors
/// Returns `EvError::Codec` if the payload is not valid JSON or `results` is
/// not an array.
pub fn decode_snapshot(payload: &str) -> Result<DecodedSnapshot, EvError> {
    let payload: Payload =
        serde_json::from_str(payload).map_err(|e| EvError::Codec(format!("snapshot payload: {e}")))?;

    let mut out = DecodedSnapshot::default();
    let mut index: HashMap<StationId, usize> = HashMap::new();

    for value in payload.results {
        let entry = match decode_entry(value) {
            Ok(entry) => entry,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "skipping malformed snapshot entry");
                out.malformed_entries.push(e);
                continue;
            }
        };
        let (Some(id), Some(fetched_at)) = (entry.id, entry.fetched_at) else {
            out.skipped_entries += 1;
            continue;
        };
        if id.is_empty() || fetched_at.is_empty() || entry.availability.is_empty() {
            out.skipped_entries += 1;
            continue;
        }
        let station = match StationId::new(id) {
            Ok(s) => s,
            Err(e) => {
                out.invalid_stations.push(e);
                continue;
            }
        };

        let name = entry.name.unwrap_or_else(|| "Unnamed".to_string());
        let address = entry.address.unwrap_or_else(|| "Unknown".to_string());
        let position = entry.position.unwrap_or_default();

        let mut readings = Vec::with_capacity(entry.availability.len());
        for group in entry.availability {
            let Some(connector_type) = group.connector_type else {
                out.skipped_connectors += 1;
                continue;
            };
            let counts = group
                .availability
                .and_then(|a| a.current)
                .unwrap_or_default();
            readings.push(ConnectorReading {
                timestamp: fetched_at.clone(),
                name: name.clone(),
                address: address.clone(),
                lat: position.lat,
                lon: position.lon,
                connector_type,
                total: group.total,
                available: counts.available,
                occupied: counts.occupied,
                unknown: counts.unknown,
            });
        }

        match index.get(&station) {
            Some(&i) => out.batches[i].readings.extend(readings),
            None => {
                index.insert(station.clone(), out.batches.len());
                out.batches.push(StationBatch { station, readings });
            }
        }
    }

    Ok(out)
}
