use serde_json::{Value, json};

/// A captured-style payload: two stations, one entry without an id, one
/// connector group without a type.
pub const SNAPSHOT: &str = r#"{
  "results": [
    {
      "id": "lj-tivoli",
      "name": "Tivoli",
      "address": "Celovska cesta 25, Ljubljana",
      "position": {"lat": 46.0569, "lon": 14.4960},
      "fetched_at": "2024-05-01T10:00:00",
      "availability": [
        {"type": "IEC62196Type2Outlet", "total": 2,
         "availability": {"current": {"available": 1, "occupied": 1, "unknown": 0}}},
        {"type": "CHAdeMO", "total": 1,
         "availability": {"current": {"available": 0, "occupied": 1, "unknown": 0}}},
        {"total": 1}
      ]
    },
    {
      "id": "mb-center",
      "position": {"lat": 46.5547, "lon": 15.6459},
      "fetched_at": "2024-05-01T10:00:00",
      "availability": [
        {"type": "CCS", "total": 4,
         "availability": {"current": {"available": 3, "occupied": 0, "unknown": 1}}}
      ]
    },
    {
      "name": "Orphan",
      "fetched_at": "2024-05-01T10:00:00",
      "availability": [{"type": "CCS", "total": 1}]
    }
  ]
}"#;

/// Payload with one `CHAdeMO` group per `(station, available)` pair, all
/// stamped `fetched_at` and with a total of 2.
#[must_use]
pub fn snapshot_payload(fetched_at: &str, stations: &[(&str, u32)]) -> String {
    let results: Vec<Value> = stations
        .iter()
        .map(|(id, available)| {
            json!({
                "id": id,
                "name": format!("Station {id}"),
                "address": "Unknown",
                "position": {"lat": 46.05, "lon": 14.50},
                "fetched_at": fetched_at,
                "availability": [{
                    "type": "CHAdeMO",
                    "total": 2,
                    "availability": {"current": {
                        "available": available,
                        "occupied": 2u32.saturating_sub(*available),
                        "unknown": 0
                    }}
                }]
            })
        })
        .collect();
    json!({ "results": results }).to_string()
}
