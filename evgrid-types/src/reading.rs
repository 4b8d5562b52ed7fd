//! Connector readings, station identifiers and numeric column selectors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EvError;

/// One observation of a connector group at a station.
///
/// Field order is the persisted column order:
/// `timestamp, name, address, lat, lon, type, total, available, occupied, unknown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorReading {
    /// Observation instant exactly as delivered upstream (ISO-8601, naive or zone-aware).
    pub timestamp: String,
    /// Station display name.
    #[serde(default)]
    pub name: String,
    /// Station street address.
    #[serde(default)]
    pub address: String,
    /// Station latitude.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Station longitude.
    #[serde(default)]
    pub lon: Option<f64>,
    /// Connector standard, e.g. `IEC62196Type2Outlet`.
    #[serde(rename = "type")]
    pub connector_type: String,
    /// Number of connectors of this type.
    #[serde(default)]
    pub total: Option<u32>,
    /// Connectors currently available.
    #[serde(default)]
    pub available: Option<u32>,
    /// Connectors currently occupied.
    #[serde(default)]
    pub occupied: Option<u32>,
    /// Connectors in an unknown state.
    #[serde(default)]
    pub unknown: Option<u32>,
}

impl ConnectorReading {
    /// Minimal reading with only key fields and counts set.
    pub fn new(timestamp: impl Into<String>, connector_type: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            name: String::new(),
            address: String::new(),
            lat: None,
            lon: None,
            connector_type: connector_type.into(),
            total: None,
            available: None,
            occupied: None,
            unknown: None,
        }
    }

    /// Set the `available`/`occupied`/`unknown`/`total` counts.
    #[must_use]
    pub const fn with_counts(
        mut self,
        total: u32,
        available: u32,
        occupied: u32,
        unknown: u32,
    ) -> Self {
        self.total = Some(total);
        self.available = Some(available);
        self.occupied = Some(occupied);
        self.unknown = Some(unknown);
        self
    }

    /// Natural key `(timestamp, connector_type)` borrowed from the reading.
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (self.timestamp.as_str(), self.connector_type.as_str())
    }

    /// Read a numeric column as `f64`, `None` when the count is absent.
    #[must_use]
    pub fn value(&self, column: Column) -> Option<f64> {
        let v = match column {
            Column::Total => self.total,
            Column::Available => self.available,
            Column::Occupied => self.occupied,
            Column::Unknown => self.unknown,
        };
        v.map(f64::from)
    }
}

/// Numeric columns of a persisted series that can be regularized and windowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Column {
    /// Connector count.
    Total,
    /// Available connectors.
    #[default]
    Available,
    /// Occupied connectors.
    Occupied,
    /// Connectors in unknown state.
    Unknown,
}

impl Column {
    /// Every numeric column, in persisted order.
    pub const ALL: [Self; 4] = [Self::Total, Self::Available, Self::Occupied, Self::Unknown];

    /// Persisted header name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = EvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EvError::InvalidArg(format!("unknown numeric column '{s}'")))
    }
}

/// Identifier of a charging station, usable as a storage address.
///
/// Accepts ASCII alphanumerics plus `-`, `_` and `.`; must not be empty or
/// start with a dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId(String);

impl StationId {
    /// Validate and wrap a station identifier.
    ///
    /// # Errors
    /// Returns `EvError::InvalidStation` if the identifier is empty, starts with a
    /// dot, or contains characters outside `[A-Za-z0-9._-]`.
    pub fn new(id: impl Into<String>) -> Result<Self, EvError> {
        let id = id.into();
        let valid = !id.is_empty()
            && !id.starts_with('.')
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if valid {
            Ok(Self(id))
        } else {
            Err(EvError::InvalidStation(id))
        }
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationId {
    type Error = EvError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for StationId {
    type Error = EvError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StationId> for String {
    fn from(value: StationId) -> Self {
        value.0
    }
}

/// A batch of freshly fetched readings destined for one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationBatch {
    /// Target station.
    pub station: StationId,
    /// Readings in arrival order.
    pub readings: Vec<ConnectorReading>,
}
