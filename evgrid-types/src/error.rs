use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the evgrid workspace.
///
/// Station-scoped failures are tagged with [`EvError::Station`] by the
/// orchestrator so they can be reported per station without aborting a run.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvError {
    /// Issues with the stored or delivered data (malformed rows, bad payloads).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A station identifier that cannot address a persisted series.
    #[error("invalid station identifier: {0:?}")]
    InvalidStation(String),

    /// A column required by the requested operation is absent.
    #[error("missing required column: {column}")]
    MissingColumn {
        /// Name of the absent column, e.g. "timestamp".
        column: String,
    },

    /// Too few rows for the requested windowing or split.
    #[error("insufficient data: need more than {needed} rows, got {got}")]
    InsufficientData {
        /// Row count that must be exceeded.
        needed: usize,
        /// Rows actually available.
        got: usize,
    },

    /// A station has no persisted series.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "series for station X".
        what: String,
    },

    /// Filesystem read or write failure.
    #[error("io error at {path}: {msg}")]
    Io {
        /// Path involved in the failed operation.
        path: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Encoding or decoding failure of a persisted series or upstream payload.
    #[error("codec error: {0}")]
    Codec(String),

    /// A failure scoped to one station's unit of work.
    #[error("station {station}: {source}")]
    Station {
        /// Station identifier the failure belongs to.
        station: String,
        /// Underlying failure.
        source: Box<EvError>,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl EvError {
    /// Helper: build an `Io` error for a path and any displayable cause.
    pub fn io(path: impl AsRef<std::path::Path>, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            msg: err.to_string(),
        }
    }

    /// Helper: build a `MissingColumn` error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: tag an error with the station it belongs to.
    ///
    /// Already-tagged errors are returned unchanged.
    pub fn for_station(station: impl Into<String>, err: Self) -> Self {
        match err {
            e @ Self::Station { .. } => e,
            other => Self::Station {
                station: station.into(),
                source: Box::new(other),
            },
        }
    }

    /// Strip a station tag, returning the underlying failure.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Station { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this outcome means "skip the station" rather than a hard failure.
    ///
    /// Missing columns, insufficient rows and absent series are skips.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(
            self.root(),
            Self::MissingColumn { .. } | Self::InsufficientData { .. } | Self::NotFound { .. }
        )
    }
}
