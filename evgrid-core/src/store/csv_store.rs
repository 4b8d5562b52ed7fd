use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use evgrid_types::{ConnectorReading, EvError, StationId};

use super::{SERIES_COLUMNS, SeriesStore, StoredSeries};

/// One CSV file per station under a root directory: `<root>/<station>.csv`.
///
/// Saves go to a dot-prefixed temporary file in the same directory, are synced,
/// and then renamed over the target, so readers see either the old or the new
/// series and never a partial one.
#[derive(Debug, Clone)]
pub struct CsvSeriesStore {
    root: PathBuf,
}

impl CsvSeriesStore {
    /// Store rooted at `root`; the directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the series of `station`.
    #[must_use]
    pub fn path_for(&self, station: &StationId) -> PathBuf {
        self.root.join(format!("{station}.csv"))
    }

    fn temp_path_for(&self, station: &StationId) -> PathBuf {
        self.root
            .join(format!(".{station}.csv.{}.tmp", std::process::id()))
    }
}

fn codec(path: &Path, e: impl std::fmt::Display) -> EvError {
    EvError::Codec(format!("{}: {e}", path.display()))
}

fn write_series(path: &Path, readings: &[ConnectorReading]) -> Result<(), EvError> {
    let file = File::create(path).map_err(|e| EvError::io(path, e))?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    wtr.write_record(SERIES_COLUMNS)
        .map_err(|e| codec(path, e))?;
    for r in readings {
        wtr.serialize(r).map_err(|e| codec(path, e))?;
    }
    let file = wtr.into_inner().map_err(|e| EvError::io(path, e))?;
    file.sync_all().map_err(|e| EvError::io(path, e))
}

impl SeriesStore for CsvSeriesStore {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn load(&self, station: &StationId) -> Result<Option<StoredSeries>, EvError> {
        let path = self.path_for(station);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(EvError::io(&path, e)),
        };
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(BufReader::new(file));

        let columns: Vec<String> = rdr
            .headers()
            .map_err(|e| codec(&path, e))?
            .iter()
            .map(str::to_string)
            .collect();
        let mut stored = StoredSeries {
            columns,
            readings: Vec::new(),
        };
        stored.require_columns(&["timestamp", "type"])?;

        for row in rdr.deserialize::<ConnectorReading>() {
            stored.readings.push(row.map_err(|e| codec(&path, e))?);
        }
        Ok(Some(stored))
    }

    fn save(&self, station: &StationId, readings: &[ConnectorReading]) -> Result<(), EvError> {
        fs::create_dir_all(&self.root).map_err(|e| EvError::io(&self.root, e))?;
        let target = self.path_for(station);
        let tmp = self.temp_path_for(station);

        let result = write_series(&tmp, readings)
            .and_then(|()| fs::rename(&tmp, &target).map_err(|e| EvError::io(&target, e)));
        if result.is_err() {
            // Best effort; the committed series is untouched either way.
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    fn stations(&self) -> Result<Vec<StationId>, EvError> {
        let dir = match fs::read_dir(&self.root) {
            Ok(d) => d,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(EvError::io(&self.root, e)),
        };
        let mut out = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|e| EvError::io(&self.root, e))?;
            let name = entry.file_name();
            let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".csv")) else {
                continue;
            };
            if let Ok(id) = StationId::new(stem) {
                out.push(id);
            }
        }
        out.sort();
        Ok(out)
    }
}
