//! Market record store: loading, validation, deduplication and persistence.
//!
//! The storage medium sits behind [`RecordSource`]. Everything above it works
//! on a [`Table`] of raw string rows, so swapping CSV for another tabular
//! medium only means another `RecordSource` impl.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use csv::StringRecord;
use serde::Deserialize;

use crate::error::MarketError;
use crate::geo;
use crate::market::{MarketRecord, RecordSet};

pub const COL_MARKET: &str = "Market";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";
pub const COL_ACTIVE_MRS: &str = "Active MRs";
pub const COL_MANAGER: &str = "Manager";

/// Columns every market table must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_MARKET,
    COL_LATITUDE,
    COL_LONGITUDE,
    COL_ACTIVE_MRS,
    COL_MANAGER,
];

/// A header row plus raw data rows, exactly as held by the medium.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

/// Backing medium for market tables.
pub trait RecordSource {
    /// Human-readable location, used in log lines and error messages.
    fn describe(&self) -> String;

    /// # Errors
    ///
    /// Returns [`MarketError::SourceNotFound`] when the medium does not exist,
    /// or a parse/I/O error when it cannot be read as a table.
    fn read_table(&self) -> Result<Table, MarketError>;

    /// Replace the stored table. Must be all-or-nothing: on error the
    /// previously stored table is left intact.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Persist`] when the table cannot be written.
    fn write_table(&self, table: &Table) -> Result<(), MarketError>;
}

/// A CSV file on local disk.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist_error(&self, reason: impl std::fmt::Display) -> MarketError {
        MarketError::Persist {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl RecordSource for CsvFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_table(&self) -> Result<Table, MarketError> {
        let file = std::fs::File::open(&self.path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                MarketError::SourceNotFound {
                    path: self.describe(),
                }
            } else {
                MarketError::SourceIo {
                    path: self.describe(),
                    source: e,
                }
            }
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader.headers().map_err(csv_parse_error)?.clone();
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_parse_error)?;

        Ok(Table { headers, rows })
    }

    fn write_table(&self, table: &Table) -> Result<(), MarketError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        // Write next to the target and rename over it so a failed save never
        // leaves a truncated file behind.
        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| self.persist_error(e))?;
        {
            let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
            writer
                .write_record(&table.headers)
                .map_err(|e| self.persist_error(e))?;
            for row in &table.rows {
                writer.write_record(row).map_err(|e| self.persist_error(e))?;
            }
            writer.flush().map_err(|e| self.persist_error(e))?;
        }
        tmp.as_file().sync_all().map_err(|e| self.persist_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.persist_error(e.error))?;

        Ok(())
    }
}

fn csv_parse_error(err: csv::Error) -> MarketError {
    let line = err.position().map_or(0, csv::Position::line);
    MarketError::Parse {
        line,
        reason: err.to_string(),
    }
}

/// The five required fields of one row, after whitespace trimming.
#[derive(Debug, Deserialize)]
struct MarketRow {
    #[serde(rename = "Market")]
    market: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Active MRs")]
    active_mrs: String,
    #[serde(rename = "Manager", default)]
    manager: String,
}

/// Loads market tables from a [`RecordSource`] and writes mutations back.
///
/// Each mutation re-reads the stored table, applies the change and writes
/// it back while holding the store's write lock, so callers in the same
/// process never overwrite each other's updates with a stale set. Other
/// processes writing the same medium are not coordinated (last writer wins).
///
/// A mutation returns the updated set only after it has been persisted; on
/// any error the caller's set and the stored table are both unchanged.
#[derive(Debug)]
pub struct MarketStore<S = CsvFileSource> {
    source: S,
    write_lock: Mutex<()>,
}

impl MarketStore<CsvFileSource> {
    /// Store backed by a CSV file at `path`.
    pub fn open_csv(path: impl Into<PathBuf>) -> Self {
        Self::new(CsvFileSource::new(path))
    }
}

impl<S: RecordSource> MarketStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            write_lock: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load, validate and deduplicate the market table.
    ///
    /// # Errors
    ///
    /// - [`MarketError::SourceNotFound`] if the medium does not exist.
    /// - [`MarketError::MissingColumn`] if a required column is absent.
    /// - [`MarketError::Parse`] for malformed rows or non-numeric cells.
    /// - [`MarketError::Validation`] for empty names, negative staff counts,
    ///   out-of-range coordinates, or one name at two different locations.
    pub fn load(&self) -> Result<RecordSet, MarketError> {
        let set = build_record_set(self.source.read_table()?)?;
        tracing::info!(
            source = %self.source.describe(),
            markets = set.len(),
            "loaded market table"
        );
        Ok(set)
    }

    /// Set one market's active staff count and persist the whole table.
    ///
    /// `name` must be a market of `set`. The count is applied to the table
    /// as stored at the time of the call, so updates other callers made
    /// after `set` was loaded are kept.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Validation`] for a negative count,
    /// [`MarketError::MarketNotFound`] for an unknown market, a load error
    /// if the stored table can no longer be read, or
    /// [`MarketError::Persist`] if the save fails.
    pub fn update_staff_count(
        &self,
        set: &RecordSet,
        name: &str,
        new_count: i64,
    ) -> Result<RecordSet, MarketError> {
        let count = checked_staff_count(new_count)?;
        let name = set.find_by_name(name)?.name.clone();

        let (updated, previous) = self.read_modify_write(|current| {
            let index = current
                .position(&name)
                .ok_or_else(|| MarketError::MarketNotFound(name.clone()))?;
            let previous = current.records()[index].active_staff_count;
            current.set_staff_count(index, count);
            Ok(previous)
        })?;

        tracing::info!(
            market = %name,
            previous,
            current = count,
            "updated active staff count"
        );
        Ok(updated)
    }

    /// Overwrite every market's staff count and persist.
    ///
    /// `counts` must hold one token per record of `set`, in record-set
    /// order. Once every token is accepted the counts are applied by market
    /// name to the table as stored at the time of the call.
    ///
    /// # Errors
    ///
    /// See [`crate::bulk::apply_bulk`]; additionally
    /// [`MarketError::MarketNotFound`] if a market of `set` has since left
    /// the stored table, and [`MarketError::Persist`] if the save fails.
    pub fn apply_bulk<T: AsRef<str>>(
        &self,
        set: &RecordSet,
        counts: &[T],
    ) -> Result<RecordSet, MarketError> {
        let requested = crate::bulk::apply_bulk(set, counts)?;

        let (updated, ()) = self.read_modify_write(|current| {
            for record in &requested {
                let index = current
                    .position(&record.name)
                    .ok_or_else(|| MarketError::MarketNotFound(record.name.clone()))?;
                current.set_staff_count(index, record.active_staff_count);
            }
            Ok(())
        })?;

        tracing::info!(markets = updated.len(), "applied bulk staff count update");
        Ok(updated)
    }

    /// Write `set` back to the source as is.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Persist`] if the source rejects the write.
    pub fn persist(&self, set: &RecordSet) -> Result<(), MarketError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.source.write_table(&set.to_table())
    }

    /// Re-read the stored table, apply `change` and write the result back,
    /// all under the write lock. Nothing is written if `change` fails.
    fn read_modify_write<T>(
        &self,
        change: impl FnOnce(&mut RecordSet) -> Result<T, MarketError>,
    ) -> Result<(RecordSet, T), MarketError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut current = build_record_set(self.source.read_table()?)?;
        let outcome = change(&mut current)?;
        self.source.write_table(&current.to_table())?;
        Ok((current, outcome))
    }
}

/// Validate a caller-supplied staff count.
pub(crate) fn checked_staff_count(value: i64) -> Result<u32, MarketError> {
    if value < 0 {
        return Err(MarketError::Validation(format!(
            "active staff count must be non-negative, got {value}"
        )));
    }
    u32::try_from(value).map_err(|_| {
        MarketError::Validation(format!("active staff count {value} is too large"))
    })
}

/// Parse an operator-entered staff count token.
///
/// # Errors
///
/// Returns [`MarketError::Validation`] unless `token` is a non-negative
/// integer.
pub fn parse_staff_count(token: &str) -> Result<u32, MarketError> {
    let token = token.trim();
    let value = token.parse::<i64>().map_err(|_| {
        MarketError::Validation(format!(
            "'{token}' is not a whole number; active staff counts must be non-negative integers"
        ))
    })?;
    checked_staff_count(value)
}

/// Staff count cell as stored. Spreadsheet exports write integral values as
/// `3.0`, so an integral decimal is accepted; anything fractional is not.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn parse_stored_staff_count(raw: &str, line: u64, market: &str) -> Result<u32, MarketError> {
    let value = if let Ok(v) = raw.parse::<i64>() {
        v
    } else {
        match raw.parse::<f64>() {
            // Integral and within the range where f64 holds integers exactly.
            Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => f as i64,
            _ => {
                let reason =
                    format!("'{COL_ACTIVE_MRS}' for market '{market}' is not an integer: '{raw}'");
                return Err(MarketError::Parse { line, reason });
            }
        }
    };

    checked_staff_count(value).map_err(|e| MarketError::Validation(format!("line {line}: {e}")))
}

fn build_record_set(table: Table) -> Result<RecordSet, MarketError> {
    let mut headers = table.headers.clone();
    headers.trim();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(MarketError::MissingColumn(column.to_string()));
        }
    }
    let staff_column = headers
        .iter()
        .position(|h| h == COL_ACTIVE_MRS)
        .ok_or_else(|| MarketError::MissingColumn(COL_ACTIVE_MRS.to_string()))?;

    let mut records: Vec<MarketRecord> = Vec::new();
    let mut row_owner = Vec::with_capacity(table.rows.len());
    let mut by_key: HashMap<(String, u64, u64), usize> = HashMap::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for (i, raw) in table.rows.iter().enumerate() {
        let line = raw
            .position()
            .map_or_else(|| u64::try_from(i).map_or(u64::MAX, |i| i + 2), csv::Position::line);

        let mut trimmed = raw.clone();
        trimmed.trim();
        let row: MarketRow = trimmed
            .deserialize(Some(&headers))
            .map_err(|e| MarketError::Parse {
                line,
                reason: e.to_string(),
            })?;

        let name = row.market.trim().to_string();
        if name.is_empty() {
            return Err(MarketError::Validation(format!(
                "line {line}: market name must be non-empty"
            )));
        }

        let latitude = geo::round_coordinate(row.latitude);
        let longitude = geo::round_coordinate(row.longitude);
        if !geo::is_valid_latitude(latitude) || !geo::is_valid_longitude(longitude) {
            return Err(MarketError::Validation(format!(
                "line {line}: '{name}' has out-of-range coordinates ({latitude}, {longitude})"
            )));
        }

        let active_staff_count = parse_stored_staff_count(&row.active_mrs, line, &name)?;

        // `+ 0.0` folds -0.0 into 0.0 so both hash alike.
        let key = (name.clone(), (latitude + 0.0).to_bits(), (longitude + 0.0).to_bits());
        if let Some(&owner) = by_key.get(&key) {
            tracing::debug!(market = %name, line, "dropping duplicate market row");
            row_owner.push(owner);
            continue;
        }

        if by_name.contains_key(&name) {
            return Err(MarketError::Validation(format!(
                "line {line}: market '{name}' appears again with different coordinates"
            )));
        }

        let index = records.len();
        by_key.insert(key, index);
        by_name.insert(name.clone(), index);
        row_owner.push(index);
        records.push(MarketRecord {
            name,
            latitude,
            longitude,
            active_staff_count,
            manager: row.manager,
        });
    }

    Ok(RecordSet::from_parts(records, table, row_owner, staff_column))
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
