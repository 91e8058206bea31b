use std::collections::HashSet;

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::classify::{classify, Tier};
use crate::error::MarketError;
use crate::geo;
use crate::store::{Table, COL_ACTIVE_MRS, REQUIRED_COLUMNS};

/// A named market location with its staffing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    /// Trimmed market name; unique within a [`RecordSet`].
    pub name: String,
    /// Degrees, rounded to six decimal places.
    pub latitude: f64,
    /// Degrees, rounded to six decimal places.
    pub longitude: f64,
    pub active_staff_count: u32,
    pub manager: String,
}

impl MarketRecord {
    #[must_use]
    pub fn tier(&self) -> Tier {
        classify(i64::from(self.active_staff_count))
    }

    /// Great-circle distance to `other` in miles.
    #[must_use]
    pub fn distance_miles_to(&self, other: &MarketRecord) -> f64 {
        geo::distance_miles(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// The validated, deduplicated markets loaded from one record store.
///
/// Besides the records, the set remembers the raw table it came from so a
/// save writes back every original row and column, changing only the
/// `Active MRs` cells of records whose count was changed.
#[derive(Debug, Clone)]
pub struct RecordSet {
    records: Vec<MarketRecord>,
    table: Table,
    /// For each raw row, the index of the record it was folded into.
    row_owner: Vec<usize>,
    /// Per record: count changed since the raw table was read.
    dirty: Vec<bool>,
    staff_column: usize,
}

impl RecordSet {
    pub(crate) fn from_parts(
        records: Vec<MarketRecord>,
        table: Table,
        row_owner: Vec<usize>,
        staff_column: usize,
    ) -> Self {
        debug_assert_eq!(table.rows.len(), row_owner.len());
        let dirty = vec![false; records.len()];
        Self {
            records,
            table,
            row_owner,
            dirty,
            staff_column,
        }
    }

    /// Build a set directly from records, e.g. to seed a new store.
    ///
    /// Names are trimmed and coordinates rounded the same way a load does.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Validation`] for an empty name, a duplicate
    /// name, or coordinates outside the valid latitude/longitude range.
    pub fn from_records(records: Vec<MarketRecord>) -> Result<Self, MarketError> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(records.len());
        for mut record in records {
            record.name = record.name.trim().to_string();
            record.latitude = geo::round_coordinate(record.latitude);
            record.longitude = geo::round_coordinate(record.longitude);
            if record.name.is_empty() {
                return Err(MarketError::Validation(
                    "market name must be non-empty".to_string(),
                ));
            }
            if !geo::is_valid_latitude(record.latitude)
                || !geo::is_valid_longitude(record.longitude)
            {
                return Err(MarketError::Validation(format!(
                    "market '{}' has out-of-range coordinates ({}, {})",
                    record.name, record.latitude, record.longitude
                )));
            }
            if !seen.insert(record.name.clone()) {
                return Err(MarketError::Validation(format!(
                    "duplicate market name: '{}'",
                    record.name
                )));
            }
            normalized.push(record);
        }

        let headers: StringRecord = REQUIRED_COLUMNS.iter().copied().collect();
        let rows = normalized
            .iter()
            .map(|r| {
                let latitude = r.latitude.to_string();
                let longitude = r.longitude.to_string();
                let staff = r.active_staff_count.to_string();
                StringRecord::from(vec![
                    r.name.as_str(),
                    latitude.as_str(),
                    longitude.as_str(),
                    staff.as_str(),
                    r.manager.as_str(),
                ])
            })
            .collect();
        let staff_column = REQUIRED_COLUMNS
            .iter()
            .position(|c| *c == COL_ACTIVE_MRS)
            .unwrap_or(3);
        let row_owner = (0..normalized.len()).collect();

        Ok(Self::from_parts(
            normalized,
            Table { headers, rows },
            row_owner,
            staff_column,
        ))
    }

    #[must_use]
    pub fn records(&self) -> &[MarketRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MarketRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a market by exact, case-sensitive name. Surrounding
    /// whitespace in `name` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::MarketNotFound`] when no record matches.
    pub fn find_by_name(&self, name: &str) -> Result<&MarketRecord, MarketError> {
        self.position(name)
            .map(|i| &self.records[i])
            .ok_or_else(|| MarketError::MarketNotFound(name.trim().to_string()))
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.records.iter().position(|r| r.name == name)
    }

    /// Market names in alphabetical order.
    #[must_use]
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.records.iter().map(|r| r.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn set_staff_count(&mut self, index: usize, count: u32) {
        let record = &mut self.records[index];
        if record.active_staff_count != count {
            record.active_staff_count = count;
            self.dirty[index] = true;
        }
    }

    /// The raw table with the `Active MRs` cells of changed records (and of
    /// the duplicate rows folded into them) replaced by the current count.
    /// Every other cell is copied verbatim.
    pub(crate) fn to_table(&self) -> Table {
        let rows = self
            .table
            .rows
            .iter()
            .zip(&self.row_owner)
            .map(|(row, &owner)| {
                if !self.dirty[owner] {
                    return row.clone();
                }
                let staff = self.records[owner].active_staff_count.to_string();
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| {
                        if i == self.staff_column {
                            staff.as_str()
                        } else {
                            cell
                        }
                    })
                    .collect::<StringRecord>()
            })
            .collect();

        Table {
            headers: self.table.headers.clone(),
            rows,
        }
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a MarketRecord;
    type IntoIter = std::slice::Iter<'a, MarketRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
