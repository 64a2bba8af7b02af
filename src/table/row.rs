use std::{collections::BTreeMap, fmt};

use crate::util::{Timestamp, next_timestamp};

/// One historical value of a qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellVersion {
    pub timestamp: Timestamp,
    pub value: String,
}

/// Append-only version history of a single qualifier.
///
/// Versions are numbered from 1; the highest number is authoritative for
/// reads. A history is never empty: it is created with its first version
/// and only ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedCell {
    versions: Vec<CellVersion>,
}

impl VersionedCell {
    pub fn new(value: impl Into<String>) -> Self {
        VersionedCell {
            versions: vec![CellVersion {
                timestamp: next_timestamp(None),
                value: value.into(),
            }],
        }
    }

    /// Rebuild a history from versions ordered 1..=n. Returns `None` for an
    /// empty list.
    pub(crate) fn from_versions(versions: Vec<CellVersion>) -> Option<Self> {
        if versions.is_empty() {
            None
        } else {
            Some(VersionedCell { versions })
        }
    }

    /// Append a new version and return its version number.
    pub fn append(&mut self, value: impl Into<String>) -> u32 {
        let timestamp = next_timestamp(self.versions.last().map(|v| &v.timestamp));
        self.versions.push(CellVersion {
            timestamp,
            value: value.into(),
        });
        self.version_count()
    }

    pub fn version_count(&self) -> u32 {
        self.versions.len() as u32
    }

    pub fn latest(&self) -> Option<&CellVersion> {
        self.versions.last()
    }

    /// Version by its 1-based number.
    pub fn version(&self, number: u32) -> Option<&CellVersion> {
        let index = (number as usize).checked_sub(1)?;
        self.versions.get(index)
    }

    /// Versions oldest first.
    pub fn versions(&self) -> &[CellVersion] {
        &self.versions
    }
}

/// All qualifiers of one `(row_key, column_family)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowEntry {
    pub row_key: String,
    pub column_family: String,
    pub qualifiers: BTreeMap<String, VersionedCell>,
}

impl RowEntry {
    pub fn new(row_key: impl Into<String>, column_family: impl Into<String>) -> Self {
        RowEntry {
            row_key: row_key.into(),
            column_family: column_family.into(),
            qualifiers: BTreeMap::new(),
        }
    }

    /// Sort key of the entry inside a table.
    pub fn key(&self) -> (&str, &str) {
        (&self.row_key, &self.column_family)
    }

    pub fn is_empty(&self) -> bool {
        self.qualifiers.is_empty()
    }
}

/// Read view of one cell version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell<'a> {
    pub row_key: &'a str,
    pub column_family: &'a str,
    pub qualifier: &'a str,
    pub version: u32,
    pub timestamp: &'a Timestamp,
    pub value: &'a str,
}

impl<'a> Cell<'a> {
    pub(crate) fn new(
        entry: &'a RowEntry,
        qualifier: &'a str,
        version: u32,
        data: &'a CellVersion,
    ) -> Self {
        Cell {
            row_key: &entry.row_key,
            column_family: &entry.column_family,
            qualifier,
            version,
            timestamp: &data.timestamp,
            value: &data.value,
        }
    }

    /// `family:qualifier`
    pub fn column(&self) -> String {
        format!("{}:{}", self.column_family, self.qualifier)
    }
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "column={}:{}, timestamp={}, value={}",
            self.column_family,
            self.qualifier,
            self.timestamp.to_rfc3339(),
            self.value
        )
    }
}
