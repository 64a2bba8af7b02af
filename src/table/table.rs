use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    column_family::{ColumnFamilyDescriptor, ColumnFamilyOptions},
    iterator::TableIterator,
    table::{
        format::{self, TABLE_FILE_EXTENSION},
        metadata::{TableMetadata, validate_table_name},
        row::{Cell, RowEntry, VersionedCell},
    },
    util::{Result, Status},
};

/// One table: its metadata plus row entries.
///
/// Entries are kept sorted by `(row_key, column_family)` and each pair
/// appears at most once. Every mutating operation runs through a single
/// `mutate` step that refreshes `updated_at` once the operation has
/// succeeded. Failed operations leave the table untouched.
///
/// # Example
///
/// ```
/// use hbaselite::{ColumnFamilyDescriptor, ColumnFamilyOptions, Table};
///
/// let mut table = Table::new(
///     "students",
///     vec![ColumnFamilyDescriptor::new("Personal", ColumnFamilyOptions::default())],
/// )
/// .unwrap();
///
/// table.put("r1", "Personal", "Nombres", "Ana").unwrap();
/// let cells = table.get("r1", None, None).unwrap();
/// assert_eq!(cells.len(), 1);
/// assert_eq!(cells[0].value, "Ana");
/// assert_eq!(table.count().unwrap(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    metadata: TableMetadata,
    entries: Vec<RowEntry>,
}

impl Table {
    /// Create an empty, enabled table.
    ///
    /// Fails if the name is illegal or two families share a name.
    pub fn new(name: impl Into<String>, column_families: Vec<ColumnFamilyDescriptor>) -> Result<Self> {
        let name = name.into();
        validate_table_name(&name)?;

        let mut seen = HashSet::new();
        for cf in &column_families {
            validate_family_name(&cf.name)?;
            if !seen.insert(cf.name.as_str()) {
                return Err(Status::already_exists(format!(
                    "Column family '{}' already exists",
                    cf.name
                )));
            }
        }

        Ok(Table {
            metadata: TableMetadata::new(name, column_families),
            entries: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        self.metadata.name()
    }

    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    pub fn entries(&self) -> &[RowEntry] {
        &self.entries
    }

    pub fn is_enabled(&self) -> bool {
        !self.metadata.is_disabled
    }

    pub fn is_disabled(&self) -> bool {
        self.metadata.is_disabled
    }

    pub fn column_family(&self, name: &str) -> Option<&ColumnFamilyDescriptor> {
        self.metadata.column_family(name)
    }

    pub fn column_family_names(&self) -> Vec<String> {
        self.metadata
            .column_families
            .iter()
            .map(|cf| cf.name.clone())
            .collect()
    }

    /// Run a mutating operation and refresh `updated_at` if it succeeds.
    fn mutate<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let out = op(self)?;
        self.metadata.touch();
        Ok(out)
    }

    fn check_enabled(&self, action: &str) -> Result<()> {
        if self.metadata.is_disabled {
            return Err(Status::disabled_state_conflict(format!(
                "Failed to {action}: table '{}' is disabled",
                self.name()
            )));
        }
        Ok(())
    }

    fn check_family(&self, family: &str) -> Result<()> {
        if self.metadata.column_family(family).is_none() {
            return Err(Status::not_found(format!(
                "Column family '{family}' not found in table '{}'",
                self.name()
            )));
        }
        Ok(())
    }

    /// Position of `(row_key, family)` or the index where it belongs.
    fn search(&self, row_key: &str, family: &str) -> std::result::Result<usize, usize> {
        self.entries
            .binary_search_by(|e| e.key().cmp(&(row_key, family)))
    }

    /// Range of entries belonging to `row_key`.
    fn row_range(&self, row_key: &str) -> std::ops::Range<usize> {
        let start = self.entries.partition_point(|e| e.row_key.as_str() < row_key);
        let end = start
            + self.entries[start..].partition_point(|e| e.row_key == row_key);
        start..end
    }

    pub fn enable(&mut self) -> Result<()> {
        if !self.metadata.is_disabled {
            return Err(Status::disabled_state_conflict(format!(
                "Table '{}' is already enabled",
                self.name()
            )));
        }
        self.mutate(|t| {
            t.metadata.is_disabled = false;
            Ok(())
        })
    }

    pub fn disable(&mut self) -> Result<()> {
        if self.metadata.is_disabled {
            return Err(Status::disabled_state_conflict(format!(
                "Table '{}' is already disabled",
                self.name()
            )));
        }
        self.mutate(|t| {
            t.metadata.is_disabled = true;
            Ok(())
        })
    }

    /// Add a family; unspecified properties take their defaults.
    pub fn create_column_family<K: AsRef<str>, V: AsRef<str>>(
        &mut self,
        name: &str,
        properties: &[(K, V)],
    ) -> Result<()> {
        self.check_enabled("create column family")?;
        validate_family_name(name)?;
        if self.metadata.column_family(name).is_some() {
            return Err(Status::already_exists(format!(
                "Column family '{name}' already exists"
            )));
        }
        let options = ColumnFamilyOptions::from_properties(properties)?;

        self.mutate(|t| {
            t.metadata
                .column_families
                .push(ColumnFamilyDescriptor::new(name, options));
            debug!(table = t.name(), family = name, "created column family");
            Ok(())
        })
    }

    pub fn update_column_family<K: AsRef<str>, V: AsRef<str>>(
        &mut self,
        name: &str,
        properties: &[(K, V)],
    ) -> Result<()> {
        self.check_enabled("update column family")?;
        self.check_family(name)?;
        let mut options = self
            .metadata
            .column_family(name)
            .map(|cf| cf.options.clone())
            .unwrap_or_default();
        options.apply(properties)?;

        self.mutate(|t| {
            if let Some(cf) = t.metadata.column_family_mut(name) {
                cf.options = options;
            }
            debug!(table = t.name(), family = name, "updated column family");
            Ok(())
        })
    }

    /// Remove a family from the schema.
    ///
    /// Cells already stored under it stay in place and count towards
    /// `row_count`, but no read path returns them while the family is absent.
    pub fn delete_column_family(&mut self, name: &str) -> Result<()> {
        self.check_enabled("delete column family")?;
        self.check_family(name)?;

        self.mutate(|t| {
            t.metadata.column_families.retain(|cf| cf.name != name);
            debug!(table = t.name(), family = name, "deleted column family");
            Ok(())
        })
    }

    /// Write a value, appending a new version if the qualifier exists.
    ///
    /// Returns the version number written. Repeated identical puts keep
    /// growing the history; `versions` on the family does not prune it.
    pub fn put(&mut self, row_key: &str, family: &str, qualifier: &str, value: &str) -> Result<u32> {
        self.check_enabled("put data")?;
        self.check_family(family)?;

        self.mutate(|t| match t.search(row_key, family) {
            Ok(idx) => {
                let entry = &mut t.entries[idx];
                match entry.qualifiers.get_mut(qualifier) {
                    Some(cell) => Ok(cell.append(value)),
                    None => {
                        entry
                            .qualifiers
                            .insert(qualifier.to_string(), VersionedCell::new(value));
                        Ok(1)
                    }
                }
            }
            Err(idx) => {
                let mut entry = RowEntry::new(row_key, family);
                entry
                    .qualifiers
                    .insert(qualifier.to_string(), VersionedCell::new(value));
                t.entries.insert(idx, entry);
                t.metadata.row_count += 1;
                Ok(1)
            }
        })
    }

    /// Remove one qualifier, and its entry if that leaves it empty.
    pub fn delete(&mut self, row_key: &str, family: &str, qualifier: &str) -> Result<()> {
        self.check_enabled("delete data")?;
        self.check_family(family)?;

        let idx = self
            .search(row_key, family)
            .ok()
            .filter(|&idx| self.entries[idx].qualifiers.contains_key(qualifier))
            .ok_or_else(|| {
                Status::not_found(format!(
                    "Cell '{family}:{qualifier}' not found in row '{row_key}'"
                ))
            })?;

        self.mutate(|t| {
            let entry = &mut t.entries[idx];
            entry.qualifiers.remove(qualifier);
            if entry.is_empty() {
                t.entries.remove(idx);
                t.metadata.row_count = t.metadata.row_count.saturating_sub(1);
            }
            Ok(())
        })
    }

    /// Remove every entry of `row_key` across all families.
    ///
    /// Returns the number of entries removed.
    pub fn delete_all(&mut self, row_key: &str) -> Result<usize> {
        self.check_enabled("delete all data")?;

        self.mutate(|t| {
            let range = t.row_range(row_key);
            let removed = range.len();
            t.entries.drain(range);
            t.metadata.row_count = t.metadata.row_count.saturating_sub(removed as u64);
            Ok(removed)
        })
    }

    /// Lazy scan over the latest version of every readable qualifier, in
    /// row-key order.
    pub fn scan(&self) -> Result<TableIterator<'_>> {
        self.check_enabled("scan data")?;
        Ok(TableIterator::new(
            &self.entries,
            &self.metadata.column_families,
        ))
    }

    /// Latest version of each qualifier of a row, optionally restricted to
    /// one family or one `family:qualifier` cell.
    pub fn get(
        &self,
        row_key: &str,
        family: Option<&str>,
        qualifier: Option<&str>,
    ) -> Result<Vec<Cell<'_>>> {
        self.get_versions(row_key, family, qualifier, 1)
    }

    /// Like [`Table::get`], returning up to `versions` most recent versions
    /// per qualifier, newest first.
    pub fn get_versions(
        &self,
        row_key: &str,
        family: Option<&str>,
        qualifier: Option<&str>,
        versions: usize,
    ) -> Result<Vec<Cell<'_>>> {
        self.check_enabled("get data")?;
        if qualifier.is_some() && family.is_none() {
            return Err(Status::invalid_argument(
                "A qualifier requires a column family",
            ));
        }
        if let Some(family) = family {
            self.check_family(family)?;
        }

        let mut cells = Vec::new();
        for entry in &self.entries[self.row_range(row_key)] {
            if family.is_some_and(|f| f != entry.column_family)
                || self.metadata.column_family(&entry.column_family).is_none()
            {
                continue;
            }
            for (name, history) in &entry.qualifiers {
                if qualifier.is_some_and(|q| q != name) {
                    continue;
                }
                let newest_first = history.versions().iter().enumerate().rev();
                for (i, version) in newest_first.take(versions.max(1)) {
                    cells.push(Cell::new(entry, name, i as u32 + 1, version));
                }
            }
        }
        Ok(cells)
    }

    pub fn count(&self) -> Result<u64> {
        self.check_enabled("count rows")?;
        Ok(self.metadata.row_count)
    }

    /// Recompute `row_count` from the stored entries.
    pub fn rebuild_row_count(&mut self) -> u64 {
        let count = self.entries.iter().filter(|e| !e.is_empty()).count() as u64;
        self.metadata.row_count = count;
        count
    }

    /// Render metadata and every family's properties.
    ///
    /// Returns the text and the number of families.
    pub fn describe(&self) -> (String, usize) {
        let metadata = &self.metadata;
        let state = if metadata.is_disabled { "DISABLED" } else { "ENABLED" };
        let mut out = format!("Table {} is {}\n", metadata.name, state);
        out.push_str(&format!(
            "{}, {{TABLE_ATTRIBUTES => {{ID => '{}', CREATED_AT => '{}', UPDATED_AT => '{}', ROWS => '{}'}}}}\n",
            metadata.name,
            metadata.id,
            metadata.created_at.to_rfc3339(),
            metadata.updated_at.to_rfc3339(),
            metadata.row_count,
        ));
        out.push_str("COLUMN FAMILIES DESCRIPTION\n");
        for cf in &metadata.column_families {
            out.push_str(&cf.describe());
            out.push('\n');
        }
        (out, metadata.column_families.len())
    }

    /// File name of this table inside a data directory.
    pub fn file_name(&self) -> String {
        file_name_for(self.name())
    }

    /// Rewrite the table file inside `dir`. Returns the file path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let text = format::encode(&self.metadata, &self.entries)?;
        fs::write(&path, text)?;
        debug!(table = self.name(), path = %path.display(), "saved table");
        Ok(path)
    }

    /// Read a table file.
    pub fn load(path: &Path) -> Result<Table> {
        let text = fs::read_to_string(path)?;
        let (metadata, entries) = format::decode(&text)
            .map_err(|e| Status::corruption(format!("{}: {}", path.display(), e)))?;
        validate_table_name(&metadata.name)?;

        let table = Table { metadata, entries };
        let stored = table.entries.len() as u64;
        if stored != table.metadata.row_count {
            warn!(
                table = table.name(),
                row_count = table.metadata.row_count,
                entries = stored,
                "row_count does not match stored entries"
            );
        }
        Ok(table)
    }
}

/// A family name is non-empty and has no `:`, which separates family from
/// qualifier in a column reference.
fn validate_family_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Status::invalid_argument("Column family name must not be empty"));
    }
    if name.contains(':') {
        return Err(Status::invalid_argument(format!(
            "Illegal column family name '{name}': ':' is not allowed"
        )));
    }
    Ok(())
}

/// File name for a table called `name`.
pub fn file_name_for(name: &str) -> String {
    format!("{name}.{TABLE_FILE_EXTENSION}")
}
