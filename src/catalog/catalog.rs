use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
    catalog::CatalogOptions,
    column_family::{ColumnFamilyDescriptor, ColumnFamilyOptions, METHOD_KEY, NAME_KEY},
    table::{TABLE_FILE_EXTENSION, Table, file_name_for, validate_table_name},
    util::{Result, Status},
};

/// Outcome of an enable/disable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Changed,
    /// The table was already in the requested state.
    Unchanged,
}

/// What an `alter` map did to its target family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterAction {
    Created(String),
    Updated(String),
    Deleted(String),
}

/// In-memory set of all tables of a data directory.
///
/// Tables are kept in catalog order: files sorted by name at open, then
/// tables in creation order.
#[derive(Debug)]
pub struct Catalog {
    options: CatalogOptions,
    tables: Vec<Table>,
}

impl Catalog {
    /// Load every table file of `options.data_dir`.
    pub fn open(options: CatalogOptions) -> Result<Self> {
        let data_dir = &options.data_dir;
        if !data_dir.exists() {
            if !options.create_if_missing {
                return Err(Status::not_found(format!(
                    "Data directory not found: {}",
                    data_dir.display()
                )));
            }
            fs::create_dir_all(data_dir)
                .map_err(|e| Status::io_error(format!("Failed to create directory: {e}")))?;
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(data_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension() == Some(OsStr::new(TABLE_FILE_EXTENSION))
            })
            .collect();
        paths.sort();

        let mut tables: Vec<Table> = Vec::with_capacity(paths.len());
        for path in paths {
            let table = Table::load(&path)?;
            let expected = file_name_for(table.name());
            if path.file_name() != Some(OsStr::new(&expected)) {
                return Err(Status::corruption(format!(
                    "{} holds table '{}', expected file name {}",
                    path.display(),
                    table.name(),
                    expected
                )));
            }
            debug!(table = table.name(), path = %path.display(), "loaded table");
            tables.push(table);
        }

        info!(data_dir = %data_dir.display(), tables = tables.len(), "catalog opened");
        Ok(Catalog { options, tables })
    }

    pub fn data_dir(&self) -> &Path {
        &self.options.data_dir
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.tables
            .iter()
            .position(|t| t.name() == name)
            .ok_or_else(|| Status::not_found(format!("Table '{name}' does not exist")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.name() == name)
    }

    pub fn get_table(&self, name: &str) -> Result<&Table> {
        let idx = self.position(name)?;
        Ok(&self.tables[idx])
    }

    /// Run `op` on a copy of a table, persist the copy, then install it.
    ///
    /// The in-memory table changes only once the file is written.
    pub fn mutate_table<T>(
        &mut self,
        name: &str,
        op: impl FnOnce(&mut Table) -> Result<T>,
    ) -> Result<T> {
        let idx = self.position(name)?;
        let mut next = self.tables[idx].clone();
        let out = op(&mut next)?;
        next.save(&self.options.data_dir)?;
        self.tables[idx] = next;
        Ok(out)
    }

    /// Create and persist a new enabled, empty table.
    pub fn create_table(
        &mut self,
        name: &str,
        column_families: Vec<ColumnFamilyDescriptor>,
    ) -> Result<&Table> {
        validate_table_name(name)?;
        let path = self.options.data_dir.join(file_name_for(name));
        if self.contains(name) || path.exists() {
            return Err(Status::already_exists(format!("Table '{name}' already exists")));
        }

        let table = Table::new(name, column_families)?;
        table.save(&self.options.data_dir)?;
        info!(table = name, id = %table.metadata().id(), "created table");

        self.tables.push(table);
        let idx = self.tables.len() - 1;
        Ok(&self.tables[idx])
    }

    /// Names of the tables whose whole name matches `pattern`, in catalog
    /// order. All tables when `pattern` is `None`.
    pub fn list_tables(&self, pattern: Option<&str>) -> Result<Vec<&str>> {
        let matcher = pattern.map(full_match).transpose()?;
        Ok(self
            .tables
            .iter()
            .map(|t| t.name())
            .filter(|name| matcher.as_ref().is_none_or(|re| re.is_match(name)))
            .collect())
    }

    pub fn is_enabled(&self, name: &str) -> Result<bool> {
        Ok(self.get_table(name)?.is_enabled())
    }

    pub fn is_disabled(&self, name: &str) -> Result<bool> {
        Ok(self.get_table(name)?.is_disabled())
    }

    pub fn disable_table(&mut self, name: &str) -> Result<StateChange> {
        if self.get_table(name)?.is_disabled() {
            warn!(table = name, "table is already disabled");
            return Ok(StateChange::Unchanged);
        }
        self.mutate_table(name, |t| t.disable())?;
        info!(table = name, "disabled table");
        Ok(StateChange::Changed)
    }

    pub fn enable_table(&mut self, name: &str) -> Result<StateChange> {
        if self.get_table(name)?.is_enabled() {
            warn!(table = name, "table is already enabled");
            return Ok(StateChange::Unchanged);
        }
        self.mutate_table(name, |t| t.enable())?;
        info!(table = name, "enabled table");
        Ok(StateChange::Changed)
    }

    /// Remove a disabled table and delete its file.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        let idx = self.position(name)?;
        if self.tables[idx].is_enabled() {
            return Err(Status::precondition_failed(format!(
                "Table '{name}' is enabled. Disable it first."
            )));
        }

        let path = self.options.data_dir.join(self.tables[idx].file_name());
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(table = name, path = %path.display(), "table file already missing");
            }
            Err(e) => return Err(e.into()),
        }
        self.tables.remove(idx);
        info!(table = name, "dropped table");
        Ok(())
    }

    /// Drop every table matching `pattern` after `confirm` approves the list.
    ///
    /// Fails without dropping anything if a matching table is still enabled.
    /// Returns the number of tables dropped.
    pub fn drop_all_tables(
        &mut self,
        pattern: &str,
        confirm: impl FnOnce(&[String]) -> bool,
    ) -> Result<usize> {
        let matched: Vec<String> = self
            .list_tables(Some(pattern))?
            .into_iter()
            .map(String::from)
            .collect();
        if matched.is_empty() {
            return Ok(0);
        }

        let enabled: Vec<&str> = matched
            .iter()
            .map(String::as_str)
            .filter(|name| self.is_enabled(name).unwrap_or(false))
            .collect();
        if !enabled.is_empty() {
            return Err(Status::precondition_failed(format!(
                "Tables must be disabled before dropping: {}",
                enabled.join(", ")
            )));
        }

        if !confirm(&matched) {
            debug!(pattern, "drop_all cancelled");
            return Ok(0);
        }
        for name in &matched {
            self.drop_table(name)?;
        }
        Ok(matched.len())
    }

    /// Apply one `alter` property map.
    ///
    /// `NAME` selects the family. `METHOD => 'delete'` removes it; otherwise
    /// the remaining properties create the family or update it.
    pub fn alter_table<K: AsRef<str>, V: AsRef<str>>(
        &mut self,
        name: &str,
        property_map: &[(K, V)],
    ) -> Result<AlterAction> {
        let lookup = |key: &str| {
            property_map
                .iter()
                .find(|(k, _)| k.as_ref().eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_ref())
        };
        let family = lookup(NAME_KEY)
            .ok_or_else(|| {
                Status::invalid_argument("alter requires a NAME => '<column family>' entry")
            })?
            .to_string();
        let method = lookup(METHOD_KEY);
        let properties: Vec<(&str, &str)> = property_map
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
            .filter(|(k, _)| {
                !k.eq_ignore_ascii_case(NAME_KEY) && !k.eq_ignore_ascii_case(METHOD_KEY)
            })
            .collect();

        let action = match method {
            Some(m) if m.eq_ignore_ascii_case("delete") => {
                self.mutate_table(name, |t| t.delete_column_family(&family))?;
                AlterAction::Deleted(family)
            }
            Some(m) => {
                return Err(Status::invalid_argument(format!(
                    "Unknown alter method '{m}'"
                )));
            }
            None if self.get_table(name)?.column_family(&family).is_some() => {
                self.mutate_table(name, |t| t.update_column_family(&family, &properties))?;
                AlterAction::Updated(family)
            }
            None => {
                self.mutate_table(name, |t| t.create_column_family(&family, &properties))?;
                AlterAction::Created(family)
            }
        };
        debug!(table = name, ?action, "altered table");
        Ok(action)
    }

    /// Disable, drop and recreate a table with the same family names.
    pub fn truncate_table(&mut self, name: &str) -> Result<()> {
        let families = self.get_table(name)?.column_family_names();
        if self.is_enabled(name)? {
            self.disable_table(name)?;
        }
        self.drop_table(name)?;

        let descriptors = families
            .into_iter()
            .map(|cf| ColumnFamilyDescriptor::new(cf, ColumnFamilyOptions::default()))
            .collect();
        self.create_table(name, descriptors)?;
        info!(table = name, "truncated table");
        Ok(())
    }
}

/// Compile `pattern` so that it must match a whole table name.
fn full_match(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^(?:{pattern})$"))?)
}
