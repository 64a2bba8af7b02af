use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    column_family::ColumnFamilyDescriptor,
    util::{Result, Status, Timestamp, now},
};

/// Table-level metadata persisted in the `metadata` section of a table file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub(crate) name: String,
    pub(crate) column_families: Vec<ColumnFamilyDescriptor>,
    pub(crate) id: Uuid,
    pub(crate) is_disabled: bool,
    pub(crate) created_at: Timestamp,
    pub(crate) updated_at: Timestamp,
    /// Number of `(row_key, column_family)` entries with at least one
    /// qualifier. Maintained incrementally.
    pub(crate) row_count: u64,
}

impl TableMetadata {
    pub(crate) fn new(name: String, column_families: Vec<ColumnFamilyDescriptor>) -> Self {
        let created_at = now();
        TableMetadata {
            name,
            column_families,
            id: Uuid::new_v4(),
            is_disabled: false,
            created_at,
            updated_at: created_at,
            row_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_families(&self) -> &[ColumnFamilyDescriptor] {
        &self.column_families
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn is_disabled(&self) -> bool {
        self.is_disabled
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    pub fn column_family(&self, name: &str) -> Option<&ColumnFamilyDescriptor> {
        self.column_families.iter().find(|cf| cf.name == name)
    }

    pub(crate) fn column_family_mut(&mut self, name: &str) -> Option<&mut ColumnFamilyDescriptor> {
        self.column_families.iter_mut().find(|cf| cf.name == name)
    }

    pub(crate) fn touch(&mut self) {
        let current = now();
        if current > self.updated_at {
            self.updated_at = current;
        }
    }
}

/// Check that `name` can be used as a table name and as a file stem.
///
/// Legal names use `[A-Za-z0-9_.-]` and do not start with `.` or `-`.
pub fn validate_table_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Status::invalid_argument("Table name must not be empty"));
    }
    if name.starts_with('.') || name.starts_with('-') {
        return Err(Status::invalid_argument(format!(
            "Illegal table name '{name}': must not start with '.' or '-'"
        )));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')))
    {
        return Err(Status::invalid_argument(format!(
            "Illegal character '{c}' in table name '{name}'"
        )));
    }
    Ok(())
}
