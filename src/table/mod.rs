pub mod format;
pub mod metadata;
pub mod row;
#[allow(clippy::module_inception)]
pub mod table;

pub use format::TABLE_FILE_EXTENSION;
pub use metadata::{TableMetadata, validate_table_name};
pub use row::{Cell, CellVersion, RowEntry, VersionedCell};
pub use table::{Table, file_name_for};
