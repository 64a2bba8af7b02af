pub mod catalog;
pub mod column_family;
pub mod iterator;
pub mod shell;
pub mod table;
pub mod util;

pub use catalog::{AlterAction, Catalog, CatalogOptions, StateChange};
pub use column_family::{
    BloomType, ColumnFamilyDescriptor, ColumnFamilyOptions, Compression, DataBlockEncoding,
    PropertyKey, Ttl,
};
pub use iterator::TableIterator;
pub use shell::{CommandResult, Reply, Shell};
pub use table::{Cell, RowEntry, Table, TableMetadata};
pub use util::{Code, Result, Status, Timestamp};
