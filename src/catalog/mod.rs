/// Catalog of tables for one hbaselite session
///
/// The catalog owns every table of a data directory. All table files are
/// loaded when the catalog opens; afterwards the catalog is the only reader
/// and writer of those files.
///
/// # Lifecycle
///
/// ```text
/// Catalog::open → load every <table>.json in data_dir
///         ↓
/// create_table → validate name → new Table → save
///         ↓
/// data/schema change → Table op → save (whole-file rewrite)
///         ↓
/// disable_table → drop_table → remove from catalog → delete file
/// ```
#[allow(clippy::module_inception)]
mod catalog;
mod catalog_options;

pub use catalog::{AlterAction, Catalog, StateChange};
pub use catalog_options::CatalogOptions;
