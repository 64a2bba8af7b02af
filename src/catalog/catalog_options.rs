use std::path::PathBuf;

/// Options for opening a [`Catalog`](crate::Catalog)
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// Directory holding one `<table>.json` file per table
    /// Default: `hbase/data`
    pub data_dir: PathBuf,

    /// Create `data_dir` when it does not exist
    /// Default: true
    pub create_if_missing: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        CatalogOptions {
            data_dir: PathBuf::from("hbase/data"),
            create_if_missing: true,
        }
    }
}

impl CatalogOptions {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        CatalogOptions {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }
}
