/// Column families for hbaselite tables
///
/// A column family is the schema unit of a table: every cell belongs to a
/// qualifier inside exactly one family, and a family must exist before any
/// cell can be written to it. Each family carries a fixed set of
/// configuration properties with HBase-compatible defaults.
///
/// # Architecture
///
/// ```text
/// Table
///  ├─→ ColumnFamilyDescriptor("Personal")
///  │    └─→ ColumnFamilyOptions { VERSIONS, TTL, BLOCKSIZE, ... }
///  └─→ ColumnFamilyDescriptor("Academic")
///       └─→ ColumnFamilyOptions { ... }
/// ```
///
/// Properties are never stored as an open map. Updates arrive as raw
/// `(key, value)` pairs from the shell and are resolved against
/// [`PropertyKey`] before any field changes.
pub mod column_family_descriptor;
pub mod column_family_options;
pub mod property;

pub use column_family_descriptor::ColumnFamilyDescriptor;
pub use column_family_options::ColumnFamilyOptions;
pub use property::{BloomType, Compression, DataBlockEncoding, PropertyKey, Ttl};

/// Property key naming the target family inside an `alter` map.
pub const NAME_KEY: &str = "NAME";

/// Property key selecting an alter action other than create/update.
pub const METHOD_KEY: &str = "METHOD";

/// Raw `(key, value)` pairs as written in a shell property map.
pub type Properties = Vec<(String, String)>;
