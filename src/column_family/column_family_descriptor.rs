use serde::{Deserialize, Serialize};

use crate::column_family::{ColumnFamilyOptions, PropertyKey};

/// Descriptor of a Column Family within a table
///
/// Contains the family name (unique within its table) and its options.
/// Serialized flat: the name sits next to the property fields.
///
/// # Example
///
/// ```
/// use hbaselite::{ColumnFamilyDescriptor, ColumnFamilyOptions};
///
/// let personal = ColumnFamilyDescriptor::new("Personal", ColumnFamilyOptions::default());
/// assert_eq!(
///     personal.describe(),
///     "{NAME => 'Personal', BLOOMFILTER => 'ROW', IN_MEMORY => 'false', \
///      VERSIONS => '1', KEEP_DELETED_CELLS => 'FALSE', DATA_BLOCK_ENCODING => 'NONE', \
///      COMPRESSION => 'NONE', TTL => 'FOREVER', MIN_VERSIONS => '0', \
///      BLOCKCACHE => 'true', BLOCKSIZE => '65536', REPLICATION_SCOPE => '0'}"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFamilyDescriptor {
    /// Name of the column family
    pub name: String,

    /// Options for this column family
    #[serde(flatten)]
    pub options: ColumnFamilyOptions,
}

impl ColumnFamilyDescriptor {
    /// Create a new column family descriptor
    pub fn new<S: Into<String>>(name: S, options: ColumnFamilyOptions) -> Self {
        ColumnFamilyDescriptor {
            name: name.into(),
            options,
        }
    }

    /// Render the full property set in shell notation, in a fixed key order.
    pub fn describe(&self) -> String {
        let mut out = format!("{{NAME => '{}'", self.name);
        for key in PropertyKey::ALL {
            out.push_str(&format!(", {} => '{}'", key, self.options.get(key)));
        }
        out.push('}');
        out
    }
}
