use serde::{Deserialize, Serialize};

use crate::{
    column_family::{BloomType, Compression, DataBlockEncoding, PropertyKey, Ttl},
    util::{Result, Status},
};

/// Configuration of a specific Column Family
///
/// Every field has the HBase default. None of them change how cells are
/// stored by this engine; they are schema metadata kept for `describe` and
/// persisted with the table.
///
/// # Example
///
/// ```
/// use hbaselite::{ColumnFamilyOptions, PropertyKey};
///
/// let mut options = ColumnFamilyOptions::default();
/// options.set(PropertyKey::Versions, "3").unwrap();
/// assert_eq!(options.versions, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFamilyOptions {
    /// Default: NONE
    pub data_block_encoding: DataBlockEncoding,

    /// Default: ROW
    pub bloom_filter_type: BloomType,

    /// Default: 0 (local only)
    pub replication_scope: u32,

    /// Number of versions to retain.
    /// Default: 1
    pub versions: u32,

    /// Default: NONE
    pub compression: Compression,

    /// Default: 0
    pub min_versions: u32,

    /// Default: FOREVER
    pub ttl: Ttl,

    /// Default: false
    pub keep_deleted_cells: bool,

    /// Block size in bytes.
    /// Default: 64KB
    pub block_size: u32,

    /// Default: false
    pub in_memory: bool,

    /// Default: true
    pub block_cache: bool,
}

impl Default for ColumnFamilyOptions {
    fn default() -> Self {
        ColumnFamilyOptions {
            data_block_encoding: DataBlockEncoding::None,
            bloom_filter_type: BloomType::Row,
            replication_scope: 0,
            versions: 1,
            compression: Compression::None,
            min_versions: 0,
            ttl: Ttl::Forever,
            keep_deleted_cells: false,
            block_size: 64 * 1024,
            in_memory: false,
            block_cache: true,
        }
    }
}

impl ColumnFamilyOptions {
    /// Set one property from its textual value.
    pub fn set(&mut self, key: PropertyKey, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            PropertyKey::DataBlockEncoding => self.data_block_encoding = value.parse()?,
            PropertyKey::BloomFilter => self.bloom_filter_type = value.parse()?,
            PropertyKey::ReplicationScope => self.replication_scope = parse_u32(key, value)?,
            PropertyKey::Versions => {
                let versions = parse_u32(key, value)?;
                if versions == 0 {
                    return Err(Status::invalid_argument("VERSIONS must be at least 1"));
                }
                self.versions = versions;
            }
            PropertyKey::Compression => self.compression = value.parse()?,
            PropertyKey::MinVersions => self.min_versions = parse_u32(key, value)?,
            PropertyKey::Ttl => self.ttl = value.parse()?,
            PropertyKey::KeepDeletedCells => self.keep_deleted_cells = parse_bool(key, value)?,
            PropertyKey::BlockSize => {
                let size = parse_u32(key, value)?;
                if size == 0 {
                    return Err(Status::invalid_argument("BLOCKSIZE must be positive"));
                }
                self.block_size = size;
            }
            PropertyKey::InMemory => self.in_memory = parse_bool(key, value)?,
            PropertyKey::BlockCache => self.block_cache = parse_bool(key, value)?,
        }
        Ok(())
    }

    /// Textual value of one property, as `describe` shows it.
    pub fn get(&self, key: PropertyKey) -> String {
        match key {
            PropertyKey::DataBlockEncoding => self.data_block_encoding.to_string(),
            PropertyKey::BloomFilter => self.bloom_filter_type.to_string(),
            PropertyKey::ReplicationScope => self.replication_scope.to_string(),
            PropertyKey::Versions => self.versions.to_string(),
            PropertyKey::Compression => self.compression.to_string(),
            PropertyKey::MinVersions => self.min_versions.to_string(),
            PropertyKey::Ttl => self.ttl.to_string(),
            // HBase prints this one upper-case and the other flags lower-case.
            PropertyKey::KeepDeletedCells => self.keep_deleted_cells.to_string().to_uppercase(),
            PropertyKey::BlockSize => self.block_size.to_string(),
            PropertyKey::InMemory => self.in_memory.to_string(),
            PropertyKey::BlockCache => self.block_cache.to_string(),
        }
    }

    /// Apply a batch of raw property pairs.
    ///
    /// All keys are resolved and all values parsed before anything is
    /// committed, so a failing batch leaves `self` unchanged.
    pub fn apply<K: AsRef<str>, V: AsRef<str>>(&mut self, properties: &[(K, V)]) -> Result<()> {
        let keys = properties
            .iter()
            .map(|(k, _)| PropertyKey::parse(k.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let mut updated = self.clone();
        for (key, (_, value)) in keys.into_iter().zip(properties) {
            updated.set(key, value.as_ref())?;
        }
        *self = updated;
        Ok(())
    }

    /// Build options from defaults plus raw property pairs.
    pub fn from_properties<K: AsRef<str>, V: AsRef<str>>(properties: &[(K, V)]) -> Result<Self> {
        let mut options = ColumnFamilyOptions::default();
        options.apply(properties)?;
        Ok(options)
    }
}

fn parse_u32(key: PropertyKey, value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| Status::invalid_argument(format!("Invalid value '{value}' for {key}")))
}

fn parse_bool(key: PropertyKey, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Status::invalid_argument(format!(
            "Invalid value '{value}' for {key}"
        ))),
    }
}
