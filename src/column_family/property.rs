use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::util::{Result, Status};

/// The recognized column family properties.
///
/// `ALL` is the order in which `describe` renders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    BloomFilter,
    InMemory,
    Versions,
    KeepDeletedCells,
    DataBlockEncoding,
    Compression,
    Ttl,
    MinVersions,
    BlockCache,
    BlockSize,
    ReplicationScope,
}

impl PropertyKey {
    pub const ALL: [PropertyKey; 11] = [
        PropertyKey::BloomFilter,
        PropertyKey::InMemory,
        PropertyKey::Versions,
        PropertyKey::KeepDeletedCells,
        PropertyKey::DataBlockEncoding,
        PropertyKey::Compression,
        PropertyKey::Ttl,
        PropertyKey::MinVersions,
        PropertyKey::BlockCache,
        PropertyKey::BlockSize,
        PropertyKey::ReplicationScope,
    ];

    /// Name used by the shell (`alter ..., {VERSIONS => 3}`).
    pub fn shell_name(self) -> &'static str {
        match self {
            PropertyKey::BloomFilter => "BLOOMFILTER",
            PropertyKey::InMemory => "IN_MEMORY",
            PropertyKey::Versions => "VERSIONS",
            PropertyKey::KeepDeletedCells => "KEEP_DELETED_CELLS",
            PropertyKey::DataBlockEncoding => "DATA_BLOCK_ENCODING",
            PropertyKey::Compression => "COMPRESSION",
            PropertyKey::Ttl => "TTL",
            PropertyKey::MinVersions => "MIN_VERSIONS",
            PropertyKey::BlockCache => "BLOCKCACHE",
            PropertyKey::BlockSize => "BLOCKSIZE",
            PropertyKey::ReplicationScope => "REPLICATION_SCOPE",
        }
    }

    /// Name used in the persisted table file.
    pub fn field_name(self) -> &'static str {
        match self {
            PropertyKey::BloomFilter => "bloom_filter_type",
            PropertyKey::InMemory => "in_memory",
            PropertyKey::Versions => "versions",
            PropertyKey::KeepDeletedCells => "keep_deleted_cells",
            PropertyKey::DataBlockEncoding => "data_block_encoding",
            PropertyKey::Compression => "compression",
            PropertyKey::Ttl => "ttl",
            PropertyKey::MinVersions => "min_versions",
            PropertyKey::BlockCache => "block_cache",
            PropertyKey::BlockSize => "block_size",
            PropertyKey::ReplicationScope => "replication_scope",
        }
    }

    /// Resolve a key written in either spelling, ignoring case.
    pub fn parse(key: &str) -> Result<PropertyKey> {
        PropertyKey::ALL
            .into_iter()
            .find(|k| {
                k.shell_name().eq_ignore_ascii_case(key) || k.field_name().eq_ignore_ascii_case(key)
            })
            .ok_or_else(|| {
                Status::invalid_property(format!("Invalid property '{key}' for a column family"))
            })
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shell_name())
    }
}

/// Declares a closed set of upper-case property values with string
/// conversions in both directions.
macro_rules! property_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Status;

            fn from_str(s: &str) -> Result<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(Status::invalid_argument(format!(
                        "Invalid value '{}' for {}", s, stringify!($name)
                    ))),
                }
            }
        }
    };
}

property_enum! {
    /// On-disk block encoding.
    DataBlockEncoding {
        None => "NONE",
        Prefix => "PREFIX",
        Diff => "DIFF",
        FastDiff => "FAST_DIFF",
        RowIndexV1 => "ROW_INDEX_V1",
    }
}

property_enum! {
    /// Bloom filter granularity.
    BloomType {
        None => "NONE",
        Row => "ROW",
        RowCol => "ROWCOL",
        RowPrefixFixedLength => "ROWPREFIX_FIXED_LENGTH",
    }
}

property_enum! {
    /// Block compression codec.
    Compression {
        None => "NONE",
        Gz => "GZ",
        Lzo => "LZO",
        Snappy => "SNAPPY",
        Lz4 => "LZ4",
        Zstd => "ZSTD",
    }
}

/// Cell time-to-live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ttl {
    Forever,
    Seconds(u64),
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Forever => f.write_str("FOREVER"),
            Ttl::Seconds(secs) => write!(f, "{secs} SECONDS"),
        }
    }
}

impl FromStr for Ttl {
    type Err = Status;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("FOREVER") {
            return Ok(Ttl::Forever);
        }
        let digits = trimmed
            .strip_suffix("SECONDS")
            .or_else(|| trimmed.strip_suffix("seconds"))
            .unwrap_or(trimmed)
            .trim();
        digits
            .parse::<u64>()
            .map(Ttl::Seconds)
            .map_err(|_| Status::invalid_argument(format!("Invalid value '{s}' for TTL")))
    }
}

impl TryFrom<String> for Ttl {
    type Error = Status;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Ttl> for String {
    fn from(ttl: Ttl) -> Self {
        ttl.to_string()
    }
}
