/// Table file format
///
/// Each table is stored as one pretty-printed JSON document named
/// `<table>.json`. The whole file is rewritten on every save.
///
/// Document layout:
///
/// ```text
/// {
///   "metadata": {
///     "name": "students",
///     "column_families": [ { "name": "Personal", "versions": 1, ... } ],
///     "id": "4f0c...",
///     "is_disabled": false,
///     "created_at": "2024-05-01T10:00:00.123456789Z",
///     "updated_at": "2024-05-01T10:05:00.000000001Z",
///     "row_count": 1
///   },
///   "data": {
///     "<row_key>": {
///       "<column_family>": {
///         "<qualifier>": {
///           "version_count": 2,
///           "version1": { "timestamp": "...", "value": "..." },
///           "version2": { "timestamp": "...", "value": "..." }
///         }
///       }
///     }
///   }
/// }
/// ```
///
/// Rows and families are emitted in ascending key order, which is also the
/// in-memory order of entries, so decoding needs no re-sorting.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    table::{
        metadata::TableMetadata,
        row::{CellVersion, RowEntry, VersionedCell},
    },
    util::{Result, Status, Timestamp},
};

/// File extension of table files
pub const TABLE_FILE_EXTENSION: &str = "json";

/// Prefix of the per-version keys inside a qualifier record
const VERSION_KEY_PREFIX: &str = "version";

type DataSection = BTreeMap<String, BTreeMap<String, BTreeMap<String, QualifierRecord>>>;

#[derive(Serialize, Deserialize)]
struct TableFile {
    metadata: TableMetadata,
    data: DataSection,
}

#[derive(Serialize, Deserialize)]
struct QualifierRecord {
    version_count: u32,
    #[serde(flatten)]
    versions: BTreeMap<String, VersionRecord>,
}

#[derive(Serialize, Deserialize)]
struct VersionRecord {
    timestamp: Timestamp,
    value: String,
}

/// Serialize a table into its file representation.
pub fn encode(metadata: &TableMetadata, entries: &[RowEntry]) -> Result<String> {
    let mut data = DataSection::new();
    for entry in entries {
        let qualifiers = entry
            .qualifiers
            .iter()
            .map(|(qualifier, cell)| (qualifier.clone(), encode_cell(cell)))
            .collect();
        data.entry(entry.row_key.clone())
            .or_default()
            .insert(entry.column_family.clone(), qualifiers);
    }

    let file = TableFile {
        metadata: metadata.clone(),
        data,
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Parse a table file back into metadata and ordered row entries.
pub fn decode(text: &str) -> Result<(TableMetadata, Vec<RowEntry>)> {
    let file: TableFile = serde_json::from_str(text)?;

    let mut entries = Vec::new();
    for (row_key, families) in file.data {
        for (column_family, qualifiers) in families {
            let mut entry = RowEntry::new(row_key.clone(), column_family);
            for (qualifier, record) in qualifiers {
                let cell = decode_cell(&row_key, &qualifier, record)?;
                entry.qualifiers.insert(qualifier, cell);
            }
            if !entry.is_empty() {
                entries.push(entry);
            }
        }
    }

    Ok((file.metadata, entries))
}

fn encode_cell(cell: &VersionedCell) -> QualifierRecord {
    let versions = cell
        .versions()
        .iter()
        .enumerate()
        .map(|(i, v)| {
            (
                format!("{VERSION_KEY_PREFIX}{}", i + 1),
                VersionRecord {
                    timestamp: v.timestamp,
                    value: v.value.clone(),
                },
            )
        })
        .collect();

    QualifierRecord {
        version_count: cell.version_count(),
        versions,
    }
}

fn decode_cell(row_key: &str, qualifier: &str, record: QualifierRecord) -> Result<VersionedCell> {
    let count = record.version_count as usize;
    if record.versions.len() != count {
        return Err(Status::corruption(format!(
            "Cell {row_key}/{qualifier}: version_count is {count} but {} versions are stored",
            record.versions.len()
        )));
    }

    let mut slots: Vec<Option<CellVersion>> = vec![None; count];
    for (key, version) in record.versions {
        let number = key
            .strip_prefix(VERSION_KEY_PREFIX)
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|n| (1..=count).contains(n) && key == format!("{VERSION_KEY_PREFIX}{n}"))
            .ok_or_else(|| {
                Status::corruption(format!(
                    "Cell {row_key}/{qualifier}: unexpected version key '{key}'"
                ))
            })?;
        slots[number - 1] = Some(CellVersion {
            timestamp: version.timestamp,
            value: version.value,
        });
    }

    // Every slot is filled: keys are canonical, in range and as many as slots.
    let versions = slots.into_iter().flatten().collect();
    VersionedCell::from_versions(versions).ok_or_else(|| {
        Status::corruption(format!("Cell {row_key}/{qualifier} has no versions"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_family::{ColumnFamilyDescriptor, ColumnFamilyOptions};

    fn sample() -> (TableMetadata, Vec<RowEntry>) {
        let metadata = TableMetadata::new(
            "students".to_string(),
            vec![ColumnFamilyDescriptor::new(
                "Personal",
                ColumnFamilyOptions::default(),
            )],
        );

        let mut entry = RowEntry::new("r1", "Personal");
        let mut cell = VersionedCell::new("Ana");
        for i in 0..10 {
            cell.append(format!("Ana {i}"));
        }
        entry.qualifiers.insert("Nombres".to_string(), cell);
        (metadata, vec![entry])
    }

    #[test]
    fn test_encode_layout() {
        let (metadata, entries) = sample();
        let text = encode(&metadata, &entries).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(doc["metadata"]["name"], "students");
        assert_eq!(doc["metadata"]["column_families"][0]["name"], "Personal");
        assert_eq!(doc["metadata"]["column_families"][0]["ttl"], "FOREVER");
        let cell = &doc["data"]["r1"]["Personal"]["Nombres"];
        assert_eq!(cell["version_count"], 11);
        assert_eq!(cell["version1"]["value"], "Ana");
        assert_eq!(cell["version11"]["value"], "Ana 9");
    }

    #[test]
    fn test_decode_orders_versions_numerically() {
        let (metadata, entries) = sample();
        let text = encode(&metadata, &entries).unwrap();
        let (decoded_meta, decoded) = decode(&text).unwrap();

        assert_eq!(decoded_meta, metadata);
        assert_eq!(decoded, entries);
        let cell = &decoded[0].qualifiers["Nombres"];
        assert_eq!(cell.version(2).unwrap().value, "Ana 0");
        assert_eq!(cell.latest().unwrap().value, "Ana 9");
    }

    #[test]
    fn test_decode_rejects_version_gap() {
        let (metadata, entries) = sample();
        let text = encode(&metadata, &entries).unwrap();
        let mut doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        let cell = doc["data"]["r1"]["Personal"]["Nombres"]
            .as_object_mut()
            .unwrap();
        let moved = cell.remove("version3").unwrap();
        cell.insert("version12".to_string(), moved);

        let err = decode(&doc.to_string()).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_decode_rejects_version_alias() {
        let (metadata, entries) = sample();
        let text = encode(&metadata, &entries).unwrap();
        for alias in ["version01", "version+1"] {
            let mut doc: serde_json::Value = serde_json::from_str(&text).unwrap();
            let cell = doc["data"]["r1"]["Personal"]["Nombres"]
                .as_object_mut()
                .unwrap();
            let moved = cell.remove("version2").unwrap();
            cell.insert(alias.to_string(), moved);

            let err = decode(&doc.to_string()).unwrap_err();
            assert!(err.is_corruption(), "{alias} accepted");
        }
    }

    #[test]
    fn test_decode_rejects_wrong_count() {
        let (metadata, entries) = sample();
        let text = encode(&metadata, &entries).unwrap();
        let mut doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        doc["data"]["r1"]["Personal"]["Nombres"]["version_count"] = 3.into();

        assert!(decode(&doc.to_string()).unwrap_err().is_corruption());
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode("not json").unwrap_err().is_corruption());
    }
}
