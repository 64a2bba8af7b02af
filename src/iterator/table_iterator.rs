use std::collections::btree_map;

use crate::{
    column_family::ColumnFamilyDescriptor,
    table::{Cell, RowEntry, VersionedCell},
};

/// Iterator over the latest version of every readable qualifier of a table.
///
/// Borrows the table, so it cannot outlive a mutation. Once exhausted it
/// stays exhausted until repositioned with [`TableIterator::seek_to_first`]
/// or [`TableIterator::seek`].
pub struct TableIterator<'a> {
    entries: &'a [RowEntry],
    families: &'a [ColumnFamilyDescriptor],
    /// Index of the entry whose qualifiers are being walked
    index: usize,
    qualifiers: Option<btree_map::Iter<'a, String, VersionedCell>>,
}

impl<'a> TableIterator<'a> {
    pub(crate) fn new(entries: &'a [RowEntry], families: &'a [ColumnFamilyDescriptor]) -> Self {
        TableIterator {
            entries,
            families,
            index: 0,
            qualifiers: None,
        }
    }

    /// Rewind to the first cell of the table.
    pub fn seek_to_first(&mut self) {
        self.index = 0;
        self.qualifiers = None;
    }

    /// Position before the first cell whose row key is `>= row_key`.
    pub fn seek(&mut self, row_key: &str) {
        self.index = self
            .entries
            .partition_point(|e| e.row_key.as_str() < row_key);
        self.qualifiers = None;
    }

    fn is_readable(&self, entry: &RowEntry) -> bool {
        self.families.iter().any(|cf| cf.name == entry.column_family)
    }
}

impl<'a> Iterator for TableIterator<'a> {
    type Item = Cell<'a>;

    fn next(&mut self) -> Option<Cell<'a>> {
        let entries = self.entries;
        loop {
            if let Some(qualifiers) = self.qualifiers.as_mut() {
                let entry = &entries[self.index];
                for (qualifier, history) in qualifiers.by_ref() {
                    if let Some(latest) = history.latest() {
                        return Some(Cell::new(entry, qualifier, history.version_count(), latest));
                    }
                }
                self.qualifiers = None;
                self.index += 1;
            }

            let entry = entries.get(self.index)?;
            if self.is_readable(entry) {
                self.qualifiers = Some(entry.qualifiers.iter());
            } else {
                self.index += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ColumnFamilyDescriptor, ColumnFamilyOptions, Table};

    fn table() -> Table {
        let mut table = Table::new(
            "t",
            vec![
                ColumnFamilyDescriptor::new("a", ColumnFamilyOptions::default()),
                ColumnFamilyDescriptor::new("b", ColumnFamilyOptions::default()),
            ],
        )
        .unwrap();
        table.put("r2", "a", "x", "1").unwrap();
        table.put("r1", "b", "y", "2").unwrap();
        table.put("r1", "a", "z", "3").unwrap();
        table.put("r1", "a", "z", "4").unwrap();
        table.put("r3", "b", "q", "5").unwrap();
        table
    }

    fn collect<'a>(iter: impl Iterator<Item = crate::Cell<'a>>) -> Vec<String> {
        iter.map(|c| format!("{}/{}={}", c.row_key, c.column(), c.value))
            .collect()
    }

    #[test]
    fn test_scan_order_and_latest_version() {
        let table = table();
        let cells = collect(table.scan().unwrap());
        assert_eq!(cells, vec!["r1/a:z=4", "r1/b:y=2", "r2/a:x=1", "r3/b:q=5"]);
    }

    #[test]
    fn test_scan_restart_and_seek() {
        let table = table();
        let mut iter = table.scan().unwrap();
        assert_eq!(iter.by_ref().count(), 4);
        assert!(iter.next().is_none());

        iter.seek_to_first();
        assert_eq!(iter.next().unwrap().row_key, "r1");

        iter.seek("r2");
        let rest: Vec<&str> = iter.map(|c| c.row_key).collect();
        assert_eq!(rest, vec!["r2", "r3"]);
    }

    #[test]
    fn test_scan_empty_table() {
        let table = Table::new("empty", Vec::new()).unwrap();
        assert!(table.scan().unwrap().next().is_none());
    }
}
