#![no_main]

use hbaselite::{ColumnFamilyDescriptor, ColumnFamilyOptions, Table};
use libfuzzer_sys::fuzz_target;

const FAMILIES: [&str; 2] = ["a", "b"];

fn text(byte: u8) -> String {
    format!("k{}", byte % 16)
}

// Fuzz target for table mutations.
// Replays a byte-encoded sequence of put/delete/delete_all/disable/enable,
// checks the entry order and row count, then round-trips through a file.
fuzz_target!(|data: &[u8]| {
    let descriptors = FAMILIES
        .iter()
        .map(|f| ColumnFamilyDescriptor::new(*f, ColumnFamilyOptions::default()))
        .collect();
    let Ok(mut table) = Table::new("fuzz", descriptors) else {
        return;
    };

    for op in data.chunks(4) {
        let [kind, row, family, qualifier] = match *op {
            [a, b, c, d] => [a, b, c, d],
            _ => break,
        };
        let row = text(row);
        let family = FAMILIES[family as usize % FAMILIES.len()];
        let qualifier = text(qualifier);

        let _ = match kind % 5 {
            0 | 1 => table.put(&row, family, &qualifier, "v").map(|_| ()),
            2 => table.delete(&row, family, &qualifier),
            3 => table.delete_all(&row).map(|_| ()),
            _ if table.is_enabled() => table.disable(),
            _ => table.enable(),
        };

        let keys: Vec<(&str, &str)> = table.entries().iter().map(|e| e.key()).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(table.metadata().row_count(), table.entries().len() as u64);
    }

    let Ok(dir) = tempfile::TempDir::new() else {
        return;
    };
    if let Ok(path) = table.save(dir.path()) {
        let loaded = Table::load(&path).expect("reload saved table");
        assert_eq!(loaded, table);
    }
});
