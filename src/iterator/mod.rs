/// Iterator module for hbaselite
///
/// Provides lazy traversal of a table's cells in row-key order.
///
/// # Architecture
///
/// ```text
/// Table::scan()
///     ↓
/// TableIterator
///     ├─→ RowEntry (r1, Academic) → qualifiers in order
///     ├─→ RowEntry (r1, Personal) → qualifiers in order
///     └─→ RowEntry (r2, Personal) → ...
/// ```
///
/// ## Key Design Principles
///
/// 1. **Latest Wins**: Each qualifier yields only its newest version
/// 2. **Schema Filter**: Entries whose family is no longer in the schema are
///    skipped
/// 3. **Lazy Evaluation**: Nothing is copied or formatted until the iterator
///    advances
/// 4. **Restartable**: `seek_to_first` rewinds, `seek` jumps to a row key
mod table_iterator;

pub use table_iterator::TableIterator;
