use tracing::debug;

use crate::{
    catalog::{AlterAction, Catalog, StateChange},
    column_family::{ColumnFamilyDescriptor, ColumnFamilyOptions},
    shell::command::{ColumnSpec, Command},
    util::Result,
};

/// Structured result of one executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Table created (CREATE).
    Created(String),
    /// Table names (LIST).
    TableList(Vec<String>),
    /// Succeeded with nothing to show (PUT, DELETE, DROP, ENABLE, ...).
    Done,
    /// Succeeded as a no-op the user should hear about.
    Warning(String),
    /// IS_ENABLED / IS_DISABLED answer.
    Bool(bool),
    /// Family changes applied by ALTER, in order.
    Altered(Vec<AlterAction>),
    /// Number of tables dropped by DROP_ALL.
    Dropped(usize),
    /// Number of `(row, family)` entries removed by DELETE_ALL.
    RowsDeleted(usize),
    /// DESCRIBE text and family count.
    Description { text: String, families: usize },
    /// GET / SCAN output.
    Cells {
        layout: CellLayout,
        lines: Vec<CellLine>,
        /// Value of the `N row(s)` footer
        rows: usize,
    },
    /// COUNT answer.
    Count(u64),
    Truncated(String),
    /// Help text (optional topic for per-command help).
    Help(Option<String>),
    /// Exit signal.
    Exit,
    Unknown(String),
    Empty,
}

impl CommandResult {
    /// Whether the command reached the catalog and gets a timing trailer.
    pub fn touches_catalog(&self) -> bool {
        !matches!(
            self,
            CommandResult::Help(_)
                | CommandResult::Exit
                | CommandResult::Unknown(_)
                | CommandResult::Empty
        )
    }
}

/// Header pair of a cell listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellLayout {
    /// `ROW  COLUMN+CELL`, used by scan
    Row,
    /// `COLUMN  CELL`, used by get
    Column,
}

/// One output line of a cell listing: left column and cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellLine {
    pub key: String,
    pub cell: String,
}

/// Execute a parsed command against the catalog.
///
/// `confirm` is asked before `drop_all` removes anything.
pub fn execute(
    catalog: &mut Catalog,
    command: Command,
    confirm: &mut dyn FnMut(&[String]) -> bool,
) -> Result<CommandResult> {
    debug!(?command, "executing command");
    match command {
        Command::Create { table, families } => {
            let descriptors = families
                .into_iter()
                .map(|spec| {
                    let options = ColumnFamilyOptions::from_properties(&spec.properties)?;
                    Ok(ColumnFamilyDescriptor::new(spec.name, options))
                })
                .collect::<Result<Vec<_>>>()?;
            catalog.create_table(&table, descriptors)?;
            Ok(CommandResult::Created(table))
        }
        Command::List { pattern } => {
            let names = catalog.list_tables(pattern.as_deref())?;
            Ok(CommandResult::TableList(
                names.into_iter().map(String::from).collect(),
            ))
        }
        Command::Disable { table } => Ok(state_result(
            catalog.disable_table(&table)?,
            &table,
            "disabled",
        )),
        Command::Enable { table } => Ok(state_result(
            catalog.enable_table(&table)?,
            &table,
            "enabled",
        )),
        Command::IsEnabled { table } => Ok(CommandResult::Bool(catalog.is_enabled(&table)?)),
        Command::IsDisabled { table } => Ok(CommandResult::Bool(catalog.is_disabled(&table)?)),
        Command::Alter { table, maps } => {
            let mut actions = Vec::with_capacity(maps.len());
            for map in &maps {
                actions.push(catalog.alter_table(&table, map)?);
            }
            Ok(CommandResult::Altered(actions))
        }
        Command::Drop { table } => {
            catalog.drop_table(&table)?;
            Ok(CommandResult::Done)
        }
        Command::DropAll { pattern } => {
            let dropped = catalog.drop_all_tables(&pattern, |names| confirm(names))?;
            Ok(CommandResult::Dropped(dropped))
        }
        Command::Describe { table } => {
            let (text, families) = catalog.get_table(&table)?.describe();
            Ok(CommandResult::Description { text, families })
        }
        Command::Put { table, cells } => {
            // Each cell is persisted on its own; a failing triple keeps the
            // ones before it.
            for cell in &cells {
                catalog.mutate_table(&table, |t| {
                    t.put(&cell.row_key, &cell.family, &cell.qualifier, &cell.value)
                })?;
            }
            Ok(CommandResult::Done)
        }
        Command::Get {
            table,
            row_key,
            column,
            versions,
        } => {
            let (family, qualifier) = match &column {
                Some(ColumnSpec { family, qualifier }) => {
                    (Some(family.as_str()), qualifier.as_deref())
                }
                None => (None, None),
            };
            let cells = catalog
                .get_table(&table)?
                .get_versions(&row_key, family, qualifier, versions)?;
            let lines: Vec<CellLine> = cells
                .iter()
                .map(|cell| CellLine {
                    key: cell.column(),
                    cell: format!(
                        "timestamp={}, value={}",
                        cell.timestamp.to_rfc3339(),
                        cell.value
                    ),
                })
                .collect();
            let rows = lines.len();
            Ok(CommandResult::Cells {
                layout: CellLayout::Column,
                lines,
                rows,
            })
        }
        Command::Scan { table } => {
            let mut lines = Vec::new();
            let mut rows = 0;
            for cell in catalog.get_table(&table)?.scan()? {
                if lines.last().is_none_or(|l: &CellLine| l.key != cell.row_key) {
                    rows += 1;
                }
                lines.push(CellLine {
                    key: cell.row_key.to_string(),
                    cell: cell.to_string(),
                });
            }
            Ok(CommandResult::Cells {
                layout: CellLayout::Row,
                lines,
                rows,
            })
        }
        Command::Delete {
            table,
            row_key,
            family,
            qualifier,
        } => {
            catalog.mutate_table(&table, |t| t.delete(&row_key, &family, &qualifier))?;
            Ok(CommandResult::Done)
        }
        Command::DeleteAll { table, row_key } => {
            let removed = catalog.mutate_table(&table, |t| t.delete_all(&row_key))?;
            Ok(CommandResult::RowsDeleted(removed))
        }
        Command::Count { table } => Ok(CommandResult::Count(catalog.get_table(&table)?.count()?)),
        Command::Truncate { table } => {
            catalog.truncate_table(&table)?;
            Ok(CommandResult::Truncated(table))
        }
        Command::Help(topic) => Ok(CommandResult::Help(topic)),
        Command::Exit => Ok(CommandResult::Exit),
        Command::Unknown(line) => Ok(CommandResult::Unknown(line)),
        Command::Empty => Ok(CommandResult::Empty),
    }
}

fn state_result(change: StateChange, table: &str, state: &str) -> CommandResult {
    match change {
        StateChange::Changed => CommandResult::Done,
        StateChange::Unchanged => {
            CommandResult::Warning(format!("Table '{table}' is already {state}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        catalog::CatalogOptions,
        shell::{command::FamilySpec, grammar::Grammar},
    };

    struct Fixture {
        _dir: TempDir,
        catalog: Catalog,
        grammar: Grammar,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let catalog = Catalog::open(CatalogOptions::with_data_dir(dir.path())).unwrap();
            Fixture {
                _dir: dir,
                catalog,
                grammar: Grammar::new().unwrap(),
            }
        }

        fn run(&mut self, line: &str) -> Result<CommandResult> {
            let command = self.grammar.parse(line)?;
            execute(&mut self.catalog, command, &mut |_| true)
        }
    }

    #[test]
    fn test_create_with_properties() {
        let mut f = Fixture::new();
        let result = execute(
            &mut f.catalog,
            Command::Create {
                table: "t".to_string(),
                families: vec![FamilySpec {
                    name: "cf".to_string(),
                    properties: vec![("VERSIONS".to_string(), "4".to_string())],
                }],
            },
            &mut |_| true,
        )
        .unwrap();
        assert_eq!(result, CommandResult::Created("t".to_string()));
        let table = f.catalog.get_table("t").unwrap();
        assert_eq!(table.column_family("cf").unwrap().options.versions, 4);

        let err = f.run("create 'u', {NAME => 'cf', COLOUR => 'red'}").unwrap_err();
        assert!(err.is_invalid_property());
        assert!(!f.catalog.contains("u"));
    }

    #[test]
    fn test_put_get_scan() {
        let mut f = Fixture::new();
        f.run("create 't', 'a', 'b'").unwrap();
        f.run("put 't', 'r2', 'a:x', '1', 'r1', 'b:y', '2', 'r1', 'a:z', '3'")
            .unwrap();

        let CommandResult::Cells { layout, lines, rows } = f.run("scan 't'").unwrap() else {
            panic!("expected cells");
        };
        assert_eq!(layout, CellLayout::Row);
        assert_eq!(rows, 2);
        let keys: Vec<&str> = lines.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, vec!["r1", "r1", "r2"]);
        assert!(lines[0].cell.starts_with("column=a:z, timestamp="));

        let CommandResult::Cells { layout, lines, rows } =
            f.run("get 't', 'r1', {COLUMN => 'b:y'}").unwrap()
        else {
            panic!("expected cells");
        };
        assert_eq!(layout, CellLayout::Column);
        assert_eq!(rows, 1);
        assert_eq!(lines[0].key, "b:y");
        assert!(lines[0].cell.ends_with("value=2"));
    }

    #[test]
    fn test_put_keeps_earlier_cells_on_failure() {
        let mut f = Fixture::new();
        f.run("create 't', 'a'").unwrap();
        let err = f.run("put 't', 'r1', 'a:x', '1', 'r2', 'zz:x', '2'").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(f.run("count 't'").unwrap(), CommandResult::Count(1));
    }

    #[test]
    fn test_delete_all_reports_entries() {
        let mut f = Fixture::new();
        f.run("create 't', 'a', 'b'").unwrap();
        f.run("put 't', 'r1', 'a:x', '1', 'r1', 'b:y', '2', 'r2', 'a:x', '3'")
            .unwrap();
        assert_eq!(f.run("delete_all 't', 'r1'").unwrap(), CommandResult::RowsDeleted(2));
        assert_eq!(f.run("delete_all 't', 'r1'").unwrap(), CommandResult::RowsDeleted(0));
        assert_eq!(f.run("count 't'").unwrap(), CommandResult::Count(1));
    }

    #[test]
    fn test_family_names_with_colon_rejected() {
        let mut f = Fixture::new();
        assert!(f.run("create 't', 'a:b'").unwrap_err().is_invalid_argument());
        assert!(!f.catalog.contains("t"));

        f.run("create 't', 'a'").unwrap();
        let before = f.catalog.get_table("t").unwrap().clone();
        assert!(f.run("alter 't', {NAME => 'a:b'}").unwrap_err().is_invalid_argument());
        assert_eq!(f.catalog.get_table("t").unwrap(), &before);
    }

    #[test]
    fn test_enable_disable_results() {
        let mut f = Fixture::new();
        f.run("create 't', 'a'").unwrap();
        assert_eq!(f.run("is_enabled 't'").unwrap(), CommandResult::Bool(true));
        assert!(matches!(f.run("enable 't'").unwrap(), CommandResult::Warning(_)));
        assert_eq!(f.run("disable 't'").unwrap(), CommandResult::Done);
        assert_eq!(f.run("is_disabled 't'").unwrap(), CommandResult::Bool(true));
    }

    #[test]
    fn test_alter_sequential_maps() {
        let mut f = Fixture::new();
        f.run("create 't', 'a'").unwrap();
        let result = f
            .run("alter 't', {NAME => 'b'}, {NAME => 'a', METHOD => 'delete'}")
            .unwrap();
        assert_eq!(
            result,
            CommandResult::Altered(vec![
                AlterAction::Created("b".to_string()),
                AlterAction::Deleted("a".to_string()),
            ])
        );
    }

    #[test]
    fn test_drop_all_uses_confirmation() {
        let mut f = Fixture::new();
        f.run("create 't1', 'a'").unwrap();
        f.run("disable 't1'").unwrap();

        let command = f.grammar.parse("drop_all 't.*'").unwrap();
        let mut asked = Vec::new();
        let result = execute(&mut f.catalog, command, &mut |names| {
            asked.extend_from_slice(names);
            false
        })
        .unwrap();
        assert_eq!(result, CommandResult::Dropped(0));
        assert_eq!(asked, vec!["t1".to_string()]);

        assert_eq!(f.run("drop_all 't.*'").unwrap(), CommandResult::Dropped(1));
    }

    #[test]
    fn test_interpreter_local_commands() {
        let mut f = Fixture::new();
        assert_eq!(f.run("help").unwrap(), CommandResult::Help(None));
        assert_eq!(f.run("exit").unwrap(), CommandResult::Exit);
        assert!(!CommandResult::Exit.touches_catalog());
        assert!(CommandResult::Done.touches_catalog());
    }
}
