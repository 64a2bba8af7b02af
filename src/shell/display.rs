use std::time::Duration;

use crate::{
    catalog::AlterAction,
    shell::{
        executor::{CellLayout, CellLine, CommandResult},
        help::{self, HelpEntry},
    },
    util::Status,
};

/// Render a command result the way the HBase shell prints it.
///
/// Commands that reached the catalog end with a `Took X.XXXX seconds` line.
pub fn render(result: &CommandResult, took: Duration) -> String {
    let mut lines: Vec<String> = match result {
        CommandResult::Created(table) => vec![format!("Created table {table}")],
        CommandResult::TableList(tables) => {
            let mut out = vec!["TABLE".to_string()];
            out.extend(tables.iter().cloned());
            out.push(rows_footer(tables.len()));
            out
        }
        CommandResult::Done => Vec::new(),
        CommandResult::Warning(msg) => vec![format!("WARNING: {msg}")],
        CommandResult::Bool(b) => vec![b.to_string()],
        CommandResult::Altered(actions) => {
            let mut out = vec!["Updating all regions with the new schema...".to_string()];
            out.extend(actions.iter().map(|action| match action {
                AlterAction::Created(cf) => format!("Column family '{cf}' created."),
                AlterAction::Updated(cf) => format!("Column family '{cf}' updated."),
                AlterAction::Deleted(cf) => format!("Column family '{cf}' deleted."),
            }));
            out.push("Done.".to_string());
            out
        }
        CommandResult::Dropped(n) => vec![format!("{n} tables successfully dropped")],
        CommandResult::RowsDeleted(n) => vec![rows_footer(*n)],
        CommandResult::Description { text, families } => {
            let mut out: Vec<String> = text.lines().map(String::from).collect();
            out.push(rows_footer(*families));
            out
        }
        CommandResult::Cells {
            layout,
            lines,
            rows,
        } => {
            let mut out = cell_listing(*layout, lines);
            out.push(rows_footer(*rows));
            out
        }
        CommandResult::Count(n) => vec![rows_footer(*n as usize), format!("=> {n}")],
        CommandResult::Truncated(table) => vec![
            format!("Truncating '{table}' table (it may take a while):"),
            "Disabling table...".to_string(),
            "Truncating table...".to_string(),
        ],
        CommandResult::Help(None) => help_all(),
        CommandResult::Help(Some(topic)) => match help::lookup(topic) {
            Some(entry) => help_entry(entry),
            None => vec![format!("Unknown command '{topic}'. Try 'help'.")],
        },
        CommandResult::Unknown(line) => vec![format!("Unknown command: '{line}'. Try 'help'.")],
        CommandResult::Exit | CommandResult::Empty => Vec::new(),
    };

    if result.touches_catalog() {
        lines.push(format!("Took {:.4} seconds", took.as_secs_f64()));
    }
    lines.join("\n")
}

/// Render an error as a single `ERROR: ...` line.
pub fn render_error(err: &Status) -> String {
    match err.message() {
        Some(msg) => format!("ERROR: {msg}"),
        None => format!("ERROR: {:?}", err.code()),
    }
}

fn rows_footer(n: usize) -> String {
    format!("{n} row(s)")
}

fn cell_listing(layout: CellLayout, lines: &[CellLine]) -> Vec<String> {
    let (left, right) = match layout {
        CellLayout::Row => ("ROW", "COLUMN+CELL"),
        CellLayout::Column => ("COLUMN", "CELL"),
    };
    // Keys are indented by one space under the header.
    let width = lines
        .iter()
        .map(|l| l.key.chars().count() + 1)
        .max()
        .unwrap_or(0)
        .max(left.len());

    let mut out = Vec::with_capacity(lines.len() + 1);
    out.push(format!("{left:<width$}  {right}"));
    for line in lines {
        out.push(format!(" {:<w$}  {}", line.key, line.cell, w = width - 1));
    }
    out
}

fn help_all() -> Vec<String> {
    let mut out = vec![
        "HBase Shell, version hbaselite".to_string(),
        "Enter 'help '<command>'' for help on a specific command.".to_string(),
        String::new(),
        "COMMANDS:".to_string(),
    ];
    for entry in help::COMMANDS {
        out.extend(help_entry(entry).into_iter().map(|l| format!("  {l}")));
    }
    out
}

fn help_entry(entry: &HelpEntry) -> Vec<String> {
    vec![
        entry.command.to_string(),
        format!("  Usage: {}", entry.usage),
        format!("  {}", entry.description),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOK: Duration = Duration::from_millis(12);

    #[test]
    fn test_took_trailer() {
        assert_eq!(
            render(&CommandResult::Created("t".to_string()), TOOK),
            "Created table t\nTook 0.0120 seconds"
        );
        assert_eq!(render(&CommandResult::Done, TOOK), "Took 0.0120 seconds");
        assert_eq!(render(&CommandResult::Empty, TOOK), "");
        assert_eq!(render(&CommandResult::Exit, TOOK), "");
    }

    #[test]
    fn test_cell_listing() {
        let result = CommandResult::Cells {
            layout: CellLayout::Row,
            lines: vec![
                CellLine {
                    key: "r1".to_string(),
                    cell: "column=a:x, value=1".to_string(),
                },
                CellLine {
                    key: "row-long".to_string(),
                    cell: "column=a:x, value=2".to_string(),
                },
            ],
            rows: 2,
        };
        let text = render(&result, TOOK);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ROW        COLUMN+CELL");
        assert_eq!(lines[1], " r1        column=a:x, value=1");
        assert_eq!(lines[2], " row-long  column=a:x, value=2");
        assert_eq!(lines[3], "2 row(s)");
    }

    #[test]
    fn test_rows_deleted() {
        assert_eq!(
            render(&CommandResult::RowsDeleted(2), TOOK),
            "2 row(s)\nTook 0.0120 seconds"
        );
    }

    #[test]
    fn test_table_list() {
        let text = render(
            &CommandResult::TableList(vec!["a".to_string(), "b".to_string()]),
            TOOK,
        );
        assert_eq!(text, "TABLE\na\nb\n2 row(s)\nTook 0.0120 seconds");
    }

    #[test]
    fn test_unknown_and_help() {
        assert_eq!(
            render(&CommandResult::Unknown("foo".to_string()), TOOK),
            "Unknown command: 'foo'. Try 'help'."
        );
        let text = render(&CommandResult::Help(Some("scan".to_string())), TOOK);
        assert_eq!(
            text,
            "scan\n  Usage: scan '<table_name>'\n  Scans and returns the table's data."
        );
        assert!(render(&CommandResult::Help(None), TOOK).contains("drop_all '<regex>'"));
    }

    #[test]
    fn test_render_error() {
        assert_eq!(
            render_error(&Status::not_found("Table 'x' does not exist")),
            "ERROR: Table 'x' does not exist"
        );
    }
}
