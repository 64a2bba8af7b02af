/// Usage and description of one shell command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpEntry {
    pub command: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

const fn entry(
    command: &'static str,
    usage: &'static str,
    description: &'static str,
) -> HelpEntry {
    HelpEntry {
        command,
        usage,
        description,
    }
}

/// Every command, in grammar order.
pub const COMMANDS: &[HelpEntry] = &[
    entry(
        "create",
        "create '<table_name>', '<column_family_1>', {NAME => '<column_family_2>', VERSIONS => 3}, ...",
        "Creates a new table with the specified column families.",
    ),
    entry(
        "list",
        "list ['<regex>']",
        "If no regex is specified, lists all tables. Otherwise, lists tables whose whole name matches the regex.",
    ),
    entry("disable", "disable '<table_name>'", "Disables the specified table."),
    entry("enable", "enable '<table_name>'", "Enables the specified table."),
    entry(
        "is_enabled",
        "is_enabled '<table_name>'",
        "Checks if the specified table is enabled.",
    ),
    entry(
        "is_disabled",
        "is_disabled '<table_name>'",
        "Checks if the specified table is disabled.",
    ),
    entry(
        "alter",
        "alter '<table_name>', {NAME => '<column_family>', VERSIONS => 5}, {NAME => '<column_family>', METHOD => 'delete'}, ...",
        "Creates, updates or deletes column families of an existing table.",
    ),
    entry(
        "drop",
        "drop '<table_name>'",
        "Deletes a table. Table must be disabled first.",
    ),
    entry(
        "drop_all",
        "drop_all '<regex>'",
        "Deletes all tables matching the regex. Tables must be disabled first.",
    ),
    entry(
        "describe",
        "describe '<table_name>'",
        "Provides the description of the table and its column families.",
    ),
    entry(
        "put",
        "put '<table_name>', '<row_id>', '<column_family>:<column_qualifier>', '<value>'[, '<row_id>', ...]",
        "Puts cell values at the specified [row, column] pairs of the table.",
    ),
    entry(
        "get",
        "get '<table_name>', '<row_id>'[, {COLUMN => '<column_family>[:<column_qualifier>]', VERSIONS => n}]",
        "Gets the contents of a row or cell.",
    ),
    entry("scan", "scan '<table_name>'", "Scans and returns the table's data."),
    entry(
        "delete",
        "delete '<table_name>', '<row_id>', '<column_family>:<column_qualifier>'",
        "Deletes a cell value in a table.",
    ),
    entry(
        "delete_all",
        "delete_all '<table_name>', '<row_id>'",
        "Deletes all cells in a given row.",
    ),
    entry(
        "count",
        "count '<table_name>'",
        "Counts and returns the number of rows in a table.",
    ),
    entry(
        "truncate",
        "truncate '<table_name>'",
        "Disables, drops and recreates the specified table.",
    ),
    entry("help", "help ['<command>']", "Shows help for all commands or one command."),
    entry("exit", "exit", "Leaves the shell."),
];

pub fn lookup(command: &str) -> Option<&'static HelpEntry> {
    COMMANDS.iter().find(|e| e.command == command)
}
