use hbaselite::{CatalogOptions, CommandResult, Shell};
use tempfile::TempDir;

fn open_shell(temp_dir: &TempDir) -> Shell {
    Shell::open(CatalogOptions::with_data_dir(temp_dir.path())).unwrap()
}

fn count(shell: &mut Shell, table: &str) -> u64 {
    match shell.execute(&format!("count '{table}'")).unwrap() {
        CommandResult::Count(n) => n,
        other => panic!("expected count, got {other:?}"),
    }
}

#[test]
fn test_scenario_put_then_get() {
    let temp_dir = TempDir::new().unwrap();
    let mut shell = open_shell(&temp_dir);

    shell.execute("create 'students', 'Personal'").unwrap();
    shell
        .execute("put 'students', 'r1', 'Personal:Nombres', 'Ana'")
        .unwrap();

    let reply = shell.run_line("get 'students', 'r1'");
    assert!(!reply.error);
    let lines: Vec<&str> = reply.text.lines().collect();
    assert_eq!(lines[0].split_whitespace().collect::<Vec<_>>(), ["COLUMN", "CELL"]);
    assert!(lines[1].trim_start().starts_with("Personal:Nombres"));
    assert!(lines[1].ends_with("value=Ana"));
    assert_eq!(lines[2], "1 row(s)");
    assert!(lines[3].starts_with("Took "));
}

#[test]
fn test_scenario_disabled_table_rejects_put() {
    let temp_dir = TempDir::new().unwrap();
    let mut shell = open_shell(&temp_dir);
    shell.execute("create 'students', 'Personal'").unwrap();

    shell.execute("disable 'students'").unwrap();
    let err = shell
        .execute("put 'students', 'r1', 'Personal:Nombres', 'Ana'")
        .unwrap_err();
    assert!(err.is_disabled_state_conflict());

    shell.execute("enable 'students'").unwrap();
    shell
        .execute("put 'students', 'r1', 'Personal:Nombres', 'Ana'")
        .unwrap();
    assert_eq!(count(&mut shell, "students"), 1);
}

#[test]
fn test_scenario_delete_last_qualifier_drops_row() {
    let temp_dir = TempDir::new().unwrap();
    let mut shell = open_shell(&temp_dir);
    shell.execute("create 'students', 'Personal'").unwrap();
    shell
        .execute("put 'students', 'r1', 'Personal:Nombres', 'Ana', 'r2', 'Personal:Nombres', 'Eva'")
        .unwrap();
    assert_eq!(count(&mut shell, "students"), 2);

    shell
        .execute("delete 'students', 'r1', 'Personal:Nombres'")
        .unwrap();
    assert_eq!(count(&mut shell, "students"), 1);

    let err = shell
        .execute("delete 'students', 'r1', 'Personal:Nombres'")
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_scenario_drop_requires_disable() {
    let temp_dir = TempDir::new().unwrap();
    let mut shell = open_shell(&temp_dir);
    shell.execute("create 'students', 'Personal'").unwrap();
    let file = temp_dir.path().join("students.json");
    assert!(file.exists());

    let err = shell.execute("drop 'students'").unwrap_err();
    assert!(err.is_precondition_failed());
    assert!(file.exists());

    shell.execute("disable 'students'").unwrap();
    shell.execute("drop 'students'").unwrap();
    assert!(!file.exists());
    assert_eq!(
        shell.execute("list").unwrap(),
        CommandResult::TableList(Vec::new())
    );
}

#[test]
fn test_scenario_alter_deletes_family() {
    let temp_dir = TempDir::new().unwrap();
    let mut shell = open_shell(&temp_dir);
    shell
        .execute("create 'students', 'Personal', 'Academic'")
        .unwrap();

    shell
        .execute("alter 'students', {NAME => 'Personal', METHOD => 'delete'}")
        .unwrap();
    let table = shell.catalog().get_table("students").unwrap();
    assert_eq!(table.column_family_names(), vec!["Academic"]);

    let err = shell
        .execute("put 'students', 'r1', 'Personal:Nombres', 'Ana'")
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_describe_output() {
    let temp_dir = TempDir::new().unwrap();
    let mut shell = open_shell(&temp_dir);
    shell
        .execute("create 'students', {NAME => 'Personal', VERSIONS => 3, TTL => 3600}")
        .unwrap();

    let reply = shell.run_line("describe 'students'");
    assert!(reply.text.starts_with("Table students is ENABLED\n"));
    assert!(reply.text.contains("VERSIONS => '3'"));
    assert!(reply.text.contains("TTL => '3600 SECONDS'"));
    assert!(reply.text.contains("\n1 row(s)\n"));
}

#[test]
fn test_get_versions() {
    let temp_dir = TempDir::new().unwrap();
    let mut shell = open_shell(&temp_dir);
    shell.execute("create 't', 'f'").unwrap();
    for value in ["a", "b", "c"] {
        shell
            .execute(&format!("put 't', 'r1', 'f:q', '{value}'"))
            .unwrap();
    }

    let CommandResult::Cells { lines, rows, .. } = shell
        .execute("get 't', 'r1', {COLUMN => 'f:q', VERSIONS => 2}")
        .unwrap()
    else {
        panic!("expected cells");
    };
    assert_eq!(rows, 2);
    assert!(lines[0].cell.ends_with("value=c"));
    assert!(lines[1].cell.ends_with("value=b"));
}

#[test]
fn test_scan_and_delete_all() {
    let temp_dir = TempDir::new().unwrap();
    let mut shell = open_shell(&temp_dir);
    shell.execute("create 't', 'a', 'b'").unwrap();
    shell
        .execute("put 't', 'r2', 'a:x', '1', 'r1', 'a:x', '2', 'r1', 'b:y', '3'")
        .unwrap();

    let reply = shell.run_line("scan 't'");
    let body: Vec<&str> = reply.text.lines().collect();
    assert!(body[0].starts_with("ROW"));
    assert!(body[1].trim_start().starts_with("r1"));
    assert!(body[3].trim_start().starts_with("r2"));
    assert_eq!(body[4], "2 row(s)");

    shell.execute("delete_all 't', 'r1'").unwrap();
    assert_eq!(count(&mut shell, "t"), 1);
}

#[test]
fn test_list_and_drop_all() {
    let temp_dir = TempDir::new().unwrap();
    let mut shell = open_shell(&temp_dir);
    for name in ["logs_2023", "logs_2024", "users"] {
        shell.execute(&format!("create '{name}', 'f'")).unwrap();
    }

    assert_eq!(
        shell.execute("list 'logs_.*'").unwrap(),
        CommandResult::TableList(vec!["logs_2023".to_string(), "logs_2024".to_string()])
    );

    let reply = shell.run_line("drop_all 'logs_.*'");
    assert!(reply.error);
    assert!(reply.text.contains("logs_2023"));

    shell.execute("disable 'logs_2023'").unwrap();
    shell.execute("disable 'logs_2024'").unwrap();
    assert_eq!(
        shell.execute("drop_all 'logs_.*'").unwrap(),
        CommandResult::Dropped(2)
    );
    assert_eq!(
        shell.execute("list").unwrap(),
        CommandResult::TableList(vec!["users".to_string()])
    );
}

#[test]
fn test_truncate() {
    let temp_dir = TempDir::new().unwrap();
    let mut shell = open_shell(&temp_dir);
    shell.execute("create 't', 'a', 'b'").unwrap();
    shell.execute("put 't', 'r1', 'a:x', '1'").unwrap();

    let reply = shell.run_line("truncate 't'");
    assert!(reply.text.starts_with("Truncating 't' table"));
    assert_eq!(count(&mut shell, "t"), 0);
    assert_eq!(
        shell.execute("is_enabled 't'").unwrap(),
        CommandResult::Bool(true)
    );
    let table = shell.catalog().get_table("t").unwrap();
    assert_eq!(table.column_family_names(), vec!["a", "b"]);
}

#[test]
fn test_errors_do_not_change_state() {
    let temp_dir = TempDir::new().unwrap();
    let mut shell = open_shell(&temp_dir);
    shell.execute("create 't', 'a'").unwrap();
    let before = shell.catalog().get_table("t").unwrap().clone();

    for line in [
        "put 't', 'r1', 'zz:x', '1'",
        "put 't', 'r1'",
        "alter 't', {NAME => 'a', BLOCKSIZE => 'big'}",
        "alter 't', {NAME => 'a', FLAVOR => 'x'}",
        "delete 't', 'r1', 'a:x'",
        "get 'missing', 'r1'",
        "wibble",
    ] {
        let reply = shell.run_line(line);
        assert!(reply.error, "{line} should fail");
    }
    assert_eq!(shell.catalog().get_table("t").unwrap(), &before);
}
