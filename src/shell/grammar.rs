use regex::Regex;

use crate::{
    column_family::{NAME_KEY, Properties},
    shell::{
        command::{ColumnSpec, Command, FamilySpec, PutCell},
        lexer::{Arg, parse_args},
    },
    util::{Result, Status},
};

type Extract = fn(&[Arg]) -> Result<Command>;

/// A command keyword and the rule turning its arguments into a [`Command`].
struct Rule {
    keyword: &'static str,
    pattern: Regex,
    extract: Extract,
}

/// Ordered command grammar. The first rule whose keyword starts the line
/// wins; the rest of the line is its argument list.
pub struct Grammar {
    rules: Vec<Rule>,
}

/// Commands whose only argument is one quoted string.
macro_rules! single_arg_command {
    ($name:ident, $keyword:literal, $variant:ident { $field:ident }) => {
        fn $name(args: &[Arg]) -> Result<Command> {
            Ok(Command::$variant {
                $field: single_arg($keyword, args)?,
            })
        }
    };
}

single_arg_command!(disable, "disable", Disable { table });
single_arg_command!(enable, "enable", Enable { table });
single_arg_command!(is_enabled, "is_enabled", IsEnabled { table });
single_arg_command!(is_disabled, "is_disabled", IsDisabled { table });
single_arg_command!(drop_table, "drop", Drop { table });
single_arg_command!(drop_matching, "drop_all", DropAll { pattern });
single_arg_command!(describe, "describe", Describe { table });
single_arg_command!(scan, "scan", Scan { table });
single_arg_command!(count, "count", Count { table });
single_arg_command!(truncate, "truncate", Truncate { table });

const RULES: &[(&str, Extract)] = &[
    ("create", create),
    ("list", list),
    ("disable", disable),
    ("enable", enable),
    ("is_enabled", is_enabled),
    ("is_disabled", is_disabled),
    ("alter", alter),
    ("drop", drop_table),
    ("drop_all", drop_matching),
    ("describe", describe),
    ("put", put),
    ("get", get),
    ("scan", scan),
    ("delete", delete),
    ("delete_all", delete_all),
    ("count", count),
    ("truncate", truncate),
    ("help", help),
    ("exit", exit),
];

impl Grammar {
    pub fn new() -> Result<Self> {
        let rules = RULES
            .iter()
            .map(|&(keyword, extract)| -> Result<Rule> {
                Ok(Rule {
                    keyword,
                    pattern: Regex::new(&format!(r"^{keyword}\b"))?,
                    extract,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Grammar { rules })
    }

    /// Command keywords in match order.
    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.keyword)
    }

    /// Parse one input line.
    ///
    /// A line matching no keyword is [`Command::Unknown`], not an error.
    /// A matching keyword with malformed arguments is `InvalidArgument`.
    pub fn parse(&self, line: &str) -> Result<Command> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Empty);
        }

        for rule in &self.rules {
            if let Some(m) = rule.pattern.find(line) {
                let args = parse_args(&line[m.end()..])
                    .map_err(|e| syntax_error(rule.keyword, e))?;
                return (rule.extract)(&args);
            }
        }
        Ok(Command::Unknown(line.to_string()))
    }
}

fn syntax_error(keyword: &str, e: Status) -> Status {
    Status::invalid_argument(format!(
        "{keyword}: {}",
        e.message().unwrap_or("syntax error")
    ))
}

fn expect_len(keyword: &str, args: &[Arg], len: usize) -> Result<()> {
    if args.len() != len {
        return Err(Status::invalid_argument(format!(
            "{keyword} takes {len} argument(s), got {}",
            args.len()
        )));
    }
    Ok(())
}

fn string_arg(keyword: &str, args: &[Arg], idx: usize) -> Result<String> {
    match args.get(idx) {
        Some(Arg::Str(s)) => Ok(s.clone()),
        Some(other) => Err(Status::invalid_argument(format!(
            "{keyword}: argument {} must be a quoted string, got {}",
            idx + 1,
            other.kind()
        ))),
        None => Err(Status::invalid_argument(format!(
            "{keyword}: missing argument {}",
            idx + 1
        ))),
    }
}

fn single_arg(keyword: &str, args: &[Arg]) -> Result<String> {
    expect_len(keyword, args, 1)?;
    string_arg(keyword, args, 0)
}

/// Take the `NAME` entry out of a property map.
fn split_name(keyword: &str, map: &Properties) -> Result<(String, Properties)> {
    let mut name = None;
    let mut rest = Properties::new();
    for (k, v) in map {
        if k.eq_ignore_ascii_case(NAME_KEY) {
            name = Some(v.clone());
        } else {
            rest.push((k.clone(), v.clone()));
        }
    }
    let name = name.ok_or_else(|| {
        Status::invalid_argument(format!("{keyword}: column family map requires a NAME"))
    })?;
    Ok((name, rest))
}

fn create(args: &[Arg]) -> Result<Command> {
    let table = string_arg("create", args, 0)?;
    if args.len() < 2 {
        return Err(Status::invalid_argument(
            "create: table must have at least one column family",
        ));
    }

    let families = args[1..]
        .iter()
        .map(|arg| match arg {
            Arg::Str(name) => Ok(FamilySpec::named(name.clone())),
            Arg::Map(map) => {
                let (name, properties) = split_name("create", map)?;
                Ok(FamilySpec { name, properties })
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Command::Create { table, families })
}

fn list(args: &[Arg]) -> Result<Command> {
    match args {
        [] => Ok(Command::List { pattern: None }),
        [_] => Ok(Command::List {
            pattern: Some(string_arg("list", args, 0)?),
        }),
        _ => Err(Status::invalid_argument("list takes at most 1 argument")),
    }
}

fn alter(args: &[Arg]) -> Result<Command> {
    let table = string_arg("alter", args, 0)?;
    if args.len() < 2 {
        return Err(Status::invalid_argument(
            "alter: expected at least one {NAME => '<column family>', ...} map",
        ));
    }

    let maps = args[1..]
        .iter()
        .map(|arg| match arg {
            Arg::Map(map) => Ok(map.clone()),
            Arg::Str(s) => Err(Status::invalid_argument(format!(
                "alter: expected a {{...}} map, got '{s}'"
            ))),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Command::Alter { table, maps })
}

fn put(args: &[Arg]) -> Result<Command> {
    let table = string_arg("put", args, 0)?;
    let body = &args[1.min(args.len())..];
    if body.is_empty() || body.len() % 3 != 0 {
        return Err(Status::invalid_argument(
            "put: expected one or more '<row>', '<family>:<qualifier>', '<value>' groups",
        ));
    }

    let mut cells = Vec::with_capacity(body.len() / 3);
    for base in (1..args.len()).step_by(3) {
        let row_key = string_arg("put", args, base)?;
        let (family, qualifier) = ColumnSpec::parse_cell(&string_arg("put", args, base + 1)?)?;
        let value = string_arg("put", args, base + 2)?;
        cells.push(PutCell {
            row_key,
            family,
            qualifier,
            value,
        });
    }
    Ok(Command::Put { table, cells })
}

fn get(args: &[Arg]) -> Result<Command> {
    let table = string_arg("get", args, 0)?;
    let row_key = string_arg("get", args, 1)?;

    let mut column = None;
    let mut versions = 1;
    match args.get(2) {
        None => {}
        Some(Arg::Str(s)) => column = Some(ColumnSpec::parse(s)?),
        Some(Arg::Map(map)) => {
            for (k, v) in map {
                if k.eq_ignore_ascii_case("COLUMN") {
                    column = Some(ColumnSpec::parse(v)?);
                } else if k.eq_ignore_ascii_case("VERSIONS") {
                    versions = v
                        .parse::<usize>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| {
                            Status::invalid_argument(format!(
                                "get: VERSIONS must be a positive number, got '{v}'"
                            ))
                        })?;
                } else {
                    return Err(Status::invalid_argument(format!(
                        "get: unknown option '{k}'"
                    )));
                }
            }
        }
    }
    if args.len() > 3 {
        return Err(Status::invalid_argument(
            "get takes at most 3 arguments",
        ));
    }

    Ok(Command::Get {
        table,
        row_key,
        column,
        versions,
    })
}

fn delete(args: &[Arg]) -> Result<Command> {
    expect_len("delete", args, 3)?;
    let (family, qualifier) = ColumnSpec::parse_cell(&string_arg("delete", args, 2)?)?;
    Ok(Command::Delete {
        table: string_arg("delete", args, 0)?,
        row_key: string_arg("delete", args, 1)?,
        family,
        qualifier,
    })
}

fn delete_all(args: &[Arg]) -> Result<Command> {
    expect_len("delete_all", args, 2)?;
    Ok(Command::DeleteAll {
        table: string_arg("delete_all", args, 0)?,
        row_key: string_arg("delete_all", args, 1)?,
    })
}

fn exit(args: &[Arg]) -> Result<Command> {
    expect_len("exit", args, 0)?;
    Ok(Command::Exit)
}

fn help(args: &[Arg]) -> Result<Command> {
    match args {
        [] => Ok(Command::Help(None)),
        [_] => Ok(Command::Help(Some(string_arg("help", args, 0)?))),
        _ => Err(Status::invalid_argument("help takes at most 1 argument")),
    }
}
