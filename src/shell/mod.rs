/// Command interpreter for the HBase-style shell language
///
/// # Architecture
///
/// ```text
/// input line
///     ↓
/// Grammar::parse ── first rule whose `^keyword\b` matches
///     ├─→ lexer::parse_args  → Vec<Arg> (quoted strings, {K => 'v'} maps)
///     └─→ rule extractor     → Command
///     ↓
/// executor::execute ── Catalog / Table call → CommandResult
///     ↓
/// display::render ── HBase shell text + "Took X.XXXX seconds"
/// ```
///
/// Errors from any stage come back as a `Status` and are rendered as one
/// `ERROR: ...` line. A line that matches no keyword is not an error; it
/// produces an "Unknown command" reply and changes nothing.
use std::time::Instant;

use crate::{
    catalog::{Catalog, CatalogOptions},
    util::Result,
};

pub mod command;
pub mod display;
pub mod executor;
pub mod grammar;
pub mod help;
pub mod lexer;

pub use command::{ColumnSpec, Command, FamilySpec, PutCell};
pub use executor::{CellLayout, CellLine, CommandResult};
pub use grammar::Grammar;

type Confirm = Box<dyn FnMut(&[String]) -> bool>;

/// Rendered answer to one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// The line asked to leave the shell.
    pub exit: bool,
    /// The line failed or was not understood.
    pub error: bool,
}

/// One shell session: a catalog plus the command grammar.
pub struct Shell {
    catalog: Catalog,
    grammar: Grammar,
    confirm: Confirm,
}

impl Shell {
    pub fn open(options: CatalogOptions) -> Result<Self> {
        Shell::new(Catalog::open(options)?)
    }

    /// Wrap an opened catalog. `drop_all` is confirmed automatically until
    /// [`Shell::with_confirmation`] installs a prompt.
    pub fn new(catalog: Catalog) -> Result<Self> {
        Ok(Shell {
            catalog,
            grammar: Grammar::new()?,
            confirm: Box::new(|_| true),
        })
    }

    /// Ask `confirm` with the matched table names before `drop_all` drops them.
    pub fn with_confirmation(mut self, confirm: impl FnMut(&[String]) -> bool + 'static) -> Self {
        self.confirm = Box::new(confirm);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Parse and execute one line.
    pub fn execute(&mut self, line: &str) -> Result<CommandResult> {
        let command = self.grammar.parse(line)?;
        executor::execute(&mut self.catalog, command, &mut *self.confirm)
    }

    /// Execute one line and render the outcome, errors included.
    pub fn run_line(&mut self, line: &str) -> Reply {
        let start = Instant::now();
        match self.execute(line) {
            Ok(result) => Reply {
                text: display::render(&result, start.elapsed()),
                exit: matches!(result, CommandResult::Exit),
                error: matches!(result, CommandResult::Unknown(_)),
            },
            Err(err) => Reply {
                text: display::render_error(&err),
                exit: false,
                error: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use tempfile::TempDir;

    use super::*;

    fn shell(dir: &TempDir) -> Shell {
        Shell::open(CatalogOptions::with_data_dir(dir.path())).unwrap()
    }

    #[test]
    fn test_run_line_replies() {
        let temp_dir = TempDir::new().unwrap();
        let mut shell = shell(&temp_dir);

        let reply = shell.run_line("create 'students', 'Personal'");
        assert!(reply.text.starts_with("Created table students\nTook "));
        assert!(!reply.error);

        let reply = shell.run_line("create 'students', 'Personal'");
        assert_eq!(reply.text, "ERROR: Table 'students' already exists");
        assert!(reply.error);

        let reply = shell.run_line("frobnicate");
        assert_eq!(reply.text, "Unknown command: 'frobnicate'. Try 'help'.");
        assert!(reply.error);

        let reply = shell.run_line("");
        assert_eq!(reply.text, "");
        assert!(!reply.error && !reply.exit);

        assert!(shell.run_line("exit").exit);
    }

    #[test]
    fn test_confirmation_callback() {
        let temp_dir = TempDir::new().unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&seen);
        let mut shell = shell(&temp_dir).with_confirmation(move |names| {
            recorder.borrow_mut().extend_from_slice(names);
            false
        });

        shell.run_line("create 'a1', 'f'");
        shell.run_line("disable 'a1'");
        let reply = shell.run_line("drop_all 'a.*'");
        assert!(reply.text.starts_with("0 tables successfully dropped"));
        assert_eq!(*seen.borrow(), vec!["a1".to_string()]);
        assert!(shell.catalog().contains("a1"));
    }
}
