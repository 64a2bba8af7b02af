//! HBase-style shell over an hbaselite data directory.
//!
//! Interactive use mirrors the HBase workflow: type `hbase shell` at the `$ `
//! prompt to enter the shell, `exit` to leave it. `--exec` runs commands
//! without prompting.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process,
};

use clap::Parser;
use hbaselite::{CatalogOptions, Shell};
use rustyline::{DefaultEditor, error::ReadlineError};
use tracing::debug;

const GATE_PROMPT: &str = "$ ";
const GATE_PHRASE: &str = "hbase shell";

/// HBase shell emulator backed by one JSON file per table.
#[derive(Parser, Debug)]
#[command(name = "hbase_shell", version)]
struct Cli {
    /// Directory holding the table files.
    #[arg(long, default_value = "hbase/data")]
    data_dir: PathBuf,

    /// Execute a command non-interactively (can be repeated).
    #[arg(short, long = "exec")]
    exec: Vec<String>,

    /// Start directly inside the shell, without the `hbase shell` gate.
    #[arg(long)]
    skip_gate: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = CatalogOptions::with_data_dir(&cli.data_dir);
    let shell = match Shell::open(options) {
        Ok(shell) => shell,
        Err(e) => {
            eprintln!("Cannot open data directory {}: {e}", cli.data_dir.display());
            process::exit(1);
        }
    };

    if !cli.exec.is_empty() {
        process::exit(run_exec_mode(shell, &cli.exec));
    }

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to initialize line editor: {e}");
            process::exit(1);
        }
    };
    let mut shell = shell.with_confirmation(confirm_on_stdin);

    if cli.skip_gate {
        run_shell(&mut shell, &mut rl);
        println!("Bye!");
    } else {
        run_gate(&mut shell, &mut rl);
    }
}

/// Execute commands in order (--exec mode).
///
/// Returns exit code: 0 = all succeeded, 1 = first error stops execution.
fn run_exec_mode(mut shell: Shell, commands: &[String]) -> i32 {
    for line in commands {
        let reply = shell.run_line(line);
        if reply.error {
            eprintln!("{}", reply.text);
            return 1;
        }
        if !reply.text.is_empty() {
            println!("{}", reply.text);
        }
        if reply.exit {
            break;
        }
    }
    0
}

/// Outer loop: wait for the gate phrase before entering the shell.
fn run_gate(shell: &mut Shell, rl: &mut DefaultEditor) {
    loop {
        match rl.readline(GATE_PROMPT) {
            Ok(line) if line.trim() == GATE_PHRASE => run_shell(shell, rl),
            Ok(_) => println!("Please access the hbase shell first by typing '{GATE_PHRASE}'"),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Bye!");
                return;
            }
            Err(e) => {
                eprintln!("Readline error: {e}");
                return;
            }
        }
    }
}

/// Inner loop: numbered prompt, one command per line.
fn run_shell(shell: &mut Shell, rl: &mut DefaultEditor) {
    println!("HBase Shell; enter 'help<RETURN>' for list of supported commands.");
    println!("Type \"exit<RETURN>\" to leave the HBase Shell");

    let mut line_no: u32 = 0;
    loop {
        let prompt = format!("hbase(main):{line_no:03}:0> ");
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = rl.add_history_entry(trimmed);
                }

                let reply = shell.run_line(trimmed);
                if !reply.text.is_empty() {
                    println!("{}", reply.text);
                }
                if reply.exit {
                    return;
                }
                line_no += 1;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                debug!("leaving shell on interrupt");
                println!();
                return;
            }
            Err(e) => {
                eprintln!("Readline error: {e}");
                return;
            }
        }
    }
}

fn confirm_on_stdin(names: &[String]) -> bool {
    for name in names {
        println!("{name}");
    }
    print!("\nDrop the above {} tables (y/n)? ", names.len());
    let _ = io::stdout().flush();

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}
