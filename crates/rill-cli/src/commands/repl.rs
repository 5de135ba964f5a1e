//! REPL command implementation

use super::report;
use anyhow::Result;
use rill_runtime::{ReplCore, Value};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Run the interactive REPL
///
/// If `no_history` is true, disables history persistence.
pub fn run(no_history: bool) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut repl = ReplCore::new();

    let history_path = if no_history { None } else { history_path() };
    if let Some(path) = &history_path {
        let _ = rl.load_history(path); // Ignore errors if file doesn't exist
    }

    println!("Rill v{} REPL", rill_runtime::VERSION);
    println!("Type expressions or statements, or :quit to exit");
    println!("Commands: :quit (or :q), :reset, :help");
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == ":quit" || trimmed == ":q" {
                    println!("Goodbye!");
                    break;
                }
                if trimmed == ":reset" {
                    repl.reset();
                    println!("REPL state reset");
                    continue;
                }
                if trimmed == ":help" || trimmed == ":h" {
                    print_help();
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                let result = repl.eval_line(&line);
                print!("{}", result.stdout);
                for diagnostic in &result.diagnostics {
                    report(diagnostic, false);
                }
                if let Some(value) = result.value {
                    // Nil from a statement-shaped expression is just noise
                    if value != Value::Nil {
                        println!("{}", value);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C clears the current line
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Read error: {}", err);
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        let _ = rl.save_history(path);
    }

    Ok(())
}

/// Platform history file, e.g. ~/.local/share/rill/history.txt
fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("rill").join("history.txt"))
}

fn print_help() {
    println!("REPL commands:");
    println!("  :quit, :q      Exit the REPL");
    println!("  :reset         Clear all definitions");
    println!("  :help, :h      Show this help");
    println!();
    println!("Anything else is evaluated as Rill code. Declarations persist");
    println!("across lines; a trailing expression prints its value.");
}
