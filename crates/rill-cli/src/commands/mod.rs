//! CLI command implementations

pub mod repl;
pub mod run;

use colored::Colorize;
use rill_runtime::{Diagnostic, DiagnosticLevel};

/// Exit code for programs with static (lex/parse/resolve) errors
pub const EXIT_STATIC_ERROR: i32 = 65;
/// Exit code for programs that fail at runtime
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// Print one diagnostic to stderr, as JSON or colored human text
pub fn report(diagnostic: &Diagnostic, json: bool) {
    if json {
        match diagnostic.to_json() {
            Ok(line) => eprintln!("{}", line),
            Err(_) => eprintln!("{}", diagnostic),
        }
        return;
    }
    eprint!("{}", format_human(diagnostic));
}

/// Colored variant of `Diagnostic::to_human_string`
fn format_human(diagnostic: &Diagnostic) -> String {
    let level = match diagnostic.level {
        DiagnosticLevel::Error => "error".red().bold(),
        DiagnosticLevel::Warning => "warning".yellow().bold(),
    };
    let mut output = format!(
        "{}[{}]: {}\n  --> line {}, column {}\n",
        level, diagnostic.code, diagnostic.message, diagnostic.line, diagnostic.column
    );
    for note in &diagnostic.notes {
        output.push_str(&format!("  {}: {}\n", "note".cyan(), note));
    }
    if let Some(help) = &diagnostic.help {
        output.push_str(&format!("  {}: {}\n", "help".green(), help));
    }
    output
}
