use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

/// Rill programming language runtime.
///
/// Rill is a small, dynamically typed scripting language with closures and
/// class-based objects. This CLI runs Rill programs and provides an
/// interactive REPL.
///
/// EXAMPLES:
///     rill run main.rill           Run a Rill program
///     rill run main.rill --json    Output diagnostics as JSON
///     rill repl                    Start interactive REPL
///
/// ENVIRONMENT VARIABLES:
///     RILL_JSON        Set to '1' for JSON diagnostics by default
///     RILL_NO_HISTORY  Set to '1' to disable REPL history
///     NO_COLOR         Set to disable colored output
#[derive(Parser)]
#[command(name = "rill")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Rill source file
    ///
    /// Exits with code 65 when the program has static errors and 70 when
    /// it fails at runtime.
    ///
    /// EXAMPLES:
    ///     rill run main.rill              Run a program
    ///     rill run main.rill --json       Output diagnostics as JSON
    #[command(visible_alias = "r")]
    Run {
        /// Path to the Rill source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long, env = "RILL_JSON", value_parser = clap::builder::FalseyValueParser::new())]
        json: bool,
    },

    /// Start an interactive REPL
    ///
    /// Opens a Read-Eval-Print Loop. Declarations persist across lines.
    ///
    /// REPL COMMANDS:
    ///     :help, :h      Show help
    ///     :quit, :q      Exit REPL
    ///     :reset         Clear all definitions
    ///
    /// EXAMPLES:
    ///     rill repl                    Start the REPL
    ///     rill repl --no-history       Disable history persistence
    Repl {
        /// Disable history persistence (for privacy)
        #[arg(long, env = "RILL_NO_HISTORY", value_parser = clap::builder::FalseyValueParser::new())]
        no_history: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, json } => {
            let code = commands::run::run(&file, json)?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Commands::Repl { no_history } => commands::repl::run(no_history),
    }
}
