//! Run command - execute Rill source files

use super::{report, EXIT_RUNTIME_ERROR, EXIT_STATIC_ERROR};
use anyhow::{Context, Result};
use rill_runtime::lexer::Lexer;
use rill_runtime::parser::Parser;
use rill_runtime::{has_errors, Interpreter, Resolver};
use std::fs;

/// Run a Rill source file, returning the process exit code.
///
/// All static diagnostics are reported in one pass before execution is
/// refused; warnings are reported but don't block the run.
pub fn run(file_path: &str, json: bool) -> Result<i32> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;

    let (tokens, mut diagnostics) = Lexer::new(&source).tokenize();
    let (program, parse_diagnostics) = Parser::new(tokens).parse();
    diagnostics.extend(parse_diagnostics);
    let (locals, resolve_diagnostics) = Resolver::new().resolve(&program);
    diagnostics.extend(resolve_diagnostics);

    for diagnostic in &diagnostics {
        report(diagnostic, json);
    }
    if has_errors(&diagnostics) {
        return Ok(EXIT_STATIC_ERROR);
    }

    let mut interpreter = Interpreter::new();
    interpreter.add_resolutions(locals);
    let runtime_diagnostics = interpreter.interpret(&program);
    for diagnostic in &runtime_diagnostics {
        report(diagnostic, json);
    }
    if !runtime_diagnostics.is_empty() {
        return Ok(EXIT_RUNTIME_ERROR);
    }

    Ok(0)
}
