//! Shared test utilities
//!
//! Helpers for running Rill source through the full pipeline and asserting
//! on values, captured output, and diagnostic codes.
#![allow(dead_code)]

use rill_runtime::lexer::Lexer;
use rill_runtime::parser::Parser;
use rill_runtime::{has_errors, Diagnostic, Interpreter, Resolver, Rill, Value};
use std::cell::RefCell;
use std::rc::Rc;

// Re-export testing utilities
pub use pretty_assertions::{assert_eq, assert_ne};

/// Assert that source code evaluates to a number
pub fn assert_eval_number(source: &str, expected: f64) {
    let runtime = Rill::new();
    match runtime.eval(source) {
        Ok(Value::Number(n)) => assert_eq!(n, expected, "source: {}", source),
        other => panic!("Expected Number({}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to a string
pub fn assert_eval_string(source: &str, expected: &str) {
    let runtime = Rill::new();
    match runtime.eval(source) {
        Ok(Value::Str(s)) => assert_eq!(s.as_ref(), expected, "source: {}", source),
        other => panic!("Expected Str({:?}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to a boolean
pub fn assert_eval_bool(source: &str, expected: bool) {
    let runtime = Rill::new();
    match runtime.eval(source) {
        Ok(Value::Bool(b)) => assert_eq!(b, expected, "source: {}", source),
        other => panic!("Expected Bool({}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to nil
pub fn assert_eval_nil(source: &str) {
    let runtime = Rill::new();
    match runtime.eval(source) {
        Ok(Value::Nil) => {}
        other => panic!("Expected Nil, got {:?}", other),
    }
}

/// Assert that source code fails with a specific diagnostic code
pub fn assert_error_code(source: &str, expected_code: &str) {
    let runtime = Rill::new();
    match runtime.eval(source) {
        Err(diagnostics) => {
            assert!(!diagnostics.is_empty(), "Expected error, got success");
            assert_eq!(
                diagnostics[0].code, expected_code,
                "source: {}\ndiagnostics: {:?}",
                source, diagnostics
            );
        }
        Ok(value) => panic!(
            "Expected error {}, got value {:?} for: {}",
            expected_code, value, source
        ),
    }
}

/// Run a full program and return everything it printed. Panics on any
/// diagnostic, static or runtime.
pub fn run_program(source: &str) -> String {
    match try_run_program(source) {
        Ok(output) => output,
        Err(diagnostics) => panic!("program failed: {:?}\nsource: {}", diagnostics, source),
    }
}

/// Run a full program, returning captured output or the diagnostics that
/// stopped it
pub fn try_run_program(source: &str) -> Result<String, Vec<Diagnostic>> {
    let (tokens, lex_diagnostics) = Lexer::new(source).tokenize();
    if !lex_diagnostics.is_empty() {
        return Err(lex_diagnostics);
    }
    let (program, parse_diagnostics) = Parser::new(tokens).parse();
    if !parse_diagnostics.is_empty() {
        return Err(parse_diagnostics);
    }
    let (locals, resolve_diagnostics) = Resolver::new().resolve(&program);
    if has_errors(&resolve_diagnostics) {
        return Err(resolve_diagnostics);
    }

    let buffer = Rc::new(RefCell::new(String::new()));
    let mut interpreter = Interpreter::with_capture(Rc::clone(&buffer));
    interpreter.add_resolutions(locals);
    let runtime_diagnostics = interpreter.interpret(&program);
    if !runtime_diagnostics.is_empty() {
        return Err(runtime_diagnostics);
    }

    let output = buffer.borrow().clone();
    Ok(output)
}

/// Static diagnostics (lex + parse + resolve) for a source text, without
/// running it
pub fn static_diagnostics(source: &str) -> Vec<Diagnostic> {
    let (tokens, mut diagnostics) = Lexer::new(source).tokenize();
    let (program, parse_diagnostics) = Parser::new(tokens).parse();
    diagnostics.extend(parse_diagnostics);
    let (_, resolve_diagnostics) = Resolver::new().resolve(&program);
    diagnostics.extend(resolve_diagnostics);
    diagnostics
}
