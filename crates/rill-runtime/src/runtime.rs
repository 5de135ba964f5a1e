//! Rill runtime API for embedding
//!
//! `Rill` runs the full pipeline (lex, parse, resolve, interpret) over a
//! persistent interpreter, so successive `eval` calls share globals.

use crate::ast::{NodeId, Program, Stmt};
use crate::diagnostic::{has_errors, Diagnostic};
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::span::Span;
use crate::value::Value;
use std::cell::{Cell, RefCell};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, Vec<Diagnostic>>;

/// Rill runtime instance
///
/// Provides a high-level API for embedding Rill in host applications.
///
/// # Examples
///
/// ```
/// use rill_runtime::{Rill, Value};
///
/// let runtime = Rill::new();
/// let result = runtime.eval("1 + 2");
/// assert_eq!(result.unwrap(), Value::Number(3.0));
/// ```
pub struct Rill {
    /// Interpreter for executing code (using interior mutability)
    interpreter: RefCell<Interpreter>,
    /// First node id for the next parse; keeps ids unique across evals
    next_node_id: Cell<NodeId>,
}

impl Rill {
    /// Create a new Rill runtime instance
    pub fn new() -> Self {
        Self {
            interpreter: RefCell::new(Interpreter::new()),
            next_node_id: Cell::new(0),
        }
    }

    /// Evaluate Rill source code.
    ///
    /// Declarations persist across calls. When the source ends in an
    /// expression statement, its value is returned; otherwise `Nil`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rill_runtime::{Rill, Value};
    ///
    /// let runtime = Rill::new();
    /// runtime.eval("var x = 40;").unwrap();
    /// assert_eq!(runtime.eval("x + 2").unwrap(), Value::Number(42.0));
    /// ```
    pub fn eval(&self, source: &str) -> RuntimeResult<Value> {
        // Warnings are dropped here; eval_with_warnings keeps them
        self.eval_with_warnings(source).map(|(value, _)| value)
    }

    /// Evaluate Rill source code, keeping static warnings.
    ///
    /// Like [`eval`](Self::eval), but a successful run also returns the
    /// warnings (e.g. unused locals) from the static passes, the same
    /// one-pass reporting the CLI and REPL give. On failure the warnings
    /// ride along in the diagnostic vec.
    pub fn eval_with_warnings(&self, source: &str) -> RuntimeResult<(Value, Vec<Diagnostic>)> {
        // REPL-style convenience: a bare expression gets its semicolon
        let source = source.trim();
        let source = if !source.is_empty() && !source.ends_with(';') && !source.ends_with('}') {
            format!("{};", source)
        } else {
            source.to_string()
        };

        let (program, mut warnings) = self.check(&source)?;

        let mut interpreter = self.interpreter.borrow_mut();
        let (body, trailing) = split_trailing_expression(&program);
        for stmt in body {
            if let Err(error) = interpreter.execute(stmt) {
                warnings.push(error.into());
                return Err(warnings);
            }
        }
        match trailing {
            Some(expr) => match interpreter.evaluate(expr) {
                Ok(value) => Ok((value, warnings)),
                Err(error) => {
                    warnings.push(error.into());
                    Err(warnings)
                }
            },
            None => Ok((Value::Nil, warnings)),
        }
    }

    /// Evaluate a Rill source file
    pub fn eval_file(&self, path: &str) -> RuntimeResult<Value> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            vec![Diagnostic::error(
                format!("Failed to read file: {}", e),
                Span::dummy(),
            )]
        })?;
        self.eval(&source)
    }

    /// Run the static phases only. On success, returns the parsed program
    /// and any warnings; the depth map is fed to the interpreter.
    fn check(&self, source: &str) -> RuntimeResult<(Program, Vec<Diagnostic>)> {
        let (tokens, lex_diagnostics) = Lexer::new(source).tokenize();
        if !lex_diagnostics.is_empty() {
            return Err(lex_diagnostics);
        }

        let mut parser = Parser::with_node_base(tokens, self.next_node_id.get());
        let (program, parse_diagnostics) = parser.parse();
        self.next_node_id.set(parser.next_node_id());
        if !parse_diagnostics.is_empty() {
            return Err(parse_diagnostics);
        }

        let (locals, resolve_diagnostics) = Resolver::new().resolve(&program);
        if has_errors(&resolve_diagnostics) {
            return Err(resolve_diagnostics);
        }
        self.interpreter.borrow_mut().add_resolutions(locals);

        Ok((program, resolve_diagnostics))
    }
}

impl Default for Rill {
    fn default() -> Self {
        Self::new()
    }
}

/// Split off a trailing expression statement so its value can be returned
pub(crate) fn split_trailing_expression(program: &Program) -> (&[Stmt], Option<&crate::ast::Expr>) {
    match program.statements.split_last() {
        Some((Stmt::Expression(last), body)) => (body, Some(&last.expr)),
        _ => (&program.statements, None),
    }
}
