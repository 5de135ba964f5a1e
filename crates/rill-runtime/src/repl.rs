//! REPL core logic (UI-agnostic)

use crate::ast::NodeId;
use crate::diagnostic::{has_errors, Diagnostic};
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::runtime::split_trailing_expression;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// REPL result type
pub struct ReplResult {
    /// The value produced by evaluation (None if statement or error)
    pub value: Option<Value>,
    /// Diagnostics from all phases; warnings can accompany a value
    pub diagnostics: Vec<Diagnostic>,
    /// Standard output captured during execution
    pub stdout: String,
}

/// REPL core state
///
/// Maintains persistent state across multiple eval calls:
/// - Variable, function, and class declarations persist
/// - Errors do not reset state
pub struct ReplCore {
    /// Interpreter state (globals, resolved depths)
    interpreter: Interpreter,
    /// Buffer the interpreter's `print` output lands in
    capture: Rc<RefCell<String>>,
    /// First node id for the next line's parse
    next_node_id: NodeId,
}

impl ReplCore {
    /// Create a new REPL core
    pub fn new() -> Self {
        let capture = Rc::new(RefCell::new(String::new()));
        Self {
            interpreter: Interpreter::with_capture(Rc::clone(&capture)),
            capture,
            next_node_id: 0,
        }
    }

    /// Evaluate a line of input
    ///
    /// Runs the full pipeline: lex -> parse -> resolve -> eval.
    /// State persists across calls - declarations remain defined.
    pub fn eval_line(&mut self, input: &str) -> ReplResult {
        // A bare expression gets its semicolon appended
        let input = input.trim();
        let source = if !input.is_empty() && !input.ends_with(';') && !input.ends_with('}') {
            format!("{};", input)
        } else {
            input.to_string()
        };

        let (tokens, lex_diags) = Lexer::new(&source).tokenize();
        if !lex_diags.is_empty() {
            return self.failure(lex_diags);
        }

        let mut parser = Parser::with_node_base(tokens, self.next_node_id);
        let (program, parse_diags) = parser.parse();
        self.next_node_id = parser.next_node_id();
        if !parse_diags.is_empty() {
            return self.failure(parse_diags);
        }

        let (locals, mut diagnostics) = Resolver::new().resolve(&program);
        if has_errors(&diagnostics) {
            return self.failure(diagnostics);
        }
        self.interpreter.add_resolutions(locals);

        let (body, trailing) = split_trailing_expression(&program);
        for stmt in body {
            if let Err(error) = self.interpreter.execute(stmt) {
                diagnostics.push(error.into());
                return self.failure(diagnostics);
            }
        }
        let value = match trailing {
            Some(expr) => match self.interpreter.evaluate(expr) {
                Ok(value) => Some(value),
                Err(error) => {
                    diagnostics.push(error.into());
                    return self.failure(diagnostics);
                }
            },
            None => None,
        };

        ReplResult {
            value,
            diagnostics,
            stdout: self.take_stdout(),
        }
    }

    /// Reset REPL state
    ///
    /// Clears all variables, functions, and classes
    pub fn reset(&mut self) {
        self.capture = Rc::new(RefCell::new(String::new()));
        self.interpreter = Interpreter::with_capture(Rc::clone(&self.capture));
        self.next_node_id = 0;
    }

    fn failure(&mut self, diagnostics: Vec<Diagnostic>) -> ReplResult {
        ReplResult {
            value: None,
            diagnostics,
            // output printed before the failure still belongs to the caller
            stdout: self.take_stdout(),
        }
    }

    fn take_stdout(&mut self) -> String {
        std::mem::take(&mut *self.capture.borrow_mut())
    }
}

impl Default for ReplCore {
    fn default() -> Self {
        Self::new()
    }
}
