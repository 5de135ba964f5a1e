//! Tree-walking interpreter
//!
//! Executes a resolved program by walking the AST. Statement execution
//! returns `ControlFlow` so `break`, `continue`, and `return` unwind as
//! ordinary values instead of errors; runtime errors terminate the run and
//! surface as diagnostics.

mod expr;
mod stmt;

use crate::ast::{Expr, Identifier, NodeId, Program};
use crate::diagnostic::Diagnostic;
use crate::environment::{Env, Environment};
use crate::object::{Function, Instance, NativeFunction};
use crate::resolver::Resolutions;
use crate::span::Span;
use crate::value::{RuntimeError, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Maximum call nesting before the run is aborted with a stack overflow
pub const FRAME_LIMIT: usize = 255;

/// Signal returned by every statement executor.
///
/// `Break`, `Continue`, and `Return` propagate upward until the construct
/// that consumes them (a loop, or a function call); they are never errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

/// Where `print` output goes
enum Output {
    Stdout,
    Capture(Rc<RefCell<String>>),
}

/// Interpreter state shared across runs (the REPL reuses one instance)
pub struct Interpreter {
    globals: Env,
    environment: Env,
    /// Resolved reference depths, merged across runs
    locals: Resolutions,
    frame_depth: usize,
    output: Output,
}

impl Interpreter {
    /// Create an interpreter printing to stdout, with natives installed
    pub fn new() -> Self {
        Self::with_output(Output::Stdout)
    }

    /// Create an interpreter that appends `print` output to a buffer
    pub fn with_capture(buffer: Rc<RefCell<String>>) -> Self {
        Self::with_output(Output::Capture(buffer))
    }

    fn with_output(output: Output) -> Self {
        let globals = Environment::new();
        globals.borrow_mut().define(
            "clock",
            Value::Native(Rc::new(NativeFunction::new("clock", 0, native_clock))),
        );
        let environment = Rc::clone(&globals);
        Self {
            globals,
            environment,
            locals: Resolutions::new(),
            frame_depth: 0,
            output,
        }
    }

    /// Merge resolver output into the depth map.
    ///
    /// Node ids are unique across a session (the parser hands out fresh
    /// ids per run), so extending never clobbers live entries.
    pub fn add_resolutions(&mut self, locals: Resolutions) {
        self.locals.extend(locals);
    }

    /// Execute a program. A runtime error stops execution and is returned
    /// as a diagnostic; an empty vec means the program ran to completion.
    pub fn interpret(&mut self, program: &Program) -> Vec<Diagnostic> {
        for stmt in &program.statements {
            // The resolver rejects top-level break/continue/return, so any
            // flow other than Normal cannot reach here.
            if let Err(error) = self.execute(stmt) {
                return vec![error.into()];
            }
        }
        Vec::new()
    }

    /// Evaluate one expression and render its canonical string form. A
    /// runtime error yields no string and one diagnostic instead.
    pub fn interpret_expr(&mut self, expr: &Expr) -> (Option<String>, Vec<Diagnostic>) {
        match self.evaluate(expr) {
            Ok(value) => (Some(value.to_string()), Vec::new()),
            Err(error) => (None, vec![error.into()]),
        }
    }

    // === Shared machinery used by both expression and statement eval ===

    /// Run statements in `env`, restoring the previous environment on
    /// every exit path
    pub(crate) fn execute_block(
        &mut self,
        statements: &[crate::ast::Stmt],
        env: Env,
    ) -> Result<ControlFlow, RuntimeError> {
        let previous = std::mem::replace(&mut self.environment, env);
        let mut result = Ok(ControlFlow::Normal);
        for stmt in statements {
            match self.execute(stmt) {
                Ok(ControlFlow::Normal) => continue,
                other => {
                    result = other;
                    break;
                }
            }
        }
        self.environment = previous;
        result
    }

    /// Read a variable through its resolved depth, or from globals when
    /// the resolver left it unresolved
    pub(crate) fn look_up_variable(
        &self,
        name: &Identifier,
        id: NodeId,
    ) -> Result<Value, RuntimeError> {
        let value = match self.locals.get(&id) {
            Some(depth) => Environment::get_at(&self.environment, *depth, &name.name),
            None => self.globals.borrow().get(&name.name),
        };
        value.ok_or_else(|| RuntimeError::UndefinedVariable {
            name: name.name.clone(),
            span: name.span,
        })
    }

    /// Call any callable value with already-evaluated arguments
    pub(crate) fn call_value(
        &mut self,
        callee: Value,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(function) => {
                check_arity(function.arity(), args.len(), span)?;
                self.call_function(&function, args, span)
            }
            Value::Class(class) => {
                check_arity(class.arity(), args.len(), span)?;
                let instance = Instance::new(Rc::clone(&class));
                if let Some(init) = class.find_method("init") {
                    let bound = init.bind(Value::Instance(Rc::clone(&instance)));
                    self.call_function(&bound, args, span)?;
                }
                Ok(Value::Instance(instance))
            }
            Value::Native(native) => {
                check_arity(native.arity, args.len(), span)?;
                (native.func)(&args)
            }
            other => Err(RuntimeError::NotCallable {
                type_name: other.type_name(),
                span,
            }),
        }
    }

    /// Invoke a user function body. Arity has already been checked.
    pub(crate) fn call_function(
        &mut self,
        function: &Function,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        if self.frame_depth >= FRAME_LIMIT {
            return Err(RuntimeError::StackOverflow {
                limit: FRAME_LIMIT,
                span,
            });
        }
        self.frame_depth += 1;

        let env = Environment::with_enclosing(Rc::clone(&function.closure));
        {
            let mut env = env.borrow_mut();
            for (param, arg) in function.def.params.iter().zip(args) {
                env.define(param.name.clone(), arg);
            }
        }
        let result = self.execute_block(&function.def.body, env);
        self.frame_depth -= 1;

        let flow = result?;
        if function.is_initializer {
            // init always yields its instance, even on bare `return`
            return Ok(
                Environment::get_at(&function.closure, 0, "this").unwrap_or(Value::Nil)
            );
        }
        match flow {
            ControlFlow::Return(value) => Ok(value),
            _ => Ok(Value::Nil),
        }
    }

    /// Emit one line of `print` output
    pub(crate) fn write_line(&mut self, text: &str) {
        match &self.output {
            Output::Stdout => println!("{}", text),
            Output::Capture(buffer) => {
                let mut buffer = buffer.borrow_mut();
                buffer.push_str(text);
                buffer.push('\n');
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn check_arity(expected: usize, got: usize, span: Span) -> Result<(), RuntimeError> {
    if expected != got {
        return Err(RuntimeError::ArityMismatch {
            expected,
            got,
            span,
        });
    }
    Ok(())
}

/// `clock()`: seconds since the Unix epoch as a number
fn native_clock(_args: &[Value]) -> Result<Value, RuntimeError> {
    let elapsed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    Ok(Value::Number(elapsed.as_secs_f64()))
}
