//! Rill language runtime
//!
//! A tree-walking interpreter for Rill: a small, dynamically typed,
//! lexically scoped language with first-class functions, closures, and
//! class-based objects.
//!
//! The pipeline is lex -> parse -> resolve -> interpret. The resolver
//! computes a static depth for every local variable reference; the
//! interpreter uses those depths to hop the environment chain directly, so
//! closures capture bindings, not values.
//!
//! # Examples
//!
//! ```
//! use rill_runtime::{Rill, Value};
//!
//! let runtime = Rill::new();
//! runtime.eval("fun square(n) { return n * n; }").unwrap();
//! assert_eq!(runtime.eval("square(7)").unwrap(), Value::Number(49.0));
//! ```

/// Runtime crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod ast;
pub mod diagnostic;
pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod resolver;
pub mod runtime;
pub mod span;
pub mod token;
pub mod value;

pub use diagnostic::{has_errors, Diagnostic, DiagnosticLevel};
pub use interpreter::{ControlFlow, Interpreter, FRAME_LIMIT};
pub use repl::{ReplCore, ReplResult};
pub use resolver::{Resolutions, Resolver};
pub use runtime::{Rill, RuntimeResult};
pub use span::Span;
pub use value::{RuntimeError, Value};
