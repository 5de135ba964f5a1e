//! Runtime value representation
//!
//! Shared value representation for the interpreter and the embedding API.
//! - Numbers, Bools, Nil: immediate values
//! - Strings: heap-allocated, reference-counted (Rc<String>), immutable
//! - Functions, classes, instances: reference-counted runtime objects; two
//!   references are equal only when they point at the same object

use crate::object::{Class, Function, Instance, NativeFunction};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Runtime value type
#[derive(Clone)]
pub enum Value {
    /// Numeric value (IEEE 754 double-precision)
    Number(f64),
    /// String value (reference-counted, immutable)
    Str(Rc<String>),
    /// Boolean value
    Bool(bool),
    /// Nil value
    Nil,
    /// User function or method (closure over its declaration environment)
    Function(Rc<Function>),
    /// Class object; also callable (constructs an instance)
    Class(Rc<Class>),
    /// Class instance (shared, mutable field table)
    Instance(Rc<RefCell<Instance>>),
    /// Built-in function implemented in Rust
    Native(Rc<NativeFunction>),
}

impl Value {
    /// Create a new string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Rc::new(s.into()))
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
            Value::Function(_) => "function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
            Value::Native(_) => "function",
        }
    }

    /// Check if this value is truthy.
    ///
    /// Only `nil` and `false` are falsy; every other value, including `0`
    /// and the empty string, is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }
}

impl PartialEq for Value {
    /// Equality contract:
    ///
    /// - Number, Str, Bool, Nil: content equality, no cross-type coercion
    ///   (`0 == "0"` is false, `nil == false` is false)
    /// - Function, Class, Instance, Native: identity — equal only when both
    ///   sides reference the same runtime object
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            // Different variants are never equal
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                // Format number nicely (no trailing .0 for whole numbers)
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Str(s) => write!(f, "{}", s.as_ref()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "nil"),
            Value::Function(func) => match func.name() {
                Some(name) => write!(f, "<fn {}>", name),
                None => write!(f, "<fn>"),
            },
            Value::Class(class) => write!(f, "{}", class.name),
            Value::Instance(instance) => {
                write!(f, "{} instance", instance.borrow().class.name)
            }
            Value::Native(native) => write!(f, "<native fn {}>", native.name),
        }
    }
}

// Manual Debug: a Function holds its closure environment, which can hold the
// function back, so a derived Debug would recurse forever.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({})", n),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Nil => write!(f, "Nil"),
            Value::Function(func) => {
                write!(f, "Function({})", func.name().unwrap_or("<anonymous>"))
            }
            Value::Class(class) => write!(f, "Class({})", class.name),
            Value::Instance(instance) => {
                write!(f, "Instance({})", instance.borrow().class.name)
            }
            Value::Native(native) => write!(f, "Native({})", native.name),
        }
    }
}

/// Runtime error type with source span information
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    /// Operand type error
    #[error("Type error: {msg}")]
    TypeError {
        msg: String,
        span: crate::span::Span,
    },
    /// Undefined variable
    #[error("Undefined variable '{name}'")]
    UndefinedVariable {
        name: String,
        span: crate::span::Span,
    },
    /// Undefined property on an instance or class
    #[error("Undefined property '{name}'")]
    UndefinedProperty {
        name: String,
        span: crate::span::Span,
    },
    /// Call target is not callable
    #[error("Can only call functions and classes, got {type_name}")]
    NotCallable {
        type_name: &'static str,
        span: crate::span::Span,
    },
    /// Wrong number of call arguments
    #[error("Expected {expected} arguments but got {got}")]
    ArityMismatch {
        expected: usize,
        got: usize,
        span: crate::span::Span,
    },
    /// Superclass expression did not evaluate to a class
    #[error("Superclass must be a class, got {type_name}")]
    SuperclassNotClass {
        type_name: &'static str,
        span: crate::span::Span,
    },
    /// Property access on a value with no properties
    #[error("Only instances have properties, got {type_name}")]
    NotAnInstance {
        type_name: &'static str,
        span: crate::span::Span,
    },
    /// Call nesting exceeded the frame limit
    #[error("Stack overflow: call depth exceeded {limit} frames")]
    StackOverflow {
        limit: usize,
        span: crate::span::Span,
    },
}

impl RuntimeError {
    /// Get the source span for this error
    pub fn span(&self) -> crate::span::Span {
        match self {
            RuntimeError::TypeError { span, .. } => *span,
            RuntimeError::UndefinedVariable { span, .. } => *span,
            RuntimeError::UndefinedProperty { span, .. } => *span,
            RuntimeError::NotCallable { span, .. } => *span,
            RuntimeError::ArityMismatch { span, .. } => *span,
            RuntimeError::SuperclassNotClass { span, .. } => *span,
            RuntimeError::NotAnInstance { span, .. } => *span,
            RuntimeError::StackOverflow { span, .. } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    #[test]
    fn test_to_string_number() {
        assert_eq!(Value::Number(42.0).to_string(), "42");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-5.0).to_string(), "-5");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "inf");
    }

    #[test]
    fn test_to_string_primitives() {
        assert_eq!(Value::string("hello").to_string(), "hello");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Nil.to_string(), "nil");
    }

    #[test]
    fn test_is_truthy() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        // everything else is truthy, including zero and empty string
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::string("").is_truthy());
    }

    #[test]
    fn test_equality_no_coercion() {
        assert_eq!(Value::Number(42.0), Value::Number(42.0));
        assert_ne!(Value::Number(0.0), Value::string("0"));
        assert_ne!(Value::Nil, Value::Bool(false));
        assert_eq!(Value::Nil, Value::Nil);
    }

    #[test]
    fn test_nan_is_not_equal_to_itself() {
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Number(1.0).type_name(), "number");
        assert_eq!(Value::string("s").type_name(), "string");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::Nil.type_name(), "nil");
    }

    #[test]
    fn test_runtime_error_messages() {
        let err = RuntimeError::UndefinedVariable {
            name: "x".to_string(),
            span: Span::dummy(),
        };
        assert_eq!(err.to_string(), "Undefined variable 'x'");

        let err = RuntimeError::ArityMismatch {
            expected: 2,
            got: 3,
            span: Span::new(1, 2, 4),
        };
        assert_eq!(err.to_string(), "Expected 2 arguments but got 3");
        assert_eq!(err.span(), Span::new(1, 2, 4));
    }
}
