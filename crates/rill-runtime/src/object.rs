//! Runtime objects: functions, classes, instances, natives
//!
//! These are the reference-typed values. A `Function` pairs a shared AST
//! body with the environment it closed over; a `Class` owns its method
//! tables and superclass link; an `Instance` is a mutable field table tied
//! to its class.

use crate::ast::FunctionDef;
use crate::environment::{Env, Environment};
use crate::value::{RuntimeError, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A user-defined function or method
pub struct Function {
    /// Shared body; cloning a Function never clones the AST
    pub def: Rc<FunctionDef>,
    /// Environment the function was declared in
    pub closure: Env,
    /// An `init` method always returns its instance, even on bare `return`
    pub is_initializer: bool,
}

impl Function {
    pub fn new(def: Rc<FunctionDef>, closure: Env, is_initializer: bool) -> Self {
        Self {
            def,
            closure,
            is_initializer,
        }
    }

    /// Declared name, if any
    pub fn name(&self) -> Option<&str> {
        self.def.name.as_ref().map(|id| id.name.as_str())
    }

    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        self.def.params.len()
    }

    /// True for getter methods (declared without a parameter list)
    pub fn is_getter(&self) -> bool {
        self.def.is_getter
    }

    /// Produce a bound copy whose closure has `this` defined.
    ///
    /// Binding wraps the closure in a one-entry environment, so the resolved
    /// depth of `this` inside the body lines up with the runtime chain.
    pub fn bind(&self, instance: Value) -> Rc<Function> {
        let env = Environment::with_enclosing(Rc::clone(&self.closure));
        env.borrow_mut().define("this", instance);
        Rc::new(Function::new(
            Rc::clone(&self.def),
            env,
            self.is_initializer,
        ))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // closure omitted: environments can reference this function back
        f.debug_struct("Function")
            .field("name", &self.name())
            .field("arity", &self.arity())
            .field("is_initializer", &self.is_initializer)
            .finish()
    }
}

/// A class object. Also callable: calling a class constructs an instance
/// and runs `init` if the class has one.
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<Class>>,
    /// Instance methods, including getters and `init`
    pub methods: HashMap<String, Rc<Function>>,
    /// Static methods, accessed on the class value itself
    pub statics: HashMap<String, Rc<Function>>,
}

impl Class {
    /// Look up an instance method here or up the superclass chain
    pub fn find_method(&self, name: &str) -> Option<Rc<Function>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }
        self.superclass
            .as_ref()
            .and_then(|superclass| superclass.find_method(name))
    }

    /// Look up a static method here or up the superclass chain
    pub fn find_static(&self, name: &str) -> Option<Rc<Function>> {
        if let Some(method) = self.statics.get(name) {
            return Some(Rc::clone(method));
        }
        self.superclass
            .as_ref()
            .and_then(|superclass| superclass.find_static(name))
    }

    /// Constructor arity: the `init` method's, or zero without one
    pub fn arity(&self) -> usize {
        self.find_method("init").map(|init| init.arity()).unwrap_or(0)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field(
                "superclass",
                &self.superclass.as_ref().map(|s| s.name.as_str()),
            )
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("statics", &self.statics.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A class instance: a field table plus the class for method lookup
#[derive(Debug)]
pub struct Instance {
    pub class: Rc<Class>,
    pub fields: HashMap<String, Value>,
}

impl Instance {
    /// Create a fresh instance with no fields
    pub fn new(class: Rc<Class>) -> Rc<RefCell<Instance>> {
        Rc::new(RefCell::new(Self {
            class,
            fields: HashMap::new(),
        }))
    }
}

/// Signature for built-in functions
pub type NativeFn = fn(&[Value]) -> Result<Value, RuntimeError>;

/// A built-in function implemented in Rust
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

impl NativeFunction {
    pub fn new(name: &'static str, arity: usize, func: NativeFn) -> Self {
        Self { name, arity, func }
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}
