//! Lexical environments
//!
//! An environment is one scope's name-to-value table plus a link to its
//! enclosing scope. Environments are shared (`Rc<RefCell>`): a closure holds
//! its declaration environment alive after the block that created it exits.
//!
//! Resolved references use `get_at`/`assign_at`, which hop an exact number
//! of links without searching by name; unresolved (global) references fall
//! back to the name-searching `get`/`assign`.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to an environment
pub type Env = Rc<RefCell<Environment>>;

/// One scope's variable bindings
#[derive(Debug)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Env>,
}

impl Environment {
    /// Create a root (global) environment
    pub fn new() -> Env {
        Rc::new(RefCell::new(Self {
            values: HashMap::new(),
            enclosing: None,
        }))
    }

    /// Create an environment nested inside `enclosing`
    pub fn with_enclosing(enclosing: Env) -> Env {
        Rc::new(RefCell::new(Self {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }))
    }

    /// Bind a name in this scope, overwriting any existing binding here
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Look up a name here or in any enclosing scope
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            return Some(value.clone());
        }
        self.enclosing.as_ref().and_then(|env| env.borrow().get(name))
    }

    /// Assign to an existing binding here or in the nearest enclosing scope
    /// that has one. Returns false if no scope binds the name.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            return true;
        }
        match &self.enclosing {
            Some(env) => env.borrow_mut().assign(name, value),
            None => false,
        }
    }

    /// The environment exactly `depth` links up the chain.
    ///
    /// The resolver guarantees the chain is at least that deep for every
    /// resolved reference; a short chain here is an interpreter bug.
    pub fn ancestor(env: &Env, depth: usize) -> Env {
        let mut current = Rc::clone(env);
        for _ in 0..depth {
            let next = current
                .borrow()
                .enclosing
                .as_ref()
                .map(Rc::clone)
                .unwrap_or_else(|| {
                    unreachable!("resolver produced a depth deeper than the environment chain")
                });
            current = next;
        }
        current
    }

    /// Read a name from the environment exactly `depth` hops up
    pub fn get_at(env: &Env, depth: usize, name: &str) -> Option<Value> {
        let target = Self::ancestor(env, depth);
        let value = target.borrow().values.get(name).cloned();
        value
    }

    /// Write a name in the environment exactly `depth` hops up
    pub fn assign_at(env: &Env, depth: usize, name: &str, value: Value) -> bool {
        let target = Self::ancestor(env, depth);
        let mut target = target.borrow_mut();
        match target.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_get() {
        let env = Environment::new();
        env.borrow_mut().define("x", Value::Number(1.0));
        assert_eq!(env.borrow().get("x"), Some(Value::Number(1.0)));
        assert_eq!(env.borrow().get("y"), None);
    }

    #[test]
    fn test_get_searches_enclosing_chain() {
        let global = Environment::new();
        global.borrow_mut().define("x", Value::Number(1.0));
        let inner = Environment::with_enclosing(Rc::clone(&global));
        assert_eq!(inner.borrow().get("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_shadowing_reads_nearest_binding() {
        let global = Environment::new();
        global.borrow_mut().define("x", Value::Number(1.0));
        let inner = Environment::with_enclosing(Rc::clone(&global));
        inner.borrow_mut().define("x", Value::Number(2.0));
        assert_eq!(inner.borrow().get("x"), Some(Value::Number(2.0)));
        assert_eq!(global.borrow().get("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_assign_updates_nearest_binding() {
        let global = Environment::new();
        global.borrow_mut().define("x", Value::Number(1.0));
        let inner = Environment::with_enclosing(Rc::clone(&global));
        assert!(inner.borrow_mut().assign("x", Value::Number(5.0)));
        assert_eq!(global.borrow().get("x"), Some(Value::Number(5.0)));
    }

    #[test]
    fn test_assign_to_unbound_name_fails() {
        let env = Environment::new();
        assert!(!env.borrow_mut().assign("nope", Value::Nil));
    }

    #[test]
    fn test_get_at_hops_exact_depth() {
        let global = Environment::new();
        global.borrow_mut().define("x", Value::Number(0.0));
        let mid = Environment::with_enclosing(Rc::clone(&global));
        mid.borrow_mut().define("x", Value::Number(1.0));
        let inner = Environment::with_enclosing(Rc::clone(&mid));

        assert_eq!(
            Environment::get_at(&inner, 1, "x"),
            Some(Value::Number(1.0))
        );
        assert_eq!(
            Environment::get_at(&inner, 2, "x"),
            Some(Value::Number(0.0))
        );
    }

    #[test]
    fn test_assign_at_writes_exact_depth() {
        let global = Environment::new();
        global.borrow_mut().define("x", Value::Number(0.0));
        let mid = Environment::with_enclosing(Rc::clone(&global));
        mid.borrow_mut().define("x", Value::Number(1.0));
        let inner = Environment::with_enclosing(Rc::clone(&mid));

        assert!(Environment::assign_at(&inner, 2, "x", Value::Number(9.0)));
        assert_eq!(global.borrow().get("x"), Some(Value::Number(9.0)));
        // the shadowing binding is untouched
        assert_eq!(mid.borrow().get("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_resolved_and_linear_lookup_agree() {
        // without intervening shadowing, an exact-depth read and a name
        // search must land on the same binding
        let global = Environment::new();
        global.borrow_mut().define("x", Value::Number(3.0));
        let mid = Environment::with_enclosing(Rc::clone(&global));
        let inner = Environment::with_enclosing(Rc::clone(&mid));

        assert_eq!(
            Environment::get_at(&inner, 2, "x"),
            inner.borrow().get("x")
        );
    }

    #[test]
    fn test_closure_keeps_scope_alive() {
        let captured = {
            let global = Environment::new();
            let inner = Environment::with_enclosing(Rc::clone(&global));
            inner.borrow_mut().define("count", Value::Number(7.0));
            inner
        };
        // the block's handles are gone; the captured env still works
        assert_eq!(captured.borrow().get("count"), Some(Value::Number(7.0)));
    }
}
