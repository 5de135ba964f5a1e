//! Statement execution

use super::{ControlFlow, Interpreter};
use crate::ast::*;
use crate::environment::Environment;
use crate::object::{Class, Function};
use crate::value::{RuntimeError, Value};
use std::collections::HashMap;
use std::rc::Rc;

impl Interpreter {
    /// Execute one statement, returning how control leaves it
    pub(crate) fn execute(&mut self, stmt: &Stmt) -> Result<ControlFlow, RuntimeError> {
        match stmt {
            Stmt::Expression(s) => {
                self.evaluate(&s.expr)?;
                Ok(ControlFlow::Normal)
            }
            Stmt::Print(s) => {
                let value = self.evaluate(&s.expr)?;
                let text = value.to_string();
                self.write_line(&text);
                Ok(ControlFlow::Normal)
            }
            Stmt::Var(s) => {
                let value = match &s.initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Value::Nil,
                };
                self.environment
                    .borrow_mut()
                    .define(s.name.name.clone(), value);
                Ok(ControlFlow::Normal)
            }
            Stmt::Block(s) => {
                let env = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(&s.statements, env)
            }
            Stmt::If(s) => {
                if self.evaluate(&s.condition)?.is_truthy() {
                    self.execute(&s.then_branch)
                } else if let Some(else_branch) = &s.else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(ControlFlow::Normal)
                }
            }
            Stmt::While(s) => self.execute_while(s),
            Stmt::Break(_) => Ok(ControlFlow::Break),
            Stmt::Continue(_) => Ok(ControlFlow::Continue),
            Stmt::Return(s) => {
                let value = match &s.value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Ok(ControlFlow::Return(value))
            }
            Stmt::Function(s) => {
                let function = Function::new(
                    Rc::clone(&s.def),
                    Rc::clone(&self.environment),
                    false,
                );
                // Defined in the same scope the closure captured, so the
                // function can call itself.
                self.environment
                    .borrow_mut()
                    .define(s.name.name.clone(), Value::Function(Rc::new(function)));
                Ok(ControlFlow::Normal)
            }
            Stmt::Class(s) => {
                self.execute_class(s)?;
                Ok(ControlFlow::Normal)
            }
        }
    }

    fn execute_while(&mut self, stmt: &WhileStmt) -> Result<ControlFlow, RuntimeError> {
        // The condition is re-evaluated before every iteration, including
        // after a `continue`.
        while self.evaluate(&stmt.condition)?.is_truthy() {
            match self.execute(&stmt.body)? {
                ControlFlow::Normal | ControlFlow::Continue => {}
                ControlFlow::Break => break,
                flow @ ControlFlow::Return(_) => return Ok(flow),
            }
        }
        Ok(ControlFlow::Normal)
    }

    fn execute_class(&mut self, decl: &ClassDecl) -> Result<(), RuntimeError> {
        let superclass = match &decl.superclass {
            Some(expr) => {
                let value = self.look_up_variable(&expr.name, expr.id)?;
                match value {
                    Value::Class(class) => Some(class),
                    other => {
                        return Err(RuntimeError::SuperclassNotClass {
                            type_name: other.type_name(),
                            span: expr.name.span,
                        })
                    }
                }
            }
            None => None,
        };

        // Provisional binding so methods resolving the class name by depth
        // land on the right slot; assigned the finished class below.
        self.environment
            .borrow_mut()
            .define(decl.name.name.clone(), Value::Nil);

        // Methods close over a scope with `super` bound when there is a
        // superclass; statics close over the declaration scope directly.
        let method_env = match &superclass {
            Some(superclass) => {
                let env = Environment::with_enclosing(Rc::clone(&self.environment));
                env.borrow_mut()
                    .define("super", Value::Class(Rc::clone(superclass)));
                env
            }
            None => Rc::clone(&self.environment),
        };

        let mut methods = HashMap::new();
        for method in &decl.methods {
            let is_initializer = method.name.name == "init";
            methods.insert(
                method.name.name.clone(),
                Rc::new(Function::new(
                    Rc::clone(&method.def),
                    Rc::clone(&method_env),
                    is_initializer,
                )),
            );
        }

        let mut statics = HashMap::new();
        for method in &decl.statics {
            statics.insert(
                method.name.name.clone(),
                Rc::new(Function::new(
                    Rc::clone(&method.def),
                    Rc::clone(&self.environment),
                    false,
                )),
            );
        }

        let class = Value::Class(Rc::new(Class {
            name: decl.name.name.clone(),
            superclass,
            methods,
            statics,
        }));
        let assigned = self.environment.borrow_mut().assign(&decl.name.name, class);
        debug_assert!(assigned, "class placeholder binding vanished");
        Ok(())
    }
}
