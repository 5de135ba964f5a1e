//! Expression evaluation

use super::Interpreter;
use crate::ast::*;
use crate::environment::Environment;
use crate::object::Function;
use crate::value::{RuntimeError, Value};
use std::rc::Rc;

impl Interpreter {
    /// Evaluate an expression to a value
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(e) => Ok(match &e.value {
                Literal::Number(n) => Value::Number(*n),
                Literal::Str(s) => Value::string(s.clone()),
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Nil => Value::Nil,
            }),
            Expr::Grouping(e) => self.evaluate(&e.expr),
            Expr::Unary(e) => self.evaluate_unary(e),
            Expr::Binary(e) => self.evaluate_binary(e),
            Expr::Logical(e) => self.evaluate_logical(e),
            Expr::Conditional(e) => self.evaluate_conditional(e),
            Expr::Variable(e) => self.look_up_variable(&e.name, e.id),
            Expr::Assign(e) => self.evaluate_assign(e),
            Expr::Call(e) => self.evaluate_call(e),
            Expr::Get(e) => self.evaluate_get(e),
            Expr::Set(e) => self.evaluate_set(e),
            Expr::This(e) => {
                self.look_up_variable(
                    &Identifier {
                        name: "this".to_string(),
                        span: e.span,
                    },
                    e.id,
                )
            }
            Expr::Super(e) => self.evaluate_super(e),
            Expr::Function(e) => Ok(Value::Function(Rc::new(Function::new(
                Rc::clone(&e.def),
                Rc::clone(&self.environment),
                false,
            )))),
        }
    }

    fn evaluate_unary(&mut self, expr: &UnaryExpr) -> Result<Value, RuntimeError> {
        let operand = self.evaluate(&expr.operand)?;
        match expr.op {
            UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
            UnaryOp::Negate => match operand {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(RuntimeError::TypeError {
                    msg: format!("Operand of '-' must be a number, got {}", other.type_name()),
                    span: expr.span,
                }),
            },
        }
    }

    fn evaluate_binary(&mut self, expr: &BinaryExpr) -> Result<Value, RuntimeError> {
        let left = self.evaluate(&expr.left)?;
        let right = self.evaluate(&expr.right)?;

        match expr.op {
            BinaryOp::Add => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                // Either side a string and the other string-or-number:
                // concatenate the canonical stringifications.
                (Value::Str(_), Value::Str(_) | Value::Number(_))
                | (Value::Number(_), Value::Str(_)) => {
                    Ok(Value::string(format!("{}{}", left, right)))
                }
                _ => Err(RuntimeError::TypeError {
                    msg: format!(
                        "Cannot add {} and {}",
                        left.type_name(),
                        right.type_name()
                    ),
                    span: expr.span,
                }),
            },
            BinaryOp::Sub => {
                let (a, b) = self.number_operands(&left, &right, "-", expr.span)?;
                Ok(Value::Number(a - b))
            }
            BinaryOp::Mul => {
                let (a, b) = self.number_operands(&left, &right, "*", expr.span)?;
                Ok(Value::Number(a * b))
            }
            BinaryOp::Div => {
                // IEEE 754 semantics: division by zero yields inf/NaN
                let (a, b) = self.number_operands(&left, &right, "/", expr.span)?;
                Ok(Value::Number(a / b))
            }
            BinaryOp::Eq => Ok(Value::Bool(left == right)),
            BinaryOp::Ne => Ok(Value::Bool(left != right)),
            BinaryOp::Lt => {
                let (a, b) = self.number_operands(&left, &right, "<", expr.span)?;
                Ok(Value::Bool(a < b))
            }
            BinaryOp::Le => {
                let (a, b) = self.number_operands(&left, &right, "<=", expr.span)?;
                Ok(Value::Bool(a <= b))
            }
            BinaryOp::Gt => {
                let (a, b) = self.number_operands(&left, &right, ">", expr.span)?;
                Ok(Value::Bool(a > b))
            }
            BinaryOp::Ge => {
                let (a, b) = self.number_operands(&left, &right, ">=", expr.span)?;
                Ok(Value::Bool(a >= b))
            }
        }
    }

    fn number_operands(
        &self,
        left: &Value,
        right: &Value,
        op: &str,
        span: crate::span::Span,
    ) -> Result<(f64, f64), RuntimeError> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
            _ => Err(RuntimeError::TypeError {
                msg: format!(
                    "Operands of '{}' must be numbers, got {} and {}",
                    op,
                    left.type_name(),
                    right.type_name()
                ),
                span,
            }),
        }
    }

    fn evaluate_logical(&mut self, expr: &LogicalExpr) -> Result<Value, RuntimeError> {
        let left = self.evaluate(&expr.left)?;
        // Short-circuit: the result is one of the operand values, not a bool
        match expr.op {
            LogicalOp::Or if left.is_truthy() => Ok(left),
            LogicalOp::And if !left.is_truthy() => Ok(left),
            _ => self.evaluate(&expr.right),
        }
    }

    fn evaluate_conditional(&mut self, expr: &ConditionalExpr) -> Result<Value, RuntimeError> {
        let condition = self.evaluate(&expr.condition)?;
        // Strict: `?:` takes a real bool, unlike if/while truthiness
        let Value::Bool(flag) = condition else {
            return Err(RuntimeError::TypeError {
                msg: format!(
                    "Condition of '?:' must be a bool, got {}",
                    condition.type_name()
                ),
                span: expr.condition.span(),
            });
        };
        if flag {
            self.evaluate(&expr.then_branch)
        } else {
            self.evaluate(&expr.else_branch)
        }
    }

    fn evaluate_assign(&mut self, expr: &AssignExpr) -> Result<Value, RuntimeError> {
        let value = self.evaluate(&expr.value)?;
        let assigned = match self.locals.get(&expr.id) {
            Some(depth) => {
                Environment::assign_at(&self.environment, *depth, &expr.name.name, value.clone())
            }
            None => self
                .globals
                .borrow_mut()
                .assign(&expr.name.name, value.clone()),
        };
        if !assigned {
            return Err(RuntimeError::UndefinedVariable {
                name: expr.name.name.clone(),
                span: expr.name.span,
            });
        }
        Ok(value)
    }

    fn evaluate_call(&mut self, expr: &CallExpr) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(&expr.callee)?;
        let mut args = Vec::with_capacity(expr.args.len());
        for arg in &expr.args {
            args.push(self.evaluate(arg)?);
        }
        self.call_value(callee, args, expr.span)
    }

    fn evaluate_get(&mut self, expr: &GetExpr) -> Result<Value, RuntimeError> {
        let object = self.evaluate(&expr.object)?;
        match object {
            Value::Instance(instance) => {
                // Fields shadow methods
                let field = instance.borrow().fields.get(&expr.name.name).cloned();
                if let Some(value) = field {
                    return Ok(value);
                }
                let method = instance.borrow().class.find_method(&expr.name.name);
                if let Some(method) = method {
                    let bound = method.bind(Value::Instance(Rc::clone(&instance)));
                    if bound.is_getter() {
                        // Getters run on access
                        return self.call_function(&bound, Vec::new(), expr.name.span);
                    }
                    return Ok(Value::Function(bound));
                }
                Err(RuntimeError::UndefinedProperty {
                    name: expr.name.name.clone(),
                    span: expr.name.span,
                })
            }
            Value::Class(class) => class
                .find_static(&expr.name.name)
                .map(Value::Function)
                .ok_or_else(|| RuntimeError::UndefinedProperty {
                    name: expr.name.name.clone(),
                    span: expr.name.span,
                }),
            other => Err(RuntimeError::NotAnInstance {
                type_name: other.type_name(),
                span: expr.name.span,
            }),
        }
    }

    fn evaluate_set(&mut self, expr: &SetExpr) -> Result<Value, RuntimeError> {
        let object = self.evaluate(&expr.object)?;
        let Value::Instance(instance) = object else {
            return Err(RuntimeError::NotAnInstance {
                type_name: object.type_name(),
                span: expr.name.span,
            });
        };
        let value = self.evaluate(&expr.value)?;
        instance
            .borrow_mut()
            .fields
            .insert(expr.name.name.clone(), value.clone());
        Ok(value)
    }

    fn evaluate_super(&mut self, expr: &SuperExpr) -> Result<Value, RuntimeError> {
        let depth = *self
            .locals
            .get(&expr.id)
            .expect("resolver accepted 'super' without recording a depth");
        let superclass = Environment::get_at(&self.environment, depth, "super");
        // `this` lives one scope inside the `super` scope
        let this = Environment::get_at(&self.environment, depth - 1, "this");

        let (Some(Value::Class(superclass)), Some(this)) = (superclass, this) else {
            return Err(RuntimeError::UndefinedVariable {
                name: "super".to_string(),
                span: expr.span,
            });
        };

        let method = superclass.find_method(&expr.method.name).ok_or_else(|| {
            RuntimeError::UndefinedProperty {
                name: expr.method.name.clone(),
                span: expr.method.span,
            }
        })?;
        Ok(Value::Function(method.bind(this)))
    }
}
