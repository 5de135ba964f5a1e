//! Static resolution pass
//!
//! Walks the AST between parsing and execution, computing for every
//! variable reference how many environments up its binding lives. The
//! output maps reference `NodeId`s to depths; a reference with no entry is
//! a global. The same walk reports the static errors that must refuse
//! execution: bad `return`/`break`/`continue` placement, `this`/`super`
//! misuse, duplicate declarations, and reading a local in its own
//! initializer. All errors in a program are collected in one pass.

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::span::Span;
use std::collections::HashMap;

/// Depth map produced by resolution: reference node id -> environment hops.
/// A node id with no entry refers to a global.
pub type Resolutions = HashMap<NodeId, usize>;

/// What kind of function body is being resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    None,
    Function,
    Method,
    Initializer,
    Static,
}

/// Whether we are inside a class body, and whether it has a superclass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassKind {
    None,
    Class,
    Subclass,
}

/// Why a name exists in a scope; decides the unused-variable warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclKind {
    Var,
    Param,
    Function,
    Class,
    Hidden,
}

#[derive(Debug)]
struct Binding {
    kind: DeclKind,
    span: Span,
    defined: bool,
    used: bool,
}

/// Resolver state for one pass over a program
pub struct Resolver {
    /// Local scopes, innermost last; globals are not tracked here
    scopes: Vec<HashMap<String, Binding>>,
    /// Output: reference node id -> environment hops to its binding
    locals: Resolutions,
    diagnostics: Vec<Diagnostic>,
    current_function: FunctionKind,
    current_class: ClassKind,
    loop_depth: usize,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            scopes: Vec::new(),
            locals: HashMap::new(),
            diagnostics: Vec::new(),
            current_function: FunctionKind::None,
            current_class: ClassKind::None,
            loop_depth: 0,
        }
    }

    /// Resolve a program, returning the depth map and all diagnostics
    pub fn resolve(mut self, program: &Program) -> (Resolutions, Vec<Diagnostic>) {
        for stmt in &program.statements {
            self.resolve_stmt(stmt);
        }
        (self.locals, self.diagnostics)
    }

    // === Statements ===

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(s) => self.resolve_expr(&s.expr),
            Stmt::Print(s) => self.resolve_expr(&s.expr),
            Stmt::Var(s) => self.resolve_var_decl(s),
            Stmt::Block(s) => {
                self.begin_scope();
                for stmt in &s.statements {
                    self.resolve_stmt(stmt);
                }
                self.end_scope();
            }
            Stmt::If(s) => {
                self.resolve_expr(&s.condition);
                self.resolve_stmt(&s.then_branch);
                if let Some(else_branch) = &s.else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::While(s) => {
                self.resolve_expr(&s.condition);
                self.loop_depth += 1;
                self.resolve_stmt(&s.body);
                self.loop_depth -= 1;
            }
            Stmt::Break(span) => {
                if self.loop_depth == 0 {
                    self.diagnostics.push(Diagnostic::error_with_code(
                        "RL0305",
                        "Can't use 'break' outside of a loop",
                        *span,
                    ));
                }
            }
            Stmt::Continue(span) => {
                if self.loop_depth == 0 {
                    self.diagnostics.push(Diagnostic::error_with_code(
                        "RL0305",
                        "Can't use 'continue' outside of a loop",
                        *span,
                    ));
                }
            }
            Stmt::Return(s) => self.resolve_return(s),
            Stmt::Function(s) => {
                // Defined before resolving the body so the function can
                // recurse into itself.
                self.declare(&s.name, DeclKind::Function);
                self.define(&s.name.name);
                self.resolve_function(&s.def, FunctionKind::Function);
            }
            Stmt::Class(s) => self.resolve_class(s),
        }
    }

    fn resolve_var_decl(&mut self, decl: &VarDecl) {
        self.declare(&decl.name, DeclKind::Var);
        if let Some(initializer) = &decl.initializer {
            self.resolve_expr(initializer);
        }
        self.define(&decl.name.name);
    }

    fn resolve_return(&mut self, stmt: &ReturnStmt) {
        if self.current_function == FunctionKind::None {
            self.diagnostics.push(Diagnostic::error_with_code(
                "RL0303",
                "Can't return from top-level code",
                stmt.span,
            ));
        }
        if let Some(value) = &stmt.value {
            if self.current_function == FunctionKind::Initializer {
                self.diagnostics.push(Diagnostic::error_with_code(
                    "RL0304",
                    "Can't return a value from an initializer",
                    stmt.span,
                ));
            }
            self.resolve_expr(value);
        }
    }

    fn resolve_class(&mut self, decl: &ClassDecl) {
        let enclosing_class = self.current_class;
        self.current_class = ClassKind::Class;

        self.declare(&decl.name, DeclKind::Class);
        self.define(&decl.name.name);

        if let Some(superclass) = &decl.superclass {
            if superclass.name.name == decl.name.name {
                self.diagnostics.push(Diagnostic::error_with_code(
                    "RL0311",
                    "A class can't inherit from itself",
                    superclass.name.span,
                ));
            }
            self.current_class = ClassKind::Subclass;
            self.resolve_variable(superclass);
        }

        // Statics see the surrounding scope only: no `this`, no `super`.
        for method in &decl.statics {
            self.resolve_function(&method.def, FunctionKind::Static);
        }

        if decl.superclass.is_some() {
            self.begin_scope();
            self.declare_hidden("super");
        }

        self.begin_scope();
        self.declare_hidden("this");

        for method in &decl.methods {
            let kind = if method.name.name == "init" {
                FunctionKind::Initializer
            } else {
                FunctionKind::Method
            };
            self.resolve_function(&method.def, kind);
        }

        self.end_scope();
        if decl.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_function(&mut self, def: &FunctionDef, kind: FunctionKind) {
        let enclosing_function = self.current_function;
        // break/continue can't escape a function body into an outer loop
        let enclosing_loop_depth = std::mem::take(&mut self.loop_depth);
        self.current_function = kind;

        self.begin_scope();
        for param in &def.params {
            self.declare(param, DeclKind::Param);
            self.define(&param.name);
        }
        for stmt in &def.body {
            self.resolve_stmt(stmt);
        }
        self.end_scope();

        self.current_function = enclosing_function;
        self.loop_depth = enclosing_loop_depth;
    }

    // === Expressions ===

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Grouping(e) => self.resolve_expr(&e.expr),
            Expr::Unary(e) => self.resolve_expr(&e.operand),
            Expr::Binary(e) => {
                self.resolve_expr(&e.left);
                self.resolve_expr(&e.right);
            }
            Expr::Logical(e) => {
                self.resolve_expr(&e.left);
                self.resolve_expr(&e.right);
            }
            Expr::Conditional(e) => {
                self.resolve_expr(&e.condition);
                self.resolve_expr(&e.then_branch);
                self.resolve_expr(&e.else_branch);
            }
            Expr::Variable(e) => self.resolve_variable(e),
            Expr::Assign(e) => {
                self.resolve_expr(&e.value);
                self.resolve_local(e.id, &e.name.name);
            }
            Expr::Call(e) => {
                self.resolve_expr(&e.callee);
                for arg in &e.args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Get(e) => self.resolve_expr(&e.object),
            Expr::Set(e) => {
                self.resolve_expr(&e.value);
                self.resolve_expr(&e.object);
            }
            Expr::This(e) => self.resolve_this(e),
            Expr::Super(e) => self.resolve_super(e),
            Expr::Function(e) => self.resolve_function(&e.def, FunctionKind::Function),
        }
    }

    fn resolve_variable(&mut self, expr: &VariableExpr) {
        if let Some(scope) = self.scopes.last() {
            if let Some(binding) = scope.get(&expr.name.name) {
                if !binding.defined {
                    self.diagnostics.push(Diagnostic::error_with_code(
                        "RL0301",
                        format!(
                            "Can't read local variable '{}' in its own initializer",
                            expr.name.name
                        ),
                        expr.name.span,
                    ));
                }
            }
        }
        self.resolve_local(expr.id, &expr.name.name);
    }

    fn resolve_this(&mut self, expr: &ThisExpr) {
        if self.current_class == ClassKind::None {
            self.diagnostics.push(Diagnostic::error_with_code(
                "RL0307",
                "Can't use 'this' outside of a class",
                expr.span,
            ));
            return;
        }
        if self.current_function == FunctionKind::Static {
            self.diagnostics.push(Diagnostic::error_with_code(
                "RL0308",
                "Can't use 'this' in a static method",
                expr.span,
            ));
            return;
        }
        self.resolve_local(expr.id, "this");
    }

    fn resolve_super(&mut self, expr: &SuperExpr) {
        if self.current_class == ClassKind::None {
            self.diagnostics.push(Diagnostic::error_with_code(
                "RL0309",
                "Can't use 'super' outside of a class",
                expr.span,
            ));
            return;
        }
        if self.current_function == FunctionKind::Static {
            self.diagnostics.push(Diagnostic::error_with_code(
                "RL0309",
                "Can't use 'super' in a static method",
                expr.span,
            ));
            return;
        }
        if self.current_class != ClassKind::Subclass {
            self.diagnostics.push(Diagnostic::error_with_code(
                "RL0310",
                "Can't use 'super' in a class with no superclass",
                expr.span,
            ));
            return;
        }
        self.resolve_local(expr.id, "super");
    }

    // === Scope bookkeeping ===

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        let scope = self.scopes.pop().expect("scope stack underflow");
        for (name, binding) in scope {
            if binding.kind == DeclKind::Var && !binding.used {
                self.diagnostics.push(Diagnostic::warning_with_code(
                    "RL0390",
                    format!("Unused local variable '{}'", name),
                    binding.span,
                ));
            }
        }
    }

    /// Record a declaration in the current scope; globals are not tracked
    fn declare(&mut self, name: &Identifier, kind: DeclKind) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        if scope.contains_key(&name.name) {
            self.diagnostics.push(Diagnostic::error_with_code(
                "RL0302",
                format!("Variable '{}' is already declared in this scope", name.name),
                name.span,
            ));
            return;
        }
        scope.insert(
            name.name.clone(),
            Binding {
                kind,
                span: name.span,
                defined: false,
                used: false,
            },
        );
    }

    /// Define `this` or `super` in the current scope
    fn declare_hidden(&mut self, name: &str) {
        let scope = self.scopes.last_mut().expect("no scope for hidden binding");
        scope.insert(
            name.to_string(),
            Binding {
                kind: DeclKind::Hidden,
                span: Span::dummy(),
                defined: true,
                used: true,
            },
        );
    }

    fn define(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            if let Some(binding) = scope.get_mut(name) {
                binding.defined = true;
            }
        }
    }

    /// Record the depth of the innermost scope binding `name`, if any.
    /// No hit means the reference is (presumed) global.
    fn resolve_local(&mut self, id: NodeId, name: &str) {
        for (distance, scope) in self.scopes.iter_mut().rev().enumerate() {
            if let Some(binding) = scope.get_mut(name) {
                binding.used = true;
                self.locals.insert(id, distance);
                return;
            }
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
