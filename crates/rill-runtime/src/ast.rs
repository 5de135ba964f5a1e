//! Abstract Syntax Tree (AST) definitions
//!
//! The parser produces a `Program`; the resolver and interpreter are two
//! independent passes matching the same variant set. Reference nodes
//! (variable reads, assignments, `this`, `super`) carry a stable `NodeId`
//! assigned at parse time — the resolver's output is keyed by it, so no
//! pass relies on node address identity.

use crate::span::Span;
use std::rc::Rc;

/// Stable id for a resolvable reference node, assigned at parse time
pub type NodeId = u32;

/// Top-level program: a fully built statement sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// An identifier with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// A function's shape, shared by declarations, expressions, and methods.
///
/// Held behind `Rc` so the runtime `Function` values created at declaration
/// time share the body instead of cloning it.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// Declared name; `None` for anonymous function expressions
    pub name: Option<Identifier>,
    pub params: Vec<Identifier>,
    pub body: Vec<Stmt>,
    /// A getter is declared without a parameter list and is auto-invoked
    /// on property access
    pub is_getter: bool,
}

// === Statements ===

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(ExprStmt),
    Print(PrintStmt),
    Var(VarDecl),
    Block(Block),
    If(IfStmt),
    While(WhileStmt),
    Break(Span),
    Continue(Span),
    Return(ReturnStmt),
    Function(FunctionDecl),
    Class(ClassDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Identifier,
    pub initializer: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub def: Rc<FunctionDef>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Identifier,
    /// Superclass reference; resolved like any variable
    pub superclass: Option<VariableExpr>,
    /// Instance methods (including getters and `init`)
    pub methods: Vec<MethodDecl>,
    /// `static` methods, bound to the class value rather than instances
    pub statics: Vec<MethodDecl>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: Identifier,
    pub def: Rc<FunctionDef>,
    pub span: Span,
}

// === Expressions ===

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralExpr),
    Grouping(Box<GroupingExpr>),
    Unary(Box<UnaryExpr>),
    Binary(Box<BinaryExpr>),
    Logical(Box<LogicalExpr>),
    Conditional(Box<ConditionalExpr>),
    Variable(VariableExpr),
    Assign(Box<AssignExpr>),
    Call(Box<CallExpr>),
    Get(Box<GetExpr>),
    Set(Box<SetExpr>),
    This(ThisExpr),
    Super(SuperExpr),
    Function(FunctionExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: Literal,
    pub span: Span,
}

/// Literal value as written in source
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupingExpr {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Expr,
    pub span: Span,
}

/// Unary operator kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-` (numeric negation)
    Negate,
    /// `!` (truthiness negation)
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Expr,
    pub right: Expr,
    pub span: Span,
}

/// Binary operator kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpr {
    pub op: LogicalOp,
    pub left: Expr,
    pub right: Expr,
    pub span: Span,
}

/// Short-circuiting logical operator kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// `cond ? a : b`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub condition: Expr,
    pub then_branch: Expr,
    pub else_branch: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpr {
    pub name: Identifier,
    pub id: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub name: Identifier,
    pub id: NodeId,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Expr,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetExpr {
    pub object: Expr,
    pub name: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetExpr {
    pub object: Expr,
    pub name: Identifier,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThisExpr {
    pub span: Span,
    pub id: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuperExpr {
    /// The method name after the dot
    pub method: Identifier,
    pub span: Span,
    pub id: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub def: Rc<FunctionDef>,
    pub span: Span,
}

impl Expr {
    /// Source location of this expression
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(e) => e.span,
            Expr::Grouping(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Logical(e) => e.span,
            Expr::Conditional(e) => e.span,
            Expr::Variable(e) => e.name.span,
            Expr::Assign(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::Get(e) => e.span,
            Expr::Set(e) => e.span,
            Expr::This(e) => e.span,
            Expr::Super(e) => e.span,
            Expr::Function(e) => e.span,
        }
    }
}

impl Stmt {
    /// Source location of this statement
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expression(s) => s.span,
            Stmt::Print(s) => s.span,
            Stmt::Var(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::Break(span) | Stmt::Continue(span) => *span,
            Stmt::Return(s) => s.span,
            Stmt::Function(s) => s.span,
            Stmt::Class(s) => s.span,
        }
    }
}
