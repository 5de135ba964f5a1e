//! Parsing (tokens to AST)
//!
//! Recursive descent over statements with the usual precedence ladder for
//! expressions. Parse errors become diagnostics and the parser recovers at
//! the next statement boundary via `synchronize`, so a single run reports
//! as many errors as possible.

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use std::rc::Rc;

/// Maximum number of parameters or call arguments
const MAX_ARITY: usize = 255;

/// Parser state for building AST from tokens
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    diagnostics: Vec<Diagnostic>,
    next_node_id: NodeId,
}

impl Parser {
    /// Create a new parser for the given tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_node_base(tokens, 0)
    }

    /// Create a parser whose node ids start at `base`.
    ///
    /// A REPL session parses one line at a time but shares a single
    /// interpreter; starting each parse where the previous one stopped
    /// keeps node ids unique across the whole session.
    pub fn with_node_base(mut tokens: Vec<Token>, base: NodeId) -> Self {
        // The lexer always terminates the stream with Eof; tolerate
        // callers that hand over a bare token vec.
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let span = tokens.last().map(|t| t.span).unwrap_or_else(Span::dummy);
            tokens.push(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                span,
            });
        }
        Self {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
            next_node_id: base,
        }
    }

    /// The first unused node id; a follow-up parse should start here
    pub fn next_node_id(&self) -> NodeId {
        self.next_node_id
    }

    /// Parse tokens into a program
    pub fn parse(&mut self) -> (Program, Vec<Diagnostic>) {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(_) => self.synchronize(),
            }
        }

        (Program { statements }, std::mem::take(&mut self.diagnostics))
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }

    // === Declarations ===

    fn declaration(&mut self) -> Result<Stmt, ()> {
        if self.check(TokenKind::Class) {
            return self.class_declaration();
        }
        // `fun` followed by a name is a declaration; a bare `fun (` starts
        // an anonymous function expression.
        if self.check(TokenKind::Fun) && self.check_next(TokenKind::Identifier) {
            return self.function_declaration();
        }
        if self.check(TokenKind::Var) {
            return self.var_declaration();
        }
        self.statement()
    }

    fn var_declaration(&mut self) -> Result<Stmt, ()> {
        let var_span = self.advance().span;
        let name = self.consume_identifier("a variable name")?;

        let initializer = if self.match_token(TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };

        let end = self
            .consume(TokenKind::Semicolon, "Expected ';' after variable declaration")?
            .span;

        Ok(Stmt::Var(VarDecl {
            name,
            initializer,
            span: var_span.merge(end),
        }))
    }

    fn function_declaration(&mut self) -> Result<Stmt, ()> {
        let fun_span = self.advance().span;
        let name = self.consume_identifier("a function name")?;
        let def = self.function_def(Some(name.clone()), "function")?;
        let span = fun_span.merge(last_body_span(&def).unwrap_or(name.span));

        Ok(Stmt::Function(FunctionDecl {
            name,
            def: Rc::new(def),
            span,
        }))
    }

    fn class_declaration(&mut self) -> Result<Stmt, ()> {
        let class_span = self.advance().span;
        let name = self.consume_identifier("a class name")?;

        let superclass = if self.match_token(TokenKind::Less) {
            let super_name = self.consume_identifier("a superclass name")?;
            Some(VariableExpr {
                name: super_name,
                id: self.alloc_id(),
            })
        } else {
            None
        };

        self.consume(TokenKind::LeftBrace, "Expected '{' before class body")?;

        let mut methods = Vec::new();
        let mut statics = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            let is_static = self.match_token(TokenKind::Static);
            let method = self.method()?;
            if is_static {
                statics.push(method);
            } else {
                methods.push(method);
            }
        }

        let end = self
            .consume(TokenKind::RightBrace, "Expected '}' after class body")?
            .span;

        Ok(Stmt::Class(ClassDecl {
            name,
            superclass,
            methods,
            statics,
            span: class_span.merge(end),
        }))
    }

    /// Parse a method: a name followed by either a parameter list or, for a
    /// getter, directly by the body block
    fn method(&mut self) -> Result<MethodDecl, ()> {
        let name = self.consume_identifier("a method name")?;
        let def = if self.check(TokenKind::LeftParen) {
            self.function_def(Some(name.clone()), "method")?
        } else {
            // Getter: no parameter list, auto-invoked on property access.
            self.consume(TokenKind::LeftBrace, "Expected '(' or '{' after method name")?;
            let body = self.block_statements()?;
            FunctionDef {
                name: Some(name.clone()),
                params: Vec::new(),
                body,
                is_getter: true,
            }
        };
        let span = name.span.merge(last_body_span(&def).unwrap_or(name.span));

        Ok(MethodDecl {
            name,
            def: Rc::new(def),
            span,
        })
    }

    /// Parse `( params ) { body }`; the name (if any) has been consumed
    fn function_def(&mut self, name: Option<Identifier>, kind: &str) -> Result<FunctionDef, ()> {
        self.consume(
            TokenKind::LeftParen,
            format!("Expected '(' after {} name", kind),
        )?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if params.len() >= MAX_ARITY {
                    let span = self.peek().span;
                    self.diagnostics.push(Diagnostic::error_with_code(
                        "RL0203",
                        format!("Can't have more than {} parameters", MAX_ARITY),
                        span,
                    ));
                }
                params.push(self.consume_identifier("a parameter name")?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expected ')' after parameters")?;

        self.consume(
            TokenKind::LeftBrace,
            format!("Expected '{{' before {} body", kind),
        )?;
        let body = self.block_statements()?;

        Ok(FunctionDef {
            name,
            params,
            body,
            is_getter: false,
        })
    }

    // === Statements ===

    fn statement(&mut self) -> Result<Stmt, ()> {
        if self.check(TokenKind::Print) {
            return self.print_statement();
        }
        if self.check(TokenKind::If) {
            return self.if_statement();
        }
        if self.check(TokenKind::While) {
            return self.while_statement();
        }
        if self.check(TokenKind::Return) {
            return self.return_statement();
        }
        if self.check(TokenKind::Break) {
            let span = self.advance().span;
            self.consume(TokenKind::Semicolon, "Expected ';' after 'break'")?;
            return Ok(Stmt::Break(span));
        }
        if self.check(TokenKind::Continue) {
            let span = self.advance().span;
            self.consume(TokenKind::Semicolon, "Expected ';' after 'continue'")?;
            return Ok(Stmt::Continue(span));
        }
        if self.check(TokenKind::LeftBrace) {
            let start = self.advance().span;
            let statements = self.block_statements()?;
            let end = self.previous().span;
            return Ok(Stmt::Block(Block {
                statements,
                span: start.merge(end),
            }));
        }
        self.expression_statement()
    }

    fn print_statement(&mut self) -> Result<Stmt, ()> {
        let print_span = self.advance().span;
        let expr = self.expression()?;
        let end = self
            .consume(TokenKind::Semicolon, "Expected ';' after value")?
            .span;
        Ok(Stmt::Print(PrintStmt {
            expr,
            span: print_span.merge(end),
        }))
    }

    fn if_statement(&mut self) -> Result<Stmt, ()> {
        let if_span = self.advance().span;
        self.consume(TokenKind::LeftParen, "Expected '(' after 'if'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after if condition")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_token(TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        let end = else_branch
            .as_ref()
            .map(|s| s.span())
            .unwrap_or_else(|| then_branch.span());

        Ok(Stmt::If(IfStmt {
            condition,
            then_branch,
            else_branch,
            span: if_span.merge(end),
        }))
    }

    fn while_statement(&mut self) -> Result<Stmt, ()> {
        let while_span = self.advance().span;
        self.consume(TokenKind::LeftParen, "Expected '(' after 'while'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after while condition")?;

        let body = Box::new(self.statement()?);
        let span = while_span.merge(body.span());

        Ok(Stmt::While(WhileStmt {
            condition,
            body,
            span,
        }))
    }

    fn return_statement(&mut self) -> Result<Stmt, ()> {
        let return_span = self.advance().span;
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        let end = self
            .consume(TokenKind::Semicolon, "Expected ';' after return value")?
            .span;

        Ok(Stmt::Return(ReturnStmt {
            value,
            span: return_span.merge(end),
        }))
    }

    fn expression_statement(&mut self) -> Result<Stmt, ()> {
        let expr = self.expression()?;
        let end = self
            .consume(TokenKind::Semicolon, "Expected ';' after expression")?
            .span;
        let span = expr.span().merge(end);
        Ok(Stmt::Expression(ExprStmt { expr, span }))
    }

    /// Parse statements until the closing brace (consumed here)
    fn block_statements(&mut self) -> Result<Vec<Stmt>, ()> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(_) => self.synchronize(),
            }
        }
        self.consume(TokenKind::RightBrace, "Expected '}' after block")?;
        Ok(statements)
    }

    // === Expressions ===

    fn expression(&mut self) -> Result<Expr, ()> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr, ()> {
        let expr = self.conditional()?;

        if self.check(TokenKind::Equal) {
            let equals_span = self.advance().span;
            let value = self.assignment()?;

            return match expr {
                Expr::Variable(var) => {
                    let span = var.name.span.merge(value.span());
                    Ok(Expr::Assign(Box::new(AssignExpr {
                        name: var.name,
                        id: self.alloc_id(),
                        value,
                        span,
                    })))
                }
                Expr::Get(get) => {
                    let span = get.span.merge(value.span());
                    Ok(Expr::Set(Box::new(SetExpr {
                        object: get.object,
                        name: get.name,
                        value,
                        span,
                    })))
                }
                other => {
                    // Report and keep the target so parsing continues; the
                    // error refuses execution either way.
                    self.diagnostics.push(Diagnostic::error_with_code(
                        "RL0202",
                        "Invalid assignment target",
                        equals_span,
                    ));
                    Ok(other)
                }
            };
        }

        Ok(expr)
    }

    fn conditional(&mut self) -> Result<Expr, ()> {
        let expr = self.or()?;

        if self.match_token(TokenKind::Question) {
            let then_branch = self.expression()?;
            self.consume(TokenKind::Colon, "Expected ':' in conditional expression")?;
            let else_branch = self.conditional()?;
            let span = expr.span().merge(else_branch.span());
            return Ok(Expr::Conditional(Box::new(ConditionalExpr {
                condition: expr,
                then_branch,
                else_branch,
                span,
            })));
        }

        Ok(expr)
    }

    fn or(&mut self) -> Result<Expr, ()> {
        let mut expr = self.and()?;
        while self.match_token(TokenKind::Or) {
            let right = self.and()?;
            let span = expr.span().merge(right.span());
            expr = Expr::Logical(Box::new(LogicalExpr {
                op: LogicalOp::Or,
                left: expr,
                right,
                span,
            }));
        }
        Ok(expr)
    }

    fn and(&mut self) -> Result<Expr, ()> {
        let mut expr = self.equality()?;
        while self.match_token(TokenKind::And) {
            let right = self.equality()?;
            let span = expr.span().merge(right.span());
            expr = Expr::Logical(Box::new(LogicalExpr {
                op: LogicalOp::And,
                left: expr,
                right,
                span,
            }));
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, ()> {
        let mut expr = self.comparison()?;
        loop {
            let op = if self.match_token(TokenKind::EqualEqual) {
                BinaryOp::Eq
            } else if self.match_token(TokenKind::BangEqual) {
                BinaryOp::Ne
            } else {
                break;
            };
            let right = self.comparison()?;
            let span = expr.span().merge(right.span());
            expr = Expr::Binary(Box::new(BinaryExpr {
                op,
                left: expr,
                right,
                span,
            }));
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, ()> {
        let mut expr = self.term()?;
        loop {
            let op = if self.match_token(TokenKind::Greater) {
                BinaryOp::Gt
            } else if self.match_token(TokenKind::GreaterEqual) {
                BinaryOp::Ge
            } else if self.match_token(TokenKind::Less) {
                BinaryOp::Lt
            } else if self.match_token(TokenKind::LessEqual) {
                BinaryOp::Le
            } else {
                break;
            };
            let right = self.term()?;
            let span = expr.span().merge(right.span());
            expr = Expr::Binary(Box::new(BinaryExpr {
                op,
                left: expr,
                right,
                span,
            }));
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, ()> {
        let mut expr = self.factor()?;
        loop {
            let op = if self.match_token(TokenKind::Plus) {
                BinaryOp::Add
            } else if self.match_token(TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let right = self.factor()?;
            let span = expr.span().merge(right.span());
            expr = Expr::Binary(Box::new(BinaryExpr {
                op,
                left: expr,
                right,
                span,
            }));
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, ()> {
        let mut expr = self.unary()?;
        loop {
            let op = if self.match_token(TokenKind::Star) {
                BinaryOp::Mul
            } else if self.match_token(TokenKind::Slash) {
                BinaryOp::Div
            } else {
                break;
            };
            let right = self.unary()?;
            let span = expr.span().merge(right.span());
            expr = Expr::Binary(Box::new(BinaryExpr {
                op,
                left: expr,
                right,
                span,
            }));
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, ()> {
        let op = if self.check(TokenKind::Bang) {
            Some(UnaryOp::Not)
        } else if self.check(TokenKind::Minus) {
            Some(UnaryOp::Negate)
        } else {
            None
        };

        if let Some(op) = op {
            let op_span = self.advance().span;
            let operand = self.unary()?;
            let span = op_span.merge(operand.span());
            return Ok(Expr::Unary(Box::new(UnaryExpr { op, operand, span })));
        }

        self.call()
    }

    fn call(&mut self) -> Result<Expr, ()> {
        let mut expr = self.primary()?;

        loop {
            if self.match_token(TokenKind::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if self.match_token(TokenKind::Dot) {
                let name = self.consume_identifier("a property name after '.'")?;
                let span = expr.span().merge(name.span);
                expr = Expr::Get(Box::new(GetExpr {
                    object: expr,
                    name,
                    span,
                }));
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr, ()> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if args.len() >= MAX_ARITY {
                    let span = self.peek().span;
                    self.diagnostics.push(Diagnostic::error_with_code(
                        "RL0203",
                        format!("Can't have more than {} arguments", MAX_ARITY),
                        span,
                    ));
                }
                args.push(self.expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self
            .consume(TokenKind::RightParen, "Expected ')' after arguments")?
            .span;
        let span = callee.span().merge(end);

        Ok(Expr::Call(Box::new(CallExpr { callee, args, span })))
    }

    fn primary(&mut self) -> Result<Expr, ()> {
        let token = self.peek().clone();

        match token.kind {
            TokenKind::Number => {
                self.advance();
                let value: f64 = token.lexeme.parse().map_err(|_| {
                    self.diagnostics.push(Diagnostic::error_with_code(
                        "RL0201",
                        format!("Invalid number literal '{}'", token.lexeme),
                        token.span,
                    ));
                })?;
                Ok(Expr::Literal(LiteralExpr {
                    value: Literal::Number(value),
                    span: token.span,
                }))
            }
            TokenKind::String => {
                self.advance();
                Ok(Expr::Literal(LiteralExpr {
                    value: Literal::Str(token.lexeme),
                    span: token.span,
                }))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Literal(LiteralExpr {
                    value: Literal::Bool(true),
                    span: token.span,
                }))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Literal(LiteralExpr {
                    value: Literal::Bool(false),
                    span: token.span,
                }))
            }
            TokenKind::Nil => {
                self.advance();
                Ok(Expr::Literal(LiteralExpr {
                    value: Literal::Nil,
                    span: token.span,
                }))
            }
            TokenKind::This => {
                self.advance();
                Ok(Expr::This(ThisExpr {
                    span: token.span,
                    id: self.alloc_id(),
                }))
            }
            TokenKind::Super => {
                self.advance();
                self.consume(TokenKind::Dot, "Expected '.' after 'super'")?;
                let method = self.consume_identifier("a superclass method name")?;
                let span = token.span.merge(method.span);
                Ok(Expr::Super(SuperExpr {
                    method,
                    span,
                    id: self.alloc_id(),
                }))
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(Expr::Variable(VariableExpr {
                    name: Identifier {
                        name: token.lexeme,
                        span: token.span,
                    },
                    id: self.alloc_id(),
                }))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                let end = self
                    .consume(TokenKind::RightParen, "Expected ')' after expression")?
                    .span;
                Ok(Expr::Grouping(Box::new(GroupingExpr {
                    expr,
                    span: token.span.merge(end),
                })))
            }
            TokenKind::Fun => {
                self.advance();
                let def = self.function_def(None, "function")?;
                let span = token.span.merge(self.previous().span);
                Ok(Expr::Function(FunctionExpr {
                    def: Rc::new(def),
                    span,
                }))
            }
            _ => {
                self.diagnostics.push(Diagnostic::error_with_code(
                    "RL0201",
                    format!("Expected an expression, found '{}'", describe(&token)),
                    token.span,
                ));
                Err(())
            }
        }
    }

    // === Token helpers ===

    fn consume(&mut self, kind: TokenKind, message: impl Into<String>) -> Result<Token, ()> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }
        let token = self.peek().clone();
        self.diagnostics.push(Diagnostic::error_with_code(
            "RL0201",
            format!("{}, found '{}'", message.into(), describe(&token)),
            token.span,
        ));
        Err(())
    }

    fn consume_identifier(&mut self, what: &str) -> Result<Identifier, ()> {
        let token = self
            .consume(TokenKind::Identifier, format!("Expected {}", what))?;
        Ok(Identifier {
            name: token.lexeme,
            span: token.span,
        })
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn check_next(&self, kind: TokenKind) -> bool {
        self.tokens
            .get(self.current + 1)
            .map(|t| t.kind == kind)
            .unwrap_or(false)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Skip tokens until a likely statement boundary.
    ///
    /// Always consumes the offending token first, so recovery makes
    /// progress even when the error sits right after a semicolon.
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Continue => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

/// Span of the last statement in a function body, if any
fn last_body_span(def: &FunctionDef) -> Option<Span> {
    def.body.last().map(|stmt| stmt.span())
}

/// Printable form of a token for error messages
fn describe(token: &Token) -> String {
    if token.kind == TokenKind::Eof {
        "end of input".to_string()
    } else {
        token.lexeme.clone()
    }
}
