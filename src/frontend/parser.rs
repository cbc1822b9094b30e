//! Recursive descent parser for the Pascal subset
//!
//! Pull-based: holds the current token and fetches the next from the
//! lexer on every `eat`. The grammar needs one token of lookahead,
//! plus a single two-token peek to tell a bare procedure call
//! statement `foo;` from an assignment `foo := ...`.

use crate::frontend::ast::*;
use crate::frontend::lexer::Lexer;
use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result, Span};

/// The grammar, exposed read-only for the grammar panel.
pub const GRAMMAR: &[&str] = &[
    "program             : PROGRAM variable SEMI block DOT",
    "block               : declarations compound_statement",
    "declarations        : (VAR (variable_declaration SEMI)+)* procedure_declaration*",
    "procedure_declaration: PROCEDURE ID (LPAREN formal_parameter_list RPAREN)? SEMI block SEMI",
    "formal_parameter_list: formal_parameters (SEMI formal_parameters)*",
    "formal_parameters   : ID (COMMA ID)* COLON type_spec",
    "variable_declaration: ID (COMMA ID)* COLON type_spec",
    "type_spec           : INTEGER | REAL",
    "compound_statement  : BEGIN statement_list END",
    "statement_list      : statement (SEMI statement)*",
    "statement           : compound_statement | assignment_statement | procedure_call_statement | empty",
    "assignment_statement: variable ASSIGN expr",
    "procedure_call_statement: ID (LPAREN expr (COMMA expr)* RPAREN)?",
    "empty               :",
    "expr                : term ((PLUS | MINUS) term)*",
    "term                : factor ((MUL | INTEGER_DIV | FLOAT_DIV) factor)*",
    "factor              : PLUS factor | MINUS factor | INTEGER_CONST | REAL_CONST | LPAREN expr RPAREN | variable",
];

/// The parser
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    /// One-slot buffer backing the single two-token lookahead
    peeked: Option<Token>,
    /// Stop offset of the last eaten token; node spans end here so
    /// trailing whitespace is never highlighted.
    prev_end: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser pulling from the given lexer
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            peeked: None,
            prev_end: 0,
        }
    }

    // ==================== Helper Methods ====================

    fn advance(&mut self) {
        self.prev_end = self.current.span.end;
        self.current = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token(),
        };
    }

    /// Kind of the token after the current one
    fn peek_kind(&mut self) -> &TokenKind {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token());
        }
        &self.peeked.as_ref().unwrap().kind
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current.kind.same_kind(kind)
    }

    /// Build the error for the current token not being one of
    /// `expected`. A lexer error token surfaces as its own kind so the
    /// UI can tag the failure to the right stage.
    fn unexpected(&self, expected: &[&str]) -> Error {
        if let TokenKind::UnexpectedChar(ch) = self.current.kind {
            return Error::UnexpectedChar {
                ch,
                span: self.current.span,
            };
        }
        let expected = match expected {
            [single] => (*single).to_string(),
            [a, b] => format!("{a} or {b}"),
            [init @ .., last] => format!("{}, or {}", init.join(", "), last),
            [] => String::new(),
        };
        Error::UnexpectedToken {
            expected,
            got: self.current.kind.name().to_string(),
            span: self.current.span,
        }
    }

    /// Assert the current token's kind and fetch the next one
    fn eat(&mut self, kind: &TokenKind) -> Result<Token> {
        if self.check(kind) {
            let token = self.current.clone();
            self.advance();
            Ok(token)
        } else {
            Err(self.unexpected(&[kind.name()]))
        }
    }

    // ==================== Parsing Methods ====================

    /// Parse a complete program: `program` followed by EOF
    pub fn parse(&mut self) -> Result<Program> {
        let program = self.program()?;
        self.eat(&TokenKind::Eof)?;
        Ok(program)
    }

    /// program : PROGRAM variable SEMI block DOT
    fn program(&mut self) -> Result<Program> {
        let start = self.current.span.start;
        self.eat(&TokenKind::Program)?;
        let var = self.variable()?;
        self.eat(&TokenKind::Semi)?;
        let block = self.block()?;
        self.eat(&TokenKind::Dot)?;
        Ok(Program {
            name: var.name,
            block,
            span: Span::new(start, self.prev_end),
        })
    }

    /// block : declarations compound_statement
    fn block(&mut self) -> Result<Block> {
        let start = self.current.span.start;
        let declarations = self.declarations()?;
        let compound = self.compound_statement()?;
        Ok(Block {
            declarations,
            compound,
            span: Span::new(start, self.prev_end),
        })
    }

    /// declarations : (VAR (variable_declaration SEMI)+)* procedure_declaration*
    fn declarations(&mut self) -> Result<Vec<Declaration>> {
        let mut declarations = Vec::new();
        while self.check(&TokenKind::Var) {
            self.eat(&TokenKind::Var)?;
            while matches!(self.current.kind, TokenKind::Id(_)) {
                for decl in self.variable_declaration()? {
                    declarations.push(Declaration::VarDecl(decl));
                }
                self.eat(&TokenKind::Semi)?;
            }
        }
        while self.check(&TokenKind::Procedure) {
            declarations.push(Declaration::Procedure(self.procedure_declaration()?));
        }
        Ok(declarations)
    }

    /// variable_declaration : ID (COMMA ID)* COLON type_spec
    fn variable_declaration(&mut self) -> Result<Vec<VarDecl>> {
        let mut vars = vec![self.variable()?];
        while self.check(&TokenKind::Comma) {
            self.eat(&TokenKind::Comma)?;
            vars.push(self.variable()?);
        }
        self.eat(&TokenKind::Colon)?;
        let type_spec = self.type_spec()?;

        Ok(vars
            .into_iter()
            .map(|var| VarDecl {
                span: Span::new(var.span.start, type_spec.span.end),
                var,
                type_spec: type_spec.clone(),
            })
            .collect())
    }

    /// procedure_declaration : PROCEDURE ID (LPAREN formal_parameter_list RPAREN)? SEMI block SEMI
    fn procedure_declaration(&mut self) -> Result<ProcedureDecl> {
        let start = self.current.span.start;
        self.eat(&TokenKind::Procedure)?;
        let name = self.variable()?.name;

        let mut params = Vec::new();
        if self.check(&TokenKind::LParen) {
            self.eat(&TokenKind::LParen)?;
            params = self.formal_parameter_list()?;
            self.eat(&TokenKind::RParen)?;
        }

        self.eat(&TokenKind::Semi)?;
        let block = self.block()?;
        self.eat(&TokenKind::Semi)?;

        Ok(ProcedureDecl {
            name,
            params,
            block,
            span: Span::new(start, self.prev_end),
        })
    }

    /// formal_parameter_list : formal_parameters (SEMI formal_parameters)*
    fn formal_parameter_list(&mut self) -> Result<Vec<Param>> {
        let mut params = self.formal_parameters()?;
        while self.check(&TokenKind::Semi) {
            self.eat(&TokenKind::Semi)?;
            params.extend(self.formal_parameters()?);
        }
        Ok(params)
    }

    /// formal_parameters : ID (COMMA ID)* COLON type_spec
    fn formal_parameters(&mut self) -> Result<Vec<Param>> {
        let mut vars = vec![self.variable()?];
        while self.check(&TokenKind::Comma) {
            self.eat(&TokenKind::Comma)?;
            vars.push(self.variable()?);
        }
        self.eat(&TokenKind::Colon)?;
        let type_spec = self.type_spec()?;

        Ok(vars
            .into_iter()
            .map(|var| Param {
                span: Span::new(var.span.start, type_spec.span.end),
                var,
                type_spec: type_spec.clone(),
            })
            .collect())
    }

    /// type_spec : INTEGER | REAL
    fn type_spec(&mut self) -> Result<TypeSpec> {
        match self.current.kind {
            TokenKind::Integer => {
                let token = self.eat(&TokenKind::Integer)?;
                Ok(TypeSpec {
                    name: TypeName::Integer,
                    span: token.span,
                })
            }
            TokenKind::Real => {
                let token = self.eat(&TokenKind::Real)?;
                Ok(TypeSpec {
                    name: TypeName::Real,
                    span: token.span,
                })
            }
            _ => Err(self.unexpected(&["INTEGER", "REAL"])),
        }
    }

    /// compound_statement : BEGIN statement_list END
    fn compound_statement(&mut self) -> Result<Compound> {
        let start = self.current.span.start;
        self.eat(&TokenKind::Begin)?;
        let children = self.statement_list()?;
        self.eat(&TokenKind::End)?;
        Ok(Compound {
            children,
            span: Span::new(start, self.prev_end),
        })
    }

    /// statement_list : statement (SEMI statement)*
    fn statement_list(&mut self) -> Result<Vec<Statement>> {
        let mut statements = vec![self.statement()?];
        while self.check(&TokenKind::Semi) {
            self.eat(&TokenKind::Semi)?;
            statements.push(self.statement()?);
        }
        // A statement followed directly by an ID means a missing
        // semicolon; report it here rather than at the END.
        if matches!(self.current.kind, TokenKind::Id(_)) {
            return Err(self.unexpected(&["SEMI"]));
        }
        Ok(statements)
    }

    /// statement : compound_statement | assignment_statement
    ///           | procedure_call_statement | empty
    fn statement(&mut self) -> Result<Statement> {
        match self.current.kind {
            TokenKind::Begin => Ok(Statement::Compound(self.compound_statement()?)),
            TokenKind::Id(_) => {
                if self.peek_kind().same_kind(&TokenKind::Assign) {
                    Ok(Statement::Assign(self.assignment_statement()?))
                } else {
                    Ok(Statement::ProcedureCall(self.procedure_call_statement()?))
                }
            }
            _ => Ok(Statement::NoOp(self.empty())),
        }
    }

    /// assignment_statement : variable ASSIGN expr
    fn assignment_statement(&mut self) -> Result<Assign> {
        let target = self.variable()?;
        self.eat(&TokenKind::Assign)?;
        let value = self.expr()?;
        Ok(Assign {
            span: Span::new(target.span.start, value.span().end),
            target,
            value,
        })
    }

    /// procedure_call_statement : ID (LPAREN expr (COMMA expr)* RPAREN)?
    fn procedure_call_statement(&mut self) -> Result<ProcedureCall> {
        let var = self.variable()?;
        let mut args = Vec::new();
        if self.check(&TokenKind::LParen) {
            self.eat(&TokenKind::LParen)?;
            args.push(self.expr()?);
            while self.check(&TokenKind::Comma) {
                self.eat(&TokenKind::Comma)?;
                args.push(self.expr()?);
            }
            self.eat(&TokenKind::RParen)?;
        }
        Ok(ProcedureCall {
            name: var.name,
            args,
            span: Span::new(var.span.start, self.prev_end),
        })
    }

    /// variable : ID
    fn variable(&mut self) -> Result<Var> {
        match self.current.kind.clone() {
            TokenKind::Id(name) => {
                let token = self.eat(&TokenKind::Id(String::new()))?;
                Ok(Var {
                    name,
                    span: token.span,
                })
            }
            _ => Err(self.unexpected(&["ID"])),
        }
    }

    /// empty :
    fn empty(&mut self) -> NoOp {
        NoOp {
            span: self.current.span,
        }
    }

    /// expr : term ((PLUS | MINUS) term)*
    fn expr(&mut self) -> Result<Expr> {
        let start = self.current.span.start;
        let mut node = self.term()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinOpKind::Plus,
                TokenKind::Minus => BinOpKind::Minus,
                _ => break,
            };
            let op_span = self.current.span;
            self.advance();
            let right = self.term()?;
            node = Expr::BinOp(Box::new(BinOp {
                span: Span::new(start, right.span().end),
                left: node,
                op,
                op_span,
                right,
            }));
        }
        Ok(node)
    }

    /// term : factor ((MUL | INTEGER_DIV | FLOAT_DIV) factor)*
    fn term(&mut self) -> Result<Expr> {
        let start = self.current.span.start;
        let mut node = self.factor()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Mul => BinOpKind::Mul,
                TokenKind::IntegerDiv => BinOpKind::IntegerDiv,
                TokenKind::FloatDiv => BinOpKind::FloatDiv,
                _ => break,
            };
            let op_span = self.current.span;
            self.advance();
            let right = self.factor()?;
            node = Expr::BinOp(Box::new(BinOp {
                span: Span::new(start, right.span().end),
                left: node,
                op,
                op_span,
                right,
            }));
        }
        Ok(node)
    }

    /// factor : PLUS factor | MINUS factor | INTEGER_CONST | REAL_CONST
    ///        | LPAREN expr RPAREN | variable
    fn factor(&mut self) -> Result<Expr> {
        let start = self.current.span.start;
        match self.current.kind {
            TokenKind::Plus => {
                self.advance();
                let expr = self.factor()?;
                Ok(Expr::UnaryOp(Box::new(UnaryOp {
                    span: Span::new(start, expr.span().end),
                    op: UnaryOpKind::Plus,
                    expr,
                })))
            }
            TokenKind::Minus => {
                self.advance();
                let expr = self.factor()?;
                Ok(Expr::UnaryOp(Box::new(UnaryOp {
                    span: Span::new(start, expr.span().end),
                    op: UnaryOpKind::Minus,
                    expr,
                })))
            }
            TokenKind::IntegerConst(value) => {
                let token = self.eat(&TokenKind::IntegerConst(0))?;
                Ok(Expr::Num(Num {
                    value: NumValue::Integer(value),
                    span: token.span,
                }))
            }
            TokenKind::RealConst(value) => {
                let token = self.eat(&TokenKind::RealConst(0.0))?;
                Ok(Expr::Num(Num {
                    value: NumValue::Real(value),
                    span: token.span,
                }))
            }
            TokenKind::LParen => {
                self.eat(&TokenKind::LParen)?;
                let expr = self.expr()?;
                self.eat(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Id(_) => Ok(Expr::Var(self.variable()?)),
            _ => Err(self.unexpected(&[
                "PLUS",
                "MINUS",
                "INTEGER_CONST",
                "REAL_CONST",
                "LPAREN",
                "ID",
            ])),
        }
    }
}
