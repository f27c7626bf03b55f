//! Recursive-descent parser producing [`Expr`] trees.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := factor (('*' | '/' | '//' | '%') factor)*
//! factor     := ('+' | '-') factor | power
//! power      := primary ['**' factor]
//! primary    := NUMBER | '(' expression ')'
//! ```
//!
//! The first token outside this grammar aborts the parse. Tokens that name
//! a recognizable non-arithmetic construct produce
//! [`EvalError::Disallowed`]; everything else is [`EvalError::Syntax`].

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::lexer::{Token, TokenKind, tokenize};
use crate::error::EvalError;

/// Parses `source` into a tree.
///
/// `max_depth` bounds the nesting of parentheses, unary operators, and
/// exponent chains.
///
/// # Errors
///
/// Returns [`EvalError::Syntax`], [`EvalError::Disallowed`], or
/// [`EvalError::Evaluation`] when the nesting limit is hit.
pub fn parse(source: &str, max_depth: usize) -> Result<Expr, EvalError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        max_depth,
    };
    let expr = parser.expression()?;
    match parser.peek().kind {
        TokenKind::Eof => Ok(expr),
        _ => Err(parser.reject_trailing()),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // The token list always ends with Eof and the cursor never passes it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, offset: usize) -> &Token {
        &self.tokens[(self.pos + offset).min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(EvalError::evaluation(format!(
                "expression nested too deeply (limit {})",
                self.max_depth
            )));
        }
        Ok(())
    }

    const fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expression(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.term()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.factor()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::DoubleSlash => BinaryOp::FloorDiv,
                TokenKind::Percent => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.factor()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn factor(&mut self) -> Result<Expr, EvalError> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            _ => return self.power(),
        };
        self.advance();
        self.enter()?;
        let operand = self.factor()?;
        self.leave();
        Ok(Expr::unary(op, operand))
    }

    fn power(&mut self) -> Result<Expr, EvalError> {
        let base = self.primary()?;
        self.reject_postfix()?;
        if self.peek().kind != TokenKind::DoubleStar {
            return Ok(base);
        }
        self.advance();
        self.enter()?;
        let exponent = self.factor()?;
        self.leave();
        Ok(Expr::binary(BinaryOp::Pow, base, exponent))
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Literal(n))
            }
            TokenKind::LParen => {
                if self.peek_at(1).kind == TokenKind::RParen {
                    return Err(EvalError::disallowed(token.span.start, "tuple literal"));
                }
                self.advance();
                self.enter()?;
                let inner = self.expression()?;
                self.leave();
                let close = self.peek().clone();
                match close.kind {
                    TokenKind::RParen => {
                        self.advance();
                        Ok(inner)
                    }
                    TokenKind::Eof => Err(EvalError::syntax(
                        token.span.start,
                        "'(' was never closed",
                    )),
                    _ => Err(self.reject_trailing()),
                }
            }
            TokenKind::Ident(ref name) => Err(self.reject_name(name, token.span.start)),
            TokenKind::Str => Err(EvalError::disallowed(token.span.start, "string literal")),
            TokenKind::Punct(ref p) => Err(match p.as_str() {
                "[" => EvalError::disallowed(token.span.start, "list literal"),
                "{" => EvalError::disallowed(token.span.start, "set or dict literal"),
                "~" => EvalError::disallowed(token.span.start, "bitwise operator `~`"),
                _ => unexpected(&token),
            }),
            TokenKind::Eof => Err(EvalError::syntax(
                token.span.start,
                "unexpected end of expression",
            )),
            _ => Err(unexpected(&token)),
        }
    }

    /// Rejects call, subscript, and attribute syntax directly after an operand.
    fn reject_postfix(&self) -> Result<(), EvalError> {
        let token = self.peek();
        let construct = match &token.kind {
            TokenKind::LParen => "function call",
            TokenKind::Punct(p) if p == "[" => "subscript",
            TokenKind::Punct(p) if p == "." => "attribute access",
            _ => return Ok(()),
        };
        Err(EvalError::disallowed(token.span.start, construct))
    }

    /// Classifies the token that stopped the parse before end of input.
    fn reject_trailing(&self) -> EvalError {
        let token = self.peek();
        let at = token.span.start;
        match &token.kind {
            TokenKind::Punct(p) => match p.as_str() {
                "==" | "!=" | "<" | ">" | "<=" | ">=" => {
                    EvalError::disallowed(at, format!("comparison `{p}`"))
                }
                "&" | "|" | "<<" | ">>" => {
                    EvalError::disallowed(at, format!("bitwise operator `{p}`"))
                }
                "," => EvalError::disallowed(at, "tuple literal"),
                "@" => EvalError::disallowed(at, "matrix multiplication"),
                ":=" => EvalError::disallowed(at, "assignment expression"),
                ";" => EvalError::syntax(at, "multiple statements are not allowed"),
                "=" => EvalError::syntax(at, "assignment is not allowed"),
                _ => unexpected(token),
            },
            TokenKind::Ident(name) => match name.as_str() {
                "and" | "or" => EvalError::disallowed(at, format!("boolean operator `{name}`")),
                "in" | "is" | "not" => EvalError::disallowed(at, format!("comparison `{name}`")),
                "if" => EvalError::disallowed(at, "conditional expression"),
                "for" => EvalError::disallowed(at, "comprehension"),
                _ => EvalError::syntax(at, format!("unexpected name `{name}`")),
            },
            TokenKind::Str => EvalError::syntax(at, "unexpected string literal"),
            TokenKind::RParen => EvalError::syntax(at, "unmatched ')'"),
            TokenKind::Number(_) => EvalError::syntax(at, "unexpected number"),
            _ => unexpected(token),
        }
    }

    /// Classifies a name found in operand position.
    fn reject_name(&self, name: &str, at: usize) -> EvalError {
        let construct = match name {
            "not" => "boolean operator `not`".to_string(),
            "lambda" => "lambda".to_string(),
            "True" | "False" | "None" => format!("constant `{name}`"),
            _ => match &self.peek_at(1).kind {
                TokenKind::LParen => format!("function call `{name}`"),
                TokenKind::Punct(p) if p == "." => format!("attribute access on `{name}`"),
                TokenKind::Punct(p) if p == "[" => format!("subscript of `{name}`"),
                TokenKind::Punct(p) if p == "=" => {
                    return EvalError::syntax(at, "assignment is not allowed");
                }
                _ => format!("name `{name}`"),
            },
        };
        EvalError::disallowed(at, construct)
    }
}

fn unexpected(token: &Token) -> EvalError {
    let text = match &token.kind {
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::Slash => "/",
        TokenKind::DoubleSlash => "//",
        TokenKind::Percent => "%",
        TokenKind::DoubleStar => "**",
        TokenKind::LParen => "(",
        TokenKind::RParen => ")",
        TokenKind::Punct(p) => p.as_str(),
        TokenKind::Ident(name) => name.as_str(),
        TokenKind::Number(_) => "number",
        TokenKind::Str => "string",
        TokenKind::Eof => "end of expression",
    };
    EvalError::syntax(token.span.start, format!("unexpected '{text}'"))
}
