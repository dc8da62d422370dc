//! Extraction expression parser
//!
//! Parses expression strings like:
//! - `content.loadingExperience.metrics["LARGEST_CONTENTFUL_PAINT_MS"].percentile`
//! - `round(content.lighthouseResult.categories.performance.score * 100)`
//! - `content.record.collectionPeriods[*].lastDate`
//! - `mode == "URL"`
//!
//! The grammar is deliberately small: paths, literals, arithmetic, one
//! optional comparison, and function calls. Anything else is a parse
//! error, never host-language execution.

use super::ast::{BinaryOp, Expr, Segment, UnaryOp};
use crate::error::{CoreError, Result};
use crate::types::Value;

/// Parse an expression string into its AST
pub fn parse_expression(source: &str) -> Result<Expr> {
    let tokens = lex(source)?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
    };
    let expr = parser.comparison()?;
    if parser.pos != parser.tokens.len() {
        return Err(CoreError::parse(
            source,
            format!("unexpected trailing input at token {}", parser.pos),
        ));
    }
    Ok(expr)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Number(f64),
    Str(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Star,
    Plus,
    Minus,
    Slash,
    EqEq,
    NotEq,
    Ge,
    Le,
    Gt,
    Lt,
}

fn lex(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '[' => {
                chars.next();
                tokens.push(Token::LBracket);
            }
            ']' => {
                chars.next();
                tokens.push(Token::RBracket);
            }
            '.' => {
                chars.next();
                tokens.push(Token::Dot);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '=' => {
                chars.next();
                match chars.next() {
                    Some('=') => tokens.push(Token::EqEq),
                    _ => return Err(CoreError::parse(source, "expected '==' after '='")),
                }
            }
            '!' => {
                chars.next();
                match chars.next() {
                    Some('=') => tokens.push(Token::NotEq),
                    _ => return Err(CoreError::parse(source, "expected '!=' after '!'")),
                }
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Ge);
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '<' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Le);
                } else {
                    tokens.push(Token::Lt);
                }
            }
            '"' | '\'' => {
                let quote = c;
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some(ch) = chars.next() {
                    if ch == '\\' {
                        match chars.next() {
                            Some(escaped) => text.push(escaped),
                            None => break,
                        }
                    } else if ch == quote {
                        closed = true;
                        break;
                    } else {
                        text.push(ch);
                    }
                }
                if !closed {
                    return Err(CoreError::parse(source, "unterminated string literal"));
                }
                tokens.push(Token::Str(text));
            }
            '0'..='9' => {
                let mut text = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        // A dot only belongs to the number when followed by
                        // a digit; otherwise it is a path separator.
                        if d == '.' {
                            let mut lookahead = chars.clone();
                            lookahead.next();
                            if !matches!(lookahead.peek(), Some(n) if n.is_ascii_digit()) {
                                break;
                            }
                        }
                        text.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let number: f64 = text
                    .parse()
                    .map_err(|_| CoreError::parse(source, format!("invalid number '{}'", text)))?;
                tokens.push(Token::Number(number));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut text = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        text.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(text));
            }
            other => {
                return Err(CoreError::parse(
                    source,
                    format!("unexpected character '{}'", other),
                ));
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            _ => Err(CoreError::parse(self.source, format!("expected {}", what))),
        }
    }

    /// comparison := additive (cmp-op additive)?
    fn comparison(&mut self) -> Result<Expr> {
        let left = self.additive()?;
        let op = match self.peek() {
            Some(Token::EqEq) => BinaryOp::Eq,
            Some(Token::NotEq) => BinaryOp::Ne,
            Some(Token::Ge) => BinaryOp::Ge,
            Some(Token::Le) => BinaryOp::Le,
            Some(Token::Gt) => BinaryOp::Gt,
            Some(Token::Lt) => BinaryOp::Lt,
            _ => return Ok(left),
        };
        self.next();
        let right = self.additive()?;
        Ok(Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    /// additive := multiplicative (("+" | "-") multiplicative)*
    fn additive(&mut self) -> Result<Expr> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.next();
            let right = self.multiplicative()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    /// multiplicative := unary (("*" | "/") unary)*
    fn multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.next();
            let right = self.unary()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    /// unary := "-" unary | primary
    fn unary(&mut self) -> Result<Expr> {
        if self.peek() == Some(&Token::Minus) {
            self.next();
            let operand = self.unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Literal(Value::Number(n))),
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::String(s))),
            Some(Token::LParen) => {
                let expr = self.comparison()?;
                self.expect(Token::RParen, "')'")?;
                Ok(expr)
            }
            Some(Token::Ident(name)) => match name.as_str() {
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "null" => Ok(Expr::Literal(Value::Null)),
                _ => {
                    if self.peek() == Some(&Token::LParen) {
                        self.next();
                        self.call(name)
                    } else {
                        self.path(name)
                    }
                }
            },
            _ => Err(CoreError::parse(self.source, "expected expression")),
        }
    }

    /// Argument list of a function call, opening paren already consumed
    fn call(&mut self, function: String) -> Result<Expr> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.next();
            return Ok(Expr::Call { function, args });
        }
        loop {
            args.push(self.comparison()?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => break,
                _ => {
                    return Err(CoreError::parse(
                        self.source,
                        "expected ',' or ')' in argument list",
                    ))
                }
            }
        }
        Ok(Expr::Call { function, args })
    }

    /// Path segments following a root identifier
    fn path(&mut self, root: String) -> Result<Expr> {
        let mut segments = Vec::new();
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.next();
                    match self.next() {
                        Some(Token::Ident(key)) => segments.push(Segment::Key(key)),
                        _ => {
                            return Err(CoreError::parse(
                                self.source,
                                "expected identifier after '.'",
                            ))
                        }
                    }
                }
                Some(Token::LBracket) => {
                    self.next();
                    let segment = match self.next() {
                        Some(Token::Number(n)) => {
                            if n.fract() != 0.0 || n < 0.0 {
                                return Err(CoreError::parse(
                                    self.source,
                                    format!("invalid array index {}", n),
                                ));
                            }
                            Segment::Index(n as usize)
                        }
                        Some(Token::Star) => Segment::Wildcard,
                        Some(Token::Str(key)) => Segment::Key(key),
                        _ => {
                            return Err(CoreError::parse(
                                self.source,
                                "expected index, '*' or string key inside '[...]'",
                            ))
                        }
                    };
                    self.expect(Token::RBracket, "']'")?;
                    segments.push(segment);
                }
                _ => break,
            }
        }
        Ok(Expr::Path { root, segments })
    }
}
