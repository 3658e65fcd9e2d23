//! Arithmetic over value columns, e.g. `time.mu / (bmtime - 10)`.

use crate::model::safe_div;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ExprError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { pos: usize, ch: char },

    #[error("unexpected '{token}' at offset {pos}")]
    UnexpectedToken { pos: usize, token: String },

    #[error("expression ended early")]
    UnexpectedEnd,

    #[error("invalid number '{text}'")]
    Number { text: String },

    #[error("'{name}' is not a selected value column")]
    UnknownIdentifier { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Column(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn parse(text: &str) -> Result<Expr, ExprError> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(ExprError::Empty);
        }
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.sum()?;
        match parser.peek() {
            None => Ok(expr),
            Some((pos, token)) => Err(ExprError::UnexpectedToken {
                pos: *pos,
                token: token.to_string(),
            }),
        }
    }

    /// Every column the expression reads.
    pub fn identifiers(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_identifiers(&mut out);
        out
    }

    fn collect_identifiers<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Column(name) => {
                out.insert(name);
            }
            Expr::Neg(inner) => inner.collect_identifiers(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_identifiers(out);
                rhs.collect_identifiers(out);
            }
        }
    }

    /// Evaluates against a row; `None` if any operand is missing.
    pub fn eval<F>(&self, lookup: &F) -> Option<f64>
    where
        F: Fn(&str) -> Option<f64>,
    {
        match self {
            Expr::Number(v) => Some(*v),
            Expr::Column(name) => lookup(name),
            Expr::Neg(inner) => inner.eval(lookup).map(|v| -v),
            Expr::Binary { op, lhs, rhs } => {
                let a = lhs.eval(lookup)?;
                let b = rhs.eval(lookup)?;
                Some(match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => safe_div(a, b),
                })
            }
        }
    }
}

//-----------------------------------------------------------------------------
// Tokenizer
//-----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
    Open,
    Close,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(v) => write!(f, "{v}"),
            Token::Ident(name) => f.write_str(name),
            Token::Op(c) => write!(f, "{c}"),
            Token::Open => f.write_str("("),
            Token::Close => f.write_str(")"),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if is_ident_start(c) {
            let mut name = String::new();
            while let Some(&(_, c)) = chars.peek().filter(|(_, c)| is_ident(*c)) {
                name.push(c);
                chars.next();
            }
            tokens.push((pos, Token::Ident(name)));
        } else if c.is_ascii_digit() || c == '.' {
            let mut number = String::new();
            while let Some(&(_, c)) = chars.peek() {
                let exponent_sign =
                    (c == '-' || c == '+') && number.ends_with(['e', 'E']);
                if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || exponent_sign {
                    number.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            let value = number
                .parse::<f64>()
                .map_err(|_| ExprError::Number { text: number.clone() })?;
            tokens.push((pos, Token::Number(value)));
        } else {
            let token = match c {
                '+' | '-' | '*' | '/' => Token::Op(c),
                '(' => Token::Open,
                ')' => Token::Close,
                _ => return Err(ExprError::UnexpectedChar { pos, ch: c }),
            };
            tokens.push((pos, token));
            chars.next();
        }
    }

    Ok(tokens)
}

//-----------------------------------------------------------------------------
// Parser
//-----------------------------------------------------------------------------

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&(usize, Token)> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<(usize, Token)> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn sum(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.product()?;
        while let Some((_, Token::Op(c @ ('+' | '-')))) = self.peek() {
            let op = if *c == '+' { BinaryOp::Add } else { BinaryOp::Sub };
            self.pos += 1;
            let rhs = self.product()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn product(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        while let Some((_, Token::Op(c @ ('*' | '/')))) = self.peek() {
            let op = if *c == '*' { BinaryOp::Mul } else { BinaryOp::Div };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        if let Some((_, Token::Op('-'))) = self.peek() {
            self.pos += 1;
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Expr, ExprError> {
        match self.next() {
            Some((_, Token::Number(v))) => Ok(Expr::Number(v)),
            Some((_, Token::Ident(name))) => Ok(Expr::Column(name)),
            Some((_, Token::Open)) => {
                let inner = self.sum()?;
                match self.next() {
                    Some((_, Token::Close)) => Ok(inner),
                    Some((pos, token)) => Err(ExprError::UnexpectedToken {
                        pos,
                        token: token.to_string(),
                    }),
                    None => Err(ExprError::UnexpectedEnd),
                }
            }
            Some((pos, token)) => Err(ExprError::UnexpectedToken {
                pos,
                token: token.to_string(),
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}
