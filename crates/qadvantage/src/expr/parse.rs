//! Recursive-descent parser for canonical algebraic strings.
//!
//! Grammar (loosest binding first)
//! - sum      := product (("+" | "-") product)*
//! - product  := implicit (("*" | "/") implicit)*
//! - implicit := fraction fraction*            (juxtaposition, binds tighter than `/`)
//! - fraction := unary ("/" number unary)*     (only `number / number symbol`)
//! - unary    := ("-" | "+") unary | power
//! - power    := primary ("^" unary)?          (right-assoc)
//! - primary  := number | call | symbol | "(" sum ")"
//!
//! Precedence follows mathjs: `n / p log(n, e)` is `n / (p * log(n, e))`,
//! while `1/2 n` is `(1/2) * n`. An identifier followed by `(` is a call only
//! when it names a known function; `n (n + 1)` is an implicit product.
//!
//! Nesting and tree depth are capped at `MAX_EXPR_DEPTH`; deeper input is
//! rejected with `ExprError::TooDeep` so later recursive walks stay bounded.

use super::eval::is_known_function;
use super::types::{Node, Op};
use super::ExprError;
use crate::cfg::MAX_EXPR_DEPTH;

#[derive(Clone, Debug, PartialEq)]
enum Tok {
    Num(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
    Comma,
}

fn tokenize(src: &str) -> Result<Vec<(Tok, usize)>, ExprError> {
    let chars: Vec<char> = src.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(|d| d.is_ascii_digit())) {
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            // Exponent only when digits follow; `2e` alone is `2 * e`.
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let text: String = chars[start..i].iter().collect();
            let value = text
                .parse::<f64>()
                .map_err(|_| ExprError::InvalidNumber { text, pos: start })?;
            out.push((Tok::Num(value), start));
            continue;
        }
        if c.is_alphabetic() || c == '_' {
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            out.push((Tok::Ident(chars[start..i].iter().collect()), start));
            continue;
        }
        let tok = match c {
            '+' | '-' | '*' | '/' | '^' => Tok::Op(c),
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            ',' => Tok::Comma,
            _ => return Err(ExprError::UnexpectedChar { ch: c, pos: i }),
        };
        out.push((tok, i));
        i += 1;
    }
    Ok(out)
}

/// A subtree with its height, so depth limits are checked as nodes are built.
struct Tree {
    node: Node,
    depth: usize,
}

impl Tree {
    fn leaf(node: Node) -> Self {
        Self { node, depth: 1 }
    }
}

fn too_deep() -> ExprError {
    ExprError::TooDeep {
        limit: MAX_EXPR_DEPTH,
    }
}

fn join(op: Op, args: Vec<Tree>) -> Result<Tree, ExprError> {
    let depth = 1 + args.iter().map(|a| a.depth).max().unwrap_or(0);
    if depth > MAX_EXPR_DEPTH {
        return Err(too_deep());
    }
    Ok(Tree {
        node: Node::op(op, args.into_iter().map(|a| a.node).collect()),
        depth,
    })
}

struct Parser {
    toks: Vec<(Tok, usize)>,
    at: usize,
    nesting: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.at).map(|(t, _)| t)
    }

    fn peek_at(&self, offset: usize) -> Option<&Tok> {
        self.toks.get(self.at + offset).map(|(t, _)| t)
    }

    fn bump(&mut self) -> Option<Tok> {
        let t = self.toks.get(self.at).map(|(t, _)| t.clone());
        self.at += 1;
        t
    }

    fn unexpected(&self) -> ExprError {
        match self.toks.get(self.at) {
            Some((t, pos)) => ExprError::UnexpectedToken {
                found: describe(t),
                pos: *pos,
            },
            None => ExprError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, want: Tok) -> Result<(), ExprError> {
        if self.peek() == Some(&want) {
            self.at += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn sum(&mut self) -> Result<Tree, ExprError> {
        let mut lhs = self.product()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Op('+')) => Op::Add,
                Some(Tok::Op('-')) => Op::Sub,
                _ => return Ok(lhs),
            };
            self.at += 1;
            let rhs = self.product()?;
            lhs = join(op, vec![lhs, rhs])?;
        }
    }

    fn product(&mut self) -> Result<Tree, ExprError> {
        let mut lhs = self.implicit()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Op('*')) => Op::Mul,
                Some(Tok::Op('/')) => Op::Div,
                _ => return Ok(lhs),
            };
            self.at += 1;
            let rhs = self.implicit()?;
            lhs = join(op, vec![lhs, rhs])?;
        }
    }

    fn implicit(&mut self) -> Result<Tree, ExprError> {
        let mut lhs = self.fraction()?;
        while matches!(self.peek(), Some(Tok::Num(_) | Tok::Ident(_) | Tok::LParen)) {
            let rhs = self.fraction()?;
            lhs = join(Op::Mul, vec![lhs, rhs])?;
        }
        Ok(lhs)
    }

    /// `1/2 n` reads as `(1/2) n`: a numeric divisor followed by a symbol or
    /// group binds to the number on its left.
    fn fraction(&mut self) -> Result<Tree, ExprError> {
        let mut lhs = self.unary()?;
        while is_numeric(&lhs.node)
            && self.peek() == Some(&Tok::Op('/'))
            && matches!(self.peek_at(1), Some(Tok::Num(_)))
            && matches!(self.peek_at(2), Some(Tok::Ident(_) | Tok::LParen))
        {
            self.at += 1;
            let rhs = self.unary()?;
            lhs = join(Op::Div, vec![lhs, rhs])?;
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Tree, ExprError> {
        self.nesting += 1;
        if self.nesting > MAX_EXPR_DEPTH {
            return Err(too_deep());
        }
        let out = match self.peek() {
            Some(Tok::Op('-')) => {
                self.at += 1;
                self.unary().and_then(|inner| join(Op::Neg, vec![inner]))
            }
            Some(Tok::Op('+')) => {
                self.at += 1;
                self.unary()
            }
            _ => self.power(),
        };
        self.nesting -= 1;
        out
    }

    fn power(&mut self) -> Result<Tree, ExprError> {
        let base = self.primary()?;
        if self.peek() == Some(&Tok::Op('^')) {
            self.at += 1;
            let exponent = self.unary()?;
            return join(Op::Pow, vec![base, exponent]);
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Tree, ExprError> {
        match self.peek() {
            Some(Tok::Num(v)) => {
                let v = *v;
                self.at += 1;
                Ok(Tree::leaf(Node::Constant(v)))
            }
            Some(Tok::Ident(name)) => {
                let name = name.clone();
                self.at += 1;
                if self.peek() == Some(&Tok::LParen) && is_known_function(&name) {
                    self.at += 1;
                    let args = self.arguments()?;
                    let depth = 1 + args.iter().map(|a| a.depth).max().unwrap_or(0);
                    if depth > MAX_EXPR_DEPTH {
                        return Err(too_deep());
                    }
                    let args = args.into_iter().map(|a| a.node).collect();
                    Ok(Tree {
                        node: Node::call(name, args),
                        depth,
                    })
                } else {
                    Ok(Tree::leaf(Node::Symbol(name)))
                }
            }
            Some(Tok::LParen) => {
                self.at += 1;
                let inner = self.sum()?;
                self.expect(Tok::RParen)?;
                if inner.depth >= MAX_EXPR_DEPTH {
                    return Err(too_deep());
                }
                Ok(Tree {
                    node: Node::paren(inner.node),
                    depth: inner.depth + 1,
                })
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Arguments after an opening parenthesis, consuming the closing one.
    fn arguments(&mut self) -> Result<Vec<Tree>, ExprError> {
        let mut args = Vec::new();
        if self.peek() == Some(&Tok::RParen) {
            self.at += 1;
            return Ok(args);
        }
        loop {
            args.push(self.sum()?);
            match self.bump() {
                Some(Tok::Comma) => continue,
                Some(Tok::RParen) => return Ok(args),
                _ => {
                    self.at -= 1;
                    return Err(self.unexpected());
                }
            }
        }
    }
}

/// A number, possibly negated: the left side of `1/2 n`.
fn is_numeric(node: &Node) -> bool {
    match node {
        Node::Constant(_) => true,
        Node::Operator { op: Op::Neg, args } => matches!(args.as_slice(), [Node::Constant(_)]),
        _ => false,
    }
}

fn describe(t: &Tok) -> String {
    match t {
        Tok::Num(v) => v.to_string(),
        Tok::Ident(s) => s.clone(),
        Tok::Op(c) => c.to_string(),
        Tok::LParen => "(".into(),
        Tok::RParen => ")".into(),
        Tok::Comma => ",".into(),
    }
}

/// Parse a canonical algebraic string into an expression tree.
pub fn parse(src: &str) -> Result<Node, ExprError> {
    let toks = tokenize(src)?;
    if toks.is_empty() {
        return Err(ExprError::Empty);
    }
    let mut p = Parser {
        toks,
        at: 0,
        nesting: 0,
    };
    let tree = p.sum()?;
    if p.at < p.toks.len() {
        return Err(p.unexpected());
    }
    Ok(tree.node)
}
