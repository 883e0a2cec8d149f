//! Expression tree and its canonical rendering.
//!
//! - `Op`: the five binary operators plus unary negation.
//! - `Node`: constants, symbols, operator applications, explicit parentheses
//!   and function calls. Parentheses are kept as nodes so the log-space
//!   rewriter can see through them.

use std::fmt;

/// Operator kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
}

impl Op {
    #[inline]
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub | Op::Neg => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Pow => "^",
        }
    }

    #[inline]
    fn precedence(self) -> u8 {
        match self {
            Op::Add | Op::Sub => 1,
            Op::Mul | Op::Div => 2,
            Op::Neg => 3,
            Op::Pow => 4,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Algebraic expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Constant(f64),
    Symbol(String),
    Operator { op: Op, args: Vec<Node> },
    Paren(Box<Node>),
    Call { name: String, args: Vec<Node> },
}

impl Node {
    #[inline]
    pub fn constant(value: f64) -> Self {
        Node::Constant(value)
    }

    #[inline]
    pub fn symbol(name: impl Into<String>) -> Self {
        Node::Symbol(name.into())
    }

    #[inline]
    pub fn op(op: Op, args: Vec<Node>) -> Self {
        Node::Operator { op, args }
    }

    #[inline]
    pub fn call(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::Call {
            name: name.into(),
            args,
        }
    }

    #[inline]
    pub fn paren(inner: Node) -> Self {
        Node::Paren(Box::new(inner))
    }

    /// Replace every occurrence of symbol `name` by `replacement`.
    pub fn substitute(&self, name: &str, replacement: &Node) -> Node {
        match self {
            Node::Symbol(s) if s == name => replacement.clone(),
            Node::Constant(_) | Node::Symbol(_) => self.clone(),
            Node::Operator { op, args } => Node::Operator {
                op: *op,
                args: args.iter().map(|a| a.substitute(name, replacement)).collect(),
            },
            Node::Paren(inner) => Node::paren(inner.substitute(name, replacement)),
            Node::Call { name: f, args } => Node::Call {
                name: f.clone(),
                args: args.iter().map(|a| a.substitute(name, replacement)).collect(),
            },
        }
    }

    /// Free symbols in first-occurrence order (constants `e`/`pi` included if used).
    pub fn symbols(&self) -> Vec<&str> {
        fn walk<'a>(n: &'a Node, out: &mut Vec<&'a str>) {
            match n {
                Node::Symbol(s) => {
                    if !out.contains(&s.as_str()) {
                        out.push(s);
                    }
                }
                Node::Constant(_) => {}
                Node::Operator { args, .. } | Node::Call { args, .. } => {
                    args.iter().for_each(|a| walk(a, out))
                }
                Node::Paren(inner) => walk(inner, out),
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }

    fn precedence(&self) -> u8 {
        match self {
            Node::Operator { op, args } if args.len() >= 2 || *op == Op::Neg => op.precedence(),
            Node::Constant(v) if *v < 0.0 => Op::Neg.precedence(),
            _ => u8::MAX,
        }
    }
}

fn fmt_constant(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        write!(f, "{}", v as i64)
    } else {
        write!(f, "{v:?}")
    }
}

fn fmt_operand(child: &Node, wrap: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if wrap {
        write!(f, "({child})")
    } else {
        write!(f, "{child}")
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Constant(v) => fmt_constant(*v, f),
            Node::Symbol(s) => f.write_str(s),
            Node::Paren(inner) => write!(f, "({inner})"),
            Node::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }
            Node::Operator { op: Op::Neg, args } => {
                f.write_str("-")?;
                for a in args {
                    fmt_operand(a, a.precedence() < Op::Neg.precedence(), f)?;
                }
                Ok(())
            }
            Node::Operator { op, args } => {
                let p = op.precedence();
                for (i, a) in args.iter().enumerate() {
                    let wrap = if i == 0 {
                        // `^` is right-associative: a left operand of equal rank needs parens.
                        a.precedence() < p || (*op == Op::Pow && a.precedence() == p)
                    } else {
                        a.precedence() < p
                            || (a.precedence() == p && matches!(op, Op::Sub | Op::Div))
                    };
                    if i > 0 {
                        match op {
                            Op::Pow => f.write_str("^")?,
                            _ => write!(f, " {op} ")?,
                        }
                    }
                    fmt_operand(a, wrap, f)?;
                }
                Ok(())
            }
        }
    }
}
