//! Log-space rewriting: `log10(f)` pushed through products, quotients and powers.
//!
//! Rules (applied recursively from the root)
//! - `log(a * b)  → log(a) + log(b)`
//! - `log(a / b)  → log(a) - log(b)`   (exactly two operands)
//! - `log(a ^ b)  → b * log(a)`        (the exponent is kept as is)
//! - `log((a))    → log(a)`
//! - anything else → `log10(node)`     (sums have no closed form)
//!
//! Evaluating the rewritten tree returns log10 of the original value without
//! ever materializing it, so `2^(2^q)` stays finite for moderate `q`.

use thiserror::Error;

use super::eval::evaluate;
use super::types::{Node, Op};
use super::{parse, ExprError, Scope};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LogFormError {
    /// Operator node with the wrong operand count; parsed input never has one.
    #[error("`{op}` expects {expected} operands in log form, found {found}")]
    Arity { op: Op, expected: usize, found: usize },
    #[error(transparent)]
    Parse(#[from] ExprError),
}

#[inline]
fn log10_of(node: &Node) -> Node {
    Node::call("log10", vec![node.clone()])
}

/// Rewrite `node` into a tree evaluating to `log10(node)`.
pub fn to_log_form(node: &Node) -> Result<Node, LogFormError> {
    match node {
        Node::Operator { op: Op::Mul, args } => {
            let mut logged = args.iter().map(to_log_form);
            let first = logged.next().ok_or(LogFormError::Arity {
                op: Op::Mul,
                expected: 2,
                found: 0,
            })??;
            logged.try_fold(first, |acc, arg| -> Result<Node, LogFormError> {
                Ok(Node::op(Op::Add, vec![acc, arg?]))
            })
        }
        Node::Operator { op: Op::Div, args } => match args.as_slice() {
            [numerator, denominator] => Ok(Node::op(
                Op::Sub,
                vec![to_log_form(numerator)?, to_log_form(denominator)?],
            )),
            _ => Err(LogFormError::Arity {
                op: Op::Div,
                expected: 2,
                found: args.len(),
            }),
        },
        Node::Operator { op: Op::Pow, args } => match args.as_slice() {
            [base, exponent] => Ok(Node::op(Op::Mul, vec![exponent.clone(), to_log_form(base)?])),
            _ => Err(LogFormError::Arity {
                op: Op::Pow,
                expected: 2,
                found: args.len(),
            }),
        },
        Node::Paren(inner) => to_log_form(inner),
        Node::Operator { .. } | Node::Call { .. } | Node::Symbol(_) | Node::Constant(_) => {
            Ok(log10_of(node))
        }
    }
}

/// Compiled log-space function of one variable.
#[derive(Clone, Debug, PartialEq)]
pub struct LoggedFn {
    var: String,
    tree: Node,
}

impl LoggedFn {
    /// `x ↦ log10(expr)` with `n = x`.
    pub fn new(expr: &str) -> Result<Self, LogFormError> {
        Self::from_tree(&parse(expr)?, "n")
    }

    /// `x ↦ log10(expr)` with `n = 10^x`: the argument is a base-10 problem-size
    /// exponent. Substitution happens on the tree, so names containing `n`
    /// (`sin`, `ln`) are left alone.
    pub fn over_size_exponent(expr: &str) -> Result<Self, LogFormError> {
        let tree = parse(expr)?;
        let var = Node::symbol("n");
        let size = Node::paren(Node::op(Op::Pow, vec![Node::constant(10.0), var]));
        Self::from_tree(&tree.substitute("n", &size), "n")
    }

    pub fn from_tree(tree: &Node, var: &str) -> Result<Self, LogFormError> {
        Ok(Self {
            var: var.to_string(),
            tree: to_log_form(tree)?,
        })
    }

    #[inline]
    pub fn tree(&self) -> &Node {
        &self.tree
    }

    pub fn eval(&self, x: f64) -> Result<f64, ExprError> {
        evaluate(&self.tree, &Scope::new().with(self.var.as_str(), x))
    }

    /// Like `eval`, with evaluation errors mapped to NaN (for root finding).
    pub fn eval_or_nan(&self, x: f64) -> f64 {
        self.eval(x).unwrap_or(f64::NAN)
    }
}
