//! Algebraic expressions: parse, evaluate, rewrite into log space.
//!
//! Purpose
//! - Parse canonical strings produced by `notation::convert` (mathjs-style
//!   syntax, implicit multiplication included) into a `Node` tree.
//! - Evaluate trees against a `Scope` of named variables.
//! - Rewrite trees so that evaluation yields log10 of the original value
//!   (`logform`), keeping doubly exponential costs finite.
//!
//! Notes
//! - `log(x)` is the natural log and `log(x, b)` takes an explicit base, as in
//!   the formulas the notation converter emits.
//! - Parsed trees are immutable; evaluating the same tree with the same scope
//!   always yields the same value.

mod eval;
pub mod logform;
mod parse;
mod types;

use std::str::FromStr;

use thiserror::Error;

pub use eval::{evaluate, Builtin, CompiledFn, ExprEngine, Scope};
pub use parse::parse;
pub use types::{Node, Op};

use logform::{LogFormError, LoggedFn};

/// Parse and evaluation failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExprError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character `{ch}` at {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unexpected `{found}` at {pos}")]
    UnexpectedToken { found: String, pos: usize },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("invalid number `{text}` at {pos}")]
    InvalidNumber { text: String, pos: usize },
    #[error("undefined symbol `{0}`")]
    UndefinedSymbol(String),
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    #[error("`{name}` expects {expected} argument(s), found {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("expression nested deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// A cost formula: its source text plus the parsed tree.
#[derive(Clone, Debug, PartialEq)]
pub struct CostExpression {
    source: String,
    tree: Node,
}

impl CostExpression {
    pub fn parse(source: impl Into<String>) -> Result<Self, ExprError> {
        let source = source.into();
        let tree = parse(&source)?;
        Ok(Self { source, tree })
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn tree(&self) -> &Node {
        &self.tree
    }

    pub fn eval(&self, scope: &Scope) -> Result<f64, ExprError> {
        evaluate(&self.tree, scope)
    }

    /// Evaluate with a single variable bound.
    pub fn eval_at(&self, var: &str, value: f64) -> Result<f64, ExprError> {
        self.eval(&Scope::new().with(var, value))
    }

    /// Log-space form over the problem-size variable `n`.
    pub fn log_form(&self) -> Result<LoggedFn, LogFormError> {
        LoggedFn::from_tree(&self.tree, "n")
    }
}

impl FromStr for CostExpression {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
