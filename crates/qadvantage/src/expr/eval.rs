//! Tree evaluation against named variables, and the engine boundary.

use std::collections::HashMap;
use std::f64::consts::{E, PI};

use super::types::{Node, Op};
use super::{parse, ExprError};

const FUNCTIONS: &[&str] = &[
    "log", "log10", "log2", "ln", "exp", "sqrt", "cbrt", "ceil", "floor", "abs",
];

#[inline]
pub(crate) fn is_known_function(name: &str) -> bool {
    FUNCTIONS.contains(&name)
}

/// Variable bindings. `e` and `pi` resolve to their constants unless shadowed.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    vars: HashMap<String, f64>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style binding.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.vars.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied().or(match name {
            "e" => Some(E),
            "pi" => Some(PI),
            _ => None,
        })
    }
}

fn arity(name: &str, expected: usize, args: &[Node]) -> Result<(), ExprError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ExprError::Arity {
            name: name.to_string(),
            expected,
            found: args.len(),
        })
    }
}

fn call(name: &str, args: &[Node], scope: &Scope) -> Result<f64, ExprError> {
    if name == "log" && args.len() == 2 {
        let x = evaluate(&args[0], scope)?;
        let base = evaluate(&args[1], scope)?;
        return Ok(x.ln() / base.ln());
    }
    arity(name, 1, args)?;
    let x = evaluate(&args[0], scope)?;
    Ok(match name {
        "log" | "ln" => x.ln(),
        "log10" => x.log10(),
        "log2" => x.log2(),
        "exp" => x.exp(),
        "sqrt" => x.sqrt(),
        "cbrt" => x.cbrt(),
        "ceil" => x.ceil(),
        "floor" => x.floor(),
        "abs" => x.abs(),
        _ => return Err(ExprError::UnknownFunction(name.to_string())),
    })
}

/// Evaluate `node` under `scope`. Domain errors (log of a negative, overflow)
/// propagate as NaN/inf; callers decide how to treat non-finite results.
pub fn evaluate(node: &Node, scope: &Scope) -> Result<f64, ExprError> {
    match node {
        Node::Constant(v) => Ok(*v),
        Node::Symbol(s) => scope
            .get(s)
            .ok_or_else(|| ExprError::UndefinedSymbol(s.clone())),
        Node::Paren(inner) => evaluate(inner, scope),
        Node::Call { name, args } => call(name, args, scope),
        Node::Operator { op, args } => {
            let binary = |args: &[Node]| -> Result<(f64, f64), ExprError> {
                arity(op.symbol(), 2, args)?;
                Ok((evaluate(&args[0], scope)?, evaluate(&args[1], scope)?))
            };
            match op {
                Op::Add => args
                    .iter()
                    .try_fold(0.0, |acc, a| -> Result<f64, ExprError> {
                        Ok(acc + evaluate(a, scope)?)
                    }),
                Op::Mul => args
                    .iter()
                    .try_fold(1.0, |acc, a| -> Result<f64, ExprError> {
                        Ok(acc * evaluate(a, scope)?)
                    }),
                Op::Sub => binary(args).map(|(a, b)| a - b),
                Op::Div => binary(args).map(|(a, b)| a / b),
                Op::Pow => binary(args).map(|(a, b)| a.powf(b)),
                Op::Neg => {
                    arity("-", 1, args)?;
                    Ok(-evaluate(&args[0], scope)?)
                }
            }
        }
    }
}

/// Compiled callable over a scope.
pub type CompiledFn = Box<dyn Fn(&Scope) -> Result<f64, ExprError> + Send + Sync>;

/// "Parse this algebraic string into a callable of named variables."
///
/// The mapping and crossover code only depend on this seam; any evaluator
/// library that can honour it is substitutable.
pub trait ExprEngine {
    fn compile(&self, source: &str) -> Result<CompiledFn, ExprError>;
}

/// Default engine backed by this module's parser and evaluator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Builtin;

impl ExprEngine for Builtin {
    fn compile(&self, source: &str) -> Result<CompiledFn, ExprError> {
        let tree = parse(source)?;
        Ok(Box::new(move |scope: &Scope| evaluate(&tree, scope)))
    }
}
