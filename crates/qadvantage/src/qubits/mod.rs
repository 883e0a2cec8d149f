//! Qubit count ↔ problem size mappings.
//!
//! Purpose
//! - Classify a textual mapping `size = f(q)` into a closed-form family or a
//!   custom expression (`QubitMapping::classify`).
//! - Invert it in log space: log10 problem size → log10 qubits
//!   (`size_exponent_to_qubits_log10`), never returning non-finite values.
//! - Evaluate it forward: qubits → problem size (`qubits_to_value`), with
//!   closed forms for the named families and the expression engine for the rest.
//!
//! Families (after normalization: trim, `{q}` → `q`, no whitespace, lowercase)
//! - `q` → Linear
//! - `2^q`, `2^(q)` → Exponential
//! - `2^(2^q)`, `2^(2^(q))` → DoubleExponential
//! - `log(q)`, `log10(q)` → Logarithmic base 10; `log(q,2)`, `log2(q)` → base 2

use std::f64::consts::{LOG10_2, LOG2_10};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::cfg::{finite_or, DEFAULT_CLAMP, MIN_LOG10_Q, MIN_POSITIVE_Q};
use crate::expr::{Builtin, ExprEngine, ExprError, Scope};

static BRACED_Q: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\{\s*q\s*\}").expect("static pattern"));

/// Forward-evaluation options.
#[derive(Clone, Copy, Debug)]
pub struct MappingCfg {
    /// Accept results ≤ 0 instead of reporting them.
    pub allow_non_positive: bool,
    /// Stand-in for results that overflow.
    pub clamp_ceiling: f64,
}

impl Default for MappingCfg {
    fn default() -> Self {
        Self {
            allow_non_positive: false,
            clamp_ceiling: DEFAULT_CLAMP,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MappingError {
    #[error("expression evaluated to a non-positive number ({0})")]
    NonPositive(f64),
    #[error("expression did not produce a finite number")]
    NonFinite,
    #[error(transparent)]
    Expr(#[from] ExprError),
}

/// Mapping family.
#[derive(Clone, Debug, PartialEq)]
pub enum MappingKind {
    Linear,
    Exponential,
    DoubleExponential,
    Logarithmic { base: f64 },
    /// Anything else, with `{q}` already rewritten to `q`.
    Custom(String),
}

/// A classified mapping plus the text it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct QubitMapping {
    pub source: String,
    pub kind: MappingKind,
}

/// Accept both `{q}` and `q`.
pub fn unbrace(expr: &str) -> String {
    BRACED_Q.replace_all(expr, "q").into_owned()
}

fn normalized_key(expr: &str) -> String {
    unbrace(expr.trim())
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

#[inline]
fn clamped_log10(q: f64) -> f64 {
    let q = if q.is_finite() && q > 0.0 { q } else { MIN_POSITIVE_Q };
    finite_or(q.log10(), MIN_LOG10_Q)
}

impl QubitMapping {
    pub fn classify(source: &str) -> Self {
        let kind = match normalized_key(source).as_str() {
            "q" => MappingKind::Linear,
            "2^q" | "2^(q)" => MappingKind::Exponential,
            "2^(2^q)" | "2^(2^(q))" => MappingKind::DoubleExponential,
            "log(q)" | "log10(q)" => MappingKind::Logarithmic { base: 10.0 },
            "log(q,2)" | "log2(q)" => MappingKind::Logarithmic { base: 2.0 },
            _ => MappingKind::Custom(unbrace(source.trim())),
        };
        Self {
            source: source.to_string(),
            kind,
        }
    }

    #[inline]
    pub fn is_builtin(&self) -> bool {
        !matches!(self.kind, MappingKind::Custom(_))
    }

    /// log10 of the qubits needed for a problem of size `10^log_size`.
    ///
    /// Custom mappings are not inverted; they are treated as `size == q`.
    pub fn size_exponent_to_qubits_log10(&self, log_size: f64) -> f64 {
        match &self.kind {
            MappingKind::Linear | MappingKind::Custom(_) => finite_or(log_size, MIN_LOG10_Q),
            // 10^s = 2^q  ⇒  q = s / log10(2)
            MappingKind::Exponential => clamped_log10(log_size / LOG10_2),
            // 10^s = 2^(2^q)  ⇒  q = log2(s · log2(10))
            MappingKind::DoubleExponential => {
                let inner = log_size * LOG2_10;
                clamped_log10(inner.max(MIN_POSITIVE_Q).log2())
            }
            // 10^s = log_b(q)  ⇒  log10(q) = 10^s · log10(b)
            MappingKind::Logarithmic { base } => {
                finite_or(10f64.powf(log_size) * base.log10(), MIN_LOG10_Q).max(MIN_LOG10_Q)
            }
        }
    }

    /// Problem size addressed by `q` qubits, using the default engine.
    pub fn qubits_to_value(&self, q: f64, cfg: &MappingCfg) -> Result<f64, MappingError> {
        self.qubits_to_value_with(&Builtin, q, cfg)
    }

    /// Problem size addressed by `q` qubits; custom mappings go through `engine`.
    pub fn qubits_to_value_with<E: ExprEngine>(
        &self,
        engine: &E,
        q: f64,
        cfg: &MappingCfg,
    ) -> Result<f64, MappingError> {
        let value = match &self.kind {
            MappingKind::Linear => q,
            MappingKind::Exponential => finite_or(2f64.powf(q), cfg.clamp_ceiling),
            MappingKind::DoubleExponential => {
                finite_or(2f64.powf(2f64.powf(q)), cfg.clamp_ceiling)
            }
            MappingKind::Logarithmic { base } => {
                if q <= 0.0 {
                    return Err(MappingError::NonPositive(q));
                }
                q.log10() / base.log10()
            }
            MappingKind::Custom(expr) => {
                let f = engine.compile(expr)?;
                finite_or(f(&Scope::new().with("q", q))?, cfg.clamp_ceiling)
            }
        };
        if !value.is_finite() {
            return Err(MappingError::NonFinite);
        }
        if value <= 0.0 && !cfg.allow_non_positive {
            return Err(MappingError::NonPositive(value));
        }
        Ok(value)
    }

    /// log10 problem size addressed by `10^log_q` qubits, evaluated in log
    /// space; overflow is replaced by `log10(cfg.clamp_ceiling)`.
    pub fn qubits_log10_to_size_log10(
        &self,
        log_q: f64,
        cfg: &MappingCfg,
    ) -> Result<f64, MappingError> {
        let ceiling = cfg.clamp_ceiling.log10();
        let value = match &self.kind {
            MappingKind::Linear => log_q,
            MappingKind::Exponential => finite_or(10f64.powf(log_q) * LOG10_2, ceiling),
            MappingKind::DoubleExponential => {
                finite_or(2f64.powf(10f64.powf(log_q)) * LOG10_2, ceiling)
            }
            MappingKind::Logarithmic { base } => {
                // size = log10(q) / log10(b) must be positive
                let size = log_q / base.log10();
                if size <= 0.0 {
                    return Err(MappingError::NonPositive(size));
                }
                size.log10()
            }
            MappingKind::Custom(_) => {
                let strict = MappingCfg {
                    allow_non_positive: false,
                    ..*cfg
                };
                self.qubits_to_value(10f64.powf(log_q), &strict)?.log10()
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(MappingError::NonFinite)
        }
    }
}

#[cfg(test)]
mod tests;
