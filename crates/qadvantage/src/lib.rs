//! Cost models for comparing classical and quantum algorithms.
//!
//! The crate turns loosely formatted complexity notation into evaluable
//! formulas, evaluates them in base-10 log space so that doubly exponential
//! costs stay representable, projects hardware capacity along a roadmap, maps
//! between qubit counts and problem sizes, and bisects for crossover points.
//!
//! Layout (leaf first)
//! - `notation`: raw notation → canonical algebraic string.
//! - `expr`: parser, evaluator and the log-space rewriter (`expr::logform`).
//! - `roadmap`: year → capacity interpolation/extrapolation with memoized fits.
//! - `qubits`: qubit-count ↔ problem-size mappings.
//! - `bisect`: single-sign-change root finder.
//! - `crossover`: budget and advantage queries built from the above.
//! - `catalog`: raw algorithm records → variants for the presentation layer.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; `api`
//!   is the curated surface for the CLI and experiments.

pub mod api;
pub mod bisect;
pub mod catalog;
pub mod cfg;
pub mod crossover;
pub mod expr;
pub mod notation;
pub mod qubits;
pub mod roadmap;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::bisect::{find_root, BisectCfg, RootSearch};
    pub use crate::crossover::CrossoverQuery;
    pub use crate::expr::{logform::LoggedFn, CostExpression, Scope};
    pub use crate::notation::convert;
    pub use crate::qubits::{MappingCfg, QubitMapping};
    pub use crate::roadmap::{Extrapolation, RegressionCache, Roadmap};
}
