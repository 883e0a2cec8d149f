//! Curated internal API for the CLI and experiments (UNSTABLE).
//!
//! Important
//! - This is not a public API. Breaking changes are allowed and expected.
//! - Prefer these re-exports for clarity and consistency across callers.

// Notation and expressions
pub use crate::expr::logform::{to_log_form, LogFormError, LoggedFn};
pub use crate::expr::{parse, Builtin, CostExpression, ExprEngine, ExprError, Node, Op, Scope};
pub use crate::notation::{convert, convert_detailed, Unavailable};
// Hardware roadmap
pub use crate::roadmap::{Extrapolation, Fit, RegressionCache, Roadmap, RoadmapError};
// Qubit mappings
pub use crate::qubits::{MappingCfg, MappingError, MappingKind, QubitMapping};
// Solving
pub use crate::bisect::{find_root, search, BisectCfg, RootSearch};
pub use crate::crossover::{
    advantage_size, advantage_year, feasible_size_log10, CrossoverError, CrossoverQuery,
    YearQuery,
};
// Records
pub use crate::catalog::{
    build_catalog, create_variant, dedup, default_problems, estimate_metrics, records_from_rows,
    Catalog, Metrics, ProblemSources, ProblemTable, ProblemVariants, RawRecord, Sheet,
    SheetError, SheetSource, Side, SourceCategory, Variant,
};
