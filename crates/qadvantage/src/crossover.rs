//! Crossover queries built on the root-finder.
//!
//! All cost functions here are `LoggedFn`s over the problem-size exponent:
//! `f(x) = log10(cost(10^x))` (see `LoggedFn::over_size_exponent`).
//!
//! - `CrossoverQuery::time_feasible_size`: largest problem size whose quantum
//!   cost fits a log10 operation budget.
//! - `advantage_size`: problem size where slowed-down quantum cost first drops
//!   below classical cost.
//! - `feasible_size_log10` / `advantage_year`: what the hardware roadmap can
//!   address in a given year, and the first year that reaches a target size.

use thiserror::Error;
use tracing::debug;

use crate::bisect::{find_root, search, BisectCfg, RootSearch};
use crate::cfg::SIZE_HORIZON_LOG10;
use crate::expr::logform::LoggedFn;
use crate::qubits::{MappingCfg, MappingError, QubitMapping};
use crate::roadmap::{Extrapolation, RegressionCache, Roadmap, RoadmapError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CrossoverError {
    #[error(transparent)]
    Roadmap(#[from] RoadmapError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Overflow in log space means "beyond any budget"; NaN stays a domain failure.
#[inline]
fn saturate(v: f64) -> f64 {
    if v.is_infinite() {
        v.signum() * f64::MAX
    } else {
        v
    }
}

/// Quantum cost against a log10 operation budget.
#[derive(Clone, Copy, Debug)]
pub struct CrossoverQuery<'a> {
    pub quantum: &'a LoggedFn,
    /// Extra cost factor (e.g. error-correction overhead); absent means 1.
    pub penalty: Option<&'a LoggedFn>,
    pub log_budget: f64,
    /// log10 of the hardware slowdown relative to classical operations.
    pub slowdown_log: f64,
}

impl<'a> CrossoverQuery<'a> {
    pub fn new(quantum: &'a LoggedFn, log_budget: f64) -> Self {
        Self {
            quantum,
            penalty: None,
            log_budget,
            slowdown_log: 0.0,
        }
    }

    pub fn with_penalty(mut self, penalty: &'a LoggedFn) -> Self {
        self.penalty = Some(penalty);
        self
    }

    pub fn with_slowdown_log(mut self, slowdown_log: f64) -> Self {
        self.slowdown_log = slowdown_log;
        self
    }

    /// log10 total cost minus the budget.
    pub fn excess(&self, x: f64) -> f64 {
        let penalty = self.penalty.map_or(0.0, |p| p.eval_or_nan(x));
        saturate(self.quantum.eval_or_nan(x) + penalty + self.slowdown_log - self.log_budget)
    }

    /// Largest problem size within budget, searched on `[0, SIZE_HORIZON_LOG10]`.
    ///
    /// The result is already the base-10 exponent: `6.0` means a problem of
    /// size `10^6`. Do not take `log10` of it again.
    ///
    /// `-∞` when even size 1 is over budget; `+∞` when the horizon stays within
    /// budget or the cost is undefined somewhere on the way.
    pub fn time_feasible_size(&self, cfg: &BisectCfg) -> f64 {
        if self.excess(0.0) > 0.0 {
            return f64::NEG_INFINITY;
        }
        match find_root(|x| self.excess(x), 0.0, SIZE_HORIZON_LOG10, cfg) {
            Some(x) if x.is_finite() => x,
            other => {
                debug!(?other, "time-feasible size unbounded");
                f64::INFINITY
            }
        }
    }
}

/// Problem-size exponent where `quantum + slowdown_log` first drops below
/// `classical`; `Some(0)` if it already does at size 1, `Some(+∞)` if it
/// never does up to the horizon, `None` if either cost is undefined.
pub fn advantage_size(
    quantum: &LoggedFn,
    classical: &LoggedFn,
    slowdown_log: f64,
    cfg: &BisectCfg,
) -> Option<f64> {
    let gap = |x: f64| {
        saturate(classical.eval_or_nan(x) - (quantum.eval_or_nan(x) + slowdown_log))
    };
    find_root(gap, 0.0, SIZE_HORIZON_LOG10, cfg)
}

/// log10 problem size addressable by the roadmap's capacity in `year`.
pub fn feasible_size_log10(
    roadmap: &Roadmap,
    year: f64,
    kind: Extrapolation,
    mapping: &QubitMapping,
    cache: &RegressionCache,
    cfg: &MappingCfg,
) -> Result<f64, CrossoverError> {
    let log_q = roadmap.capacity_log10(year, kind, cache)?;
    Ok(mapping.qubits_log10_to_size_log10(log_q, cfg)?)
}

/// Inputs for the year search.
#[derive(Clone, Copy, Debug)]
pub struct YearQuery<'a> {
    pub roadmap: &'a Roadmap,
    pub extrapolation: Extrapolation,
    pub mapping: &'a QubitMapping,
    pub cache: &'a RegressionCache,
    pub from: f64,
    pub to: f64,
}

impl YearQuery<'_> {
    fn size_at(&self, year: f64, cfg: &MappingCfg) -> f64 {
        feasible_size_log10(
            self.roadmap,
            year,
            self.extrapolation,
            self.mapping,
            self.cache,
            cfg,
        )
        .unwrap_or(f64::NAN)
    }
}

/// Earliest year in `[from, to]` whose feasible problem size reaches
/// `target_log10`; `Some(from)` if it already does, `Some(+∞)` if it never
/// does within the window, `None` if the roadmap or mapping cannot be
/// evaluated there.
pub fn advantage_year(
    query: &YearQuery<'_>,
    target_log10: f64,
    mapping_cfg: &MappingCfg,
    cfg: &BisectCfg,
) -> Option<f64> {
    if target_log10.is_nan() {
        return None;
    }
    if target_log10 == f64::INFINITY {
        return Some(f64::INFINITY);
    }
    let h = |year: f64| query.size_at(year, mapping_cfg) - target_log10;
    match search(h, query.from, query.to, cfg) {
        RootSearch::AtOrBeforeStart => Some(query.from),
        other => other.value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logged(expr: &str) -> LoggedFn {
        LoggedFn::over_size_exponent(expr).unwrap()
    }

    #[test]
    fn time_feasible_size_inverts_the_budget() {
        // n^2 within 10^12 operations ⇒ n = 10^6
        let q = logged("n^2");
        let x = CrossoverQuery::new(&q, 12.0).time_feasible_size(&BisectCfg::default());
        assert!((x - 6.0).abs() < 1e-6);
        // An exponent, not a size: cost at 10^x is the budget itself.
        assert!((q.eval(x).unwrap() - 12.0).abs() < 1e-5);

        // slowdown 10^2 and penalty n ⇒ 3x + 2 = 12
        let p = logged("n");
        let x = CrossoverQuery::new(&q, 12.0)
            .with_penalty(&p)
            .with_slowdown_log(2.0)
            .time_feasible_size(&BisectCfg::default());
        assert!((x - 10.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn time_feasible_size_sentinels() {
        let cfg = BisectCfg::default();
        let q = logged("n");
        let over = CrossoverQuery::new(&q, 2.0).with_slowdown_log(5.0);
        assert_eq!(over.time_feasible_size(&cfg), f64::NEG_INFINITY);
        assert_eq!(CrossoverQuery::new(&q, 1e6).time_feasible_size(&cfg), f64::INFINITY);
        // exactly on budget at size 1
        assert_eq!(CrossoverQuery::new(&q, 0.0).time_feasible_size(&cfg), 0.0);
    }

    #[test]
    fn double_exponential_costs_stay_finite() {
        // 2^(2^n) over n = 10^x: log10 cost = 2^(10^x) · log10 2
        let q = logged("2^(2^n)");
        let x = CrossoverQuery::new(&q, 100.0).time_feasible_size(&BisectCfg::default());
        let expected = (100.0 / 2f64.log10()).log2().log10();
        assert!((x - expected).abs() < 1e-6, "{x} vs {expected}");
    }

    #[test]
    fn grover_style_advantage() {
        // classical n, quantum sqrt(n) slowed by 10^4 ⇒ x/2 + 4 = x at x = 8
        let classical = logged("n");
        let quantum = logged("n^(1/2)");
        let x = advantage_size(&quantum, &classical, 4.0, &BisectCfg::default()).unwrap();
        assert!((x - 8.0).abs() < 1e-6);
        // no slowdown: advantage from size 1 on
        assert_eq!(advantage_size(&quantum, &classical, 0.0, &BisectCfg::default()), Some(0.0));
        // same scaling never catches up
        assert_eq!(
            advantage_size(&classical, &classical, 1.0, &BisectCfg::default()),
            Some(f64::INFINITY)
        );
    }

    #[test]
    fn year_search_over_roadmap() {
        let road = Roadmap::new([(2020.0, 100.0), (2030.0, 100_000.0)]).unwrap();
        let mapping = QubitMapping::classify("q");
        let cache = RegressionCache::new();
        let query = YearQuery {
            roadmap: &road,
            extrapolation: Extrapolation::Exponential,
            mapping: &mapping,
            cache: &cache,
            from: 2020.0,
            to: 2050.0,
        };
        let mcfg = MappingCfg::default();
        let cfg = BisectCfg::default();
        // capacity grows 10x every 10/3 years from 10^2
        let year = advantage_year(&query, 4.0, &mcfg, &cfg).unwrap();
        assert!((year - (2020.0 + 20.0 / 3.0)).abs() < 1e-5);
        // past the table: extrapolated
        let year = advantage_year(&query, 6.0, &mcfg, &cfg).unwrap();
        assert!((year - (2020.0 + 40.0 / 3.0)).abs() < 1e-5);
        assert_eq!(advantage_year(&query, 1.0, &mcfg, &cfg), Some(2020.0));
        assert_eq!(advantage_year(&query, 50.0, &mcfg, &cfg), Some(f64::INFINITY));
        assert_eq!(advantage_year(&query, f64::INFINITY, &mcfg, &cfg), Some(f64::INFINITY));
        assert_eq!(advantage_year(&query, f64::NAN, &mcfg, &cfg), None);
    }

    #[test]
    fn feasible_size_goes_through_the_mapping() {
        let road = Roadmap::new([(2020.0, 20.0), (2025.0, 40.0)]).unwrap();
        let cache = RegressionCache::new();
        let mapping = QubitMapping::classify("2^{q}");
        let x = feasible_size_log10(
            &road,
            2020.0,
            Extrapolation::Linear,
            &mapping,
            &cache,
            &MappingCfg::default(),
        )
        .unwrap();
        assert!((x - 20.0 * 2f64.log10()).abs() < 1e-9);

        let single = Roadmap::new([(2020.0, 20.0)]).unwrap();
        let err = feasible_size_log10(
            &single,
            2021.0,
            Extrapolation::Linear,
            &mapping,
            &cache,
            &MappingCfg::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CrossoverError::Roadmap(RoadmapError::InsufficientPoints { .. })));
    }
}
