//! Bisection under an assumed single, increasing sign change.
//!
//! Purpose
//! - Locate crossover points: the smallest `x ∈ [a, b]` with `f(x) ≈ 0`, where
//!   `f < 0` means "still within budget" and `f ≥ 0` means "over".
//!
//! Outcomes
//! - Non-finite `f(a)`, `f(b)` or midpoint value → domain failure.
//! - `f(a) ≥ 0` → the root is at or before `a` (reported as `0`).
//! - `f(b) < 0` → no root up to `b` (reported as `+∞`).
//! - Otherwise the midpoint once `|f(mid)| ≤ tol` or the bracket is within `tol`;
//!   after `max_iterations` the last midpoint is returned as a best effort.
//!
//! `search` keeps the distinction between converged and iteration-limited
//! results; `find_root` collapses it to a plain number.

use tracing::{debug, warn};

#[derive(Clone, Copy, Debug)]
pub struct BisectCfg {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for BisectCfg {
    fn default() -> Self {
        Self {
            tolerance: 1e-7,
            max_iterations: 1000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RootSearch {
    /// `f` was not finite at an endpoint or a midpoint.
    Domain,
    AtOrBeforeStart,
    BeyondEnd,
    Converged { x: f64, iterations: usize, width: f64 },
    /// Best effort: the last midpoint and the bracket width left.
    IterationLimit { x: f64, width: f64 },
}

impl RootSearch {
    /// `None` for domain failures, `0` / `+∞` for the short-circuits.
    pub fn value(&self) -> Option<f64> {
        match *self {
            RootSearch::Domain => None,
            RootSearch::AtOrBeforeStart => Some(0.0),
            RootSearch::BeyondEnd => Some(f64::INFINITY),
            RootSearch::Converged { x, .. } | RootSearch::IterationLimit { x, .. } => Some(x),
        }
    }

    #[inline]
    pub fn converged(&self) -> bool {
        !matches!(self, RootSearch::IterationLimit { .. } | RootSearch::Domain)
    }
}

pub fn search<F>(mut f: F, a: f64, b: f64, cfg: &BisectCfg) -> RootSearch
where
    F: FnMut(f64) -> f64,
{
    let (fa, fb) = (f(a), f(b));
    if !fa.is_finite() || !fb.is_finite() {
        debug!(a, b, fa, fb, "bisection endpoints out of domain");
        return RootSearch::Domain;
    }
    if fa >= 0.0 {
        return RootSearch::AtOrBeforeStart;
    }
    if fb < 0.0 {
        return RootSearch::BeyondEnd;
    }

    let (mut lo, mut hi, mut f_lo) = (a, b, fa);
    let mut mid = lo + (hi - lo) / 2.0;
    for iterations in 1..=cfg.max_iterations {
        mid = lo + (hi - lo) / 2.0;
        let f_mid = f(mid);
        if !f_mid.is_finite() {
            debug!(mid, "bisection midpoint out of domain");
            return RootSearch::Domain;
        }
        if f_mid.abs() <= cfg.tolerance || hi - lo <= cfg.tolerance {
            let out = RootSearch::Converged {
                x: mid,
                iterations,
                width: hi - lo,
            };
            debug!(?out, "bisection converged");
            return out;
        }
        if f_lo * f_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }
    warn!(
        x = mid,
        width = hi - lo,
        max_iterations = cfg.max_iterations,
        "bisection hit the iteration limit"
    );
    RootSearch::IterationLimit { x: mid, width: hi - lo }
}

#[inline]
pub fn find_root<F>(f: F, a: f64, b: f64, cfg: &BisectCfg) -> Option<f64>
where
    F: FnMut(f64) -> f64,
{
    search(f, a, b, cfg).value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn finds_linear_root() {
        let x = find_root(|x| x - 5.0, 0.0, 10.0, &BisectCfg::default()).unwrap();
        assert!((x - 5.0).abs() < 1e-6);
    }

    #[test]
    fn short_circuits_on_monotone_boundaries() {
        let cfg = BisectCfg::default();
        assert_eq!(find_root(|_| 3.0, 0.0, 10.0, &cfg), Some(0.0));
        assert_eq!(find_root(|_| 0.0, 0.0, 10.0, &cfg), Some(0.0));
        assert_eq!(find_root(|_| -3.0, 0.0, 10.0, &cfg), Some(f64::INFINITY));
    }

    #[test]
    fn domain_failures_yield_none() {
        let cfg = BisectCfg::default();
        assert_eq!(find_root(|_| f64::NAN, 0.0, 1.0, &cfg), None);
        assert_eq!(find_root(|x| 1.0 / (x - 1.0), 0.0, 1.0, &cfg), None);
        // finite endpoints, NaN inside
        let f = |x: f64| if (x - 0.5).abs() < 1e-9 { f64::NAN } else { x - 0.75 };
        assert_eq!(search(f, 0.0, 1.0, &cfg), RootSearch::Domain);
    }

    #[test]
    fn iteration_limit_is_reported() {
        let cfg = BisectCfg {
            tolerance: 1e-12,
            max_iterations: 3,
        };
        let out = search(|x| x - 0.3, 0.0, 1.0, &cfg);
        match out {
            RootSearch::IterationLimit { x, width } => {
                assert_eq!(x, 0.375);
                assert_eq!(width, 0.125);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!out.converged());
        assert_eq!(out.value(), Some(0.375));
    }

    #[test]
    fn converged_reports_iterations_and_width() {
        let out = search(|x| x * x * x - 8.0, 0.0, 4.0, &BisectCfg::default());
        match out {
            RootSearch::Converged { x, iterations, width } => {
                assert!((x - 2.0).abs() < 1e-6);
                assert!(iterations >= 1);
                assert!(width <= 4.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        // the first midpoint hits the root exactly
        let out = search(|x| x - 2.0, 0.0, 4.0, &BisectCfg::default());
        assert_eq!(
            out,
            RootSearch::Converged {
                x: 2.0,
                iterations: 1,
                width: 4.0
            }
        );
    }

    proptest! {
        #[test]
        fn prop_idempotent(root in -50.0f64..50.0, scale in 0.1f64..100.0) {
            let cfg = BisectCfg::default();
            let f = |x: f64| scale * (x - root);
            let first = find_root(f, -100.0, 100.0, &cfg);
            let second = find_root(f, -100.0, 100.0, &cfg);
            prop_assert_eq!(first, second);
            prop_assert!((first.unwrap() - root).abs() < 1e-5);
        }
    }
}
