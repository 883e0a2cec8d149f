//! Least-squares fits and their memo.
//!
//! The cache key is the exact sample window (bit patterns of years and
//! values), so a cached fit is a pure function of its key. Entries are never
//! evicted: windows come from a small, immutable roadmap.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use nalgebra::DVector;
use once_cell::sync::Lazy;

/// Line `y = slope · x + intercept`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
    pub slope: f64,
    pub intercept: f64,
}

impl Fit {
    /// Ordinary least squares on centered samples.
    pub fn least_squares(xs: &[f64], ys: &[f64]) -> Fit {
        debug_assert_eq!(xs.len(), ys.len());
        let x = DVector::from_column_slice(xs);
        let y = DVector::from_column_slice(ys);
        let (x_mean, y_mean) = (x.mean(), y.mean());
        let dx = x.add_scalar(-x_mean);
        let dy = y.add_scalar(-y_mean);
        let slope = dx.dot(&dy) / dx.dot(&dx);
        Fit {
            slope,
            intercept: y_mean - slope * x_mean,
        }
    }

    #[inline]
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct WindowKey {
    xs: Vec<u64>,
    ys: Vec<u64>,
}

impl WindowKey {
    fn new(xs: &[f64], ys: &[f64]) -> Self {
        Self {
            xs: xs.iter().map(|v| v.to_bits()).collect(),
            ys: ys.iter().map(|v| v.to_bits()).collect(),
        }
    }
}

static GLOBAL: Lazy<RegressionCache> = Lazy::new(RegressionCache::new);

/// Thread-safe memo of fits keyed by sample window.
#[derive(Debug, Default)]
pub struct RegressionCache {
    fits: DashMap<WindowKey, Fit>,
    computed: AtomicUsize,
}

impl RegressionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide instance for callers that do not carry their own.
    pub fn global() -> &'static RegressionCache {
        &GLOBAL
    }

    /// Fit for this window, computed at most once per key.
    pub fn fit(&self, xs: &[f64], ys: &[f64]) -> Fit {
        let key = WindowKey::new(xs, ys);
        *self.fits.entry(key).or_insert_with(|| {
            self.computed.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(?xs, ?ys, "regression cache miss");
            Fit::least_squares(xs, ys)
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fits.is_empty()
    }

    /// Number of fits derived so far (misses).
    #[inline]
    pub fn fits_computed(&self) -> usize {
        self.computed.load(Ordering::Relaxed)
    }
}
