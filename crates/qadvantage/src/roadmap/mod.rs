//! Hardware roadmaps: capacity (log10) for arbitrary years.
//!
//! Purpose
//! - Exact lookup for known years.
//! - Interpolation between the two bracketing known years.
//! - Extrapolation past the last year from a least-squares fit of the last
//!   two points, memoized in a `RegressionCache`.
//!
//! Modes
//! - `Linear`: interpolate/fit raw capacities, then take log10.
//! - `Exponential`: interpolate/fit in log space (geometric growth); the fit
//!   already yields log10 capacity.

mod regression;
mod types;

pub use regression::{Fit, RegressionCache};
pub use types::{Extrapolation, Roadmap, RoadmapError};

impl Roadmap {
    /// log10 of the (estimated) capacity at `year`.
    pub fn capacity_log10(
        &self,
        year: f64,
        kind: Extrapolation,
        cache: &RegressionCache,
    ) -> Result<f64, RoadmapError> {
        if let Some(i) = self.years.iter().position(|&y| y == year) {
            return Ok(self.capacities[i].log10());
        }
        let n = self.len();
        if n < 2 {
            return Err(RoadmapError::InsufficientPoints { found: n });
        }
        if year > self.last_year() {
            let xs = &self.years[n - 2..];
            let ys = &self.capacities[n - 2..];
            return match kind {
                Extrapolation::Linear => {
                    let estimate = cache.fit(xs, ys).at(year);
                    positive(year, estimate).map(f64::log10)
                }
                Extrapolation::Exponential => {
                    let logs = [ys[0].log10(), ys[1].log10()];
                    Ok(cache.fit(xs, &logs).at(year))
                }
            };
        }

        // First segment whose right end reaches `year`; years before the
        // first point fall into the first segment.
        let i = self
            .years
            .windows(2)
            .position(|w| year <= w[1])
            .unwrap_or(n - 2);
        let (x1, x2) = (self.years[i], self.years[i + 1]);
        let (y1, y2) = (self.capacities[i], self.capacities[i + 1]);
        let t = (year - x1) / (x2 - x1);
        match kind {
            Extrapolation::Linear => positive(year, y1 + (y2 - y1) * t).map(f64::log10),
            Extrapolation::Exponential => {
                let (l1, l2) = (y1.ln(), y2.ln());
                Ok((l1 + (l2 - l1) * t).exp().log10())
            }
        }
    }
}

#[inline]
fn positive(year: f64, estimate: f64) -> Result<f64, RoadmapError> {
    if estimate > 0.0 {
        Ok(estimate)
    } else {
        Err(RoadmapError::NonPositiveEstimate { year, estimate })
    }
}
