//! Roadmap data and its validation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How capacity grows between and beyond known years.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extrapolation {
    Linear,
    Exponential,
}

impl FromStr for Extrapolation {
    type Err = RoadmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "exponential" | "exp" => Ok(Self::Exponential),
            other => Err(RoadmapError::UnknownExtrapolation(other.to_string())),
        }
    }
}

impl fmt::Display for Extrapolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linear => "linear",
            Self::Exponential => "exponential",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoadmapError {
    #[error("roadmap has no points")]
    Empty,
    #[error("year `{0}` is not a number")]
    InvalidYear(String),
    #[error("year {0} is not finite")]
    NonFiniteYear(f64),
    #[error("year {0} appears twice")]
    DuplicateYear(f64),
    #[error("capacity {capacity} at year {year} must be positive and finite")]
    NonPositiveCapacity { year: f64, capacity: f64 },
    #[error("extrapolation needs at least 2 points, roadmap has {found}")]
    InsufficientPoints { found: usize },
    #[error("linear estimate {estimate} at year {year} is not positive")]
    NonPositiveEstimate { year: f64, estimate: f64 },
    #[error("unknown extrapolation `{0}` (expected linear or exponential)")]
    UnknownExtrapolation(String),
}

/// Year → capacity table, sorted ascending by year, all capacities > 0.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>")]
pub struct Roadmap {
    pub(super) years: Vec<f64>,
    pub(super) capacities: Vec<f64>,
}

impl Roadmap {
    /// Build from `(year, capacity)` pairs in any order.
    pub fn new<I>(points: I) -> Result<Self, RoadmapError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut pts: Vec<(f64, f64)> = points.into_iter().collect();
        if pts.is_empty() {
            return Err(RoadmapError::Empty);
        }
        for &(year, capacity) in &pts {
            if !year.is_finite() {
                return Err(RoadmapError::NonFiniteYear(year));
            }
            if !(capacity.is_finite() && capacity > 0.0) {
                return Err(RoadmapError::NonPositiveCapacity { year, capacity });
            }
        }
        pts.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(w) = pts.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(RoadmapError::DuplicateYear(w[0].0));
        }
        let (years, capacities) = pts.into_iter().unzip();
        Ok(Self { years, capacities })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.years.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.years.iter().copied().zip(self.capacities.iter().copied())
    }

    /// Latest known year.
    #[inline]
    pub fn last_year(&self) -> f64 {
        self.years[self.years.len() - 1]
    }

    #[inline]
    pub fn first_year(&self) -> f64 {
        self.years[0]
    }
}

impl TryFrom<BTreeMap<String, f64>> for Roadmap {
    type Error = RoadmapError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut points = Vec::with_capacity(map.len());
        for (key, capacity) in map {
            let year = key
                .trim()
                .parse::<f64>()
                .map_err(|_| RoadmapError::InvalidYear(key.clone()))?;
            points.push((year, capacity));
        }
        Self::new(points)
    }
}
