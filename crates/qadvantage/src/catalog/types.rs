//! Record and variant types for the algorithm catalog.
//!
//! - `RawRecord`: one algorithm row as delivered by a sheet, untouched text.
//! - `Variant`: the presentation-facing record (serialized camelCase).
//! - `ProblemSources`: which sheet family name feeds a catalog problem.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Where a record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCategory {
    Parallel,
    Sequential,
    Approximate,
    Quantum,
}

impl SourceCategory {
    #[inline]
    pub fn is_quantum(self) -> bool {
        matches!(self, SourceCategory::Quantum)
    }

    /// Display name used in variant references.
    pub fn title(self) -> &'static str {
        match self {
            SourceCategory::Parallel => "Parallel Algos",
            SourceCategory::Sequential => "Sheet1",
            SourceCategory::Approximate => "Approx Algos",
            SourceCategory::Quantum => "Quantum Algorithms",
        }
    }
}

/// One algorithm as read from a sheet; all text trimmed, otherwise raw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRecord {
    pub name: String,
    pub variant: String,
    pub runtime: String,
    pub work: String,
    pub source: SourceCategory,
    pub parallel: bool,
    pub approximation: bool,
}

/// Ordinal ratings; lower is better.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub speed: u8,
    pub work: u8,
    pub span: u8,
    pub space: u8,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            speed: 2,
            work: 2,
            span: 2,
            space: 2,
        }
    }
}

impl Metrics {
    /// Comparison order for picking the best variant.
    #[inline]
    pub fn rank(&self) -> (u8, u8, u8, u8) {
        (self.speed, self.work, self.span, self.space)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub key: String,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub runtime_formula: Option<String>,
    pub work_formula: Option<String>,
    pub metrics: Metrics,
    pub reference: String,
    pub parallel: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Classical,
    Quantum,
}

/// Both variant lists of one problem, in source order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemVariants {
    pub classical: Vec<Variant>,
    pub quantum: Vec<Variant>,
}

impl ProblemVariants {
    #[inline]
    pub fn side(&self, side: Side) -> &[Variant] {
        match side {
            Side::Classical => &self.classical,
            Side::Quantum => &self.quantum,
        }
    }

    pub fn available(&self, side: Side) -> impl Iterator<Item = &Variant> + '_ {
        self.side(side).iter().filter(|v| v.available)
    }

    /// Best available variant by `Metrics::rank` (first wins ties); the first
    /// variant when none is available.
    pub fn best(&self, side: Side) -> Option<&Variant> {
        self.available(side)
            .min_by_key(|v| v.metrics.rank())
            .or_else(|| self.side(side).first())
    }

    pub fn by_key(&self, side: Side, key: &str) -> Option<&Variant> {
        self.side(side).iter().find(|v| v.key == key)
    }

    pub fn available_counts(&self) -> (usize, usize) {
        (
            self.available(Side::Classical).count(),
            self.available(Side::Quantum).count(),
        )
    }
}

/// Problem name → variants.
pub type Catalog = BTreeMap<String, ProblemVariants>;

/// Sheet family names feeding one catalog problem; `None` skips that sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemSources {
    pub parallel: Option<String>,
    pub sheet1: Option<String>,
    pub approx: Option<String>,
    pub quantum: Option<String>,
}

/// Catalog problem name → sources.
pub type ProblemTable = BTreeMap<String, ProblemSources>;
