//! Sheet layouts and the row → record step.
//!
//! Rows are plain strings (header row first). Column indices are fixed per
//! sheet; a row shorter than an index reads as an empty cell.

use std::collections::BTreeMap;

use thiserror::Error;

use super::types::{RawRecord, SourceCategory};

/// The four source sheets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sheet {
    Parallel,
    Sheet1,
    Approx,
    Quantum,
}

impl Sheet {
    pub const ALL: [Sheet; 4] = [Sheet::Parallel, Sheet::Sheet1, Sheet::Approx, Sheet::Quantum];

    /// Tab name in the source workbook.
    pub fn title(self) -> &'static str {
        match self {
            Sheet::Parallel => "Parallel Algos",
            Sheet::Sheet1 => "Sheet1",
            Sheet::Approx => "Approx Algos",
            Sheet::Quantum => "Quantum Algorithms",
        }
    }

    pub fn category(self) -> SourceCategory {
        match self {
            Sheet::Parallel => SourceCategory::Parallel,
            Sheet::Sheet1 => SourceCategory::Sequential,
            Sheet::Approx => SourceCategory::Approximate,
            Sheet::Quantum => SourceCategory::Quantum,
        }
    }

    pub fn layout(self) -> SheetLayout {
        match self {
            Sheet::Parallel => SheetLayout {
                family: 1,
                algorithm: 17,
                variant: 7,
                runtime: 27,
                work: Some(31),
                quantum_flag: None,
            },
            Sheet::Sheet1 => SheetLayout {
                family: 1,
                algorithm: 14,
                variant: 4,
                runtime: 28,
                work: None,
                quantum_flag: Some(50),
            },
            Sheet::Approx => SheetLayout {
                family: 1,
                algorithm: 15,
                variant: 5,
                runtime: 28,
                work: None,
                quantum_flag: None,
            },
            Sheet::Quantum => SheetLayout {
                family: 1,
                algorithm: 13,
                variant: 4,
                runtime: 27,
                work: Some(29),
                quantum_flag: None,
            },
        }
    }
}

/// 0-based column indices of one sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetLayout {
    pub family: usize,
    pub algorithm: usize,
    pub variant: usize,
    pub runtime: usize,
    /// Without a work column, work is the runtime.
    pub work: Option<usize>,
    /// Rows flagged here are quantum entries and are skipped.
    pub quantum_flag: Option<usize>,
}

const QUANTUM_FLAGS: &[&str] = &["1", "Y", "y", "Yes"];

#[inline]
fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map_or("", |s| s.trim())
}

/// Records of `family` in `rows` (header row skipped).
pub fn records_from_rows(rows: &[Vec<String>], sheet: Sheet, family: &str) -> Vec<RawRecord> {
    let layout = sheet.layout();
    let source = sheet.category();
    rows.iter()
        .skip(1)
        .filter(|row| cell(row, layout.family) == family)
        .filter(|row| {
            layout
                .quantum_flag
                .map_or(true, |idx| !QUANTUM_FLAGS.contains(&cell(row, idx)))
        })
        .filter_map(|row| {
            let name = cell(row, layout.algorithm);
            if name.is_empty() {
                return None;
            }
            let runtime = cell(row, layout.runtime).to_string();
            let work = match layout.work {
                Some(idx) => cell(row, idx).to_string(),
                None => runtime.clone(),
            };
            Some(RawRecord {
                name: name.to_string(),
                variant: cell(row, layout.variant).to_string(),
                runtime,
                work,
                source,
                parallel: source == SourceCategory::Parallel,
                approximation: source == SourceCategory::Approximate,
            })
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("sheet `{0}` is not available")]
    Missing(&'static str),
    #[error("failed to load sheet `{sheet}`: {reason}")]
    Load { sheet: &'static str, reason: String },
}

/// Data-provider boundary: all rows of a sheet, header row first.
pub trait SheetSource {
    fn rows(&self, sheet: Sheet) -> Result<Vec<Vec<String>>, SheetError>;
}

impl SheetSource for BTreeMap<Sheet, Vec<Vec<String>>> {
    fn rows(&self, sheet: Sheet) -> Result<Vec<Vec<String>>, SheetError> {
        self.get(&sheet)
            .cloned()
            .ok_or(SheetError::Missing(sheet.title()))
    }
}
