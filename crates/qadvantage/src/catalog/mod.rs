//! Algorithm catalog: raw sheet records → presentation variants.
//!
//! Purpose
//! - Pull the records of each catalog problem out of the four source sheets,
//!   drop duplicates, and convert every record into a `Variant` whose runtime
//!   and work formulas are canonical (or `None` with an explanatory note).
//!
//! Notes
//! - Nothing here fails a batch: unusable notation gives `available = false`,
//!   a sheet that cannot be loaded contributes no rows.
//! - A problem is only emitted when it has classical and quantum records.

mod sheets;
mod types;

use std::collections::{BTreeMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::notation::convert;

pub use sheets::{records_from_rows, Sheet, SheetError, SheetLayout, SheetSource};
pub use types::{
    Catalog, Metrics, ProblemSources, ProblemTable, ProblemVariants, RawRecord, Side,
    SourceCategory, Variant,
};

const KEY_LEN: usize = 50;
const NAME_LEN: usize = 80;
const DESCRIPTION_LEN: usize = 150;
const NOTE_LEN: usize = 50;

static SLUG_SEP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static pattern"));
static PER_PROCESSOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*/\s*p").expect("static pattern"));

/// Speed classes, first match wins.
static SPEED_CLASSES: Lazy<[(Regex, u8); 4]> = Lazy::new(|| {
    let re = |p: &str| Regex::new(p).expect("static pattern");
    [
        (re(r"n log n|nlog|m\+n|v\^2 log v|v log v"), 1),
        (re(r"n\^2|v\^2|n\^3|v\^3"), 2),
        (re(r"2\^n|e\^|exp|v\^2 e"), 3),
        (re(r"sqrt\(n\)|n/2"), 1),
    ]
});

/// Keep the first record per (lowercased name, runtime notation).
pub fn dedup(records: Vec<RawRecord>) -> Vec<RawRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            let fresh = seen.insert((r.name.to_lowercase(), r.runtime.clone()));
            if !fresh {
                debug!(name = %r.name, "skipping duplicate record");
            }
            fresh
        })
        .collect()
}

/// Lowercase, runs of anything but `[a-z0-9]` become `-`, at most 50 chars.
pub fn slug(name: &str) -> String {
    let s = SLUG_SEP.replace_all(&name.to_lowercase(), "-").into_owned();
    truncate(&s, KEY_LEN)
}

#[inline]
fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Ordinal ratings from the raw runtime notation.
pub fn estimate_metrics(runtime: &str, approximation: bool) -> Metrics {
    let lower = runtime.to_lowercase();
    let mut m = Metrics::default();
    if approximation {
        m.speed = 1;
    }
    if let Some((_, speed)) = SPEED_CLASSES.iter().find(|(re, _)| re.is_match(&lower)) {
        m.speed = *speed;
    }
    m.work = m.speed;
    m
}

/// Work formula when the work notation itself is unusable.
fn fallback_work(record: &RawRecord, runtime: &str) -> String {
    if record.source.is_quantum() {
        format!("({runtime}) * q")
    } else if record.parallel {
        PER_PROCESSOR.replace(runtime, "").into_owned()
    } else {
        runtime.to_string()
    }
}

/// Presentation variant for the `index`-th record of its side.
pub fn create_variant(record: &RawRecord, index: usize) -> Variant {
    let runtime_formula = convert(&record.runtime);
    let work_formula = match (&runtime_formula, convert(&record.work)) {
        (Some(rt), None) => Some(fallback_work(record, rt)),
        (_, work) => work,
    };
    let available = runtime_formula.is_some() && work_formula.is_some();

    let base = if record.variant.is_empty() {
        "Algorithm variant"
    } else {
        record.variant.as_str()
    };
    let description = if record.approximation {
        format!("Approximation/Heuristic: {base}")
    } else {
        base.to_string()
    };
    let reference = if record.variant.is_empty() {
        record.source.title().to_string()
    } else {
        format!("{} - {}", record.source.title(), record.variant)
    };

    Variant {
        key: format!("{}-{index}", slug(&record.name)),
        name: truncate(&record.name, NAME_LEN),
        description: truncate(&description, DESCRIPTION_LEN),
        available,
        runtime_formula,
        work_formula,
        metrics: estimate_metrics(&record.runtime, record.approximation),
        reference,
        parallel: record.parallel,
        approximation: record.approximation.then_some(true),
        note: (!available).then(|| {
            format!(
                "Formula unavailable - original: {}",
                truncate(&record.runtime, NOTE_LEN)
            )
        }),
    }
}

fn sources(
    parallel: Option<&str>,
    sheet1: Option<&str>,
    approx: Option<&str>,
    quantum: &str,
) -> ProblemSources {
    ProblemSources {
        parallel: parallel.map(str::to_string),
        sheet1: sheet1.map(str::to_string),
        approx: approx.map(str::to_string),
        quantum: Some(quantum.to_string()),
    }
}

/// The three catalog problems and their sheet family names.
pub fn default_problems() -> ProblemTable {
    const FACTORING: &str = "Integer Factoring";
    const SEARCH: &str = "String Search";
    const TSP: &str = "The Traveling-Salesman Problem";
    BTreeMap::from([
        (
            "Integer Factorization".to_string(),
            sources(Some(FACTORING), Some(FACTORING), None, FACTORING),
        ),
        (
            "Database Search".to_string(),
            sources(Some(SEARCH), Some(SEARCH), Some(SEARCH), SEARCH),
        ),
        (
            "Traveling Salesman".to_string(),
            sources(None, None, Some(TSP), TSP),
        ),
    ])
}

/// Variants of one problem; `None` unless both sides have records.
pub fn problem_variants(
    name: &str,
    sources: &ProblemSources,
    rows: &BTreeMap<Sheet, Vec<Vec<String>>>,
) -> Option<ProblemVariants> {
    let records_of = |sheet: Sheet, family: &Option<String>| -> Vec<RawRecord> {
        match (family, rows.get(&sheet)) {
            (Some(family), Some(rows)) => records_from_rows(rows, sheet, family),
            _ => Vec::new(),
        }
    };
    let classical = dedup(
        [
            records_of(Sheet::Parallel, &sources.parallel),
            records_of(Sheet::Sheet1, &sources.sheet1),
            records_of(Sheet::Approx, &sources.approx),
        ]
        .concat(),
    );
    let quantum = dedup(records_of(Sheet::Quantum, &sources.quantum));
    if classical.is_empty() || quantum.is_empty() {
        warn!(
            problem = name,
            classical = classical.len(),
            quantum = quantum.len(),
            "skipping problem: needs both classical and quantum records"
        );
        return None;
    }
    let to_variants = |records: &[RawRecord]| -> Vec<Variant> {
        records
            .iter()
            .enumerate()
            .map(|(i, r)| create_variant(r, i))
            .collect()
    };
    let variants = ProblemVariants {
        classical: to_variants(&classical),
        quantum: to_variants(&quantum),
    };
    let (c, q) = variants.available_counts();
    debug!(
        problem = name,
        classical = %format_args!("{c}/{}", variants.classical.len()),
        quantum = %format_args!("{q}/{}", variants.quantum.len()),
        "variants available"
    );
    Some(variants)
}

/// Load every sheet once and build all problems of `problems`.
pub fn build_catalog<S>(source: &S, problems: &ProblemTable) -> Catalog
where
    S: SheetSource + ?Sized,
{
    let rows: BTreeMap<Sheet, Vec<Vec<String>>> = Sheet::ALL
        .into_iter()
        .filter_map(|sheet| match source.rows(sheet) {
            Ok(rows) => Some((sheet, rows)),
            Err(err) => {
                warn!(sheet = sheet.title(), %err, "sheet contributes no rows");
                None
            }
        })
        .collect();
    problems
        .iter()
        .filter_map(|(name, sources)| {
            problem_variants(name, sources, &rows).map(|v| (name.clone(), v))
        })
        .collect()
}
