use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use qadvantage::api::{
    advantage_size, advantage_year, build_catalog, convert_detailed, default_problems,
    BisectCfg, CrossoverQuery, Extrapolation, LoggedFn, MappingCfg, ProblemTable, QubitMapping,
    RegressionCache, Roadmap, Side, YearQuery,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod sheets;

use provenance::Provenance;
use sheets::SheetPaths;

#[derive(Parser)]
#[command(name = "qadv")]
#[command(about = "Classical vs quantum cost engine")]
struct Cmd {
    /// Log at DEBUG level (rejected notations, cache misses, bisection outcomes)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build the algorithm catalog from the sheet exports and write it as JSON
    Sync {
        #[command(flatten)]
        sheets: SheetPaths,
        /// JSON table of problem name → sheet family names (default: built-in table)
        #[arg(long)]
        problems: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Canonicalize complexity notations
    Convert {
        #[arg(required = true)]
        notation: Vec<String>,
    },
    /// log10 hardware capacity per year from a JSON roadmap
    Capacity {
        #[arg(long)]
        roadmap: PathBuf,
        #[arg(long, default_value_t = Extrapolation::Exponential)]
        extrapolation: Extrapolation,
        #[arg(required = true)]
        years: Vec<f64>,
    },
    /// Solve for feasible sizes, the advantage size, and the advantage year
    Crossover {
        /// Quantum runtime in n (canonical form)
        #[arg(long)]
        quantum: String,
        /// Classical runtime in n; enables the advantage queries
        #[arg(long)]
        classical: Option<String>,
        /// Extra quantum cost factor in n
        #[arg(long)]
        penalty: Option<String>,
        /// log10 of the operation budget
        #[arg(long, default_value_t = 24.0)]
        budget: f64,
        /// log10 of the quantum slowdown per operation
        #[arg(long, default_value_t = 0.0)]
        slowdown_log: f64,
        /// JSON roadmap; enables the year search
        #[arg(long)]
        roadmap: Option<PathBuf>,
        #[arg(long, default_value_t = Extrapolation::Exponential)]
        extrapolation: Extrapolation,
        /// Qubit count → problem size mapping
        #[arg(long, default_value = "2^{q}")]
        mapping: String,
        #[arg(long, default_value_t = 2024.0)]
        from: f64,
        #[arg(long, default_value_t = 2100.0)]
        to: f64,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Sync {
            sheets,
            problems,
            out,
        } => sync(sheets, problems, out),
        Action::Convert { notation } => convert(&notation),
        Action::Capacity {
            roadmap,
            extrapolation,
            years,
        } => capacity(&roadmap, extrapolation, &years),
        Action::Crossover {
            quantum,
            classical,
            penalty,
            budget,
            slowdown_log,
            roadmap,
            extrapolation,
            mapping,
            from,
            to,
        } => {
            let year_window = roadmap.map(|path| (path, extrapolation, mapping, from, to));
            crossover(
                &quantum,
                classical.as_deref(),
                penalty.as_deref(),
                budget,
                slowdown_log,
                year_window,
            )
        }
        Action::Report => report(),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

fn sync(sheets: SheetPaths, problems: Option<PathBuf>, out: PathBuf) -> Result<()> {
    tracing::info!(out = %out.display(), "sync");
    let table: ProblemTable = match &problems {
        Some(path) => read_json(path)?,
        None => default_problems(),
    };
    let params = json!({
        "sheets": {
            "parallel": sheets.parallel,
            "sheet1": sheets.sheet1,
            "approx": sheets.approx,
            "quantum": sheets.quantum,
        },
        "problems": problems,
        "problem_names": table.keys().collect::<Vec<_>>(),
    });
    let inputs = [
        sheets.parallel.clone(),
        sheets.sheet1.clone(),
        sheets.approx.clone(),
        sheets.quantum.clone(),
    ];
    let catalog = build_catalog(&sheets.into_source(), &table);
    if catalog.is_empty() {
        bail!("no problem has both classical and quantum records");
    }
    for (name, variants) in &catalog {
        let (c, q) = variants.available_counts();
        let best = variants.best(Side::Quantum).map(|v| v.name.as_str());
        tracing::info!(
            problem = %name,
            classical = %format!("{c}/{}", variants.classical.len()),
            quantum = %format!("{q}/{}", variants.quantum.len()),
            best_quantum = ?best,
            "synced"
        );
    }

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&out, serde_json::to_vec_pretty(&catalog)?)
        .with_context(|| format!("writing {}", out.display()))?;
    Provenance::new(params).with_inputs(inputs).write_beside(&out)?;
    Ok(())
}

fn convert(notations: &[String]) -> Result<()> {
    for raw in notations {
        match convert_detailed(raw) {
            Ok(formula) => println!("{raw}\t{formula}"),
            Err(reason) => println!("{raw}\tunavailable ({reason})"),
        }
    }
    Ok(())
}

fn capacity(path: &Path, kind: Extrapolation, years: &[f64]) -> Result<()> {
    let roadmap: Roadmap = read_json(path)?;
    let cache = RegressionCache::new();
    for &year in years {
        let log_q = roadmap
            .capacity_log10(year, kind, &cache)
            .with_context(|| format!("capacity in {year}"))?;
        println!("{year}\t{log_q:.4}");
    }
    tracing::debug!(fits = cache.fits_computed(), "regressions");
    Ok(())
}

fn crossover(
    quantum: &str,
    classical: Option<&str>,
    penalty: Option<&str>,
    budget: f64,
    slowdown_log: f64,
    year_window: Option<(PathBuf, Extrapolation, String, f64, f64)>,
) -> Result<()> {
    let cfg = BisectCfg::default();
    let logged = |expr: &str| -> Result<LoggedFn> {
        LoggedFn::over_size_exponent(expr)
            .with_context(|| format!("building log form of `{expr}`"))
    };
    let q = logged(quantum)?;
    let p = penalty.map(logged).transpose()?;

    let mut query = CrossoverQuery::new(&q, budget).with_slowdown_log(slowdown_log);
    if let Some(p) = &p {
        query = query.with_penalty(p);
    }
    let feasible = query.time_feasible_size(&cfg);

    let advantage = match classical {
        Some(expr) => advantage_size(&q, &logged(expr)?, slowdown_log, &cfg),
        None => None,
    };

    let year = match (year_window, advantage) {
        (Some((path, extrapolation, mapping, from, to)), Some(size)) => {
            let roadmap: Roadmap = read_json(&path)?;
            let mapping = QubitMapping::classify(&mapping);
            let cache = RegressionCache::new();
            let query = YearQuery {
                roadmap: &roadmap,
                extrapolation,
                mapping: &mapping,
                cache: &cache,
                from,
                to,
            };
            advantage_year(&query, size, &MappingCfg::default(), &cfg)
        }
        _ => None,
    };

    let out = json!({
        "time_feasible_size_log10": finite_or_label(feasible),
        "advantage_size_log10": advantage.map(finite_or_label),
        "advantage_year": year.map(finite_or_label),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// JSON has no infinities.
fn finite_or_label(x: f64) -> serde_json::Value {
    if x.is_finite() {
        json!(x)
    } else if x > 0.0 {
        json!("inf")
    } else {
        json!("-inf")
    }
}

fn report() -> Result<()> {
    let record = Provenance::new(json!({}));
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qadvantage::api::Catalog;
    use tempfile::tempdir;

    fn csv_row(cells: &[(usize, &str)]) -> String {
        let mut row = vec![String::new(); 52];
        for &(i, text) in cells {
            row[i] = format!("\"{text}\"");
        }
        row.join(",")
    }

    fn write_sheet(dir: &Path, name: &str, rows: &[String]) -> PathBuf {
        let path = dir.join(name);
        let mut body = (0..52).map(|i| format!("c{i}")).collect::<Vec<_>>().join(",");
        for row in rows {
            body.push('\n');
            body.push_str(row);
        }
        body.push('\n');
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn sync_writes_catalog_and_sidecar() {
        let dir = tempdir().unwrap();
        let d = dir.path();
        let sheets = SheetPaths {
            parallel: write_sheet(d, "parallel.csv", &[]),
            sheet1: write_sheet(
                d,
                "sheet1.csv",
                &[
                    csv_row(&[(1, "String Search"), (14, "Naive"), (28, "O(n m)")]),
                    csv_row(&[(1, "String Search"), (14, "Grover"), (28, "O(sqrt(n))"), (50, "Y")]),
                ],
            ),
            approx: d.join("missing.csv"),
            quantum: write_sheet(
                d,
                "quantum.csv",
                &[csv_row(&[(1, "String Search"), (13, "Grover"), (27, "O(sqrt(n))")])],
            ),
        };
        let out = d.join("out").join("catalog.json");
        sync(sheets, None, out.clone()).unwrap();

        let catalog: Catalog = read_json(&out).unwrap();
        assert_eq!(catalog.len(), 1);
        let search = &catalog["Database Search"];
        assert_eq!(search.classical.len(), 1);
        assert_eq!(search.classical[0].runtime_formula.as_deref(), Some("n m"));
        assert_eq!(search.quantum[0].work_formula.as_deref(), Some("(sqrt(n)) * q"));
        assert!(d.join("out").join("catalog.provenance.json").exists());
    }

    #[test]
    fn sync_without_any_complete_problem_fails() {
        let dir = tempdir().unwrap();
        let d = dir.path();
        let empty = write_sheet(d, "empty.csv", &[]);
        let sheets = SheetPaths {
            parallel: empty.clone(),
            sheet1: empty.clone(),
            approx: empty.clone(),
            quantum: empty,
        };
        assert!(sync(sheets, None, d.join("catalog.json")).is_err());
        assert!(!d.join("catalog.json").exists());
    }

    #[test]
    fn infinities_become_labels() {
        assert_eq!(finite_or_label(2.5), json!(2.5));
        assert_eq!(finite_or_label(f64::INFINITY), json!("inf"));
        assert_eq!(finite_or_label(f64::NEG_INFINITY), json!("-inf"));
    }
}
