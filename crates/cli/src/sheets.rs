//! CSV exports of the source workbook as a `SheetSource`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use polars::prelude::*;
use qadvantage::api::{Sheet, SheetError, SheetSource};

/// One CSV export per workbook tab.
#[derive(Args, Debug, Clone)]
pub struct SheetPaths {
    /// "Parallel Algos" export
    #[arg(long, env = "QADV_PARALLEL_CSV")]
    pub parallel: PathBuf,
    /// "Quantum Algorithms" export
    #[arg(long, env = "QADV_QUANTUM_CSV")]
    pub quantum: PathBuf,
    /// "Sheet1" export
    #[arg(long, env = "QADV_SHEET1_CSV")]
    pub sheet1: PathBuf,
    /// "Approx Algos" export
    #[arg(long, env = "QADV_APPROX_CSV")]
    pub approx: PathBuf,
}

impl SheetPaths {
    pub fn into_source(self) -> CsvSheets {
        CsvSheets {
            paths: BTreeMap::from([
                (Sheet::Parallel, self.parallel),
                (Sheet::Sheet1, self.sheet1),
                (Sheet::Approx, self.approx),
                (Sheet::Quantum, self.quantum),
            ]),
        }
    }
}

pub struct CsvSheets {
    paths: BTreeMap<Sheet, PathBuf>,
}

/// All cells as strings, header row kept as the first row.
pub fn read_rows(path: &PathBuf) -> PolarsResult<Vec<Vec<String>>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .with_truncate_ragged_lines(true)
        .finish()?
        .collect()?;
    let columns = df
        .get_columns()
        .iter()
        .map(|s| s.str().cloned())
        .collect::<PolarsResult<Vec<StringChunked>>>()?;
    Ok((0..df.height())
        .map(|i| {
            columns
                .iter()
                .map(|ca| ca.get(i).unwrap_or("").to_string())
                .collect()
        })
        .collect())
}

impl SheetSource for CsvSheets {
    fn rows(&self, sheet: Sheet) -> Result<Vec<Vec<String>>, SheetError> {
        let path = self
            .paths
            .get(&sheet)
            .ok_or(SheetError::Missing(sheet.title()))?;
        let rows = read_rows(path).map_err(|e| SheetError::Load {
            sheet: sheet.title(),
            reason: format!("{}: {e}", path.display()),
        })?;
        tracing::info!(sheet = sheet.title(), rows = rows.len(), "loaded sheet");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_every_cell_as_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        fs::write(&path, "id,Family,Runtime\n1,String Search,\"O(n, m)\"\n2,,007\n").unwrap();
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ["id", "Family", "Runtime"]);
        assert_eq!(rows[1], ["1", "String Search", "O(n, m)"]);
        assert_eq!(rows[2], ["2", "", "007"]);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = tempdir().unwrap();
        let paths = SheetPaths {
            parallel: dir.path().join("absent.csv"),
            quantum: dir.path().join("absent.csv"),
            sheet1: dir.path().join("absent.csv"),
            approx: dir.path().join("absent.csv"),
        };
        let err = paths.into_source().rows(Sheet::Quantum).unwrap_err();
        assert!(matches!(err, SheetError::Load { sheet: "Quantum Algorithms", .. }));
    }
}
