//! Provenance records: which build and which inputs produced a catalog.
//!
//! `sync` writes one next to its output as `<stem>.provenance.json`;
//! `report` prints the same record with no inputs or outputs.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Serialize)]
pub struct Provenance {
    pub code_rev: String,
    pub engine_version: &'static str,
    pub params: Value,
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
}

impl Provenance {
    pub fn new(params: Value) -> Self {
        Self {
            code_rev: code_rev(),
            engine_version: qadvantage::VERSION,
            params,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_inputs<I: IntoIterator<Item = PathBuf>>(mut self, inputs: I) -> Self {
        self.inputs.extend(inputs);
        self
    }

    /// Record `catalog` as the output and write the sidecar beside it.
    pub fn write_beside(mut self, catalog: &Path) -> Result<PathBuf> {
        self.outputs.push(catalog.to_path_buf());
        let path = sidecar_path(catalog);
        fs::write(&path, serde_json::to_vec_pretty(&self)?)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "provenance written");
        Ok(path)
    }
}

/// `out/catalog.json` → `out/catalog.provenance.json`.
fn sidecar_path(catalog: &Path) -> PathBuf {
    catalog.with_extension("provenance.json")
}

/// `GIT_COMMIT` if set, else `git rev-parse HEAD`, else `"unknown"`.
fn code_rev() -> String {
    std::env::var("GIT_COMMIT")
        .ok()
        .filter(|rev| !rev.is_empty())
        .or_else(|| {
            Command::new("git")
                .args(["rev-parse", "HEAD"])
                .output()
                .ok()
                .filter(|output| output.status.success())
                .and_then(|output| String::from_utf8(output.stdout).ok())
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
