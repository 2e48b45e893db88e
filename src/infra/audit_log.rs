// ============================================================
// Layer 6 — Prediction Audit Log
// ============================================================
// Appends one CSV row per served prediction.
//
// Example output:
//   variant,prediction,confidence,schema_origin
//   standard,Yes,70.00%,model
//   legacy,No,81.25%,fallback
//
// Only the outcome is recorded, never the raw input. The file is
// created on the first row, not when the log is configured. Writes
// are serialised with a mutex so rows from batch workers never
// interleave.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::prediction::PredictionOutcome;

const HEADER: &str = "variant,prediction,confidence,schema_origin";

pub struct AuditLog {
    csv_path: PathBuf,
    /// Set once the file (and its header) is known to exist
    opened:   Mutex<bool>,
}

impl AuditLog {
    /// Nothing touches the disk until the first `record`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { csv_path: path.into(), opened: Mutex::new(false) }
    }

    /// Create the directory and the CSV with its header if missing.
    fn open(&self) -> Result<()> {
        if let Some(dir) = self.csv_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create audit log directory '{}'", dir.display()))?;
        }

        if !self.csv_path.exists() {
            let mut f = fs::File::create(&self.csv_path)
                .with_context(|| format!("Cannot create audit log '{}'", self.csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created audit log: '{}'", self.csv_path.display());
        }
        Ok(())
    }

    /// Append one outcome as a CSV row.
    pub fn record(&self, outcome: &PredictionOutcome) -> Result<()> {
        let mut opened = self.opened.lock();
        if !*opened {
            self.open()?;
            *opened = true;
        }

        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open audit log '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{},{},{}",
            outcome.variant,
            outcome.result.label,
            outcome.result.confidence(),
            outcome.schema_origin.as_str(),
        )?;

        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
