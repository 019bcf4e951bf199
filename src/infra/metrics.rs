// ============================================================
// Layer 6 - Pass Metrics Logger
// ============================================================
// Appends one CSV row per finished pass, and keeps a copy of
// the configuration the run was started with.
//
// Output directory layout:
//   runs/
//     passes.csv        ← one row per EndOfPass
//     feed_config.json  ← FeedConfig of the latest run
//
// Example CSV output:
//   pass,batches,examples,longest_sequence,truncated_examples
//   1,1250,10000,512,37
//   2,1250,10000,512,37
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use crate::data::assembler::PassSummary;

const CSV_HEADER: &str = "pass,batches,examples,longest_sequence,truncated_examples";

pub struct MetricsLogger {
    dir:      PathBuf,
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the directory and the CSV header if they don't exist.
    /// An existing CSV is appended to.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("passes.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "{CSV_HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { dir, csv_path })
    }

    /// Append one pass summary as a CSV row.
    pub fn log(&self, s: &PassSummary) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{},{},{},{}",
            s.pass, s.batches, s.examples, s.longest_sequence, s.truncated_examples,
        )?;

        tracing::debug!("Logged pass {} metrics", s.pass);
        Ok(())
    }

    /// Write `config` as pretty JSON next to the CSV.
    pub fn save_config<C: Serialize>(&self, config: &C) -> Result<()> {
        let path = self.dir.join("feed_config.json");
        fs::write(&path, serde_json::to_string_pretty(config)?)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn summary(pass: usize) -> PassSummary {
        PassSummary {
            pass,
            batches:            3,
            examples:           5,
            longest_sequence:   12,
            truncated_examples: 0,
        }
    }

    #[test]
    fn test_appends_rows_after_header() {
        let tmp    = TempDir::new().unwrap();
        let logger = MetricsLogger::new(tmp.path().join("runs")).unwrap();
        logger.log(&summary(1)).unwrap();
        logger.log(&summary(2)).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec![CSV_HEADER, "1,3,5,12,0", "2,3,5,12,0"]);
    }

    #[test]
    fn test_reopening_keeps_existing_rows() {
        let tmp = TempDir::new().unwrap();
        MetricsLogger::new(tmp.path()).unwrap().log(&summary(1)).unwrap();
        let logger = MetricsLogger::new(tmp.path()).unwrap();
        logger.log(&summary(2)).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_save_config_writes_json() {
        let tmp    = TempDir::new().unwrap();
        let logger = MetricsLogger::new(tmp.path()).unwrap();
        logger.save_config(&summary(4)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(tmp.path().join("feed_config.json")).unwrap())
                .unwrap();
        assert_eq!(raw["pass"], 4);
    }
}
