//! Consolidated Coverage Dataset
//!
//! The union, per source-file path, of all executed-line sets across
//! every partial record supplied as input. Merging is a plain per-file
//! set union: commutative, associative, and idempotent with respect to
//! the set of inputs, so record ingestion order never affects the
//! result. A line executed in any input is executed here.
//!
//! The dataset lives for one pipeline invocation: the combine stage
//! writes it to a durable path, the render stage reads it back, and
//! nothing outlasts the run.

use crate::error::{CoverageError, CoverageResult};
use crate::record::PartialRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Merged per-file coverage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCoverage {
    /// Union of executed lines across all records
    pub executed: BTreeSet<u32>,
    /// Union of instrumented lines across all records
    pub instrumented: BTreeSet<u32>,
    /// Union of taken branch pairs across all records
    #[serde(default)]
    pub branches: BTreeSet<(u32, u32)>,
}

impl FileCoverage {
    /// Coverage percentage for this file.
    ///
    /// A file with zero instrumented lines is vacuously at 100%.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.instrumented.is_empty() {
            return 100.0;
        }
        (self.executed.len() as f64 / self.instrumented.len() as f64) * 100.0
    }

    /// Check whether every instrumented line was executed
    #[must_use]
    pub fn is_fully_covered(&self) -> bool {
        self.instrumented.is_subset(&self.executed)
    }
}

/// Dataset-wide summary statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Number of source files
    pub total_files: usize,
    /// Total instrumented lines across all files
    pub instrumented_lines: usize,
    /// Total executed lines across all files
    pub executed_lines: usize,
    /// Overall coverage percentage
    pub coverage_percent: f64,
}

/// The merged result across all partial records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedDataset {
    /// Common source root, when the records declared one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    root: Option<String>,
    /// Merged coverage per source-file path
    files: BTreeMap<String, FileCoverage>,
}

impl ConsolidatedDataset {
    /// Create an empty dataset
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the dataset holds no files
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of source files in the dataset
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Common source root, if any record declared one
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Per-file coverage, ordered by source path
    #[must_use]
    pub fn files(&self) -> &BTreeMap<String, FileCoverage> {
        &self.files
    }

    /// Look up one file's merged coverage
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FileCoverage> {
        self.files.get(path)
    }

    /// Merge one partial record into the dataset.
    ///
    /// Instrumented-line disagreements between records merge to the
    /// union, same as executed lines, so no record can shrink a
    /// denominator another record established. A record whose `root`
    /// disagrees with the root already adopted fails with
    /// [`CoverageError::MalformedRecord`].
    pub fn merge_record(&mut self, origin: &Path, record: &PartialRecord) -> CoverageResult<()> {
        match (&self.root, &record.root) {
            (Some(ours), Some(theirs)) if ours != theirs => {
                return Err(CoverageError::malformed(
                    origin,
                    format!("source root `{theirs}` does not match `{ours}`"),
                ));
            }
            (None, Some(theirs)) => self.root = Some(theirs.clone()),
            _ => {}
        }

        for (file, cov) in &record.files {
            let entry = self.files.entry(file.clone()).or_default();
            entry.executed.extend(&cov.executed);
            entry.instrumented.extend(cov.instrumented_lines());
            entry.branches.extend(&cov.branches);
        }

        tracing::debug!(
            record = %origin.display(),
            files = record.files.len(),
            "merged coverage record"
        );
        Ok(())
    }

    /// Combine every record in `directory` matching `pattern` into one
    /// dataset.
    ///
    /// Fails with [`CoverageError::NoDataFound`] when nothing matches
    /// and with [`CoverageError::MalformedRecord`] on the first bad
    /// record; no partial result is produced.
    pub fn combine_dir(directory: &Path, pattern: &str) -> CoverageResult<Self> {
        let paths = find_records(directory, pattern)?;

        let mut dataset = Self::new();
        for path in &paths {
            let record = PartialRecord::load(path)?;
            dataset.merge_record(path, &record)?;
        }

        tracing::debug!(
            records = paths.len(),
            files = dataset.len(),
            "combined coverage records"
        );
        Ok(dataset)
    }

    /// Write the dataset to `path` as JSON, creating parent
    /// directories as needed.
    pub fn save(&self, path: &Path) -> CoverageResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CoverageError::render(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a dataset previously written by [`Self::save`]
    pub fn load(path: &Path) -> CoverageResult<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| CoverageError::malformed(path, format!("invalid dataset JSON: {e}")))
    }

    /// Dataset-wide summary statistics
    #[must_use]
    pub fn summary(&self) -> DatasetSummary {
        let instrumented_lines: usize = self.files.values().map(|c| c.instrumented.len()).sum();
        let executed_lines: usize = self.files.values().map(|c| c.executed.len()).sum();

        let coverage_percent = if instrumented_lines == 0 {
            100.0
        } else {
            (executed_lines as f64 / instrumented_lines as f64) * 100.0
        };

        DatasetSummary {
            total_files: self.files.len(),
            instrumented_lines,
            executed_lines,
            coverage_percent,
        }
    }
}

/// List the partial records in `directory` matching `pattern`,
/// sorted by path.
///
/// Fails with [`CoverageError::NoDataFound`] when nothing matches: an
/// empty report is never silently produced.
pub fn find_records(directory: &Path, pattern: &str) -> CoverageResult<Vec<PathBuf>> {
    let full_pattern = directory.join(pattern);
    let full_pattern = full_pattern.to_string_lossy();

    let entries = glob::glob(&full_pattern)
        .map_err(|e| CoverageError::render(format!("invalid pattern `{pattern}`: {e}")))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path =
            entry.map_err(|e| CoverageError::malformed(e.path(), e.error().to_string()))?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(CoverageError::NoDataFound {
            pattern: pattern.to_string(),
            directory: directory.to_path_buf(),
        });
    }
    Ok(paths)
}
