//! Markdown Summary Formatter
//!
//! Renders the per-file coverage table appended to a build summary
//! surface:
//!
//! ```text
//! | File | Lines | Covered | Coverage |
//! |------|------:|--------:|---------:|
//! | src/a.py | 4 | 3 | 75.0% |
//! | **TOTAL** | 4 | 3 | 75.0% |
//! ```

use crate::dataset::ConsolidatedDataset;
use std::fmt::Write;

/// Explicit marker distinguishing "ran but nothing to report" from
/// "did not run"
pub const NO_DATA_MARKER: &str = "_No coverage data._";

/// Markdown summary table generator
#[derive(Debug)]
pub struct MarkdownFormatter<'a> {
    dataset: &'a ConsolidatedDataset,
    skip_empty: bool,
    skip_covered: bool,
}

impl<'a> MarkdownFormatter<'a> {
    /// Create a new Markdown formatter with no filters: every file in
    /// the dataset gets a row.
    #[must_use]
    pub fn new(dataset: &'a ConsolidatedDataset) -> Self {
        Self {
            dataset,
            skip_empty: false,
            skip_covered: false,
        }
    }

    /// Omit files with zero instrumented lines
    #[must_use]
    pub fn with_skip_empty(mut self) -> Self {
        self.skip_empty = true;
        self
    }

    /// Omit files at 100% coverage
    #[must_use]
    pub fn with_skip_covered(mut self) -> Self {
        self.skip_covered = true;
        self
    }

    /// Generate the summary table as a string.
    ///
    /// Rows are sorted by file path. The TOTAL row always covers the
    /// full dataset; filters only prune display rows. An empty dataset
    /// renders as [`NO_DATA_MARKER`] rather than an empty table.
    #[must_use]
    pub fn generate(&self) -> String {
        if self.dataset.is_empty() {
            return format!("{NO_DATA_MARKER}\n");
        }

        let mut output = String::new();
        output.push_str("| File | Lines | Covered | Coverage |\n");
        output.push_str("|------|------:|--------:|---------:|\n");

        for (file, cov) in self.dataset.files() {
            if self.skip_empty && cov.instrumented.is_empty() {
                continue;
            }
            if self.skip_covered && cov.is_fully_covered() {
                continue;
            }
            let _ = writeln!(
                output,
                "| {} | {} | {} | {:.1}% |",
                file,
                cov.instrumented.len(),
                cov.executed.len(),
                cov.percent(),
            );
        }

        let summary = self.dataset.summary();
        let _ = writeln!(
            output,
            "| **TOTAL** | {} | {} | {:.1}% |",
            summary.instrumented_lines, summary.executed_lines, summary.coverage_percent,
        );

        output
    }
}
