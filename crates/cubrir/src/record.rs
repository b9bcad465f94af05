//! Partial Coverage Record loading
//!
//! One record file per measurement run, produced externally and
//! immutable once written. A record maps source-file paths to the set
//! of line numbers observed executing, optionally with the full set of
//! instrumented lines and taken branch pairs:
//!
//! ```json
//! {
//!   "root": "src",
//!   "files": {
//!     "src/a.py": {
//!       "executed": [1, 2],
//!       "instrumented": [1, 2, 3, 4],
//!       "branches": [[4, 5], [4, 7]]
//!     }
//!   }
//! }
//! ```

use crate::error::{CoverageError, CoverageResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Per-file measurement inside a partial record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Line numbers observed executing
    #[serde(default)]
    pub executed: BTreeSet<u32>,

    /// Executable line numbers (the denominator). When absent, the
    /// record is hit-only and `executed` stands in for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrumented: Option<BTreeSet<u32>>,

    /// Branch (from-line, to-line) pairs taken
    #[serde(default)]
    pub branches: BTreeSet<(u32, u32)>,
}

impl FileRecord {
    /// The instrumented-line set, defaulting to `executed` for
    /// hit-only records.
    #[must_use]
    pub fn instrumented_lines(&self) -> &BTreeSet<u32> {
        self.instrumented.as_ref().unwrap_or(&self.executed)
    }
}

/// One measurement run's raw coverage data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialRecord {
    /// Common source root the file paths resolve against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Coverage per source-file path
    #[serde(default)]
    pub files: BTreeMap<String, FileRecord>,
}

impl PartialRecord {
    /// Load and validate a record from disk.
    ///
    /// Unreadable or corrupt input fails with
    /// [`CoverageError::MalformedRecord`]; there is no partial success.
    pub fn load(path: &Path) -> CoverageResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoverageError::malformed(path, e.to_string()))?;

        let record: Self = serde_json::from_str(&content)
            .map_err(|e| CoverageError::malformed(path, format!("invalid JSON: {e}")))?;

        record.validate(path)?;
        Ok(record)
    }

    /// Check internal consistency: every executed line must be
    /// instrumented when the record declares an instrumented set.
    pub fn validate(&self, origin: &Path) -> CoverageResult<()> {
        for (file, cov) in &self.files {
            if let Some(ref instrumented) = cov.instrumented {
                if let Some(line) = cov.executed.difference(instrumented).next() {
                    return Err(CoverageError::malformed(
                        origin,
                        format!("{file}: executed line {line} is not instrumented"),
                    ));
                }
            }
        }
        Ok(())
    }
}
