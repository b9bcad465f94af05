//! Cubrir: Coverage Artifact Aggregation
//!
//! Cubrir (Spanish: "to cover") merges partial coverage records
//! downloaded from a CI artifact store into one consolidated dataset,
//! then renders it for the two consumers a build pipeline has: a
//! coverage-tracking service (Cobertura-style XML) and the build
//! summary surface (a Markdown table).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    CUBRIR Pipeline                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   coverage-*.json ──► Combine (set union) ──► combined.json     │
//! │                                                  │               │
//! │                               ┌──────────────────┴────────┐      │
//! │                               ▼                           ▼      │
//! │                        Cobertura XML               Markdown table│
//! │                        (uploader)                  (summary sink)│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline is strictly linear and single-threaded: no stage reads
//! before the prior stage's output is durably on disk. External
//! collaborators (artifact fetcher, summary sink, uploader) stay
//! behind the file and string seams this crate exposes; no network,
//! terminal, or ambient environment access happens here.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod dataset;
mod error;
mod record;
pub mod render;

pub use dataset::{find_records, ConsolidatedDataset, DatasetSummary, FileCoverage};
pub use error::{CoverageError, CoverageResult};
pub use record::{FileRecord, PartialRecord};
pub use render::{MarkdownFormatter, XmlFormatter};
