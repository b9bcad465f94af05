//! Report renderers
//!
//! Read-only views over a [`ConsolidatedDataset`](crate::ConsolidatedDataset):
//! a machine-readable Cobertura-style XML exchange rendering for
//! third-party ingestion, and a human-readable Markdown summary table
//! for a build summary surface. Both are deterministic: the same
//! dataset renders byte-identically.

mod markdown;
mod xml;

pub use markdown::MarkdownFormatter;
pub use xml::XmlFormatter;
