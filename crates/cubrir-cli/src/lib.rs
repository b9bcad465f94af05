//! Cubridor CLI Library
//!
//! Command-line interface for the Cubrir coverage aggregation
//! pipeline: `combine` merges downloaded coverage artifacts into one
//! consolidated dataset, `render` turns it into a Cobertura XML report
//! or a Markdown summary table.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{
    Cli, ColorArg, CombineArgs, Commands, RenderArgs, RenderFormat, DEFAULT_DATASET_PATH,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::ProgressReporter;
