//! CLI command definitions using clap

use crate::config::ColorChoice;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Default durable location for the consolidated dataset between the
/// combine and render stages
pub const DEFAULT_DATASET_PATH: &str = "target/cubrir/combined.json";

/// Cubridor: CLI for Cubrir - merge coverage artifacts and render CI coverage reports
#[derive(Parser, Debug)]
#[command(name = "cubridor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Combine partial coverage records into one consolidated dataset
    Combine(CombineArgs),

    /// Render the consolidated dataset as XML or Markdown
    Render(RenderArgs),
}

/// Arguments for the combine command
#[derive(Parser, Debug)]
pub struct CombineArgs {
    /// Directory holding the downloaded coverage artifacts
    pub directory: PathBuf,

    /// Artifact filename pattern selecting partial records
    #[arg(short, long, default_value = "coverage-*.json")]
    pub pattern: String,

    /// Where to write the consolidated dataset
    #[arg(short, long, default_value = DEFAULT_DATASET_PATH)]
    pub output: PathBuf,
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Report format
    #[arg(short, long, default_value = "markdown")]
    pub format: RenderFormat,

    /// Consolidated dataset to render
    #[arg(short, long, default_value = DEFAULT_DATASET_PATH)]
    pub input: PathBuf,

    /// Output file (markdown defaults to stdout, xml to coverage.xml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Omit files with zero instrumented lines (markdown only)
    #[arg(long)]
    pub skip_empty: bool,

    /// Omit files at 100% coverage (markdown only)
    #[arg(long)]
    pub skip_covered: bool,
}

/// Report output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderFormat {
    /// Markdown summary table
    #[default]
    Markdown,
    /// Cobertura XML
    Xml,
}

/// Color output argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Detect terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
