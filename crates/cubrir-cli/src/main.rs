//! Cubridor CLI: coverage artifact aggregation for CI
//!
//! ## Usage
//!
//! ```bash
//! cubridor combine artifacts/            # Merge coverage-*.json records
//! cubridor render --format=xml -o coverage.xml
//! cubridor render --format=markdown --skip-covered >> "$GITHUB_STEP_SUMMARY"
//! ```

use clap::Parser;
use cubridor::{Cli, CliConfig, CliResult, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);

    match cli.command {
        Commands::Combine(args) => cubridor::handlers::combine::execute_combine(&config, &args),
        Commands::Render(args) => cubridor::handlers::render::execute_render(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(cli.color.clone().into())
}
