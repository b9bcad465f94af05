//! Combine command handler

use crate::commands::CombineArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::ProgressReporter;
use cubrir::{find_records, ConsolidatedDataset, PartialRecord};

/// Execute the combine command: merge every partial record matching
/// the artifact pattern and persist the consolidated dataset for the
/// render stage.
pub fn execute_combine(config: &CliConfig, args: &CombineArgs) -> CliResult<()> {
    let mut reporter =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());

    let paths = find_records(&args.directory, &args.pattern)?;

    if config.verbosity.is_verbose() {
        for path in &paths {
            reporter.info(&format!("found {}", path.display()));
        }
    }

    reporter.start_progress(paths.len() as u64, "Merging records");
    let mut dataset = ConsolidatedDataset::new();
    for path in &paths {
        let record = PartialRecord::load(path)?;
        dataset.merge_record(path, &record)?;
        reporter.increment(1);
    }
    reporter.finish();

    dataset.save(&args.output)?;

    reporter.success(&format!(
        "combined {} record(s) into {}",
        paths.len(),
        args.output.display()
    ));
    reporter.coverage_summary(&dataset.summary());

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn quiet_config() -> CliConfig {
        CliConfig::new().with_verbosity(crate::config::Verbosity::Quiet)
    }

    fn args(dir: &TempDir, output: PathBuf) -> CombineArgs {
        CombineArgs {
            directory: dir.path().to_path_buf(),
            pattern: "coverage-*.json".to_string(),
            output,
        }
    }

    #[test]
    fn test_combine_writes_dataset() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("coverage-1.json"),
            r#"{"files":{"a.py":{"executed":[1,2],"instrumented":[1,2,3,4]}}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("coverage-2.json"),
            r#"{"files":{"a.py":{"executed":[2,3],"instrumented":[1,2,3,4]}}}"#,
        )
        .unwrap();

        let output = dir.path().join("out").join("combined.json");
        execute_combine(&quiet_config(), &args(&dir, output.clone())).unwrap();

        let dataset = ConsolidatedDataset::load(&output).unwrap();
        let cov = dataset.get("a.py").unwrap();
        assert_eq!(cov.executed, [1, 2, 3].into_iter().collect());
    }

    #[test]
    fn test_combine_empty_directory_fails() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("combined.json");

        let err = execute_combine(&quiet_config(), &args(&dir, output.clone())).unwrap_err();
        assert!(matches!(
            err,
            CliError::Coverage(cubrir::CoverageError::NoDataFound { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_combine_malformed_record_writes_nothing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("coverage-1.json"),
            r#"{"files":{"a.py":{"executed":[1],"instrumented":[1]}}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("coverage-2.json"), "garbage").unwrap();

        let output = dir.path().join("combined.json");
        let err = execute_combine(&quiet_config(), &args(&dir, output.clone())).unwrap_err();
        assert!(matches!(
            err,
            CliError::Coverage(cubrir::CoverageError::MalformedRecord { .. })
        ));
        assert!(!output.exists());
    }
}
