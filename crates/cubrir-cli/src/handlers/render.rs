//! Render command handler

use crate::commands::{RenderArgs, RenderFormat};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use cubrir::{ConsolidatedDataset, MarkdownFormatter, XmlFormatter};
use std::io::Write;
use std::path::PathBuf;

/// Default XML report path when `-o` is not given
const DEFAULT_XML_PATH: &str = "coverage.xml";

/// Execute the render command: read the consolidated dataset back and
/// produce one of the two renderings.
///
/// Markdown without `-o` goes to stdout, which is the plain-text
/// stream a build summary surface consumes.
pub fn execute_render(config: &CliConfig, args: &RenderArgs) -> CliResult<()> {
    if args.format == RenderFormat::Xml && (args.skip_empty || args.skip_covered) {
        return Err(CliError::invalid_argument(
            "--skip-empty and --skip-covered only apply to --format=markdown",
        ));
    }

    let reporter =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());

    let dataset = ConsolidatedDataset::load(&args.input)?;

    match args.format {
        RenderFormat::Xml => {
            let path = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_XML_PATH));
            XmlFormatter::new(&dataset).save(&path)?;
            reporter.success(&format!("wrote XML report to {}", path.display()));
        }
        RenderFormat::Markdown => {
            let mut formatter = MarkdownFormatter::new(&dataset);
            if args.skip_empty {
                formatter = formatter.with_skip_empty();
            }
            if args.skip_covered {
                formatter = formatter.with_skip_covered();
            }
            let table = formatter.generate();

            match args.output {
                Some(ref path) => {
                    std::fs::write(path, &table)?;
                    reporter.success(&format!("wrote summary to {}", path.display()));
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(table.as_bytes())?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Verbosity;
    use std::path::Path;
    use tempfile::TempDir;

    fn quiet_config() -> CliConfig {
        CliConfig::new().with_verbosity(Verbosity::Quiet)
    }

    fn saved_dataset(dir: &TempDir) -> PathBuf {
        let mut record = cubrir::PartialRecord::default();
        let _ = record.files.insert(
            "a.py".to_string(),
            cubrir::FileRecord {
                executed: [1, 2, 3].into_iter().collect(),
                instrumented: Some([1, 2, 3, 4].into_iter().collect()),
                branches: std::collections::BTreeSet::new(),
            },
        );
        let mut dataset = ConsolidatedDataset::new();
        dataset.merge_record(Path::new("r"), &record).unwrap();

        let path = dir.path().join("combined.json");
        dataset.save(&path).unwrap();
        path
    }

    #[test]
    fn test_render_xml_to_file() {
        let dir = TempDir::new().unwrap();
        let input = saved_dataset(&dir);
        let output = dir.path().join("coverage.xml");

        let args = RenderArgs {
            format: RenderFormat::Xml,
            input,
            output: Some(output.clone()),
            skip_empty: false,
            skip_covered: false,
        };
        execute_render(&quiet_config(), &args).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains(r#"filename="a.py""#));
        assert!(content.contains(r#"lines-valid="4""#));
    }

    #[test]
    fn test_render_markdown_to_file() {
        let dir = TempDir::new().unwrap();
        let input = saved_dataset(&dir);
        let output = dir.path().join("summary.md");

        let args = RenderArgs {
            format: RenderFormat::Markdown,
            input,
            output: Some(output.clone()),
            skip_empty: false,
            skip_covered: false,
        };
        execute_render(&quiet_config(), &args).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("| a.py | 4 | 3 | 75.0% |"));
    }

    #[test]
    fn test_render_xml_rejects_markdown_filters() {
        let dir = TempDir::new().unwrap();
        let input = saved_dataset(&dir);

        let args = RenderArgs {
            format: RenderFormat::Xml,
            input,
            output: None,
            skip_empty: false,
            skip_covered: true,
        };
        let err = execute_render(&quiet_config(), &args).unwrap_err();
        assert!(matches!(err, crate::error::CliError::InvalidArgument { .. }));
    }

    #[test]
    fn test_render_missing_dataset_fails() {
        let args = RenderArgs {
            format: RenderFormat::Markdown,
            input: PathBuf::from("/nonexistent/combined.json"),
            output: None,
            skip_empty: false,
            skip_covered: false,
        };
        assert!(execute_render(&quiet_config(), &args).is_err());
    }
}
