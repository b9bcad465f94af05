//! Cobertura XML Exchange Formatter
//!
//! Serializes the consolidated dataset so a third-party coverage
//! service can recompute percentages from the line-level detail.
//!
//! ## Cobertura XML Format
//!
//! ```xml
//! <?xml version="1.0" ?>
//! <!DOCTYPE coverage SYSTEM "http://cobertura.sourceforge.net/xml/coverage-04.dtd">
//! <coverage line-rate="0.75" branch-rate="0" lines-covered="3" lines-valid="4" version="0.2.1">
//!   <sources><source>src</source></sources>
//!   <packages>
//!     <package name="src" line-rate="0.75" branch-rate="0" complexity="0">
//!       <classes>
//!         <class name="a" filename="src/a.py" line-rate="0.75">
//!           <lines>
//!             <line number="1" hits="1"/>
//!           </lines>
//!         </class>
//!       </classes>
//!     </package>
//!   </packages>
//! </coverage>
//! ```

use crate::dataset::{ConsolidatedDataset, FileCoverage};
use crate::error::CoverageResult;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

/// Files grouped by package (directory)
type PackageMap<'a> = BTreeMap<String, BTreeMap<&'a str, &'a FileCoverage>>;

/// Cobertura XML format report generator
#[derive(Debug)]
pub struct XmlFormatter<'a> {
    dataset: &'a ConsolidatedDataset,
    version: String,
}

impl<'a> XmlFormatter<'a> {
    /// Create a new XML formatter
    #[must_use]
    pub fn new(dataset: &'a ConsolidatedDataset) -> Self {
        Self {
            dataset,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Set the version string embedded in the report
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Generate the Cobertura XML report as a string.
    ///
    /// Deterministic: equal datasets render byte-identically. An empty
    /// dataset carries an explicit no-data marker comment instead of
    /// an empty package list.
    #[must_use]
    pub fn generate(&self) -> String {
        let summary = self.dataset.summary();
        let line_rate = if summary.instrumented_lines == 0 {
            1.0
        } else {
            summary.executed_lines as f64 / summary.instrumented_lines as f64
        };

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<!DOCTYPE coverage SYSTEM "http://cobertura.sourceforge.net/xml/coverage-04.dtd">"#,
        );
        xml.push('\n');
        let _ = write!(
            xml,
            r#"<coverage line-rate="{:.4}" branch-rate="0" lines-covered="{}" lines-valid="{}" version="{}">"#,
            line_rate, summary.executed_lines, summary.instrumented_lines, self.version,
        );
        xml.push('\n');

        if let Some(root) = self.dataset.root() {
            let _ = writeln!(
                xml,
                "  <sources><source>{}</source></sources>",
                escape(root)
            );
        }

        if self.dataset.is_empty() {
            xml.push_str("  <!-- no coverage data -->\n");
            xml.push_str("</coverage>\n");
            return xml;
        }

        xml.push_str("  <packages>\n");

        for (package_name, files) in &self.group_by_package() {
            let (pkg_covered, pkg_total) = Self::package_line_counts(files);
            let pkg_rate = if pkg_total > 0 {
                pkg_covered as f64 / pkg_total as f64
            } else {
                1.0
            };

            let _ = write!(
                xml,
                r#"    <package name="{}" line-rate="{:.4}" branch-rate="0" complexity="0">"#,
                escape(package_name),
                pkg_rate
            );
            xml.push('\n');
            xml.push_str("      <classes>\n");

            for (&file_path, cov) in files {
                let _ = write!(
                    xml,
                    r#"        <class name="{}" filename="{}" line-rate="{:.4}" branch-rate="0" complexity="0">"#,
                    escape(&Self::class_name(file_path)),
                    escape(file_path),
                    cov.percent() / 100.0,
                );
                xml.push('\n');
                xml.push_str("          <lines>\n");

                // Post-merge the executed set is a subset of the
                // instrumented set; the union keeps a hand-built
                // dataset renderable.
                for line in cov.instrumented.union(&cov.executed) {
                    let hits = u8::from(cov.executed.contains(line));
                    let _ = writeln!(xml, r#"            <line number="{line}" hits="{hits}"/>"#);
                }

                xml.push_str("          </lines>\n");
                xml.push_str("        </class>\n");
            }

            xml.push_str("      </classes>\n");
            xml.push_str("    </package>\n");
        }

        xml.push_str("  </packages>\n");
        xml.push_str("</coverage>\n");

        xml
    }

    /// Save the XML report to a file, creating parent directories as
    /// needed.
    pub fn save(&self, path: &Path) -> CoverageResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.generate())?;
        Ok(())
    }

    /// Group files by package (directory)
    fn group_by_package(&self) -> PackageMap<'a> {
        let mut packages: PackageMap<'a> = BTreeMap::new();

        for (file, cov) in self.dataset.files() {
            let package = file
                .rsplit_once('/')
                .map_or_else(|| "default".to_string(), |(dir, _)| dir.to_string());

            let _ = packages
                .entry(package)
                .or_default()
                .insert(file.as_str(), cov);
        }

        packages
    }

    /// Extract class name from file path: basename without extension
    fn class_name(file_path: &str) -> String {
        let name = file_path
            .rsplit_once('/')
            .map_or(file_path, |(_, name)| name);
        name.rsplit_once('.').map_or(name, |(stem, _)| stem).to_string()
    }

    /// Covered/total instrumented lines for a package
    fn package_line_counts(files: &BTreeMap<&str, &FileCoverage>) -> (usize, usize) {
        let mut covered = 0;
        let mut total = 0;
        for cov in files.values() {
            total += cov.instrumented.len();
            covered += cov.executed.len();
        }
        (covered, total)
    }
}

/// Escape XML attribute/text special characters
fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::record::{FileRecord, PartialRecord};

    fn test_dataset() -> ConsolidatedDataset {
        let mut record = PartialRecord {
            root: Some("src".to_string()),
            ..Default::default()
        };
        let _ = record.files.insert(
            "src/game.py".to_string(),
            FileRecord {
                executed: [10, 15].into_iter().collect(),
                instrumented: Some([10, 15, 20].into_iter().collect()),
                branches: std::collections::BTreeSet::new(),
            },
        );
        let _ = record.files.insert(
            "src/player.py".to_string(),
            FileRecord {
                executed: [5].into_iter().collect(),
                instrumented: Some([5, 10].into_iter().collect()),
                branches: std::collections::BTreeSet::new(),
            },
        );
        let mut dataset = ConsolidatedDataset::new();
        dataset.merge_record(Path::new("r"), &record).unwrap();
        dataset
    }

    #[test]
    fn test_xml_declaration_and_doctype() {
        let dataset = test_dataset();
        let output = XmlFormatter::new(&dataset).generate();

        assert!(output.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(output.contains("<!DOCTYPE coverage"));
    }

    #[test]
    fn test_coverage_element_totals() {
        let dataset = test_dataset();
        let output = XmlFormatter::new(&dataset).generate();

        // 3 of 5 instrumented lines executed
        assert!(output.contains(r#"line-rate="0.6000""#));
        assert!(output.contains(r#"lines-covered="3""#));
        assert!(output.contains(r#"lines-valid="5""#));
        assert!(output.contains("</coverage>"));
    }

    #[test]
    fn test_sources_element_from_root() {
        let dataset = test_dataset();
        let output = XmlFormatter::new(&dataset).generate();
        assert!(output.contains("<sources><source>src</source></sources>"));
    }

    #[test]
    fn test_packages_and_classes() {
        let dataset = test_dataset();
        let output = XmlFormatter::new(&dataset).generate();

        assert!(output.contains(r#"<package name="src""#));
        assert!(output.contains(r#"<class name="game" filename="src/game.py""#));
        assert!(output.contains(r#"<class name="player" filename="src/player.py""#));
    }

    #[test]
    fn test_line_detail_recomputable() {
        // Every instrumented line appears with hits 0 or 1
        let dataset = test_dataset();
        let output = XmlFormatter::new(&dataset).generate();

        assert!(output.contains(r#"<line number="10" hits="1"/>"#));
        assert!(output.contains(r#"<line number="15" hits="1"/>"#));
        assert!(output.contains(r#"<line number="20" hits="0"/>"#));
    }

    #[test]
    fn test_deterministic() {
        let dataset = test_dataset();
        let first = XmlFormatter::new(&dataset).generate();
        let second = XmlFormatter::new(&dataset).generate();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_dataset_has_no_data_marker() {
        let dataset = ConsolidatedDataset::new();
        let output = XmlFormatter::new(&dataset).generate();

        assert!(output.contains("<!-- no coverage data -->"));
        assert!(!output.contains("<packages>"));
    }

    #[test]
    fn test_with_version() {
        let dataset = test_dataset();
        let output = XmlFormatter::new(&dataset).with_version("9.9").generate();
        assert!(output.contains(r#"version="9.9""#));
    }

    #[test]
    fn test_class_name_extraction() {
        assert_eq!(XmlFormatter::class_name("src/game.py"), "game");
        assert_eq!(XmlFormatter::class_name("src/player/movement.py"), "movement");
        assert_eq!(XmlFormatter::class_name("main.rs"), "main");
        assert_eq!(XmlFormatter::class_name("Makefile"), "Makefile");
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape(r#"a<b>&"c""#), "a&lt;b&gt;&amp;&quot;c&quot;");
    }

    #[test]
    fn test_save_creates_file() {
        let dataset = test_dataset();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("reports").join("coverage.xml");

        XmlFormatter::new(&dataset).save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<?xml"));
    }
}
