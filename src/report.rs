/*!
 * Reporting functionality for files-to-xml
 *
 * Summarizes a finished run as console tables rendered with tabled.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::Node;

/// Number of files listed in the files table
const TOP_FILES: usize = 10;

/// Information about a file in the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
    /// Whether the content is a read error marker
    pub unreadable: bool,
}

/// Statistics for a finished run
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Output file path
    pub output_file: String,
    /// Time taken to scan, render and write
    pub duration: Duration,
    /// Number of file nodes in the tree
    pub files_processed: usize,
    /// Number of files replaced by an error marker
    pub unreadable_files: usize,
    /// Lines written to the output file
    pub lines_written: usize,
    /// Total number of characters of file content
    pub total_chars: usize,
    /// Details for each file, in tree order
    pub file_details: Vec<(String, FileReportInfo)>,
}

impl ScanReport {
    /// Collect statistics from a scanned tree
    pub fn from_tree(
        tree: &Node,
        output_file: impl Into<String>,
        duration: Duration,
        lines_written: usize,
    ) -> Self {
        let file_details: Vec<(String, FileReportInfo)> = tree
            .files()
            .into_iter()
            .map(|file| {
                let info = FileReportInfo {
                    lines: file.content.lines().count(),
                    chars: file.content.chars().count(),
                    unreadable: file.is_read_error(),
                };
                (file.path.to_string_lossy().to_string(), info)
            })
            .collect();

        Self {
            output_file: output_file.into(),
            duration,
            files_processed: file_details.len(),
            unreadable_files: file_details.iter().filter(|(_, i)| i.unreadable).count(),
            lines_written,
            total_chars: file_details.iter().map(|(_, i)| i.chars).sum(),
            file_details,
        }
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for scan results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string based on run statistics
    pub fn generate_report(&self, report: &ScanReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ScanReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Keep the tail of long paths, where the file name is
    fn format_path(&self, path: &str, max_len: usize) -> String {
        let count = path.chars().count();
        if count <= max_len {
            return path.to_string();
        }
        let tail: String = path.chars().skip(count - (max_len - 3)).collect();
        format!("...{}", tail)
    }

    fn styled(&self, mut table: Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let row = |key: &str, value: String| SummaryRow {
            key: key.to_string(),
            value,
        };

        let rows = vec![
            row("📂 Output File", report.output_file.clone()),
            row("⏱️ Process Time", format!("{:.4?}", report.duration)),
            row("📄 Files Included", self.format_number(report.files_processed)),
            row("⚠️ Unreadable Files", self.format_number(report.unreadable_files)),
            row("📝 Lines Written", self.format_number(report.lines_written)),
            row(
                "📦 LLM Tokens",
                format!(
                    "{} tokens (estimated)",
                    self.format_number(report.total_chars / 4)
                ),
            ),
        ];

        self.styled(Table::new(rows))
    }

    fn create_files_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        let mut files: Vec<&(String, FileReportInfo)> = report.file_details.iter().collect();
        files.sort_by(|(_, a), (_, b)| b.chars.cmp(&a.chars));

        let rows: Vec<FileRow> = files
            .into_iter()
            .take(TOP_FILES)
            .map(|(path, info)| FileRow {
                path: self.format_path(path, 60),
                lines: if info.unreadable {
                    "error".to_string()
                } else {
                    self.format_number(info.lines)
                },
                tokens: self.format_number(info.chars / 4),
            })
            .collect();

        self.styled(Table::new(rows))
    }

    fn generate_console_report(&self, report: &ScanReport) -> String {
        let files_title = if report.file_details.len() > TOP_FILES {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT"
        } else {
            "📋  INCLUDED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title,
            self.create_files_table(report),
            "✅  XML WRITTEN",
            self.create_summary_table(report)
        )
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::types::{DirectoryNode, FileNode};

    fn tree() -> Node {
        Node::Directory(DirectoryNode {
            path: PathBuf::from("/r"),
            children: vec![
                Node::File(FileNode {
                    path: PathBuf::from("a.rs"),
                    content: "fn a() {}\nfn b() {}\n".to_string(),
                }),
                Node::File(FileNode::read_error(PathBuf::from("b.rs"), "denied")),
            ],
        })
    }

    #[test]
    fn report_counts_files_and_errors() {
        let report = ScanReport::from_tree(&tree(), "out.xml", Duration::from_millis(5), 12);
        assert_eq!(report.files_processed, 2);
        assert_eq!(report.unreadable_files, 1);
        assert_eq!(report.file_details[0].1.lines, 2);
        assert_eq!(report.lines_written, 12);
    }

    #[test]
    fn console_report_mentions_files() {
        let report = ScanReport::from_tree(&tree(), "out.xml", Duration::from_millis(5), 12);
        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&report);
        assert!(text.contains("a.rs"));
        assert!(text.contains("out.xml"));
        assert!(text.contains("INCLUDED FILES"));
    }

    #[test]
    fn long_paths_keep_their_tail() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        let long = format!("{}/main.rs", "deep".repeat(20));
        let shown = reporter.format_path(&long, 20);
        assert_eq!(shown.chars().count(), 20);
        assert!(shown.ends_with("/main.rs"));
    }
}
