/*!
 * files-to-xml - Serialize a directory's text files into one XML document
 *
 * The library walks a directory, keeps the plain-text files that are not
 * hidden or inside `node_modules`, reads them in parallel and renders the
 * resulting tree as XML with every file's content in a CDATA section.
 */

pub mod config;
pub mod error;
pub mod extensions;
pub mod gitignore;
pub mod pretty;
pub mod report;
pub mod scanner;
pub mod types;
pub mod writer;


// Re-export main components for easier access
pub use config::{Config, TreeShape};
pub use error::{FilesToXmlError, Result};
pub use extensions::Allowlist;
pub use gitignore::{collect_patterns, filter_paths, GlobPattern};
pub use pretty::pretty_print;
pub use report::{FileReportInfo, ReportFormat, Reporter, ScanReport};
pub use scanner::Scanner;
pub use types::{DirectoryNode, FileNode, Node, OtherNode};
pub use writer::{format_xml, render, XmlWriter};
