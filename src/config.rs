/*!
 * Configuration handling for files-to-xml
 */

use std::env;
use std::path::{Component, Path, PathBuf};

use clap::{Parser, ValueEnum};
use clap_complete::Shell;

use crate::error::Result;
use crate::extensions::Allowlist;
use crate::{bail, ensure};

/// How scanned files are arranged under the root directory node
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeShape {
    /// Every file is a direct child of the root (default)
    Flat,
    /// Intermediate directories become their own directory nodes
    Nested,
}

impl Default for TreeShape {
    fn default() -> Self {
        Self::Flat
    }
}

/// Command-line arguments for files-to-xml
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "files-to-xml",
    version = env!("CARGO_PKG_VERSION"),
    about = "Serialize a directory's text files into a single XML document",
    long_about = "Walks a directory, keeps the plain-text files that are not hidden or inside node_modules, and writes their contents as CDATA sections of one XML document, ready to paste into an LLM."
)]
pub struct Args {
    /// Directory to scan (defaults to the current directory)
    pub source_path: Option<String>,

    /// Output XML file (defaults to files.<current dir name>.xml)
    #[clap(long)]
    pub out_file: Option<String>,

    /// Arrangement of files in the output
    #[clap(long, value_enum, default_value_t = TreeShape::default())]
    pub shape: TreeShape,

    /// Also drop paths matched by .gitignore files above the source directory
    #[clap(long)]
    pub respect_gitignore: bool,

    /// Comma-separated suffixes/basenames replacing the default allow-list
    #[clap(long, value_delimiter = ',')]
    pub allow: Vec<String>,

    /// Comma-separated suffixes/basenames added to the allow-list
    #[clap(long, value_delimiter = ',')]
    pub also_allow: Vec<String>,

    /// Number of threads used to read files
    #[clap(long, default_value = "4")]
    pub threads: usize,

    /// Write the raw XML without re-indenting it
    #[clap(long)]
    pub no_format: bool,

    /// Only log warnings and skip the summary table
    #[clap(long, short)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to scan
    pub target_dir: PathBuf,

    /// Output XML file path
    pub output_file: PathBuf,

    /// Output tree shape
    pub shape: TreeShape,

    /// Whether to apply .gitignore patterns
    pub respect_gitignore: bool,

    /// Files considered plain text
    pub allowlist: Allowlist,

    /// Number of threads to use for reading
    pub num_threads: usize,

    /// Whether to re-indent the XML before writing
    pub format_output: bool,

    /// Suppress progress and summary output
    pub quiet: bool,
}

impl Config {
    /// Configuration with defaults for everything but the two paths
    pub fn new(target_dir: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            output_file: output_file.into(),
            shape: TreeShape::default(),
            respect_gitignore: false,
            allowlist: Allowlist::default(),
            num_threads: 4,
            format_output: true,
            quiet: false,
        }
    }

    /// Create configuration from command-line arguments and the process working directory
    pub fn from_args(args: Args) -> Result<Self> {
        let cwd = env::current_dir()?;
        Ok(Self::from_args_in(args, &cwd))
    }

    /// Create configuration from command-line arguments relative to `cwd`
    pub fn from_args_in(args: Args, cwd: &Path) -> Self {
        let target_dir = match &args.source_path {
            Some(source) => resolve(cwd, Path::new(source)),
            None => cwd.to_path_buf(),
        };

        let output_file = match &args.out_file {
            Some(out) => resolve(cwd, Path::new(out)),
            None => cwd.join(default_output_name(cwd)),
        };

        let mut allowlist = if args.allow.is_empty() {
            Allowlist::default()
        } else {
            Allowlist::new(&args.allow)
        };
        allowlist.extend(&args.also_allow);

        Self {
            target_dir,
            output_file,
            shape: args.shape,
            respect_gitignore: args.respect_gitignore,
            allowlist,
            num_threads: args.threads,
            format_output: !args.no_format,
            quiet: args.quiet,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.target_dir.exists() {
            bail!(
                PathNotFound,
                "Source directory not found: {}",
                self.target_dir.display()
            );
        }
        ensure!(
            self.target_dir.is_dir(),
            Config,
            "Source path is not a directory: {}",
            self.target_dir.display()
        );

        if let Some(parent) = self.output_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                bail!(
                    PathNotFound,
                    "Output directory not found: {}",
                    parent.display()
                );
            }
        }

        ensure!(self.num_threads > 0, Config, "--threads must be at least 1");
        ensure!(
            !self.allowlist.entries().is_empty(),
            Config,
            "The allow-list is empty, nothing would be included"
        );

        Ok(())
    }
}

/// Join `path` onto `base` and fold away `.` and `..` without touching the filesystem
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in base.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// `files.<dir name>.xml` for the given working directory
fn default_output_name(cwd: &Path) -> String {
    match cwd.file_name() {
        Some(name) => format!("files.{}.xml", name.to_string_lossy()),
        None => "files.xml".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("files-to-xml").chain(argv.iter().copied()))
    }

    #[test]
    fn defaults_resolve_against_cwd() {
        let config = Config::from_args_in(parse(&[]), Path::new("/work/project"));
        assert_eq!(config.target_dir, PathBuf::from("/work/project"));
        assert_eq!(
            config.output_file,
            PathBuf::from("/work/project/files.project.xml")
        );
        assert_eq!(config.shape, TreeShape::Flat);
        assert!(config.format_output);
        assert_eq!(config.allowlist, Allowlist::default());
    }

    #[test]
    fn explicit_paths_and_allow_lists() {
        let args = parse(&[
            "src",
            "--out-file",
            "out/dump.xml",
            "--shape",
            "nested",
            "--allow",
            ".rs,.toml",
            "--also-allow",
            "Justfile",
            "--no-format",
        ]);
        let config = Config::from_args_in(args, Path::new("/work/project"));
        assert_eq!(config.target_dir, PathBuf::from("/work/project/src"));
        assert_eq!(config.output_file, PathBuf::from("/work/project/out/dump.xml"));
        assert_eq!(config.shape, TreeShape::Nested);
        assert!(!config.format_output);
        assert_eq!(config.allowlist.entries(), &[".rs", ".toml", "Justfile"]);
    }

    #[test]
    fn absolute_source_path_wins_over_cwd() {
        let config = Config::from_args_in(parse(&["/elsewhere"]), Path::new("/work"));
        assert_eq!(config.target_dir, PathBuf::from("/elsewhere"));
    }

    #[test]
    fn parent_components_are_folded() {
        let args = parse(&["../sub/./src", "--out-file", "../out/dump.xml"]);
        let config = Config::from_args_in(args, Path::new("/work/sub"));
        assert_eq!(config.target_dir, PathBuf::from("/work/sub/src"));
        assert_eq!(config.output_file, PathBuf::from("/work/out/dump.xml"));

        assert_eq!(resolve(Path::new("/"), Path::new("../../a")), PathBuf::from("/a"));
    }

    #[test]
    fn validate_rejects_missing_source() {
        let dir = tempdir().unwrap();
        let config = Config::new(dir.path().join("missing"), dir.path().join("out.xml"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().starts_with("Path not found"));
    }

    #[test]
    fn validate_rejects_missing_output_dir_and_zero_threads() {
        let dir = tempdir().unwrap();
        let config = Config::new(dir.path(), dir.path().join("nope").join("out.xml"));
        assert!(config.validate().is_err());

        let mut config = Config::new(dir.path(), dir.path().join("out.xml"));
        config.validate().unwrap();
        config.num_threads = 0;
        assert!(config.validate().is_err());
    }
}
