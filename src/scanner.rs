/*!
 * Directory walking, filtering and file reading
 */

use std::ffi::OsStr;
use std::fs::{self, FileType};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use log::{debug, info, warn};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::{Config, TreeShape};
use crate::error::{FilesToXmlError, Result};
use crate::fs_error;
use crate::gitignore::{collect_patterns, GitIgnoreFilter};
use crate::types::{DirectoryNode, FileNode, Node, OtherNode};

/// Directory name whose contents are always skipped
const DEPENDENCY_DIR: &str = "node_modules";

/// What a surviving entry will turn into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    /// Regular file or symlink, read as text
    File,
    /// Fifo, socket or device, never read
    Special(&'static str),
}

/// A path that passed every filter and is waiting to be read
#[derive(Debug, Clone)]
struct Candidate {
    abs_path: PathBuf,
    rel_path: PathBuf,
    kind: EntryKind,
}

/// Scanner for directory contents
pub struct Scanner {
    /// Scanner configuration
    config: Config,
    /// Progress bar, advanced once per entry read
    pub progress: Arc<ProgressBar>,
    /// Output file with its parent directory canonicalized, if that exists
    output_location: Option<PathBuf>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        let output_location = canonical_location(&config.output_file);
        Self {
            config,
            progress,
            output_location,
        }
    }

    /// Scan the target directory and return the root directory node
    ///
    /// Only a failure to list the root itself (or to read `.gitignore`
    /// files when they are respected) is an error. Unreadable files end up
    /// as file nodes carrying an `[ERROR]: ...` marker.
    pub fn scan(&self) -> Result<Node> {
        let root = &self.config.target_dir;

        let mut candidates = self.list_candidates(root)?;
        if self.config.respect_gitignore {
            candidates = self.apply_gitignore(root, candidates)?;
        }
        info!(
            "Found {} files to include under {}",
            candidates.len(),
            root.display()
        );

        self.progress.set_length(candidates.len() as u64);
        let nodes: Vec<Node> = candidates
            .par_iter()
            .map(|candidate| self.load(candidate))
            .collect();

        let children = match self.config.shape {
            TreeShape::Flat => nodes,
            TreeShape::Nested => nest(nodes),
        };

        Ok(Node::Directory(DirectoryNode {
            path: root.clone(),
            children,
        }))
    }

    /// Recursively list every entry that survives the path filters
    fn list_candidates(&self, root: &Path) -> Result<Vec<Candidate>> {
        if let Err(e) = fs::read_dir(root) {
            return Err(match e.kind() {
                io::ErrorKind::NotFound => FilesToXmlError::PathNotFound(root.display().to_string()),
                _ => fs_error!(Scanner, "Cannot list {}: {}", root.display(), e),
            });
        }

        let walker = WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_excluded_segment(e.file_name()));

        let mut candidates = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }

            let abs_path = entry.path().to_path_buf();
            if self.is_output_file(&abs_path) {
                debug!("Skipping output file {}", abs_path.display());
                continue;
            }
            if !self.config.allowlist.is_allowed(&abs_path) {
                continue;
            }

            let rel_path = match abs_path.strip_prefix(root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => {
                    warn!("{} is outside of {}", abs_path.display(), root.display());
                    continue;
                }
            };

            candidates.push(Candidate {
                abs_path,
                rel_path,
                kind: classify(file_type),
            });
        }

        Ok(candidates)
    }

    /// Whether `path` names the file this run is about to write
    fn is_output_file(&self, path: &Path) -> bool {
        if path == self.config.output_file {
            return true;
        }
        match &self.output_location {
            Some(location) => {
                path.file_name() == location.file_name()
                    && canonical_location(path).as_ref() == Some(location)
            }
            None => false,
        }
    }

    /// Drop candidates matched by .gitignore patterns found from the root upwards
    fn apply_gitignore(&self, root: &Path, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        let patterns = collect_patterns(root)?;
        debug!("Applying {} .gitignore patterns", patterns.len());
        let filter = GitIgnoreFilter::new(&patterns)?;

        Ok(candidates
            .into_iter()
            .filter(|c| {
                let keep = filter.keeps(&slash_path(&c.rel_path));
                if !keep {
                    debug!("Ignored by .gitignore: {}", c.rel_path.display());
                }
                keep
            })
            .collect())
    }

    /// Turn a candidate into a node, absorbing read failures
    fn load(&self, candidate: &Candidate) -> Node {
        self.progress.inc(1);

        match candidate.kind {
            EntryKind::Special(kind) => Node::Other(OtherNode {
                kind: kind.to_string(),
                path: candidate.rel_path.clone(),
            }),
            EntryKind::File => match fs::read(&candidate.abs_path) {
                Ok(bytes) => Node::File(FileNode {
                    path: candidate.rel_path.clone(),
                    content: String::from_utf8_lossy(&bytes).into_owned(),
                }),
                Err(e) => {
                    warn!("Failed to read {}: {}", candidate.abs_path.display(), e);
                    Node::File(FileNode::read_error(candidate.rel_path.clone(), e))
                }
            },
        }
    }
}

/// `path` with its parent directory canonicalized and its file name kept as is
fn canonical_location(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|dir| dir.join(name))
}

/// Hidden entries and dependency directories
fn is_excluded_segment(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') || name == DEPENDENCY_DIR
}

#[cfg(unix)]
fn classify(file_type: FileType) -> EntryKind {
    use std::os::unix::fs::FileTypeExt;

    if file_type.is_fifo() {
        EntryKind::Special("fifo")
    } else if file_type.is_socket() {
        EntryKind::Special("socket")
    } else if file_type.is_block_device() {
        EntryKind::Special("block-device")
    } else if file_type.is_char_device() {
        EntryKind::Special("char-device")
    } else {
        EntryKind::File
    }
}

#[cfg(not(unix))]
fn classify(_file_type: FileType) -> EntryKind {
    EntryKind::File
}

/// Relative path with `/` separators, as .gitignore patterns expect
fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Regroup flat file nodes under directory nodes for each parent directory
///
/// Directories appear in the order their first file was enumerated.
fn nest(nodes: Vec<Node>) -> Vec<Node> {
    let mut root = Vec::new();

    for node in nodes {
        let mut parents: Vec<PathBuf> = node
            .path()
            .ancestors()
            .skip(1)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect();
        parents.reverse();

        let mut level = &mut root;
        for dir in parents {
            level = child_dir(level, dir);
        }
        level.push(node);
    }

    root
}

/// Children of the directory node `dir` within `level`, created on first use
fn child_dir(level: &mut Vec<Node>, dir: PathBuf) -> &mut Vec<Node> {
    let existing = level
        .iter()
        .position(|n| matches!(n, Node::Directory(d) if d.path == dir));

    let idx = match existing {
        Some(idx) => idx,
        None => {
            level.push(Node::Directory(DirectoryNode {
                path: dir,
                children: Vec::new(),
            }));
            level.len() - 1
        }
    };

    match &mut level[idx] {
        Node::Directory(d) => &mut d.children,
        _ => unreachable!("index always points at a directory node"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> Node {
        Node::File(FileNode {
            path: PathBuf::from(path),
            content: String::new(),
        })
    }

    #[test]
    fn excluded_segments() {
        assert!(is_excluded_segment(OsStr::new(".git")));
        assert!(is_excluded_segment(OsStr::new(".env")));
        assert!(is_excluded_segment(OsStr::new("node_modules")));
        assert!(!is_excluded_segment(OsStr::new("node_modules_backup")));
        assert!(!is_excluded_segment(OsStr::new("src")));
    }

    #[test]
    fn slash_path_joins_components() {
        assert_eq!(slash_path(Path::new("a/b/c.rs")), "a/b/c.rs");
    }

    #[test]
    fn nest_groups_by_parent_in_first_seen_order() {
        let nested = nest(vec![
            file("src/main.rs"),
            file("README.md"),
            file("src/util/mod.rs"),
            file("src/lib.rs"),
        ]);

        let paths: Vec<&Path> = nested.iter().map(Node::path).collect();
        assert_eq!(paths, vec![Path::new("src"), Path::new("README.md")]);

        let Node::Directory(src) = &nested[0] else {
            panic!("expected src directory");
        };
        let src_paths: Vec<&Path> = src.children.iter().map(Node::path).collect();
        assert_eq!(
            src_paths,
            vec![
                Path::new("src/main.rs"),
                Path::new("src/util"),
                Path::new("src/lib.rs")
            ]
        );
    }
}
