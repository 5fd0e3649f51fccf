/*!
 * Core types and data structures for files-to-xml
 */

use std::path::{Path, PathBuf};

/// Prefix placed in front of the message when a file could not be read
pub const READ_ERROR_PREFIX: &str = "[ERROR]: ";

/// Represents a directory in the scanned tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    /// Scan root as given for the root node, root-relative path otherwise
    pub path: PathBuf,
    /// Directory contents, in enumeration order
    pub children: Vec<Node>,
}

/// Represents a text file and its content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    /// Root-relative path
    pub path: PathBuf,
    /// File text, or a `[ERROR]: ...` marker if reading failed
    pub content: String,
}

/// A filesystem entry that is neither a directory nor a regular file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherNode {
    /// Short description of the entry type, e.g. `fifo` or `socket`
    pub kind: String,
    /// Root-relative path
    pub path: PathBuf,
}

/// A node of the source code tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Directory node
    Directory(DirectoryNode),
    /// Text file node
    File(FileNode),
    /// Special file node
    Other(OtherNode),
}

impl FileNode {
    /// Build a file node whose content is an inline read error
    pub fn read_error(path: PathBuf, message: impl std::fmt::Display) -> Self {
        Self {
            path,
            content: format!("{}{}", READ_ERROR_PREFIX, message),
        }
    }

    /// Whether the content is a read error marker
    pub fn is_read_error(&self) -> bool {
        self.content.starts_with(READ_ERROR_PREFIX)
    }
}

impl Node {
    pub fn path(&self) -> &Path {
        match self {
            Node::Directory(dir) => &dir.path,
            Node::File(file) => &file.path,
            Node::Other(other) => &other.path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    /// All file nodes below this node, depth-first in child order
    pub fn files(&self) -> Vec<&FileNode> {
        let mut out = Vec::new();
        self.collect_files(&mut out);
        out
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a FileNode>) {
        match self {
            Node::Directory(dir) => {
                for child in &dir.children {
                    child.collect_files(out);
                }
            }
            Node::File(file) => out.push(file),
            Node::Other(_) => {}
        }
    }
}
