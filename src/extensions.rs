/*!
 * Extension allow-list deciding which files count as plain text
 */

use std::path::Path;

use once_cell::sync::Lazy;

/// Bumped whenever [`DEFAULT_ALLOWED`] changes
pub const ALLOWLIST_VERSION: u32 = 1;

/// Default suffixes (leading dot) and exact basenames (no dot) to include
pub static DEFAULT_ALLOWED: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Web
        ".astro",
        ".css",
        ".scss",
        ".htm",
        ".html",
        ".html.in",
        ".js",
        ".jsx",
        ".mjs",
        ".ts",
        ".tsx",
        ".svg",
        // Config & data
        ".cfg",
        ".conf",
        ".csv",
        ".env",
        ".gitignore",
        ".ini",
        ".json",
        ".properties",
        ".toml",
        ".xml",
        ".yml",
        ".yaml",
        // Templates
        ".j2",
        // Docs
        ".log",
        ".md",
        ".markdown",
        ".tex",
        ".txt",
        // Languages
        ".lua",
        ".php",
        ".py",
        ".rb",
        ".rs",
        ".sh",
        ".sql",
        ".zig",
        ".zon",
        // Terraform
        ".tf",
        ".tfvars",
        // Build files
        "Dockerfile",
        "Makefile",
    ]
});

/// Set of file suffixes and basenames considered plain text
///
/// Entries starting with `.` match the end of a file name, so compound
/// suffixes such as `.html.in` work. Entries without a leading dot must equal
/// the whole file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allowlist {
    entries: Vec<String>,
}

impl Default for Allowlist {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED.iter().copied())
    }
}

impl Allowlist {
    /// Create an allow-list from the given entries, dropping blank ones
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self {
            entries: Vec::new(),
        };
        list.extend(entries);
        list
    }

    /// Add more entries, skipping blanks and duplicates
    pub fn extend<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() || self.entries.iter().any(|e| e == entry) {
                continue;
            }
            self.entries.push(entry.to_string());
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Check whether the file name of `path` is on the allow-list
    pub fn is_allowed(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy();

        self.entries.iter().any(|entry| {
            if entry.starts_with('.') {
                name.ends_with(entry.as_str())
            } else {
                name == entry.as_str()
            }
        })
    }
}
