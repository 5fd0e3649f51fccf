/*!
 * Simplified .gitignore support
 *
 * Patterns are collected from every `.gitignore` between a start directory
 * and the filesystem root, then translated into regular expressions. Only a
 * subset of git's glob syntax is understood: `*`, `?`, a leading `/` anchor
 * and a trailing `/` anchor. There is no `**`, no character classes and no
 * per-directory scoping, so this is not a faithful .gitignore engine.
 */

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use regex::Regex;

use crate::error::Result;

const GITIGNORE_FILE: &str = ".gitignore";

/// One pattern line from a `.gitignore` file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlobPattern(String);

impl GlobPattern {
    /// Parse a raw line, returning `None` for blanks and comments
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        Some(Self(line.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the pattern starts with `!`
    pub fn is_negated(&self) -> bool {
        self.0.starts_with('!')
    }

    /// Compile the pattern into a path predicate
    pub fn to_predicate(&self) -> Result<PatternPredicate> {
        let glob = self.0.strip_prefix('!').unwrap_or(&self.0);
        let regex = Regex::new(&glob_to_regex(glob))?;
        Ok(PatternPredicate {
            regex,
            negated: self.is_negated(),
        })
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compiled form of a [`GlobPattern`]
#[derive(Debug, Clone)]
pub struct PatternPredicate {
    regex: Regex,
    negated: bool,
}

impl PatternPredicate {
    /// Whether the glob (without its `!`) matches the path
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// A negated predicate re-includes paths instead of excluding them
    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

/// Translate a glob into an unanchored regular expression
fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let last = chars.len().saturating_sub(1);
    let mut out = String::with_capacity(glob.len() * 2);
    let mut buf = [0u8; 4];

    for (i, c) in chars.iter().enumerate() {
        match c {
            '/' if i == 0 => out.push('^'),
            '/' if i == last => out.push('$'),
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }

    out
}

/// Split `.gitignore` content into patterns
pub fn parse_gitignore(content: &str) -> Vec<GlobPattern> {
    content.lines().filter_map(GlobPattern::parse).collect()
}

/// Gather patterns from `start_dir` and all of its ancestors
///
/// Patterns from directories closer to `start_dir` come first. A missing
/// `.gitignore` is skipped; any other I/O failure is returned.
pub fn collect_patterns(start_dir: &Path) -> Result<Vec<GlobPattern>> {
    let start_dir = fs::canonicalize(start_dir)?;
    let mut patterns = Vec::new();
    let mut current = Some(start_dir.as_path());

    while let Some(dir) = current {
        let candidate = dir.join(GITIGNORE_FILE);
        match fs::read_to_string(&candidate) {
            Ok(content) => {
                let found = parse_gitignore(&content);
                debug!("{} patterns from {}", found.len(), candidate.display());
                patterns.extend(found);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        current = dir.parent();
    }

    Ok(patterns)
}

/// A set of compiled patterns applied together
#[derive(Debug, Clone, Default)]
pub struct GitIgnoreFilter {
    predicates: Vec<PatternPredicate>,
}

impl GitIgnoreFilter {
    pub fn new(patterns: &[GlobPattern]) -> Result<Self> {
        let predicates = patterns
            .iter()
            .map(GlobPattern::to_predicate)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { predicates })
    }

    /// Keep a path unless an exclusion matches and no negation rescues it
    pub fn keeps(&self, path: &str) -> bool {
        let mut excluded = false;
        for predicate in &self.predicates {
            if predicate.matches(path) {
                if predicate.is_negated() {
                    return true;
                }
                excluded = true;
            }
        }
        !excluded
    }
}

/// Filter paths through the given patterns, preserving order and duplicates
pub fn filter_paths<S: AsRef<str>>(paths: &[S], patterns: &[GlobPattern]) -> Result<Vec<String>> {
    let filter = GitIgnoreFilter::new(patterns)?;
    Ok(paths
        .iter()
        .map(|path| path.as_ref())
        .filter(|path| filter.keeps(path))
        .map(|path| path.to_string())
        .collect())
}
