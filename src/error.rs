//! Global error handling for files-to-xml
//!
//! Only structural failures travel through this type. Per-file read failures
//! never become errors: the scanner folds them into the file node's content.

use std::io;
use thiserror::Error;

/// Global error type for files-to-xml operations
#[derive(Error, Debug)]
pub enum FilesToXmlError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Directory traversal errors
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// XML processing errors, including strict re-formatting failures
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A .gitignore pattern that could not be compiled
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Scanner errors
    #[error("Scanner error: {0}")]
    Scanner(String),

    /// Writer errors
    #[error("Writer error: {0}")]
    Writer(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Specialized Result type for files-to-xml operations
pub type Result<T> = std::result::Result<T, FilesToXmlError>;

/// Creates a FilesToXmlError with a formatted message
#[macro_export]
macro_rules! fs_error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::FilesToXmlError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::fs_error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            FilesToXmlError::Unexpected(format!("{}: {}", context, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn needs_positive(n: i32) -> Result<i32> {
        crate::ensure!(n > 0, Config, "expected a positive number, got {}", n);
        Ok(n)
    }

    #[test]
    fn ensure_macro_builds_formatted_error() {
        assert_eq!(needs_positive(3).unwrap(), 3);
        let err = needs_positive(-1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: expected a positive number, got -1"
        );
    }

    #[test]
    fn with_context_prefixes_message() {
        let raw: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let err = raw.with_context(|| "writing out.xml").unwrap_err();
        assert_eq!(err.to_string(), "Unexpected error: writing out.xml: denied");
    }
}
