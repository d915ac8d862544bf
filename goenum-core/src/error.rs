//! Typed error handling for goenum.
//!
//! Loader failures carry the file and, where known, the position of the
//! offending token so callers can print compiler-style diagnostics.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for goenum operations.
#[derive(Error, Debug)]
pub enum GoenumError {
    /// I/O error when reading source or config files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Lexical or syntax error in a Go source file
    #[error("{}", render_parse(.path, .message, .line, .column))]
    Parse {
        path: PathBuf,
        message: String,
        /// Line number (1-indexed) if available
        line: Option<usize>,
        /// Column number (1-indexed) if available
        column: Option<usize>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A const group held a specification that is not a value spec.
    ///
    /// The loader never builds such a tree; seeing one aborts extraction
    /// for that file.
    #[error("Malformed declaration in {path}: {message}")]
    MalformedSpec { path: PathBuf, message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn render_parse(
    path: &std::path::Path,
    message: &str,
    line: &Option<usize>,
    column: &Option<usize>,
) -> String {
    match (*line, *column) {
        (Some(l), Some(c)) => format!("{}:{}:{}: {}", path.display(), l, c, message),
        (Some(l), None) => format!("{}:{}: {}", path.display(), l, message),
        _ => format!("{}: {}", path.display(), message),
    }
}

impl GoenumError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a parse error without location.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Create a parse error with line/column info.
    pub fn parse_at(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a malformed-spec error.
    pub fn malformed_spec(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedSpec {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an internal error for a broken invariant.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (other files can still be processed).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::MalformedSpec { .. } | Self::Io { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Parse { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            Self::MalformedSpec { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for goenum results.
pub type GoenumResult<T> = Result<T, GoenumError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> GoenumResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> GoenumResult<T> {
        self.map_err(|e| GoenumError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = GoenumError::io(
            PathBuf::from("/test/enums.go"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, GoenumError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/test/enums.go")));
        assert!(err.to_string().contains("/test/enums.go"));
    }

    #[test]
    fn test_parse_error_with_location() {
        let err = GoenumError::parse_at("pkg/color.go", "expected ')'", 10, 5);
        if let GoenumError::Parse { line, column, .. } = &err {
            assert_eq!(*line, Some(10));
            assert_eq!(*column, Some(5));
        } else {
            panic!("Expected Parse error");
        }
        assert_eq!(err.to_string(), "pkg/color.go:10:5: expected ')'");
    }

    #[test]
    fn test_parse_error_without_location() {
        let err = GoenumError::parse("pkg/color.go", "file too large");
        assert_eq!(err.to_string(), "pkg/color.go: file too large");
    }

    #[test]
    fn test_is_recoverable() {
        assert!(GoenumError::parse("a.go", "error").is_recoverable());
        assert!(GoenumError::malformed_spec("a.go", "type spec in const group").is_recoverable());
        assert!(!GoenumError::invalid_argument("bad --type").is_recoverable());
        assert!(!GoenumError::config("goenum.toml", "bad key").is_recoverable());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let mapped = result.with_path("/missing/file.go");
        assert!(matches!(mapped, Err(GoenumError::Io { .. })));
    }
}
