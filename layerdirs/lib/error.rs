use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a layerdirs-related operation.
pub type LayerdirsResult<T> = Result<T, LayerdirsError>;

/// An error that occurred while reading or populating a layer storage root.
#[derive(pretty_error_debug::Debug, Error)]
pub enum LayerdirsError {
    /// An ancestry record or source path does not exist.
    #[error("not found: {}", path.display())]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,

        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// A directory listing or record file could not be read.
    #[error("unreadable: {}: {source}", path.display())]
    Unreadable {
        /// The path that could not be read.
        path: PathBuf,

        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// A directory or file could not be created, written or flushed.
    #[error("write failed: {}: {source}", path.display())]
    WriteFailed {
        /// The path that could not be written.
        path: PathBuf,

        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// Source metadata could not be read or permissions could not be applied.
    #[error("permission copy failed: {}: {source}", path.display())]
    PermissionCopyFailed {
        /// The path whose permissions were being copied.
        path: PathBuf,

        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// An I/O error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A configuration file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// An error that can represent any error.
    #[error(transparent)]
    Custom(#[from] AnyError),
}

/// An error that can represent any error.
#[derive(Debug)]
pub struct AnyError {
    error: anyhow::Error,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl LayerdirsError {
    /// Creates a new `Err` result.
    pub fn custom(error: impl Into<anyhow::Error>) -> LayerdirsError {
        LayerdirsError::Custom(AnyError {
            error: error.into(),
        })
    }

    /// Classifies a failed read of `path`, separating absence from other failures.
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> LayerdirsError {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            LayerdirsError::NotFound { path, source }
        } else {
            LayerdirsError::Unreadable { path, source }
        }
    }

    /// Wraps a failed write of `path`.
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> LayerdirsError {
        LayerdirsError::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Wraps a failed permission read or update of `path`.
    pub(crate) fn permission(path: impl Into<PathBuf>, source: io::Error) -> LayerdirsError {
        LayerdirsError::PermissionCopyFailed {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the error means the looked up path does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LayerdirsError::NotFound { .. })
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl PartialEq for AnyError {
    fn eq(&self, other: &Self) -> bool {
        self.error.to_string() == other.error.to_string()
    }
}

impl Display for AnyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl Error for AnyError {}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_read_classifies_not_found() {
        let err = LayerdirsError::read("/r/layers/x", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_not_found());

        let err = LayerdirsError::read(
            "/r/layers/x",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, LayerdirsError::Unreadable { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_display_includes_path() {
        let err = LayerdirsError::write("/r/diff/a", io::Error::other("disk full"));
        assert_eq!(err.to_string(), "write failed: /r/diff/a: disk full");
    }
}
