use std::io;
use std::path::{Path, PathBuf};

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A collection or resource name was empty or not a usable path segment.
    #[error("invalid {what}: {reason}")]
    InvalidArgument { what: &'static str, reason: String },

    /// Neither the literal path nor its `.json` sibling exists.
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// I/O error from the underlying filesystem.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The stored document is malformed or does not match the requested shape.
    #[error("cannot decode {}: {source}", path.display())]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The value handed to a write cannot be represented as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn invalid(what: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            what,
            reason: reason.into(),
        }
    }

    /// Wrap an I/O error with the path it happened at.
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Like [`io`](Self::io), for reading or removing an existing target:
    /// a missing target is reported as [`StoreError::NotFound`].
    pub(crate) fn lookup(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            return Self::NotFound {
                path: path.to_path_buf(),
            };
        }
        Self::io(path, source)
    }

    pub(crate) fn decode(path: &Path, source: serde_json::Error) -> Self {
        Self::Deserialization {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns `true` for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for [`StoreError::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = StoreError::lookup(
            Path::new("/db/users/alice.json"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "not found: /db/users/alice.json");
    }

    #[test]
    fn missing_path_during_mutation_stays_io() {
        let err = StoreError::io(
            Path::new("/db/users/alice.json.tmp"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        match err {
            StoreError::Io { source, .. } => assert_eq!(source.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn other_io_errors_keep_their_source() {
        let err = StoreError::lookup(
            Path::new("/db/users"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        match err {
            StoreError::Io { path, source } => {
                assert_eq!(path, PathBuf::from("/db/users"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_argument_display() {
        let err = StoreError::invalid("collection", "must not be empty");
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "invalid collection: must not be empty");
    }
}
