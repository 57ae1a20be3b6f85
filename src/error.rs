use thiserror::Error;

/// Unified error type for build-reconstructor operations
#[derive(Error, Debug)]
pub enum ReconstructError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Malformed version string: {0}")]
    MalformedVersion(String),

    #[error("Could not resolve commit: {0}")]
    Resolution(String),

    /// Recoverable: the requested ref does not exist in the repository.
    /// The resolver uses this as its "try the next tag candidate" signal.
    #[error("Ref not found: {0}")]
    MissingRef(String),

    #[error("Spec file error: {0}")]
    SpecFile(String),

    #[error("Spec file format error: {0}")]
    SpecFileFormat(String),

    #[error("Package metadata error: {0}")]
    Metadata(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Refusing to execute unsafe command: {0}")]
    UnsafeCommand(String),

    #[error("External tool failed: {0}")]
    Tool(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in build-reconstructor
pub type Result<T> = std::result::Result<T, ReconstructError>;

impl ReconstructError {
    /// Create a malformed-version error with context
    pub fn malformed_version(msg: impl Into<String>) -> Self {
        ReconstructError::MalformedVersion(msg.into())
    }

    /// Create a resolution error with context
    pub fn resolution(msg: impl Into<String>) -> Self {
        ReconstructError::Resolution(msg.into())
    }

    /// Create a missing-ref error for a ref name
    pub fn missing_ref(name: impl Into<String>) -> Self {
        ReconstructError::MissingRef(name.into())
    }

    /// Create a metadata error with context
    pub fn metadata(msg: impl Into<String>) -> Self {
        ReconstructError::Metadata(msg.into())
    }

    /// Create a spec file error with context
    pub fn spec_file(msg: impl Into<String>) -> Self {
        ReconstructError::SpecFile(msg.into())
    }

    /// Create a tool error with context
    pub fn tool(msg: impl Into<String>) -> Self {
        ReconstructError::Tool(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReconstructError::Config(msg.into())
    }

    /// Whether this error means "the ref does not exist, try another"
    /// rather than a fatal repository failure.
    pub fn is_missing_ref(&self) -> bool {
        matches!(self, ReconstructError::MissingRef(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReconstructError::resolution("no candidate tag matched");
        assert_eq!(
            err.to_string(),
            "Could not resolve commit: no candidate tag matched"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReconstructError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_constructors() {
        assert!(ReconstructError::malformed_version("test")
            .to_string()
            .contains("Malformed version"));
        assert!(ReconstructError::metadata("test")
            .to_string()
            .contains("metadata"));
    }

    #[test]
    fn test_missing_ref_is_recoverable() {
        assert!(ReconstructError::missing_ref("v1.0.0").is_missing_ref());
        assert!(!ReconstructError::resolution("x").is_missing_ref());
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ReconstructError = io_err.into();
        assert!(!err.is_missing_ref());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReconstructError::malformed_version("x"), "Malformed version"),
            (ReconstructError::resolution("x"), "Could not resolve"),
            (ReconstructError::spec_file("x"), "Spec file error"),
            (
                ReconstructError::UnsafeCommand("x".to_string()),
                "Refusing to execute",
            ),
            (ReconstructError::tool("x"), "External tool failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
