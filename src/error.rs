use thiserror::Error;

/// Unified error type for git-semrel operations
#[derive(Error, Debug)]
pub enum SemrelError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Not a conventional commit: {0}")]
    NotConventional(String),

    #[error("Invalid commit message: {0}")]
    Validation(String),

    #[error("Tag already exists: {0}")]
    AlreadyExists(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results in git-semrel
pub type Result<T> = std::result::Result<T, SemrelError>;

impl SemrelError {
    /// Create a repository error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        SemrelError::Repository(msg.into())
    }

    /// Create a validation error naming the missing field
    pub fn validation(msg: impl Into<String>) -> Self {
        SemrelError::Validation(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        SemrelError::Version(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SemrelError::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SemrelError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_git() {
        let git_err = git2::Error::from_str("object not found");
        let err: SemrelError = git_err.into();
        assert!(err.to_string().starts_with("Git operation failed"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (SemrelError::repository("x"), "Repository error"),
            (SemrelError::validation("x"), "Invalid commit message"),
            (SemrelError::version("x"), "Version parsing error"),
            (SemrelError::config("x"), "Configuration error"),
            (
                SemrelError::AlreadyExists("refs/tags/v1.0.0".to_string()),
                "Tag already exists",
            ),
            (
                SemrelError::NotConventional("wip".to_string()),
                "Not a conventional commit",
            ),
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

    #[test]
    fn test_error_empty_messages() {
        let errors = vec![
            SemrelError::config(""),
            SemrelError::version(""),
            SemrelError::validation(""),
        ];

        for err in errors {
            // Even with empty message, the error type prefix should be present
            assert!(!err.to_string().is_empty());
        }
    }
}
