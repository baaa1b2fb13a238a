//! Error types for brain operations.

use std::fmt;

use crate::auth::AuthError;

/// Errors that can occur while serving a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrainError {
    /// A required request field was absent or empty.
    MissingFields(String),

    /// Input was present but malformed. Carries one message per failing rule.
    Validation(Vec<String>),

    /// Signup with a username that already exists.
    UsernameTaken,

    /// Signin with a username that does not exist.
    UnknownUsername,

    /// Signin with a wrong password.
    WrongPassword,

    /// Missing or invalid bearer token.
    Unauthorized(AuthError),

    /// Content does not exist or is not owned by the caller.
    ContentNotFound,

    /// Share token was never issued or has been revoked.
    InvalidShareLink,

    /// Share link points at a user record that no longer exists.
    ShareOwnerMissing,

    /// Storage or other infrastructure failure. The message is for logs only.
    Internal(String),
}

impl fmt::Display for BrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields(msg) => write!(f, "Missing fields: {}", msg),
            Self::Validation(msgs) => write!(f, "Validation failed: {}", msgs.join("; ")),
            Self::UsernameTaken => write!(f, "User already exists with this username"),
            Self::UnknownUsername => write!(f, "Invalid username"),
            Self::WrongPassword => write!(f, "Invalid password"),
            Self::Unauthorized(e) => write!(f, "Unauthorized: {}", e),
            Self::ContentNotFound => write!(f, "Content not found"),
            Self::InvalidShareLink => write!(f, "Incorrect input: share link not found"),
            Self::ShareOwnerMissing => write!(f, "Share link owner no longer exists"),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for BrainError {}

/// Result type for brain operations.
pub type BrainResult<T> = Result<T, BrainError>;

impl From<anyhow::Error> for BrainError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{:#}", err))
    }
}

impl From<AuthError> for BrainError {
    fn from(err: AuthError) -> Self {
        Self::Unauthorized(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            BrainError::UsernameTaken.to_string(),
            "User already exists with this username"
        );
        assert_eq!(
            BrainError::Validation(vec!["a".into(), "b".into()]).to_string(),
            "Validation failed: a; b"
        );
        assert_eq!(
            BrainError::Unauthorized(AuthError::MissingToken).to_string(),
            "Unauthorized: Token not found"
        );
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let err: BrainError = anyhow::anyhow!("connection reset").into();
        assert!(matches!(err, BrainError::Internal(msg) if msg.contains("connection reset")));
    }
}
