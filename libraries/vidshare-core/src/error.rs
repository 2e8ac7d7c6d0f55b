//! Core error types for Vidshare

use thiserror::Error;

/// Result type alias using `VidshareError`
pub type Result<T> = std::result::Result<T, VidshareError>;

/// Core error type for Vidshare collaborators
#[derive(Error, Debug)]
pub enum VidshareError {
    /// The action needs a signed-in user
    #[error("You must be logged in to {action}")]
    AuthRequired {
        /// What the user attempted (e.g. "upload videos")
        action: String,
    },

    /// Network-like failure reported by a service
    #[error("Network error: {0}")]
    Network(String),
}

impl VidshareError {
    /// Create an authentication-required error
    pub fn auth_required(action: impl Into<String>) -> Self {
        Self::AuthRequired {
            action: action.into(),
        }
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Whether this error means the caller is not signed in
    pub fn is_auth_required(&self) -> bool {
        matches!(self, Self::AuthRequired { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_required_message_names_action() {
        let err = VidshareError::auth_required("upload videos");
        assert_eq!(err.to_string(), "You must be logged in to upload videos");
        assert!(err.is_auth_required());
    }

    #[test]
    fn network_message() {
        let err = VidshareError::network("connection reset");
        assert_eq!(err.to_string(), "Network error: connection reset");
        assert!(!err.is_auth_required());
    }
}
