//! Common error types for FileDeck

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommonError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Failed to obtain upload credential: {0}")]
    Credential(String),

    #[error("Failed to transfer file contents: {0}")]
    Transfer(String),

    #[error("Failed to register file metadata: {0}")]
    Registration(String),

    #[error("Fetch aborted at page {page}: {reason}")]
    SessionAborted { page: u32, reason: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl CommonError {
    /// Build an error from a non-success HTTP status and the body's message.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => CommonError::Unauthorized(message),
            _ => CommonError::Api { status, message },
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            CommonError::Api { status, .. } => Some(*status),
            CommonError::Unauthorized(_) => Some(401),
            _ => None,
        }
    }

    /// Errors scoped to a single file of an upload batch.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            CommonError::Credential(_) | CommonError::Transfer(_) | CommonError::Registration(_)
        )
    }
}

impl From<reqwest::Error> for CommonError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            CommonError::from_status(status.as_u16(), err.to_string())
        } else if err.is_decode() {
            CommonError::Decode(err.to_string())
        } else {
            CommonError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        CommonError::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CommonError {
    fn from(err: validator::ValidationErrors) -> Self {
        CommonError::ValidationFailed(err.to_string())
    }
}

impl From<std::io::Error> for CommonError {
    fn from(err: std::io::Error) -> Self {
        CommonError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            CommonError::from_status(401, "expired"),
            CommonError::Unauthorized(_)
        ));
        assert!(matches!(
            CommonError::from_status(403, "admins only"),
            CommonError::Unauthorized(_)
        ));
        assert_eq!(CommonError::from_status(500, "boom").status_code(), Some(500));
    }

    #[test]
    fn test_per_file_errors() {
        assert!(CommonError::Credential("test".to_string()).is_per_file());
        assert!(CommonError::Transfer("test".to_string()).is_per_file());
        assert!(CommonError::Registration("test".to_string()).is_per_file());
        assert!(!CommonError::Network("test".to_string()).is_per_file());
        assert!(!CommonError::SessionAborted { page: 2, reason: "test".to_string() }.is_per_file());
    }

    #[test]
    fn test_session_aborted_message() {
        let err = CommonError::SessionAborted {
            page: 3,
            reason: "Network error: connection reset".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Fetch aborted at page 3: Network error: connection reset"
        );
    }
}
