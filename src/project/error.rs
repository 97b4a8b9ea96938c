use std::path::PathBuf;
use thiserror::Error;

use crate::io::ProcessError;

/// Why a project load produced no catalog
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Helper script not found: {}", path.display())]
    HelperMissing { path: PathBuf },

    #[error("Helper process failed: {message}")]
    ProcessFailed { message: String },

    #[error("Helper produced unexpected output ({reason}): {payload}")]
    ProtocolViolation { payload: String, reason: String },

    #[error("{message}")]
    HelperReportedError {
        message: String,
        diagnostic: Option<String>,
    },
}

impl LoadError {
    /// Create a process failure error
    pub fn process_failed(message: impl Into<String>) -> Self {
        Self::ProcessFailed {
            message: message.into(),
        }
    }

    /// Create a protocol violation error, keeping the offending payload
    pub fn protocol_violation(payload: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            payload: payload.into(),
            reason: reason.into(),
        }
    }

    /// Extra detail for the user beyond the error message, if any
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            LoadError::HelperReportedError { diagnostic, .. } => diagnostic.as_deref(),
            _ => None,
        }
    }
}

impl From<ProcessError> for LoadError {
    fn from(error: ProcessError) -> Self {
        LoadError::process_failed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_error_message_is_verbatim() {
        let error = LoadError::HelperReportedError {
            message: "No IDEA configuration directory found".to_string(),
            diagnostic: Some("Traceback ...".to_string()),
        };
        assert_eq!(error.to_string(), "No IDEA configuration directory found");
        assert_eq!(error.diagnostic(), Some("Traceback ..."));
    }

    #[test]
    fn test_process_error_conversion() {
        let error: LoadError = ProcessError::InvalidUtf8 {
            program: "python3".to_string(),
        }
        .into();
        assert!(matches!(error, LoadError::ProcessFailed { .. }));
        assert!(error.to_string().contains("python3"));
        assert_eq!(error.diagnostic(), None);
    }
}
