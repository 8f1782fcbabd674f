//! Result and error types for apicov.

use thiserror::Error;

/// Result type for apicov operations
pub type ApicovResult<T> = Result<T, ApicovError>;

/// Errors raised while loading inputs or rendering reports.
///
/// The reconciliation engine itself never fails; only the collaborators
/// around it (loaders and renderers) produce these.
#[derive(Debug, Error)]
pub enum ApicovError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Contract document could not be parsed
    #[error("Failed to parse API contract: {message}")]
    ContractParse {
        /// Error message
        message: String,
    },

    /// Traffic archive could not be parsed
    #[error("Failed to parse traffic archive: {message}")]
    TrafficParse {
        /// Error message
        message: String,
    },

    /// Verdict report could not be parsed
    #[error("Failed to parse verdict report: {message}")]
    VerdictParse {
        /// Error message
        message: String,
    },

    /// Report rendering failed
    #[error("Report rendering failed: {message}")]
    Render {
        /// Error message
        message: String,
    },
}

impl ApicovError {
    /// Create a contract parse error
    #[must_use]
    pub fn contract(message: impl Into<String>) -> Self {
        Self::ContractParse {
            message: message.into(),
        }
    }

    /// Create a traffic parse error
    #[must_use]
    pub fn traffic(message: impl Into<String>) -> Self {
        Self::TrafficParse {
            message: message.into(),
        }
    }

    /// Create a verdict parse error
    #[must_use]
    pub fn verdict(message: impl Into<String>) -> Self {
        Self::VerdictParse {
            message: message.into(),
        }
    }

    /// Create a render error
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_error_display() {
        let err = ApicovError::contract("bad yaml");
        assert!(err.to_string().contains("API contract"));
        assert!(err.to_string().contains("bad yaml"));
    }

    #[test]
    fn test_traffic_error_display() {
        let err = ApicovError::traffic("missing entries");
        assert!(err.to_string().contains("traffic archive"));
    }

    #[test]
    fn test_verdict_error_display() {
        let err = ApicovError::verdict("unreadable");
        assert!(err.to_string().contains("verdict report"));
    }

    #[test]
    fn test_render_error_display() {
        let err = ApicovError::render("serializer failed");
        assert!(err.to_string().contains("rendering"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ApicovError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
