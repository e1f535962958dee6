//! Error types for Content Understanding operations.
//!
//! Errors are categorized so callers can distinguish credential problems
//! from transient network failures and give appropriate advice.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for content operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of content errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid or missing API credentials.
    Auth,
    /// Network-related errors (transient, retryable).
    Network,
    /// Schema or resource not found.
    NotFound,
    /// Malformed response or schema definition.
    Format,
    /// Analysis did not finish within the polling budget.
    Timeout,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::Timeout)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Auth => "Authentication failed",
            Self::Network => "Network connectivity issue",
            Self::NotFound => "Not found",
            Self::Format => "Invalid format",
            Self::Timeout => "Operation timed out",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Auth => "Check that CONTENT_UNDERSTANDING_KEY holds a valid key for the endpoint",
            Self::Network => "Check your internet connection and try again",
            Self::NotFound => "Verify the name and version are correct",
            Self::Format => "The response or file may be malformed, check the error details",
            Self::Timeout => "The service may be busy, try again in a moment",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur during content operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// Analysis request was accepted with an unexpected status code.
    #[error("analysis did not start: expected HTTP 202, got {status}")]
    AnalysisNotStarted {
        /// Status code the service returned.
        status: u16,
    },

    /// Accepted analysis response carried no polling location.
    #[error("analysis response missing Operation-Location header")]
    MissingOperationLocation,

    /// The service reported the analysis as failed.
    #[error("analysis failed for {analyzer}: {message}")]
    AnalysisFailed {
        /// Analyzer id that was running.
        analyzer: String,
        /// Failure detail from the service.
        message: String,
    },

    /// Polling budget ran out before the analysis finished.
    #[error("analysis timed out for {analyzer} after {seconds}s")]
    AnalysisTimedOut {
        /// Analyzer id that was running.
        analyzer: String,
        /// Budget that was exhausted.
        seconds: u64,
    },

    /// The service reported a status this client does not know.
    #[error("unexpected analysis status: {0}")]
    UnexpectedStatus(String),

    /// Invalid response from the API.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// Schema file does not exist.
    #[error("schema {name} version {version} not found at {path}")]
    SchemaNotFound {
        /// Schema base name.
        name: String,
        /// Schema version.
        version: String,
        /// Path that was probed.
        path: PathBuf,
    },

    /// Schema definition failed validation.
    #[error("invalid schema: {0}")]
    SchemaInvalid(String),

    /// IO error during file operations.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Http {
                status: Some(401 | 403),
                ..
            } => ErrorCategory::Auth,
            Error::Http { .. } => ErrorCategory::Network,
            Error::AnalysisNotStarted { .. } => ErrorCategory::Format,
            Error::MissingOperationLocation => ErrorCategory::Format,
            Error::AnalysisFailed { .. } => ErrorCategory::Other,
            Error::AnalysisTimedOut { .. } => ErrorCategory::Timeout,
            Error::UnexpectedStatus(_) => ErrorCategory::Format,
            Error::InvalidResponse(_) => ErrorCategory::Format,
            Error::SchemaNotFound { .. } => ErrorCategory::NotFound,
            Error::SchemaInvalid(_) => ErrorCategory::Format,
            Error::Io { .. } => ErrorCategory::Other,
        }
    }

    /// Whether this error is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
