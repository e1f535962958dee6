//! Error types for Azure Resource Manager operations.
//!
//! Errors are categorized so callers can apply the right policy per call
//! site: auth and connectivity problems abort a whole run, while a
//! "not found" during cleanup means the resource is already gone and the
//! operation effectively succeeded.

use thiserror::Error;

/// Categories of provider errors.
///
/// The category decides whether an error aborts the run, can be treated as
/// already-done, or is just a per-item failure to log and skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Not logged in, expired token, missing subscription
    Auth,
    /// Network-level failure reaching the provider
    Network,
    /// Resource, group, or deployment does not exist
    NotFound,
    /// Concurrent operation or name still held by an in-flight deletion
    Conflict,
    /// Provider refused the request (quota, policy, SKU availability)
    Rejected,
    /// The az CLI itself is not installed
    CliMissing,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Whether this error must abort the whole run, even inside a
    /// best-effort batch loop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth | Self::Network | Self::CliMissing)
    }

    /// Whether this error can be treated as "already done" when the goal
    /// was to remove something.
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Auth => "Azure authentication problem",
            Self::Network => "Network connectivity issue",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Conflicting operation in progress",
            Self::Rejected => "Request rejected by the provider",
            Self::CliMissing => "Azure CLI not installed",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Auth => "Run `az login` and select the right subscription",
            Self::Network => "Check your internet connection and try again",
            Self::NotFound => "Verify the resource group and deployment names",
            Self::Conflict => "Wait for the in-flight provider operation to finish",
            Self::Rejected => "Check quota, policy assignments, and SKU availability in the region",
            Self::CliMissing => "Install the Azure CLI from https://aka.ms/azure-cli",
            Self::Other => "Check the error details for more information",
        }
    }
}

/// Errors that can occur during provider operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Not authenticated against the provider
    #[error("authentication failed: {message}")]
    Auth {
        /// Detail from the failed call
        message: String,
    },

    /// Network-level failure
    #[error("network error: {message}")]
    Network {
        /// Detail from the failed call
        message: String,
    },

    /// Target does not exist
    #[error("not found: {what}")]
    NotFound {
        /// What was being looked up
        what: String,
    },

    /// Another operation holds the resource or its name
    #[error("conflict: {message}")]
    Conflict {
        /// Detail from the failed call
        message: String,
    },

    /// Provider refused the request outright
    #[error("request rejected: {message}")]
    Rejected {
        /// Detail from the failed call
        message: String,
    },

    /// The az executable could not be located
    #[error("az CLI not found. Install it from https://aka.ms/azure-cli")]
    CliMissing,

    /// Command execution failed for another reason
    #[error("command failed: {message}")]
    CommandFailed {
        /// Description of what command failed
        message: String,
        /// Standard error output from the failed command
        stderr: String,
    },

    /// The CLI produced output we could not interpret
    #[error("unexpected az output: {0}")]
    Parse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Get the error category for run policy decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Auth { .. } => ErrorCategory::Auth,
            Error::Network { .. } => ErrorCategory::Network,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::Conflict { .. } => ErrorCategory::Conflict,
            Error::Rejected { .. } => ErrorCategory::Rejected,
            Error::CliMissing => ErrorCategory::CliMissing,
            _ => ErrorCategory::Other,
        }
    }

    /// Whether this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        self.category().is_fatal()
    }

    /// Whether this error can be treated as "already done".
    pub fn is_ignorable(&self) -> bool {
        self.category().is_ignorable()
    }

    /// Create an error from az command output.
    ///
    /// Analyzes stderr to categorize the error appropriately. `what` names
    /// the target of the call for NotFound messages.
    pub fn from_az_output(stderr: &str, what: Option<&str>) -> Self {
        let stderr_lower = stderr.to_lowercase();

        // Authentication problems
        if stderr_lower.contains("az login")
            || stderr_lower.contains("aadsts")
            || stderr_lower.contains("authentication")
            || stderr_lower.contains("credential")
            || stderr_lower.contains("token has expired")
            || stderr_lower.contains("no subscription")
        {
            return Error::Auth {
                message: stderr.trim().to_string(),
            };
        }

        // Network errors
        if stderr_lower.contains("could not resolve")
            || stderr_lower.contains("connection refused")
            || stderr_lower.contains("connection aborted")
            || stderr_lower.contains("timed out")
            || stderr_lower.contains("max retries exceeded")
            || stderr_lower.contains("getaddrinfo")
            || stderr_lower.contains("ssl")
        {
            return Error::Network {
                message: stderr.trim().to_string(),
            };
        }

        // Not found errors
        if stderr_lower.contains("could not be found")
            || stderr_lower.contains("resourcenotfound")
            || stderr_lower.contains("resourcegroupnotfound")
            || stderr_lower.contains("deploymentnotfound")
            || stderr_lower.contains("was not found")
            || stderr_lower.contains("does not exist")
        {
            return Error::NotFound {
                what: what.unwrap_or("unknown").to_string(),
            };
        }

        // Conflicts (name reservations, in-flight deletions)
        if stderr_lower.contains("conflict")
            || stderr_lower.contains("is being deleted")
            || stderr_lower.contains("anotheroperationinprogress")
            || stderr_lower.contains("operation is in progress")
        {
            return Error::Conflict {
                message: stderr.trim().to_string(),
            };
        }

        // Hard rejections that need a human
        if stderr_lower.contains("quota")
            || stderr_lower.contains("requestdisallowedbypolicy")
            || stderr_lower.contains("skunotavailable")
            || stderr_lower.contains("invalidtemplate")
            || stderr_lower.contains("authorizationfailed")
        {
            return Error::Rejected {
                message: stderr.trim().to_string(),
            };
        }

        Error::CommandFailed {
            message: format!(
                "az command failed{}",
                what.map(|w| format!(" for {w}")).unwrap_or_default()
            ),
            stderr: stderr.trim().to_string(),
        }
    }
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, Error>;
