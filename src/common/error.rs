//! Error types for the test-run orchestrator
//!
//! The `Display` text of each variant is the exact message surfaced to the
//! CI log and the action output, so wording changes are user-visible.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the orchestrator
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Failed: Service account key should be provided.")]
    MissingCredential,

    #[error("Failed: WAIT_TIMEOUT_SECONDS must be between {min} and {max} seconds, got {value}")]
    WaitTimeoutOutOfRange { value: u64, min: u64, max: u64 },

    #[error("Failed: Invalid JSON in params_override: {0}")]
    InvalidParamsOverride(String),

    #[error("Failed: Either test_id or test_suite_id should be provided.")]
    MissingTarget,

    #[error("Failed: Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed: Could not read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Authentication ===
    #[error("Failed to login service account.")]
    LoginFailed,

    // === Trigger Errors ===
    #[error("Failed to create test run: {0}")]
    TestRunRejected(String),

    #[error("Failed to create test suite run: {0}")]
    SuiteRunRejected(String),

    #[error("Invalid timestamp format in response")]
    InvalidTimestamp,

    // === Fetch Errors ===
    #[error("Failed: Error fetching run status (HTTP {status}): {body}")]
    FetchFailed { status: u16, body: String },

    // === Timeout Errors ===
    #[error("Timed out waiting for test result!")]
    RunTimeout,

    #[error("Timed out waiting for test suite result.")]
    SuiteTimeout,

    // === Aggregation Errors ===
    #[error("Failed: No linked runs found in the response")]
    NoLinkedRuns,

    #[error("Failed: No target run found in the response")]
    NoTargetRun,

    // === Transport / IO Errors ===
    #[error("Failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed: {0}")]
    Io(#[from] io::Error),

    #[error("Failed: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create a fetch failure from an HTTP status and response body
    pub fn fetch_failed(status: u16, body: &str) -> Self {
        Self::FetchFailed {
            status,
            body: body.to_string(),
        }
    }

    /// Taxonomy name of this error, used as a structured log field
    pub fn category(&self) -> &'static str {
        match self {
            Error::MissingCredential
            | Error::WaitTimeoutOutOfRange { .. }
            | Error::InvalidParamsOverride(_)
            | Error::MissingTarget
            | Error::ConfigParse(_)
            | Error::FileRead { .. } => "ConfigError",
            Error::LoginFailed => "AuthFailure",
            Error::TestRunRejected(_) | Error::SuiteRunRejected(_) | Error::InvalidTimestamp => {
                "TriggerFailure"
            }
            Error::FetchFailed { .. } => "FetchFailure",
            Error::RunTimeout | Error::SuiteTimeout => "Timeout",
            Error::NoLinkedRuns | Error::NoTargetRun => "AggregationError",
            Error::Http(_) | Error::Io(_) | Error::Json(_) | Error::Internal(_) => "Internal",
        }
    }

    /// Whether this error was raised before any request reached the backend
    pub fn is_config(&self) -> bool {
        self.category() == "ConfigError"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_action_output() {
        assert_eq!(
            Error::MissingCredential.to_string(),
            "Failed: Service account key should be provided."
        );
        assert_eq!(Error::LoginFailed.to_string(), "Failed to login service account.");
        assert!(Error::RunTimeout.to_string().contains("Timed out"));
        assert!(Error::SuiteTimeout.to_string().contains("Timed out"));
        assert!(Error::InvalidParamsOverride("expected value".into())
            .to_string()
            .contains("Invalid JSON"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(Error::MissingTarget.category(), "ConfigError");
        assert_eq!(Error::NoTargetRun.category(), "AggregationError");
        assert_eq!(Error::fetch_failed(502, "bad gateway").category(), "FetchFailure");
        assert!(Error::WaitTimeoutOutOfRange { value: 1000, min: 30, max: 900 }.is_config());
        assert!(!Error::LoginFailed.is_config());
    }
}
