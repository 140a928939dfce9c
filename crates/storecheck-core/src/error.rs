use std::fmt;

use thiserror::Error;

/// Application-wide error types for storecheck.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required element is not on the page.
    #[error("Element not found: {selector}")]
    NotFound { selector: String },

    /// A page-state condition was not met within its wait window.
    #[error("Timed out after {millis} ms waiting for {what}")]
    Timeout { what: String, millis: u64 },

    /// The browser or the CDP connection failed.
    #[error("Browser error: {0}")]
    Browser(String),

    /// Invalid run configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A scenario assertion did not hold.
    #[error("Assertion failed: {0}")]
    Assertion(String),
}

/// Closed classification of errors, used to tag issues in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Timeout,
    Other,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::Other => "Other",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AppError {
    pub fn not_found(selector: impl fmt::Display) -> Self {
        AppError::NotFound {
            selector: selector.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::Timeout { .. } => ErrorKind::Timeout,
            _ => ErrorKind::Other,
        }
    }
}
