//! Error handling for the assessment tool
//!
//! This module provides the crate error type and user-friendly error reporting for the
//! CLI. The error system is designed around two core principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`AssessError`] - Enumerated error types for every run-level failure
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! Rule violations, missing bundles and platform rejections are *not* errors: they
//! are recorded on the affected artifact and the run continues. Only configuration
//! problems, unreadable inputs and exhausted transient platform failures surface here.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gateway_assess::core::{AssessError, user_friendly_error};
//!
//! let err = anyhow::Error::from(AssessError::PlatformRequired);
//! let ctx = user_friendly_error(err);
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::platform::PlatformError;

/// The main error type for assessment operations.
///
/// Every variant carries owned strings so errors can be cloned into an
/// [`ErrorContext`] after being pulled out of an [`anyhow::Error`] chain.
#[derive(Error, Debug, Clone)]
pub enum AssessError {
    /// Configuration file does not exist
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was looked up
        path: String,
    },

    /// Configuration file exists but cannot be parsed
    #[error("Invalid configuration in {path}: {reason}")]
    ConfigParseError {
        /// Path to the configuration file
        path: String,
        /// Parser message
        reason: String,
    },

    /// An export document (source export or target snapshot) cannot be parsed
    #[error("Invalid export document {path}: {reason}")]
    ExportParseError {
        /// Path to the export document
        path: String,
        /// Parser message
        reason: String,
    },

    /// A rule table override file cannot be parsed
    #[error("Invalid rule tables in {path}: {reason}")]
    RulesParseError {
        /// Path to the rules file
        path: String,
        /// Parser message
        reason: String,
    },

    /// File system operation failed
    #[error("File system error during {operation}: {path}")]
    FileSystemError {
        /// Operation being performed
        operation: String,
        /// Path involved
        path: String,
        /// Underlying I/O message
        reason: String,
    },

    /// Live target validation is enabled but no platform client was supplied
    #[error("Target validation is enabled but no target platform client is configured")]
    PlatformRequired,

    /// A target platform call failed and could not be recovered
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Any other failure, carried as its rendered message
    #[error("{message}")]
    Other {
        /// Rendered error message
        message: String,
    },
}

impl AssessError {
    /// Builds a [`AssessError::FileSystemError`] from an I/O error.
    pub fn fs(operation: impl Into<String>, path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::FileSystemError {
            operation: operation.into(),
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Error with user-facing details and an optional suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: AssessError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details.
    #[must_use]
    pub const fn new(error: AssessError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach extra details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with suggestions where possible.
///
/// Walks the `anyhow` chain looking for an [`AssessError`] or [`PlatformError`];
/// anything else is reported as a generic failure with the full chain as details.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(assess_error) = cause.downcast_ref::<AssessError>() {
            return create_error_context(assess_error.clone());
        }
        if let Some(platform_error) = cause.downcast_ref::<PlatformError>() {
            return create_error_context(AssessError::Platform(platform_error.clone()));
        }
    }

    let details = error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>().join(": ");
    let mut ctx = ErrorContext::new(AssessError::Other {
        message: error.to_string(),
    });
    if !details.is_empty() {
        ctx = ctx.with_details(details);
    }
    ctx
}

fn create_error_context(error: AssessError) -> ErrorContext {
    match &error {
        AssessError::ConfigNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Pass --config <file> or create assess.toml in the working directory"),
        AssessError::ConfigParseError { reason, .. } => {
            let reason = reason.clone();
            ErrorContext::new(error)
                .with_details(reason)
                .with_suggestion("Check the TOML syntax and field names of the configuration file")
        }
        AssessError::ExportParseError { reason, .. } => {
            let reason = reason.clone();
            ErrorContext::new(error)
                .with_details(reason)
                .with_suggestion("Export documents must be JSON objects with orgConfig/envConfig sections")
        }
        AssessError::RulesParseError { reason, .. } => {
            let reason = reason.clone();
            ErrorContext::new(error).with_details(reason).with_suggestion(
                "Rule tables use [<kind>.<field>.invalid_values] tables mapping a value to a message",
            )
        }
        AssessError::FileSystemError { reason, .. } => {
            let reason = reason.clone();
            ErrorContext::new(error).with_details(reason)
        }
        AssessError::PlatformRequired => ErrorContext::new(error).with_suggestion(
            "Set [target] base_url and organization, or pass --skip-target-validation",
        ),
        AssessError::Platform(platform_error) => {
            let suggestion = if platform_error.is_transient() {
                "The target management API kept failing; check connectivity and retry later"
            } else {
                "Check the target base URL, organization and access token"
            };
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        AssessError::Other { .. } => ErrorContext::new(error),
    }
}
