//! Target platform capabilities consumed by the validator.
//!
//! The validator never talks HTTP directly. It depends on the two capabilities
//! of [`TargetPlatform`], which [`ManagementClient`] implements over the target
//! management API and `test_utils::MockPlatform` implements in memory for tests.
//!
//! # Response Model
//!
//! - 2xx -> [`PlatformResponse::Accepted`] with the JSON body
//! - 4xx -> [`PlatformResponse::Rejected`]; a terminal verdict, never retried
//! - 5xx, 429, connection failures -> [`PlatformError::Transient`]; retryable

pub mod client;

pub use client::ManagementClient;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::models::ApiType;

/// Mode of a bundle create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateAction {
    /// Dry run: report acceptance or rejection without persisting anything
    Validate,
}

impl CreateAction {
    /// Query-string value of the `action` parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            CreateAction::Validate => "validate",
        }
    }
}

impl fmt::Display for CreateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a platform call that reached the platform and got an answer.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformResponse {
    /// The platform accepted the request; body is `Null` when empty
    Accepted(Value),
    /// The platform refused the request with a structured error
    Rejected {
        /// HTTP status code
        status: u16,
        /// The body's `error` object, or `{"message": <text>}` for non-JSON bodies
        error: Value,
    },
}

impl PlatformResponse {
    /// The `error.details` list of a rejection, if the platform sent one.
    pub fn error_details(&self) -> Option<&Vec<Value>> {
        match self {
            PlatformResponse::Rejected { error, .. } => error.get("details").and_then(Value::as_array),
            PlatformResponse::Accepted(_) => None,
        }
    }
}

/// Failure to obtain any answer from the platform.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// Network failure, timeout, throttling or server error
    #[error("Transient target platform failure during {operation}: {message}")]
    Transient {
        /// Operation being performed
        operation: String,
        /// Failure description
        message: String,
    },

    /// The request itself could not be built or its response read
    #[error("Target platform request failed during {operation}: {message}")]
    Request {
        /// Operation being performed
        operation: String,
        /// Failure description
        message: String,
    },

    /// The bundle to upload could not be read from disk
    #[error("Cannot read bundle {path}: {message}")]
    Io {
        /// Bundle path
        path: String,
        /// Underlying I/O message
        message: String,
    },
}

impl PlatformError {
    /// Whether retrying the same call may succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(self, PlatformError::Transient { .. })
    }
}

/// Capabilities of the target management plane used during validation.
#[async_trait]
pub trait TargetPlatform: Send + Sync {
    /// Create a revisioned bundle (or dry-run it with [`CreateAction::Validate`]).
    async fn create(
        &self,
        api_type: ApiType,
        name: &str,
        bundle: Vec<u8>,
        action: CreateAction,
    ) -> Result<PlatformResponse, PlatformError>;

    /// Fetch an environment-scoped object, e.g. `("test", "sharedflows", "auth/deployments")`.
    async fn get_env_object(
        &self,
        env: &str,
        kind: &str,
        id_suffix: &str,
    ) -> Result<PlatformResponse, PlatformError>;
}
