//! Global constants used throughout the assessment codebase.
//!
//! This module contains sentinel reason strings, archive layout names, and
//! retry parameters that are shared across the validator, the comparator and
//! the CLI.

/// Reason recorded when an exported bundle for an API or shared flow is absent.
pub const BUNDLE_MISSING_REASON: &str = "Proxy bundle parse issue OR No valid revisions found";

/// Reason recorded when live target validation is disabled by configuration.
pub const VALIDATION_SKIPPED_REASON: &str = "Validation skipped by user flag.";

/// Reason recorded when the target platform rejects a bundle without details.
pub const GENERIC_REJECTION_REASON: &str = "ERROR";

/// Suffix of proxy-definition files inside a bundle archive.
pub const PROXY_DEFINITION_SUFFIX: &str = ".xml";

/// Second path segment of packaging manifests inside a bundle archive.
///
/// Files under `apiproxy/manifests/` describe packaging, not behavior, and
/// are never compared.
pub const MANIFEST_DIR: &str = "manifests";

/// Extension of exported bundle archives.
pub const BUNDLE_EXTENSION: &str = "zip";

/// Default number of attempts for a dry-run bundle validation (first call included).
pub const DEFAULT_RETRY_ATTEMPTS: usize = 3;

/// Base of the exponential backoff, in milliseconds.
///
/// Combined with [`DEFAULT_RETRY_FACTOR`] this yields delays of 1s, 2s, 4s...
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 2;

/// Multiplier applied to every exponential backoff step.
pub const DEFAULT_RETRY_FACTOR: u64 = 500;

/// Maximum backoff delay between attempts (8 seconds).
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 8_000;

/// Environment variable holding the bearer token for the target management API.
pub const TOKEN_ENV_VAR: &str = "GATEWAY_ASSESS_TOKEN";

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "GATEWAY_ASSESS_CONFIG";

/// Configuration file looked up in the working directory when nothing else is given.
pub const DEFAULT_CONFIG_FILE: &str = "assess.toml";

/// Environment variable that disables progress spinners.
pub const NO_PROGRESS_ENV_VAR: &str = "GATEWAY_ASSESS_NO_PROGRESS";
