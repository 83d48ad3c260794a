//! Run configuration loaded from `assess.toml`.
//!
//! # Location
//!
//! 1. `--config <path>` (must exist)
//! 2. `GATEWAY_ASSESS_CONFIG` environment variable (must exist)
//! 3. `./assess.toml` when present
//! 4. Built-in defaults
//!
//! # Format
//!
//! ```toml
//! [target]
//! base_url = "https://mgmt.example.com/v1"
//! organization = "acme-prod"
//!
//! [validation]
//! target_compare = true
//! skip_target_validation = false
//! rules_file = "rules.toml"
//!
//! [retry]
//! max_attempts = 3
//!
//! [paths]
//! source_export = "export/source.json"
//! target_snapshot = "export/target.json"
//! export_dir = "export/source"
//! target_export_dir = "export/target"
//! report = "report.json"
//! ```
//!
//! Relative paths are resolved against the current directory. Command-line
//! flags override file values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use crate::core::AssessError;
use crate::retry::RetryPolicy;

/// Where the target management API lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Base URL of the management API, e.g. `https://mgmt.example.com/v1`
    pub base_url: Option<String>,
    /// Target organization name
    pub organization: Option<String>,
    /// Bearer token; `GATEWAY_ASSESS_TOKEN` takes precedence
    pub token: Option<String>,
}

/// Validation switches and rule overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub target_compare: bool,
    pub skip_target_validation: bool,
    /// TOML file overriding the built-in rule tables
    pub rules_file: Option<PathBuf>,
}

/// Input and output locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Source organization export (JSON)
    pub source_export: Option<PathBuf>,
    /// Target organization export used as the comparison baseline (JSON)
    pub target_snapshot: Option<PathBuf>,
    /// Directory holding `apis/` and `sharedflows/` bundles from the source
    pub export_dir: Option<PathBuf>,
    /// Directory holding `apis/` and `sharedflows/` bundles from the target
    pub target_export_dir: Option<PathBuf>,
    /// Where to write the report; stdout when unset
    pub report: Option<PathBuf>,
}

/// The complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessConfig {
    pub target: TargetConfig,
    pub validation: ValidationConfig,
    pub retry: RetryPolicy,
    pub paths: PathsConfig,
}

impl AssessConfig {
    /// Load configuration from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self, AssessError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AssessError::ConfigNotFound {
                    path: path.display().to_string(),
                }
            } else {
                AssessError::fs("reading configuration", path, &e)
            }
        })?;
        Self::from_toml(&content, path)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, AssessError> {
        toml::from_str(content).map_err(|e| AssessError::ConfigParseError {
            path: origin.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Load configuration following the lookup order above.
    ///
    /// An explicitly requested file must exist; the implicit `./assess.toml`
    /// is optional.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self, AssessError> {
        let explicit = path.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
        if let Some(path) = explicit {
            debug!("Loading configuration from {}", path.display());
            return Self::load_from(&path).await;
        }

        let implicit = PathBuf::from(DEFAULT_CONFIG_FILE);
        if tokio::fs::try_exists(&implicit).await.unwrap_or(false) {
            debug!("Loading configuration from {}", implicit.display());
            Self::load_from(&implicit).await
        } else {
            debug!("No configuration file, using defaults");
            Ok(Self::default())
        }
    }
}
