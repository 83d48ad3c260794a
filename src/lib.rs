//! gateway-assess - migration assessment for API gateway organizations
//!
//! Given an export of a source organization (configuration JSON plus exported
//! API proxy and shared-flow bundles), decides for every artifact whether it
//! can be imported into a target platform as-is, and optionally whether it
//! already exists there and how an existing bundle has drifted.
//!
//! # Architecture Overview
//!
//! ```text
//! OrgExport ──► Validator ──► ValidationReport ──► report (text / JSON)
//!                 │  ▲
//!     rules ──────┘  ├── TargetSnapshot (existence baseline)
//!                    ├── TargetPlatform (dry-run create, deployment lookups)
//!                    └── compare (structural bundle diff)
//! ```
//!
//! # Core Modules
//!
//! - [`validator`] - Per-artifact validation and the export orchestrator
//! - [`rules`] - Field rule tables for target servers and resource files
//! - [`compare`] - Structural XML and bundle archive comparison
//! - [`platform`] - Target platform capability and its HTTP client
//! - [`retry`] - Backoff policy for transient platform failures
//! - [`models`] - Artifact records, export documents and the report model
//!
//! # Supporting Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - `assess.toml` loading
//! - [`core`] - Error types and user-facing error rendering
//! - [`report`] - Report rendering and writing
//! - [`utils`] - Directory listing and progress spinners
//! - [`constants`] - Shared sentinel strings and defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use gateway_assess::models::{OrgExport, TargetSnapshot};
//! use gateway_assess::rules::RuleSet;
//! use gateway_assess::validator::{Validator, ValidatorOptions};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let source = OrgExport::load_from(Path::new("export/source.json")).await?;
//! let options = ValidatorOptions { target_compare: false, skip_target_validation: true };
//! let validator = Validator::new(options, TargetSnapshot::empty(), RuleSet::default(), None)?;
//! let report = validator
//!     .validate_export(&source, Path::new("export/source"), Path::new("export/target"))
//!     .await?;
//! println!("{} blocking artifact(s)", report.blocking().len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod compare;
pub mod config;
pub mod constants;
pub mod core;
pub mod models;
pub mod platform;
pub mod report;
pub mod retry;
pub mod rules;
pub mod utils;
pub mod validator;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
