//! Migration validation engine.
//!
//! A [`Validator`] turns the source export into one [`ArtifactRecord`](crate::models::ArtifactRecord) per
//! artifact, deciding two things for each:
//!
//! - **importable**: can the artifact be created in the target as-is, judged by
//!   the rule tables, or by a dry-run create on the target platform for bundles
//! - **imported**: does it already exist in the target snapshot (only when
//!   `target_compare` is on; otherwise `UNKNOWN`)
//!
//! # Components
//!
//! - [`org`] - Org-scoped resources and key value maps
//! - [`env`] - Target servers, resource files and flow hooks
//! - [`bundles`] - API proxy and shared-flow bundles
//!
//! Artifacts are validated sequentially. A failing artifact never aborts its
//! siblings; only platform errors that outlast the retry policy end the run.

pub mod bundles;
pub mod env;
pub mod org;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::AssessError;
use crate::models::{ApiType, Imported, OrgExport, TargetSnapshot, ValidationReport};
use crate::platform::TargetPlatform;
use crate::retry::RetryPolicy;
use crate::rules::RuleSet;

/// The two switches that shape a validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Check existence in the target snapshot and diff already-imported bundles
    pub target_compare: bool,
    /// Make no calls to the target platform at all
    pub skip_target_validation: bool,
}

/// Validates exported artifacts against the target platform.
///
/// Holds only read-only state for the run: the options, the target snapshot,
/// the rule tables and the platform capability.
pub struct Validator {
    options: ValidatorOptions,
    snapshot: TargetSnapshot,
    rules: RuleSet,
    platform: Option<Arc<dyn TargetPlatform>>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("options", &self.options)
            .field("rules", &self.rules)
            .field("has_platform", &self.platform.is_some())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// Build a validator.
    ///
    /// # Errors
    ///
    /// [`AssessError::PlatformRequired`] when target validation is enabled but
    /// `platform` is `None`.
    pub fn new(
        options: ValidatorOptions,
        snapshot: TargetSnapshot,
        rules: RuleSet,
        platform: Option<Arc<dyn TargetPlatform>>,
    ) -> Result<Self, AssessError> {
        if !options.skip_target_validation && platform.is_none() {
            return Err(AssessError::PlatformRequired);
        }
        Ok(Self {
            options,
            snapshot,
            rules,
            platform,
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy wrapping single-bundle validation.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub const fn options(&self) -> ValidatorOptions {
        self.options
    }

    fn imported(&self, present: impl FnOnce() -> bool) -> Imported {
        Imported::resolve(self.options.target_compare, present)
    }

    fn platform(&self) -> Result<&dyn TargetPlatform, AssessError> {
        self.platform.as_deref().ok_or(AssessError::PlatformRequired)
    }

    /// Validate a whole source export.
    ///
    /// Organization scope first, then each environment in name order, then API
    /// proxies, then shared flows. Bundles are read from `export_dir/<type>/`
    /// and compared against `target_export_dir/<type>/`.
    pub async fn validate_export(
        &self,
        source: &OrgExport,
        export_dir: &Path,
        target_export_dir: &Path,
    ) -> Result<ValidationReport, AssessError> {
        let mut report = ValidationReport::default();

        for kind in source.org_config.keys() {
            if matches!(kind.as_str(), "apis" | "sharedflows") {
                continue;
            }
            let Some(resources) = source.org_resources(kind) else {
                debug!("Skipping orgConfig.{}: not a mapping", kind);
                continue;
            };
            let records = if kind == "kvms" {
                self.validate_kvms(None, resources)
            } else {
                self.validate_org_resource(kind, resources)
            };
            info!("Validated {} orgConfig.{} artifact(s)", records.len(), kind);
            report.org_config.insert(kind.clone(), records);
        }

        for (env, kinds) in &source.env_config {
            for kind in kinds.keys() {
                let Some(resources) = source.env_resources(env, kind) else {
                    debug!("Skipping envConfig.{}.{}: not a mapping", env, kind);
                    continue;
                };
                let records = match kind.as_str() {
                    "targetServers" => self.validate_env_targetservers(env, resources),
                    "resourcefiles" => self.validate_env_resourcefiles(env, resources),
                    "flowhooks" => self.validate_env_flowhooks(env, resources).await?,
                    "kvms" => self.validate_kvms(Some(env), resources),
                    _ => {
                        debug!("No validation defined for envConfig.{}.{}", env, kind);
                        continue;
                    }
                };
                info!("Validated {} envConfig.{}.{} artifact(s)", records.len(), env, kind);
                report.env_config.entry(env.clone()).or_default().insert(kind.clone(), records);
            }
        }

        for api_type in ApiType::ALL {
            let names = source.org_names(api_type.as_str());
            if names.is_empty() {
                continue;
            }
            let mut validated = self
                .validate_proxy_bundles(&names, export_dir, target_export_dir, api_type)
                .await?;
            let records = validated.remove(api_type.as_str()).unwrap_or_default();
            info!("Validated {} {} bundle(s)", records.len(), api_type);
            match api_type {
                ApiType::Apis => report.apis = records,
                ApiType::Sharedflows => report.sharedflows = records,
            }
        }

        Ok(report)
    }
}

/// `artifact["name"]` when it is a string, else `fallback`.
fn name_or(artifact: &Value, fallback: &str) -> String {
    artifact.get("name").and_then(Value::as_str).unwrap_or(fallback).to_string()
}
