//! API proxy and shared-flow bundle validation.
//!
//! Each named bundle is looked up as `<export_dir>/<type>/<name>.zip`, dry-run
//! created on the target platform (with retries for transient failures) and,
//! when it already exists in the target, diffed against the target's export of
//! the same bundle.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::Validator;
use crate::compare::compare_bundles;
use crate::constants::{
    BUNDLE_EXTENSION, BUNDLE_MISSING_REASON, GENERIC_REJECTION_REASON, VALIDATION_SKIPPED_REASON,
};
use crate::core::AssessError;
use crate::models::{ApiType, ArtifactRecord, Reason};
use crate::platform::{CreateAction, PlatformError, PlatformResponse};
use crate::utils::list_dir;

impl Validator {
    /// Validate the named bundles of one type.
    ///
    /// Returns `{api_type: records}`, one record per name in input order. A name
    /// without an exported bundle gets a not-importable record and no platform call.
    ///
    /// # Errors
    ///
    /// Platform failures that outlast the retry policy, or an unreadable export directory.
    pub async fn validate_proxy_bundles(
        &self,
        names: &[String],
        export_dir: &Path,
        target_export_dir: &Path,
        api_type: ApiType,
    ) -> Result<BTreeMap<String, Vec<ArtifactRecord>>, AssessError> {
        let bundle_dir = export_dir.join(api_type.as_str());
        let exported = list_dir(&bundle_dir).await?;
        debug!("{} bundle(s) exported under {}", exported.len(), bundle_dir.display());

        let mut records = Vec::with_capacity(names.len());
        for name in names {
            let bundle = format!("{name}.{BUNDLE_EXTENSION}");
            let mut record = if exported.contains(&bundle) {
                self.validate_proxy(&bundle_dir, api_type, &bundle).await?
            } else {
                info!("No exported bundle for {} {}", api_type, name);
                ArtifactRecord::new(name.as_str(), &Value::Null)
                    .with_verdict(false, vec![Reason::violation(BUNDLE_MISSING_REASON)])
            };

            let present = self.options.target_compare
                && self.snapshot.has_org_resource(api_type.as_str(), name);
            record.imported = self.imported(|| present);
            if present {
                let findings = compare_in_background(
                    bundle_dir.join(&bundle),
                    target_export_dir.join(api_type.as_str()).join(&bundle),
                )
                .await?;
                if !findings.is_empty() {
                    info!("{} {} drifted from target: {} finding(s)", api_type, name, findings.len());
                }
                record.append_findings(&findings);
            }

            records.push(record);
        }

        Ok(BTreeMap::from([(api_type.as_str().to_string(), records)]))
    }

    /// Dry-run validate one bundle file from `bundle_dir`.
    ///
    /// Transient platform failures are retried per the validator's [`RetryPolicy`];
    /// a rejection is a verdict, not a failure.
    ///
    /// [`RetryPolicy`]: crate::retry::RetryPolicy
    pub async fn validate_proxy(
        &self,
        bundle_dir: &Path,
        api_type: ApiType,
        bundle_file: &str,
    ) -> Result<ArtifactRecord, AssessError> {
        let name = bundle_file.strip_suffix(&format!(".{BUNDLE_EXTENSION}")).unwrap_or(bundle_file);

        if self.options.skip_target_validation {
            return Ok(ArtifactRecord::new(name, &Value::Null)
                .with_verdict(false, vec![Reason::violation(VALIDATION_SKIPPED_REASON)]));
        }

        let platform = self.platform()?;
        let path = bundle_dir.join(bundle_file);
        let operation = format!("validate {api_type}/{name}");

        let response = self
            .retry
            .run(&operation, || async {
                let bytes = read_bundle(&path).await?;
                platform.create(api_type, name, bytes, CreateAction::Validate).await
            })
            .await?;

        let details = response.error_details().cloned();
        Ok(match response {
            PlatformResponse::Accepted(body) => {
                debug!("{} accepted by target", operation);
                ArtifactRecord::new(name, &body).with_verdict(true, vec![Reason::Violations {
                    violations: Vec::new(),
                }])
            }
            PlatformResponse::Rejected { status, .. } => {
                debug!("{} rejected by target (HTTP {})", operation, status);
                let reason = match details {
                    Some(details) if !details.is_empty() => {
                        details.into_iter().map(Reason::Platform).collect()
                    }
                    _ => vec![Reason::violation(GENERIC_REJECTION_REASON)],
                };
                ArtifactRecord::new(name, &Value::Object(Map::new())).with_verdict(false, reason)
            }
        })
    }
}

async fn read_bundle(path: &Path) -> Result<Vec<u8>, PlatformError> {
    tokio::fs::read(path).await.map_err(|e| PlatformError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Run the blocking archive comparison off the async runtime.
async fn compare_in_background(source: PathBuf, target: PathBuf) -> Result<Vec<String>, AssessError> {
    tokio::task::spawn_blocking(move || compare_bundles(&source, &target)).await.map_err(|e| {
        AssessError::Other {
            message: format!("Bundle comparison task failed: {e}"),
        }
    })
}
