//! Environment-scoped resources: target servers, resource files and flow hooks.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{Validator, name_or};
use crate::constants::VALIDATION_SKIPPED_REASON;
use crate::core::AssessError;
use crate::models::{ArtifactRecord, Reason};
use crate::platform::PlatformResponse;
use crate::rules::{self, RuleTable};

const FLOWHOOK_SHARED_FLOW_KEY: &str = "sharedFlow";

impl Validator {
    /// Validate target servers against the target-server rule table.
    ///
    /// Existence is tested by the server's `name` field, which may differ from
    /// its key in the export.
    pub fn validate_env_targetservers(
        &self,
        env: &str,
        target_servers: &Map<String, Value>,
    ) -> Vec<ArtifactRecord> {
        target_servers
            .iter()
            .map(|(id, server)| {
                let name = name_or(server, id);
                let imported =
                    self.imported(|| self.snapshot.has_env_resource(env, "targetServers", &name));
                rule_checked(&self.rules.target_servers, name, server).with_imported(imported)
            })
            .collect()
    }

    /// Validate resource files against the resource-file rule table.
    ///
    /// Existence is tested by key (the file name).
    pub fn validate_env_resourcefiles(
        &self,
        env: &str,
        resourcefiles: &Map<String, Value>,
    ) -> Vec<ArtifactRecord> {
        resourcefiles
            .iter()
            .map(|(id, file)| {
                let imported =
                    self.imported(|| self.snapshot.has_env_resource(env, "resourcefiles", id));
                rule_checked(&self.rules.resource_files, name_or(file, id), file)
                    .with_imported(imported)
            })
            .collect()
    }

    /// Validate flow hooks, checking that any attached shared flow is deployed in `env`.
    ///
    /// # Errors
    ///
    /// Platform failures during the deployment lookup are not retried and end the run.
    pub async fn validate_env_flowhooks(
        &self,
        env: &str,
        flowhooks: &Map<String, Value>,
    ) -> Result<Vec<ArtifactRecord>, AssessError> {
        let mut records = Vec::with_capacity(flowhooks.len());
        for (id, hook) in flowhooks {
            let (importable, reason) = self.validate_env_flowhook_resource(env, hook).await?;
            let imported = self.imported(|| self.snapshot.has_env_resource(env, "flowhooks", id));
            records.push(
                ArtifactRecord::new(id.clone(), hook)
                    .with_verdict(importable, reason)
                    .with_imported(imported),
            );
        }
        Ok(records)
    }

    /// Importability of a single flow hook.
    ///
    /// A hook without a shared flow is importable. A hook whose shared flow has an
    /// empty deployment list in `env` is not. A lookup the platform rejects is
    /// logged and does not block the hook.
    pub async fn validate_env_flowhook_resource(
        &self,
        env: &str,
        hook: &Value,
    ) -> Result<(bool, Vec<Reason>), AssessError> {
        if self.options.skip_target_validation {
            return Ok((false, vec![Reason::field(FLOWHOOK_SHARED_FLOW_KEY, VALIDATION_SKIPPED_REASON)]));
        }

        let Some(shared_flow) = hook.get(FLOWHOOK_SHARED_FLOW_KEY).and_then(Value::as_str) else {
            return Ok((true, Vec::new()));
        };

        let response = self
            .platform()?
            .get_env_object(env, "sharedflows", &format!("{shared_flow}/deployments"))
            .await?;

        match response {
            PlatformResponse::Accepted(body) => {
                let undeployed = body
                    .get("deployments")
                    .and_then(Value::as_array)
                    .is_some_and(|deployments| deployments.is_empty());
                if undeployed {
                    debug!("Shared flow {} has no deployments in {}", shared_flow, env);
                    return Ok((
                        false,
                        vec![Reason::field(
                            FLOWHOOK_SHARED_FLOW_KEY,
                            format!(
                                "Flowhook sharedflow - {shared_flow} is not deployed in target environment {env}"
                            ),
                        )],
                    ));
                }
            }
            PlatformResponse::Rejected { status, error } => {
                warn!(
                    "Deployment lookup for shared flow {} in {} was rejected (HTTP {}): {}",
                    shared_flow, env, status, error
                );
            }
        }
        Ok((true, Vec::new()))
    }
}

/// A fresh record carrying the rule table's verdict for `artifact`.
fn rule_checked(rules: &RuleTable, name: String, artifact: &Value) -> ArtifactRecord {
    let fields = artifact.as_object().cloned().unwrap_or_default();
    let (importable, reason) = rules::check(rules, &fields);
    ArtifactRecord::new(name, artifact).with_verdict(importable, reason)
}
