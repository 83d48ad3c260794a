//! Export documents: the source-side export and the target snapshot.
//!
//! Both share one nested shape, keyed by scope then resource kind then identifier:
//!
//! ```json
//! {
//!   "orgConfig": { "developers": { "a@example.com": { ... } }, "apis": { "orders": { ... } } },
//!   "envConfig": { "test": { "targetServers": { "backend": { ... } } } }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::AssessError;

/// A nested export of one organization's configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgExport {
    /// Organization-scoped resources, keyed by resource kind
    #[serde(default)]
    pub org_config: BTreeMap<String, Value>,
    /// Environment-scoped resources, keyed by environment then resource kind
    #[serde(default)]
    pub env_config: BTreeMap<String, BTreeMap<String, Value>>,
}

impl OrgExport {
    /// Parse an export document from JSON text.
    pub fn from_json(content: &str, origin: &Path) -> Result<Self, AssessError> {
        serde_json::from_str(content).map_err(|e| AssessError::ExportParseError {
            path: origin.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Load an export document from a JSON file.
    pub async fn load_from(path: &Path) -> Result<Self, AssessError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AssessError::fs("reading export document", path, &e))?;
        Self::from_json(&content, path)
    }

    /// Organization-scoped resources of one kind, when present as a mapping.
    pub fn org_resources(&self, kind: &str) -> Option<&Map<String, Value>> {
        self.org_config.get(kind).and_then(Value::as_object)
    }

    /// Environment-scoped resources of one kind, when present as a mapping.
    pub fn env_resources(&self, env: &str, kind: &str) -> Option<&Map<String, Value>> {
        self.env_config.get(env).and_then(|kinds| kinds.get(kind)).and_then(Value::as_object)
    }

    /// Names listed under an organization-scoped kind.
    ///
    /// Accepts either a mapping keyed by name or an array of names.
    pub fn org_names(&self, kind: &str) -> Vec<String> {
        match self.org_config.get(kind) {
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            Some(Value::Array(items)) => {
                items.iter().filter_map(Value::as_str).map(str::to_string).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Read-only view of the target organization, used as the comparison baseline.
///
/// Loaded once per run and never mutated. Missing scopes, environments or kinds
/// simply mean "not present".
#[derive(Debug, Clone, Default)]
pub struct TargetSnapshot {
    export: OrgExport,
}

impl TargetSnapshot {
    /// Wrap an export of the target organization.
    pub fn new(export: OrgExport) -> Self {
        Self {
            export,
        }
    }

    /// An empty baseline; every membership test fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `id` exists under `orgConfig[kind]`.
    pub fn has_org_resource(&self, kind: &str, id: &str) -> bool {
        contains(self.export.org_config.get(kind), id)
    }

    /// Whether `id` exists under `envConfig[env][kind]`.
    pub fn has_env_resource(&self, env: &str, kind: &str, id: &str) -> bool {
        contains(self.export.env_config.get(env).and_then(|kinds| kinds.get(kind)), id)
    }
}

fn contains(collection: Option<&Value>, id: &str) -> bool {
    match collection {
        Some(Value::Object(map)) => map.contains_key(id),
        Some(Value::Array(items)) => items.iter().any(|item| item.as_str() == Some(id)),
        _ => false,
    }
}
