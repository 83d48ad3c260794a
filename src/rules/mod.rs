//! Compatibility rule tables and the rule-based field validator.
//!
//! A rule table maps a field name to the literal values that field must not
//! take in the target platform, each with the message reported when it does:
//!
//! ```toml
//! [resource_files.type.invalid_values]
//! node = "Node.js resources are not supported in the target platform"
//! ```
//!
//! Tables are plain data. They are built once (defaults, optionally replaced
//! from a TOML file) and handed to the validator through a [`RuleSet`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::core::AssessError;
use crate::models::Reason;

/// Invalid values of a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Invalid literal value -> violation message
    #[serde(default)]
    pub invalid_values: BTreeMap<String, String>,
}

/// Field name -> rule for one artifact kind.
pub type RuleTable = BTreeMap<String, FieldRule>;

/// The rule tables for every artifact kind that has compatibility rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Rules applied to environment target servers
    #[serde(default)]
    pub target_servers: RuleTable,
    /// Rules applied to environment resource files
    #[serde(default)]
    pub resource_files: RuleTable,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            target_servers: table(&[(
                "host",
                &[
                    ("localhost", "Loopback hosts are not reachable from the target runtime"),
                    ("127.0.0.1", "Loopback hosts are not reachable from the target runtime"),
                ],
            )]),
            resource_files: table(&[(
                "type",
                &[
                    ("node", "Node.js resources are not supported in the target platform"),
                    ("hosted", "Hosted target resources are not supported in the target platform"),
                ],
            )]),
        }
    }
}

fn table(rules: &[(&str, &[(&str, &str)])]) -> RuleTable {
    rules
        .iter()
        .map(|(field, values)| {
            let invalid_values =
                values.iter().map(|(value, msg)| ((*value).to_string(), (*msg).to_string())).collect();
            ((*field).to_string(), FieldRule { invalid_values })
        })
        .collect()
}

/// Partial override document; kinds left out keep their defaults.
#[derive(Debug, Deserialize)]
struct RuleOverrides {
    target_servers: Option<RuleTable>,
    resource_files: Option<RuleTable>,
}

impl RuleSet {
    /// Parse a TOML override document on top of the default tables.
    ///
    /// A kind present in the document replaces that kind's default table wholesale.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, AssessError> {
        let overrides: RuleOverrides =
            toml::from_str(content).map_err(|e| AssessError::RulesParseError {
                path: origin.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut rules = Self::default();
        if let Some(target_servers) = overrides.target_servers {
            rules.target_servers = target_servers;
        }
        if let Some(resource_files) = overrides.resource_files {
            rules.resource_files = resource_files;
        }
        Ok(rules)
    }

    /// Load rule tables from a TOML file, falling back to defaults when `path` is `None`.
    pub async fn load(path: Option<&Path>) -> Result<Self, AssessError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AssessError::fs("reading rule tables", path, &e))?;
        Self::from_toml(&content, path)
    }
}

/// Check an artifact against a rule table.
///
/// Returns the importability verdict and one [`Reason::Field`] per violated field,
/// in field-name order. Fields the artifact does not carry are skipped: an absent
/// value cannot equal an invalid literal.
pub fn check(rules: &RuleTable, artifact: &Map<String, Value>) -> (bool, Vec<Reason>) {
    let mut violations = Vec::new();

    for (field, rule) in rules {
        let Some(value) = artifact.get(field) else {
            debug!("Field '{}' absent from artifact, rule skipped", field);
            continue;
        };
        let Some(literal) = literal(value) else {
            continue;
        };
        if let Some(message) = rule.invalid_values.get(&*literal) {
            violations.push(Reason::field(field.as_str(), message.as_str()));
        }
    }

    (violations.is_empty(), violations)
}

/// Canonical literal of a scalar JSON value; `None` for arrays, objects and null.
fn literal(value: &Value) -> Option<std::borrow::Cow<'_, str>> {
    match value {
        Value::String(s) => Some(std::borrow::Cow::Borrowed(s.as_str())),
        Value::Bool(_) | Value::Number(_) => Some(std::borrow::Cow::Owned(value.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
