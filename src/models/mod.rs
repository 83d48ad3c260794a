//! Shared data models for artifact validation.
//!
//! Every validated artifact becomes exactly one [`ArtifactRecord`], whatever its
//! kind. The record keeps the artifact's own fields in an `extra` payload bag so
//! kind-specific data travels to the report without leaking between kinds.
//!
//! - [`ArtifactRecord`] - The uniform per-artifact verdict
//! - [`Reason`] - One entry of a record's `reason` list
//! - [`Imported`] - Tri-state "already exists in target" flag
//! - [`ApiType`] - Proxy bundles versus shared-flow bundles
//! - [`export`] - Source export and target snapshot documents
//! - [`report`] - Aggregated validation report

pub mod export;
pub mod report;

pub use export::{OrgExport, TargetSnapshot};
pub use report::{SectionSummary, ValidationReport};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Keys owned by [`ArtifactRecord`] itself; stripped from the payload bag.
const RECORD_KEYS: [&str; 4] = ["name", "importable", "reason", "imported"];

/// Kind of revisioned bundle being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiType {
    /// API proxies
    Apis,
    /// Shared flows
    Sharedflows,
}

impl ApiType {
    /// Every bundle kind, in report order.
    pub const ALL: [ApiType; 2] = [ApiType::Apis, ApiType::Sharedflows];

    /// Collection name used in export layouts and management API paths.
    pub const fn as_str(self) -> &'static str {
        match self {
            ApiType::Apis => "apis",
            ApiType::Sharedflows => "sharedflows",
        }
    }
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an artifact already exists in the target organization.
///
/// Serialized as JSON `true`, `false`, or the string `"UNKNOWN"` when the
/// existence check was not requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Imported {
    /// Present in the target snapshot
    Yes,
    /// Absent from the target snapshot
    No,
    /// Comparison mode is off
    #[default]
    Unknown,
}

impl Imported {
    /// Resolves the flag from comparison mode and a lazily evaluated membership test.
    pub fn resolve(target_compare: bool, present: impl FnOnce() -> bool) -> Self {
        if !target_compare {
            Imported::Unknown
        } else if present() {
            Imported::Yes
        } else {
            Imported::No
        }
    }
}

impl Serialize for Imported {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Imported::Yes => serializer.serialize_bool(true),
            Imported::No => serializer.serialize_bool(false),
            Imported::Unknown => serializer.serialize_str("UNKNOWN"),
        }
    }
}

impl<'de> Deserialize<'de> for Imported {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(Imported::Yes),
            Raw::Flag(false) => Ok(Imported::No),
            Raw::Text(text) if text == "UNKNOWN" => Ok(Imported::Unknown),
            Raw::Text(text) => {
                Err(serde::de::Error::custom(format!("invalid imported value: {text}")))
            }
        }
    }
}

/// A single entry in an artifact's `reason` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reason {
    /// A rule-table violation on one field
    Field {
        /// Field name the violation applies to
        key: String,
        /// Human-readable violation message
        error_msg: String,
    },
    /// A list of free-text violations
    Violations {
        /// Violation messages, in the order they were found
        violations: Vec<String>,
    },
    /// A structured error detail returned verbatim by the target platform
    Platform(Value),
}

impl Reason {
    /// Builds a field violation.
    pub fn field(key: impl Into<String>, error_msg: impl Into<String>) -> Self {
        Reason::Field {
            key: key.into(),
            error_msg: error_msg.into(),
        }
    }

    /// Builds a violation list holding a single message.
    pub fn violation(message: impl Into<String>) -> Self {
        Reason::Violations {
            violations: vec![message.into()],
        }
    }

    /// Mutable access to this entry's violation list, when it has one.
    fn violations_mut(&mut self) -> Option<ViolationsMut<'_>> {
        match self {
            Reason::Violations { violations } => Some(ViolationsMut::Text(violations)),
            Reason::Platform(Value::Object(detail)) => match detail.get_mut("violations") {
                Some(Value::Array(items)) => Some(ViolationsMut::Json(items)),
                _ => None,
            },
            _ => None,
        }
    }
}

enum ViolationsMut<'a> {
    Text(&'a mut Vec<String>),
    Json(&'a mut Vec<Value>),
}

/// The uniform validation verdict for one artifact.
///
/// All four typed fields are always populated. The artifact's remaining source
/// fields ride along in `extra` and are flattened into the serialized record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Identifier of the artifact within its kind and scope
    pub name: String,
    /// Whether the artifact can be created in the target as-is
    pub importable: bool,
    /// Why the artifact is not importable; empty when it is
    pub reason: Vec<Reason>,
    /// Whether the artifact already exists in the target
    pub imported: Imported,
    /// The artifact's other source fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArtifactRecord {
    /// Starts a fresh record with no reasons and an unknown import state.
    ///
    /// `source` is the artifact as exported. Non-object values carry no payload.
    pub fn new(name: impl Into<String>, source: &Value) -> Self {
        let mut extra = source.as_object().cloned().unwrap_or_default();
        for key in RECORD_KEYS {
            extra.remove(key);
        }
        Self {
            name: name.into(),
            importable: true,
            reason: Vec::new(),
            imported: Imported::Unknown,
            extra,
        }
    }

    /// Sets the importability verdict and its reasons together.
    #[must_use]
    pub fn with_verdict(mut self, importable: bool, reason: Vec<Reason>) -> Self {
        self.importable = importable;
        self.reason = reason;
        self
    }

    /// Sets the import state.
    #[must_use]
    pub fn with_imported(mut self, imported: Imported) -> Self {
        self.imported = imported;
        self
    }

    /// Appends free-text findings to the first reason entry that holds a violation list.
    ///
    /// When no entry has one, the findings become a new trailing entry. Nothing
    /// changes for an empty `findings` slice.
    pub fn append_findings(&mut self, findings: &[String]) {
        if findings.is_empty() {
            return;
        }

        match self.reason.iter_mut().find_map(Reason::violations_mut) {
            Some(ViolationsMut::Text(list)) => list.extend(findings.iter().cloned()),
            Some(ViolationsMut::Json(list)) => {
                list.extend(findings.iter().cloned().map(Value::String));
            }
            None => self.reason.push(Reason::Violations {
                violations: findings.to_vec(),
            }),
        }
    }

    /// Counts every individual problem recorded on the artifact.
    pub fn finding_count(&self) -> usize {
        self.reason
            .iter()
            .map(|reason| match reason {
                Reason::Field { .. } | Reason::Platform(_) => 1,
                Reason::Violations { violations } => violations.len(),
            })
            .sum()
    }
}
