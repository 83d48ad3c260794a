//! Aggregated validation report handed to the report writer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ArtifactRecord, Imported};

/// Every artifact record produced by one validation run, grouped like the export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Organization-scoped records, keyed by resource kind
    pub org_config: BTreeMap<String, Vec<ArtifactRecord>>,
    /// Environment-scoped records, keyed by environment then resource kind
    pub env_config: BTreeMap<String, BTreeMap<String, Vec<ArtifactRecord>>>,
    /// API proxy bundle records
    pub apis: Vec<ArtifactRecord>,
    /// Shared-flow bundle records
    pub sharedflows: Vec<ArtifactRecord>,
}

/// Counts for one report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    /// Section label, e.g. `orgConfig.developers` or `envConfig.test.targetServers`
    pub section: String,
    /// Number of artifacts validated
    pub total: usize,
    /// Artifacts importable as-is
    pub importable: usize,
    /// Artifacts with at least one blocking reason
    pub blocked: usize,
    /// Artifacts already present in the target
    pub already_imported: usize,
}

impl SectionSummary {
    fn from_records(section: String, records: &[ArtifactRecord]) -> Self {
        let importable = records.iter().filter(|r| r.importable).count();
        Self {
            section,
            total: records.len(),
            importable,
            blocked: records.len() - importable,
            already_imported: records.iter().filter(|r| r.imported == Imported::Yes).count(),
        }
    }
}

impl ValidationReport {
    /// Iterate every section as `(label, records)` in report order.
    pub fn sections(&self) -> Vec<(String, &[ArtifactRecord])> {
        let mut sections: Vec<(String, &[ArtifactRecord])> = Vec::new();
        for (kind, records) in &self.org_config {
            sections.push((format!("orgConfig.{kind}"), records.as_slice()));
        }
        for (env, kinds) in &self.env_config {
            for (kind, records) in kinds {
                sections.push((format!("envConfig.{env}.{kind}"), records.as_slice()));
            }
        }
        sections.push(("apis".to_string(), self.apis.as_slice()));
        sections.push(("sharedflows".to_string(), self.sharedflows.as_slice()));
        sections
    }

    /// Per-section counts, skipping empty sections.
    pub fn summary(&self) -> Vec<SectionSummary> {
        self.sections()
            .into_iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(section, records)| SectionSummary::from_records(section, records))
            .collect()
    }

    /// Every record that is not importable, with its section label.
    pub fn blocking(&self) -> Vec<(String, &ArtifactRecord)> {
        self.sections()
            .into_iter()
            .flat_map(|(section, records)| {
                records.iter().filter(|r| !r.importable).map(move |r| (section.clone(), r))
            })
            .collect()
    }

    /// Whether every validated artifact is importable.
    pub fn all_importable(&self) -> bool {
        self.sections().iter().all(|(_, records)| records.iter().all(|r| r.importable))
    }
}
