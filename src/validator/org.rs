//! Organization-scoped resources and key value maps.
//!
//! Neither has compatibility rules: every record is importable and only the
//! existence check against the snapshot varies.

use serde_json::{Map, Value};

use super::{Validator, name_or};
use crate::models::ArtifactRecord;

impl Validator {
    /// Validate org-scoped resources of one kind (developers, apiProducts, apps, ...).
    ///
    /// Developers are keyed by email in the export; the key becomes the record name.
    /// Existence is tested by key against `orgConfig[kind]`.
    pub fn validate_org_resource(
        &self,
        kind: &str,
        resources: &Map<String, Value>,
    ) -> Vec<ArtifactRecord> {
        resources
            .iter()
            .map(|(id, resource)| {
                let name = if kind == "developers" { id.clone() } else { name_or(resource, id) };
                ArtifactRecord::new(name, resource)
                    .with_imported(self.imported(|| self.snapshot.has_org_resource(kind, id)))
            })
            .collect()
    }

    /// Validate key value maps, org-scoped when `env` is `None`.
    pub fn validate_kvms(&self, env: Option<&str>, kvms: &Map<String, Value>) -> Vec<ArtifactRecord> {
        kvms.iter()
            .map(|(id, kvm)| {
                let imported = self.imported(|| match env {
                    Some(env) => self.snapshot.has_env_resource(env, "kvms", id),
                    None => self.snapshot.has_org_resource("kvms", id),
                });
                ArtifactRecord::new(name_or(kvm, id), kvm).with_imported(imported)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Imported, OrgExport, TargetSnapshot};
    use crate::rules::RuleSet;
    use crate::validator::{Validator, ValidatorOptions};
    use serde_json::{Map, Value, json};

    fn validator(target_compare: bool, target: Value) -> Validator {
        let snapshot = TargetSnapshot::new(serde_json::from_value::<OrgExport>(target).unwrap());
        let options = ValidatorOptions {
            target_compare,
            skip_target_validation: true,
        };
        Validator::new(options, snapshot, RuleSet::default(), None).unwrap()
    }

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_org_resources_are_always_importable() {
        let validator = validator(false, json!({}));
        let records = validator.validate_org_resource(
            "apiProducts",
            &map(json!({"gold": {"name": "gold", "quota": "100"}, "silver": {}})),
        );

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.importable && r.reason.is_empty()));
        assert!(records.iter().all(|r| r.imported == Imported::Unknown));
        assert_eq!(records[0].extra["quota"], json!("100"));
        assert_eq!(records[1].name, "silver");
    }

    #[test]
    fn test_developer_key_becomes_name() {
        let validator = validator(true, json!({"orgConfig": {"developers": {"a@example.com": {}}}}));
        let records = validator.validate_org_resource(
            "developers",
            &map(json!({
                "a@example.com": {"email": "a@example.com", "name": "ignored"},
                "b@example.com": {"email": "b@example.com"}
            })),
        );

        assert_eq!(records[0].name, "a@example.com");
        assert_eq!(records[0].imported, Imported::Yes);
        assert_eq!(records[1].name, "b@example.com");
        assert_eq!(records[1].imported, Imported::No);
    }

    #[test]
    fn test_org_kvm_without_compare_is_unknown() {
        let validator = validator(false, json!({}));
        let records = validator.validate_kvms(None, &map(json!({"kvm1": {"name": "kvm1"}})));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "kvm1");
        assert!(records[0].importable);
        assert_eq!(records[0].imported, Imported::Unknown);
    }

    #[test]
    fn test_kvm_membership_follows_scope() {
        let validator = validator(
            true,
            json!({
                "orgConfig": {"kvms": {"shared": {}}},
                "envConfig": {"test": {"kvms": {"local": {}}}}
            }),
        );
        let kvms = map(json!({"shared": {}, "local": {"name": "local-display"}}));

        let org = validator.validate_kvms(None, &kvms);
        assert_eq!(org.iter().find(|r| r.name == "shared").unwrap().imported, Imported::Yes);
        assert_eq!(org.iter().find(|r| r.name == "local-display").unwrap().imported, Imported::No);

        let env = validator.validate_kvms(Some("test"), &kvms);
        assert_eq!(env.iter().find(|r| r.name == "shared").unwrap().imported, Imported::No);
        assert_eq!(env.iter().find(|r| r.name == "local-display").unwrap().imported, Imported::Yes);
    }
}
