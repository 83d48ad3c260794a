use gateway_assess::core::AssessError;
use gateway_assess::models::{Imported, OrgExport, Reason, TargetSnapshot};
use gateway_assess::platform::{PlatformResponse, TargetPlatform};
use gateway_assess::retry::RetryPolicy;
use gateway_assess::rules::RuleSet;
use gateway_assess::test_utils::{BundleBuilder, ExportFixture, MockPlatform, init_test_logging, transient};
use gateway_assess::validator::{Validator, ValidatorOptions};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn export(value: Value) -> OrgExport {
    serde_json::from_value(value).unwrap()
}

fn write_bundles(dir: &Path, api_type: &str, bundles: &[(&str, BundleBuilder)]) {
    for (name, bundle) in bundles {
        bundle.write(&dir.join(api_type).join(format!("{name}.zip"))).unwrap();
    }
}

fn validator(options: ValidatorOptions, snapshot: TargetSnapshot, platform: &Arc<MockPlatform>) -> Validator {
    init_test_logging(None);
    let platform: Arc<dyn TargetPlatform> = platform.clone();
    Validator::new(options, snapshot, RuleSet::default(), Some(platform))
        .unwrap()
        .with_retry(RetryPolicy::immediate(3))
}

#[tokio::test]
async fn test_target_compare_marks_imported_and_appends_drift() {
    let source_dir = TempDir::new().unwrap();
    let target_dir = TempDir::new().unwrap();
    write_bundles(source_dir.path(), "apis", &[
        ("orders", BundleBuilder::proxy("/orders")),
        ("billing", BundleBuilder::proxy("/billing")),
    ]);
    write_bundles(target_dir.path(), "apis", &[("orders", BundleBuilder::proxy("/v2/orders"))]);

    let source = export(json!({
        "orgConfig": {
            "apis": ["orders", "billing"],
            "developers": {"jane@example.com": {"email": "jane@example.com"}}
        }
    }));
    let snapshot = TargetSnapshot::new(export(json!({
        "orgConfig": {"apis": ["orders"], "developers": {"jane@example.com": {}}}
    })));
    let platform = Arc::new(MockPlatform::new());
    let options = ValidatorOptions {
        target_compare: true,
        skip_target_validation: false,
    };

    let report = validator(options, snapshot, &platform)
        .validate_export(&source, source_dir.path(), target_dir.path())
        .await
        .unwrap();

    let orders = &report.apis[0];
    assert_eq!(orders.name, "orders");
    assert!(orders.importable);
    assert_eq!(orders.imported, Imported::Yes);
    assert_eq!(orders.reason, vec![Reason::Violations {
        violations: vec!["Mismatch in file: apiproxy/proxies/default.xml".to_string()],
    }]);

    let billing = &report.apis[1];
    assert_eq!(billing.imported, Imported::No);
    assert_eq!(billing.finding_count(), 0);

    assert_eq!(report.org_config["developers"][0].imported, Imported::Yes);
    assert_eq!(platform.create_count("orders"), 1);
    assert_eq!(platform.create_count("billing"), 1);
}

#[tokio::test]
async fn test_rejected_bundle_keeps_platform_details() {
    let dir = TempDir::new().unwrap();
    write_bundles(dir.path(), "sharedflows", &[("auth", BundleBuilder::proxy("/auth"))]);

    let detail = json!({"violations": [{"description": "Unsupported policy type JavaCallout"}]});
    let platform = Arc::new(MockPlatform::new().on_create("auth", Ok(PlatformResponse::Rejected {
        status: 400,
        error: json!({"code": 400, "details": [detail.clone()]}),
    })));

    let source = export(json!({"orgConfig": {"sharedflows": {"auth": {}}}}));
    let report = validator(ValidatorOptions::default(), TargetSnapshot::empty(), &platform)
        .validate_export(&source, dir.path(), dir.path())
        .await
        .unwrap();

    let auth = &report.sharedflows[0];
    assert!(!auth.importable);
    assert_eq!(auth.reason, vec![Reason::Platform(detail)]);
    assert!(report.blocking().iter().any(|(section, record)| section == "sharedflows" && record.name == "auth"));
}

#[tokio::test]
async fn test_transient_failures_are_retried_until_success() {
    let dir = TempDir::new().unwrap();
    write_bundles(dir.path(), "apis", &[("orders", BundleBuilder::proxy("/orders"))]);

    let platform = Arc::new(
        MockPlatform::new()
            .on_create("orders", Err(transient("validate apis/orders")))
            .on_create("orders", Err(transient("validate apis/orders")))
            .on_create("orders", Ok(PlatformResponse::Accepted(json!({"name": "orders", "revision": "3"})))),
    );

    let source = export(json!({"orgConfig": {"apis": ["orders"]}}));
    let report = validator(ValidatorOptions::default(), TargetSnapshot::empty(), &platform)
        .validate_export(&source, dir.path(), dir.path())
        .await
        .unwrap();

    assert_eq!(platform.create_count("orders"), 3);
    assert!(report.apis[0].importable);
    assert_eq!(report.apis[0].extra["revision"], json!("3"));
}

#[tokio::test]
async fn test_exhausted_retries_abort_the_run() {
    let dir = TempDir::new().unwrap();
    write_bundles(dir.path(), "apis", &[("orders", BundleBuilder::proxy("/orders"))]);

    let platform = Arc::new(MockPlatform::new().on_create("orders", Err(transient("validate apis/orders"))));
    let source = export(json!({"orgConfig": {"apis": ["orders"]}}));
    let err = validator(ValidatorOptions::default(), TargetSnapshot::empty(), &platform)
        .validate_export(&source, dir.path(), dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, AssessError::Platform(_)), "unexpected error: {err:?}");
    assert_eq!(platform.create_count("orders"), 3);
}

#[tokio::test]
async fn test_report_serializes_like_the_export() {
    let dir = TempDir::new().unwrap();
    let options = ValidatorOptions {
        target_compare: false,
        skip_target_validation: true,
    };
    let report = Validator::new(options, TargetSnapshot::empty(), RuleSet::default(), None)
        .unwrap()
        .validate_export(&export(ExportFixture::source()), dir.path(), dir.path())
        .await
        .unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["orgConfig"]["developers"][0]["name"], json!("jane@example.com"));
    assert_eq!(value["orgConfig"]["developers"][0]["firstName"], json!("Jane"));
    assert_eq!(value["orgConfig"]["developers"][0]["imported"], json!("UNKNOWN"));

    let servers = &value["envConfig"]["test"]["targetServers"];
    assert_eq!(servers[0]["name"], json!("backend"));
    assert_eq!(servers[0]["reason"], json!([]));
    assert_eq!(servers[1]["importable"], json!(false));
    assert_eq!(servers[1]["reason"][0]["key"], json!("host"));

    assert_eq!(value["apis"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["apis"][0]["importable"], json!(false));
}
