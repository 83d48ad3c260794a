use gateway_assess::test_utils::BundleBuilder;
use predicates::prelude::*;
use tempfile::TempDir;

use super::common::gateway_assess;

#[test]
fn test_compare_identical_bundles() {
    let temp = TempDir::new().unwrap();
    BundleBuilder::proxy("/orders").write(&temp.path().join("a.zip")).unwrap();
    BundleBuilder::proxy("/orders").write(&temp.path().join("b.zip")).unwrap();

    gateway_assess(temp.path())
        .args(["compare", "a.zip", "b.zip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No differences"));
}

#[test]
fn test_compare_reports_drift_and_fails() {
    let temp = TempDir::new().unwrap();
    BundleBuilder::proxy("/orders")
        .file("apiproxy/policies/verify-key.xml", r#"<VerifyAPIKey name="verify-key"/>"#)
        .write(&temp.path().join("a.zip"))
        .unwrap();
    BundleBuilder::proxy("/v2/orders").write(&temp.path().join("b.zip")).unwrap();

    gateway_assess(temp.path())
        .args(["compare", "a.zip", "b.zip"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("File missing in target: apiproxy/policies/verify-key.xml"))
        .stdout(predicate::str::contains("Mismatch in file: apiproxy/proxies/default.xml"))
        .stderr(predicate::str::contains("2 difference(s) found"));
}

#[test]
fn test_compare_unreadable_archive_is_a_finding() {
    let temp = TempDir::new().unwrap();
    BundleBuilder::proxy("/orders").write(&temp.path().join("a.zip")).unwrap();

    gateway_assess(temp.path())
        .args(["compare", "a.zip", "missing.zip"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error processing proxy bundles"));
}
