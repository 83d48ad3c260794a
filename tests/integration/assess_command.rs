use gateway_assess::constants::TOKEN_ENV_VAR;
use gateway_assess::test_utils::ExportFixture;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{gateway_assess, stdout_json, write_source};

#[test]
fn test_assess_offline_text_summary() {
    let temp = TempDir::new().unwrap();
    write_source(temp.path(), &ExportFixture::source(), &[("apis", "orders"), ("sharedflows", "auth")]);

    gateway_assess(temp.path())
        .args(["assess", "--source-export", "source.json", "--skip-target-validation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("orgConfig.developers"))
        .stdout(predicate::str::contains("envConfig.test.targetServers"))
        .stdout(predicate::str::contains("Validation skipped by user flag."))
        .stdout(predicate::str::contains("No valid revisions found"))
        .stdout(predicate::str::contains("Loopback hosts are not reachable"));
}

#[test]
fn test_assess_json_output_and_report_file() {
    let temp = TempDir::new().unwrap();
    write_source(temp.path(), &ExportFixture::source(), &[("apis", "orders")]);

    let output = gateway_assess(temp.path())
        .args([
            "--quiet",
            "assess",
            "--source-export",
            "source.json",
            "--skip-target-validation",
            "--format",
            "json",
            "--output",
            "reports/report.json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report = stdout_json(&output);
    assert_eq!(report["apis"][0]["name"], json!("orders"));
    assert_eq!(report["apis"][0]["importable"], json!(false));
    assert_eq!(report["apis"][0]["imported"], json!("UNKNOWN"));
    assert_eq!(report["apis"][1]["name"], json!("billing"));
    assert_eq!(report["envConfig"]["test"]["flowhooks"][0]["reason"][0]["key"], json!("sharedFlow"));
    assert!(report["envConfig"]["test"].get("caches").is_none());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(temp.path().join("reports/report.json")).unwrap())
            .unwrap();
    assert_eq!(written["apis"], report["apis"]);
}

#[test]
fn test_assess_strict_fails_on_blocking_artifacts() {
    let temp = TempDir::new().unwrap();
    write_source(temp.path(), &ExportFixture::source(), &[]);

    gateway_assess(temp.path())
        .args(["assess", "--source-export", "source.json", "--skip-target-validation", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be imported as-is"));
}

#[test]
fn test_assess_with_target_compare_uses_snapshot() {
    let temp = TempDir::new().unwrap();
    let source = json!({"orgConfig": {"developers": {"a@example.com": {}, "b@example.com": {}}}});
    write_source(temp.path(), &source, &[]);
    ExportFixture::write(
        &json!({"orgConfig": {"developers": {"a@example.com": {}}}}),
        &temp.path().join("target.json"),
    )
    .unwrap();

    let output = gateway_assess(temp.path())
        .args([
            "assess",
            "--source-export",
            "source.json",
            "--target-snapshot",
            "target.json",
            "--target-export-dir",
            "target",
            "--target-compare",
            "--skip-target-validation",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let developers = &stdout_json(&output)["orgConfig"]["developers"];
    assert_eq!(developers[0]["imported"], json!(true));
    assert_eq!(developers[1]["imported"], json!(false));
    assert_eq!(developers[0]["importable"], json!(true));
}

#[test]
fn test_assess_reads_config_file() {
    let temp = TempDir::new().unwrap();
    write_source(temp.path(), &json!({"orgConfig": {"kvms": {"kvm1": {"name": "kvm1"}}}}), &[]);
    std::fs::write(
        temp.path().join("assess.toml"),
        "[validation]\nskip_target_validation = true\n\n[paths]\nsource_export = \"source.json\"\n",
    )
    .unwrap();

    let output = gateway_assess(temp.path()).args(["assess", "--format", "json"]).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_json(&output)["orgConfig"]["kvms"][0]["name"], json!("kvm1"));
}

#[test]
fn test_assess_without_target_requires_platform() {
    let temp = TempDir::new().unwrap();
    write_source(temp.path(), &ExportFixture::source(), &[]);

    gateway_assess(temp.path())
        .args(["assess", "--source-export", "source.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no target platform client"));
}

#[test]
fn test_assess_invalid_export_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("source.json"), "{not json").unwrap();

    gateway_assess(temp.path())
        .args(["assess", "--source-export", "source.json", "--skip-target-validation"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid export document"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_assess_against_management_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/organizations/acme/apis"))
        .and(query_param("name", "orders"))
        .and(query_param("action", "validate"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "orders", "revision": "1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/organizations/acme/environments/test/sharedflows/auth/deployments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deployments": []})))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let source = json!({
        "orgConfig": {"apis": ["orders"]},
        "envConfig": {"test": {"flowhooks": {"PreProxyFlowHook": {"sharedFlow": "auth"}}}}
    });
    write_source(temp.path(), &source, &[("apis", "orders")]);

    let base_url = format!("{}/v1", server.uri());
    let dir = temp.path().to_path_buf();
    let output = tokio::task::spawn_blocking(move || {
        gateway_assess(&dir)
            .env(TOKEN_ENV_VAR, "secret-token")
            .args([
                "assess",
                "--source-export",
                "source.json",
                "--base-url",
                &base_url,
                "--organization",
                "acme",
                "--format",
                "json",
            ])
            .output()
            .unwrap()
    })
    .await
    .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report = stdout_json(&output);
    assert_eq!(report["organization"], json!("acme"));
    assert_eq!(report["apis"][0]["importable"], json!(true));
    assert_eq!(report["apis"][0]["revision"], json!("1"));
    let hook = &report["envConfig"]["test"]["flowhooks"][0];
    assert_eq!(hook["importable"], json!(false));
    assert_eq!(
        hook["reason"][0]["error_msg"],
        json!("Flowhook sharedflow - auth is not deployed in target environment test")
    );
}
