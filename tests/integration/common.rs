//! Shared helpers for integration tests.

use assert_cmd::Command;
use gateway_assess::constants::{CONFIG_ENV_VAR, NO_PROGRESS_ENV_VAR, TOKEN_ENV_VAR};
use gateway_assess::test_utils::{BundleBuilder, ExportFixture};
use serde_json::Value;
use std::path::Path;

/// The binary, isolated from the caller's configuration and token.
pub fn gateway_assess(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gateway-assess").unwrap();
    cmd.current_dir(dir)
        .env_remove(CONFIG_ENV_VAR)
        .env_remove(TOKEN_ENV_VAR)
        .env_remove("RUST_LOG")
        .env(NO_PROGRESS_ENV_VAR, "1");
    cmd
}

/// Writes `export` to `<dir>/source.json` plus a bundle for every name in `bundles`.
pub fn write_source(dir: &Path, export: &Value, bundles: &[(&str, &str)]) {
    ExportFixture::write(export, &dir.join("source.json")).unwrap();
    for (api_type, name) in bundles {
        BundleBuilder::proxy(&format!("/{name}"))
            .write(&dir.join(api_type).join(format!("{name}.zip")))
            .unwrap();
    }
}

/// Parses the JSON document printed by `assess --format json`.
pub fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
