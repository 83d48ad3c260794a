//! Test fixtures for bundle archives and export documents.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builder for in-memory or on-disk bundle archives.
#[derive(Clone, Debug, Default)]
pub struct BundleBuilder {
    files: Vec<(String, String)>,
}

impl BundleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A minimal proxy bundle: manifest, one proxy endpoint, one target endpoint.
    pub fn proxy(base_path: &str) -> Self {
        Self::new()
            .file("apiproxy/manifests/manifest.xml", r#"<Manifest name="manifest"/>"#)
            .file(
                "apiproxy/proxies/default.xml",
                &format!(
                    r#"<ProxyEndpoint name="default"><HTTPProxyConnection><BasePath>{base_path}</BasePath></HTTPProxyConnection><RouteRule name="default"><TargetEndpoint>default</TargetEndpoint></RouteRule></ProxyEndpoint>"#
                ),
            )
            .file(
                "apiproxy/targets/default.xml",
                r#"<TargetEndpoint name="default"><HTTPTargetConnection><URL>https://backend.example.com</URL></HTTPTargetConnection></TargetEndpoint>"#,
            )
    }

    /// Add an entry; later entries with the same name are written too.
    pub fn file(mut self, name: &str, content: &str) -> Self {
        self.files.push((name.to_string(), content.to_string()));
        self
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in &self.files {
            writer
                .start_file(name.as_str(), SimpleFileOptions::default())
                .with_context(|| format!("Failed to start zip entry {name}"))?;
            writer.write_all(content.as_bytes())?;
        }
        Ok(writer.finish().context("Failed to finish zip archive")?.into_inner())
    }

    /// Write the archive to `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_bytes()?)
            .with_context(|| format!("Failed to write bundle {}", path.display()))?;
        Ok(path.to_path_buf())
    }
}

/// Sample export documents.
pub struct ExportFixture;

impl ExportFixture {
    /// A source export touching every artifact kind the validator knows.
    pub fn source() -> Value {
        json!({
            "orgConfig": {
                "developers": {
                    "jane@example.com": {"email": "jane@example.com", "firstName": "Jane"}
                },
                "apiProducts": {
                    "gold": {"name": "gold", "displayName": "Gold"}
                },
                "kvms": {
                    "settings": {"name": "settings", "encrypted": false}
                },
                "apis": ["orders", "billing"],
                "sharedflows": {"auth": {"revision": ["1"]}}
            },
            "envConfig": {
                "test": {
                    "targetServers": {
                        "backend": {"name": "backend", "host": "backend.example.com", "port": 443},
                        "local": {"name": "local", "host": "localhost", "port": 8080}
                    },
                    "resourcefiles": {
                        "lib.js": {"name": "lib.js", "type": "jsc"},
                        "server.js": {"name": "server.js", "type": "node"}
                    },
                    "flowhooks": {
                        "PreProxyFlowHook": {"sharedFlow": "auth", "continueOnError": true},
                        "PostProxyFlowHook": {}
                    },
                    "kvms": {
                        "env-settings": {"name": "env-settings"}
                    },
                    "caches": {
                        "c1": {"name": "c1"}
                    }
                }
            }
        })
    }

    /// Write `export` as pretty JSON to `path`.
    pub fn write(export: &Value, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(export)?)?;
        Ok(path.to_path_buf())
    }
}
