//! Structural comparison of two exported bundle archives.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

use super::xml;
use crate::constants::{MANIFEST_DIR, PROXY_DEFINITION_SUFFIX};

/// Compare the proxy definitions of a source bundle against a target bundle.
///
/// Only XML definitions nested at least two directories deep and outside the
/// manifest directory are compared (`apiproxy/proxies/default.xml` yes,
/// `apiproxy/manifests/manifest.xml` and `apiproxy/orders.xml` no). Each
/// qualifying source file produces at most one finding:
///
/// - `"File missing in target: <path>"`
/// - `"Mismatch in file: <path>"`
/// - `"Error parsing <path>: <cause>"`
///
/// An archive that cannot be opened or read yields the single finding
/// `"Error processing proxy bundles: <cause>"`. This function never fails.
/// An empty result means no drift within the compared files.
pub fn compare_bundles(source: &Path, target: &Path) -> Vec<String> {
    match try_compare(source, target) {
        Ok(findings) => findings,
        Err(e) => vec![format!("Error processing proxy bundles: {e}")],
    }
}

/// Whether an archive entry is a proxy definition worth comparing.
pub fn is_compared_entry(name: &str) -> bool {
    let segments: Vec<&str> = name.split('/').collect();
    name.ends_with(PROXY_DEFINITION_SUFFIX) && segments.len() > 2 && segments[1] != MANIFEST_DIR
}

fn try_compare(source: &Path, target: &Path) -> Result<Vec<String>, BundleError> {
    let mut source_zip = open(source)?;
    let mut target_zip = open(target)?;

    let source_files = file_names(&mut source_zip)?;
    let target_files = file_names(&mut target_zip)?;

    let mut findings = Vec::new();
    for name in source_files.iter().filter(|name| is_compared_entry(name)) {
        let source_text = match String::from_utf8(read_entry(&mut source_zip, name)?) {
            Ok(text) => text,
            Err(e) => {
                findings.push(format!("Error parsing {name}: {e}"));
                continue;
            }
        };
        let source_doc = match xml::parse(&source_text) {
            Ok(doc) => doc,
            Err(e) => {
                findings.push(format!("Error parsing {name}: {e}"));
                continue;
            }
        };

        if !target_files.contains(name) {
            findings.push(format!("File missing in target: {name}"));
            continue;
        }

        let target_text = match String::from_utf8(read_entry(&mut target_zip, name)?) {
            Ok(text) => text,
            Err(e) => {
                findings.push(format!("Error parsing {name}: {e}"));
                continue;
            }
        };
        match xml::parse(&target_text) {
            Ok(target_doc) => {
                if !xml::documents_equal(&source_doc, &target_doc) {
                    debug!("Structural drift in {} between {} and {}", name, source.display(), target.display());
                    findings.push(format!("Mismatch in file: {name}"));
                }
            }
            Err(e) => findings.push(format!("Error parsing {name}: {e}")),
        }
    }

    Ok(findings)
}

#[derive(Debug, thiserror::Error)]
enum BundleError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Zip {
        path: String,
        source: zip::result::ZipError,
    },
}

fn open(path: &Path) -> Result<ZipArchive<File>, BundleError> {
    let file = File::open(path).map_err(|source| BundleError::Io {
        path: path.display().to_string(),
        source,
    })?;
    ZipArchive::new(file).map_err(|source| BundleError::Zip {
        path: path.display().to_string(),
        source,
    })
}

/// Names of every non-directory entry, sorted.
fn file_names(archive: &mut ZipArchive<File>) -> Result<BTreeSet<String>, BundleError> {
    let mut names = BTreeSet::new();
    for index in 0..archive.len() {
        let entry = archive.by_index(index).map_err(|source| BundleError::Zip {
            path: format!("entry #{index}"),
            source,
        })?;
        if !entry.is_dir() {
            names.insert(entry.name().to_string());
        }
    }
    Ok(names)
}

fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> Result<Vec<u8>, BundleError> {
    let mut entry = archive.by_name(name).map_err(|source| BundleError::Zip {
        path: name.to_string(),
        source,
    })?;
    let mut content = Vec::new();
    entry.read_to_end(&mut content).map_err(|source| BundleError::Io {
        path: name.to_string(),
        source,
    })?;
    Ok(content)
}
