//! Filesystem helpers and user interface elements.
//!
//! - [`progress`] - Spinners for long-running operations

pub mod progress;

pub use progress::{ProgressBar, spinner_with_message};

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;

use crate::core::AssessError;

/// Names of the regular files directly inside `dir`, sorted.
///
/// A missing directory lists as empty; any other I/O failure is an error.
pub async fn list_dir(dir: &Path) -> Result<BTreeSet<String>, AssessError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(AssessError::fs("listing directory", dir, &e)),
    };

    let mut names = BTreeSet::new();
    while let Some(entry) =
        entries.next_entry().await.map_err(|e| AssessError::fs("listing directory", dir, &e))?
    {
        let file_type =
            entry.file_type().await.map_err(|e| AssessError::fs("listing directory", dir, &e))?;
        if file_type.is_file() {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}
