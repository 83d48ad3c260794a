//! `compare`: structural diff of two bundle archives.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::compare::compare_bundles;

/// Compare the proxy definitions of a source bundle against a target bundle.
///
/// Exits non-zero when any difference is found.
#[derive(Args, Debug)]
pub struct CompareCommand {
    /// Source bundle archive
    pub source: PathBuf,
    /// Target bundle archive
    pub target: PathBuf,
}

impl CompareCommand {
    pub async fn execute(self) -> Result<()> {
        let findings =
            tokio::task::spawn_blocking(move || compare_bundles(&self.source, &self.target)).await?;

        if findings.is_empty() {
            println!("{} No differences in proxy definitions", "✓".green());
            return Ok(());
        }

        for finding in &findings {
            println!("{} {}", "✗".red(), finding);
        }
        bail!("{} difference(s) found between bundles", findings.len())
    }
}
