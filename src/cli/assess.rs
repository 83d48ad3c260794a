//! `assess`: validate a source export and report importability.
//!
//! Inputs come from flags first, then `assess.toml`:
//!
//! - source export JSON (required)
//! - target snapshot JSON (optional; an empty baseline when absent)
//! - exported bundle directories for the source and, with `--target-compare`, the target
//! - target management API location and token, unless `--skip-target-validation`

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::CliConfig;
use crate::config::AssessConfig;
use crate::constants::TOKEN_ENV_VAR;
use crate::models::{OrgExport, TargetSnapshot};
use crate::platform::{ManagementClient, TargetPlatform};
use crate::report::{self, ReportFormat};
use crate::rules::RuleSet;
use crate::utils::spinner_with_message;
use crate::validator::{Validator, ValidatorOptions};

#[derive(Args, Debug, Default)]
pub struct AssessCommand {
    /// Source organization export (JSON)
    #[arg(long)]
    pub source_export: Option<PathBuf>,

    /// Target organization export used as the existence baseline (JSON)
    #[arg(long)]
    pub target_snapshot: Option<PathBuf>,

    /// Directory holding the source's exported `apis/` and `sharedflows/` bundles
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Directory holding the target's exported bundles
    #[arg(long)]
    pub target_export_dir: Option<PathBuf>,

    /// TOML file overriding the built-in rule tables
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Base URL of the target management API
    #[arg(long)]
    pub base_url: Option<String>,

    /// Target organization
    #[arg(long)]
    pub organization: Option<String>,

    /// Check existence in the target and diff already-imported bundles
    #[arg(long)]
    pub target_compare: bool,

    /// Make no calls to the target platform
    #[arg(long)]
    pub skip_target_validation: bool,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Also write the full JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail when any artifact is not importable
    #[arg(long)]
    pub strict: bool,
}

/// Every input of a run after merging flags over the configuration file.
#[derive(Debug)]
struct ResolvedRun {
    source_export: PathBuf,
    target_snapshot: Option<PathBuf>,
    export_dir: PathBuf,
    target_export_dir: PathBuf,
    rules: Option<PathBuf>,
    options: ValidatorOptions,
    output: Option<PathBuf>,
}

impl AssessCommand {
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let config = AssessConfig::load_with_optional(cli.config_path.clone()).await?;
        let run = self.resolve(&config)?;
        debug!("Resolved run: {:?}", run);

        let source = OrgExport::load_from(&run.source_export).await?;
        let snapshot = match &run.target_snapshot {
            Some(path) => TargetSnapshot::new(OrgExport::load_from(path).await?),
            None => TargetSnapshot::empty(),
        };
        let rules = RuleSet::load(run.rules.as_deref()).await?;
        let platform =
            if run.options.skip_target_validation { None } else { self.platform(&config)? };

        let validator = Validator::new(run.options, snapshot, rules, platform)?
            .with_retry(config.retry.clone());

        let spinner = spinner_with_message("Validating exported artifacts...", !cli.no_progress);
        let result =
            validator.validate_export(&source, &run.export_dir, &run.target_export_dir).await;
        spinner.finish_and_clear();
        let report = result.context("Validation run failed")?;

        let organization = self.organization.as_deref().or(config.target.organization.as_deref());
        println!("{}", report::render(&report, self.format, organization)?);

        if let Some(output) = &run.output {
            report::write_report(output, &report::render_json(&report, organization)?).await?;
            info!("Report written to {}", output.display());
        }

        if self.strict && !report.all_importable() {
            bail!("{} artifact(s) cannot be imported as-is", report.blocking().len());
        }
        Ok(())
    }

    fn resolve(&self, config: &AssessConfig) -> Result<ResolvedRun> {
        let paths = &config.paths;
        let source_export = self
            .source_export
            .clone()
            .or_else(|| paths.source_export.clone())
            .context("No source export given: pass --source-export or set [paths] source_export")?;

        let export_dir = self
            .export_dir
            .clone()
            .or_else(|| paths.export_dir.clone())
            .unwrap_or_else(|| parent_dir(&source_export));

        let options = ValidatorOptions {
            target_compare: self.target_compare || config.validation.target_compare,
            skip_target_validation: self.skip_target_validation
                || config.validation.skip_target_validation,
        };

        let target_export_dir =
            match self.target_export_dir.clone().or_else(|| paths.target_export_dir.clone()) {
                Some(dir) => dir,
                None if options.target_compare => bail!(
                    "--target-compare needs the target's bundles: \
                     pass --target-export-dir or set [paths] target_export_dir"
                ),
                None => export_dir.clone(),
            };

        Ok(ResolvedRun {
            source_export,
            target_snapshot: self.target_snapshot.clone().or_else(|| paths.target_snapshot.clone()),
            export_dir,
            target_export_dir,
            rules: self.rules.clone().or_else(|| config.validation.rules_file.clone()),
            options,
            output: self.output.clone().or_else(|| paths.report.clone()),
        })
    }

    /// The management client, or `None` when the target is not configured.
    fn platform(&self, config: &AssessConfig) -> Result<Option<Arc<dyn TargetPlatform>>> {
        let base_url = self.base_url.clone().or_else(|| config.target.base_url.clone());
        let organization = self.organization.clone().or_else(|| config.target.organization.clone());
        let (Some(base_url), Some(organization)) = (base_url, organization) else {
            return Ok(None);
        };

        let token = std::env::var(TOKEN_ENV_VAR).ok().or_else(|| config.target.token.clone());
        let client: Arc<dyn TargetPlatform> =
            Arc::new(ManagementClient::new(base_url, organization, token)?);
        Ok(Some(client))
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
