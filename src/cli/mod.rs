//! Command-line interface for gateway-assess.
//!
//! # Commands
//!
//! - `assess` - Validate a source export against the target platform and report
//! - `compare` - Structurally diff two exported bundle archives
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Only warnings and errors
//! - `--config <file>` - Configuration file (defaults to `./assess.toml`)
//! - `--no-progress` - Disable spinners
//!
//! # Examples
//!
//! ```bash
//! gateway-assess assess --source-export export/source.json --export-dir export/source
//! gateway-assess --quiet assess --skip-target-validation --format json --output report.json
//! gateway-assess compare export/source/apis/orders.zip export/target/apis/orders.zip
//! ```
//!
//! Logs go to stderr and honor `RUST_LOG`; reports go to stdout.

pub mod assess;
pub mod compare;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use assess::AssessCommand;
pub use compare::CompareCommand;

/// Settings derived from the global flags, shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Hide progress spinners
    pub no_progress: bool,
    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
}

/// Migration assessment for API gateway organizations.
#[derive(Parser)]
#[command(
    name = "gateway-assess",
    about = "Assess whether an exported API gateway organization can be imported into a target platform",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable progress spinners
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a source export and report importability
    Assess(AssessCommand),
    /// Compare the proxy definitions of two bundle archives
    Compare(CompareCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        init_logging(&config.log_level);
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            no_progress: self.no_progress || self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Run the selected command with an already-built configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Assess(cmd) => cmd.execute(&config).await,
            Commands::Compare(cmd) => cmd.execute().await,
        }
    }
}

/// Install the stderr subscriber; `RUST_LOG` wins over `default_level`.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
