//! Progress spinners for long-running assessment steps.
//!
//! Spinners are hidden when `--no-progress` is passed or the
//! `GATEWAY_ASSESS_NO_PROGRESS` environment variable is set to any value.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

use crate::constants::NO_PROGRESS_ENV_VAR;

fn is_progress_disabled() -> bool {
    std::env::var(NO_PROGRESS_ENV_VAR).is_ok()
}

/// A spinner with consistent styling.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a spinner, hidden when `enabled` is false or progress is disabled globally.
    pub fn new_spinner(enabled: bool) -> Self {
        let bar = if !enabled || is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self {
            inner: bar,
        }
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }
}

/// Creates a spinner already showing `msg`.
pub fn spinner_with_message(msg: impl Into<String>, enabled: bool) -> ProgressBar {
    let spinner = ProgressBar::new_spinner(enabled);
    spinner.set_message(msg);
    spinner
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}
