//! Spinner shown while a request to the server is in flight

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::OutputConfig;

/// Indeterminate progress indicator
///
/// Suppressed in quiet and JSON mode. Draws to stderr so it never mixes
/// with command output.
#[derive(Debug)]
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    /// Start a spinner with the given message
    pub fn start(config: &OutputConfig, message: &str) -> Self {
        if config.quiet || config.json {
            return Self { bar: None };
        }

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar: Some(bar) }
    }

    /// Finish and clear the spinner
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.finish();
    }
}
