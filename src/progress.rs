//! Progress indicators for the airform CLI.

use crate::ui;
use declarative::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};
use registry::ResourceKind;
use std::time::Duration;

/// Start a spinner with a message. Hidden when `quiet`.
pub fn spinner(msg: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Clear a spinner and report success.
pub fn finish_success(pb: &ProgressBar, msg: &str) {
    pb.finish_and_clear();
    if !pb.is_hidden() {
        ui::success(msg);
    }
}

/// Clear a spinner after a failure.
pub fn finish_error(pb: &ProgressBar) {
    pb.finish_and_clear();
}

/// Prints one step line per synthesized resource.
pub struct StepReporter {
    quiet: bool,
    total: usize,
    done: usize,
}

impl StepReporter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            total: 0,
            done: 0,
        }
    }
}

impl ProgressCallback for StepReporter {
    fn on_start(&mut self, total: usize) {
        // The destination block is always added to the checkout files.
        self.total = total + 1;
        self.done = 0;
    }

    fn on_resource(&mut self, kind: ResourceKind, address: &str) {
        self.done += 1;
        if !self.quiet {
            ui::step(self.done, self.total, &format!("{kind} {address}"));
        }
    }

    fn on_skip(&mut self, kind: ResourceKind, label: &str, reason: &str) {
        self.done += 1;
        if !self.quiet {
            ui::dim(&format!("skipped {kind} {label}: {reason}"));
        }
    }

    fn on_complete(&mut self, blocks: usize) {
        log::info!("{blocks} resource blocks written");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_spinner_is_hidden() {
        let pb = spinner("Fetching", true);
        assert!(pb.is_hidden());
        finish_success(&pb, "done");
        assert!(pb.is_finished());
    }

    #[test]
    fn test_step_reporter_counts() {
        let mut reporter = StepReporter::new(true);
        reporter.on_start(2);
        reporter.on_resource(ResourceKind::Destination, "airbyte_destination_bigquery.bigquery");
        reporter.on_skip(ResourceKind::Destination, "bigquery", "declared by the preamble");
        reporter.on_resource(ResourceKind::Source, "airbyte_source_x.y");
        reporter.on_complete(2);
        assert_eq!(reporter.total, 3);
        assert_eq!(reporter.done, 3);
    }
}
