//! Progress bar for CLI extraction.

use indicatif::{ProgressBar, ProgressStyle};
use unpak::Progress;

use crate::output::format_bytes;

/// Thin wrapper around an `indicatif` bar driven by the library's
/// progress callback. `ProgressBar` is internally reference-counted, so
/// clones share the same display.
#[derive(Clone)]
pub struct CliProgress {
    bar: ProgressBar,
    quiet: bool,
}

impl CliProgress {
    /// Creates a progress display; hidden when `quiet` is set.
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::no_length();
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} entries {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb
        };
        Self { bar, quiet }
    }

    /// Advances the display from one progress snapshot.
    pub fn update(&self, progress: &Progress<'_>) {
        if self.quiet {
            return;
        }
        if self.bar.length().is_none() {
            if let Some(total) = progress.total_entries {
                self.bar.set_length(total as u64);
            }
        }
        self.bar.set_position(progress.entry_index as u64 + 1);
        self.bar
            .set_message(format!("({})", format_bytes(progress.bytes_written)));
    }

    /// Clears the display.
    pub fn finish(&self) {
        if !self.quiet {
            self.bar.finish_and_clear();
        }
    }
}
