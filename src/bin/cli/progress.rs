//! Progress bar implementation for CLI operations.

use indicatif::{ProgressBar, ProgressStyle};
use zhepub::{MemberClass, RewriteProgress};

/// Per-file progress bar counting archive members
pub struct CliProgress {
    bar: ProgressBar,
    quiet: bool,
}

impl CliProgress {
    /// Creates a new progress display
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} members {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        };

        Self { bar, quiet }
    }

    /// Removes the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Leaves the bar with a failure message
    pub fn abandon(&self) {
        self.bar.abandon_with_message("Failed");
    }
}

impl RewriteProgress for CliProgress {
    fn on_start(&mut self, total_members: usize) {
        self.bar.set_length(total_members as u64);
        self.bar.set_position(0);
    }

    fn on_member_start(&mut self, name: &str, _size: u64) {
        if self.quiet {
            return;
        }

        // Truncate long names
        let count = name.chars().count();
        let display_name = if count > 40 {
            let tail: String = name.chars().skip(count - 37).collect();
            format!("...{}", tail)
        } else {
            name.to_string()
        };
        self.bar.set_message(display_name);
    }

    fn on_member_complete(&mut self, _name: &str, _class: MemberClass) {
        self.bar.inc(1);
    }
}
