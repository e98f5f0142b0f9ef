//! Output formatting for CLI operations.

use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What happened to one input
pub enum FileReport {
    /// Converted and written
    Converted {
        input: PathBuf,
        output: PathBuf,
        elapsed: Duration,
        members: usize,
        markup_converted: usize,
    },
    /// Not an EPUB file
    NotEpub { input: PathBuf },
    /// File name unchanged by conversion, skipped by policy
    AlreadyConverted { input: PathBuf },
    /// Conversion failed
    Failed { input: PathBuf, error: String },
}

/// Trait for output formatting
pub trait OutputFormatter {
    /// Announces that an input is about to be converted
    fn format_start(&self, input: &Path) -> Option<String>;

    /// Formats the report of one input as soon as it is known
    fn format_report(&self, report: &FileReport) -> Option<String>;

    /// Formats all reports once every input was processed
    fn format_summary(&self, reports: &[FileReport]) -> Option<String>;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_start(&self, input: &Path) -> Option<String> {
        Some(format!("Converting {}\n", input.display()))
    }

    fn format_report(&self, report: &FileReport) -> Option<String> {
        Some(match report {
            FileReport::Converted { input, elapsed, .. } => format!(
                "File {} is successfully converted. Time elapsed: {:.2}s\n",
                input.display(),
                elapsed.as_secs_f64()
            ),
            FileReport::NotEpub { input } => format!(
                "Skipping file {}, which is not an epub document.\n",
                input.display()
            ),
            FileReport::AlreadyConverted { input } => format!(
                "Skipping file {}, which is already converted.\n",
                input.display()
            ),
            FileReport::Failed { input, error } => {
                format!("Failed to convert {}: {}\n", input.display(), error)
            }
        })
    }

    fn format_summary(&self, reports: &[FileReport]) -> Option<String> {
        if reports.len() < 2 {
            return None;
        }
        let converted = reports
            .iter()
            .filter(|r| matches!(r, FileReport::Converted { .. }))
            .count();
        let failed = reports
            .iter()
            .filter(|r| matches!(r, FileReport::Failed { .. }))
            .count();
        Some(format!(
            "{} converted, {} skipped, {} failed\n",
            converted,
            reports.len() - converted - failed,
            failed
        ))
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_start(&self, _input: &Path) -> Option<String> {
        None
    }

    fn format_report(&self, _report: &FileReport) -> Option<String> {
        None
    }

    fn format_summary(&self, reports: &[FileReport]) -> Option<String> {
        let items: Vec<_> = reports
            .iter()
            .map(|r| match r {
                FileReport::Converted {
                    input,
                    output,
                    elapsed,
                    members,
                    markup_converted,
                } => json!({
                    "input": input.display().to_string(),
                    "status": "converted",
                    "output": output.display().to_string(),
                    "elapsed_secs": elapsed.as_secs_f64(),
                    "members": members,
                    "markup_converted": markup_converted,
                }),
                FileReport::NotEpub { input } => json!({
                    "input": input.display().to_string(),
                    "status": "skipped",
                    "reason": "not an epub document",
                }),
                FileReport::AlreadyConverted { input } => json!({
                    "input": input.display().to_string(),
                    "status": "skipped",
                    "reason": "already converted",
                }),
                FileReport::Failed { input, error } => json!({
                    "input": input.display().to_string(),
                    "status": "failed",
                    "error": error,
                }),
            })
            .collect();

        Some(serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string()) + "\n")
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}
