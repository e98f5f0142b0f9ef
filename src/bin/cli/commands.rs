//! Command implementations for the CLI tool.

use zhepub::batch::{self, BatchOutcome, Plan};
use zhepub::{ConversionContext, Error, ScriptVariant, UnchangedNamePolicy};

use crate::OutputFormat;
use crate::exit_codes::ExitCode;
use crate::output::{FileReport, create_formatter};
use crate::progress::CliProgress;

/// Configuration for the convert command.
pub struct ConvertConfig<'a> {
    pub files: &'a [String],
    pub variant: ScriptVariant,
    pub policy: UnchangedNamePolicy,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Convert command implementation
pub fn convert(config: &ConvertConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let inputs = match batch::resolve_inputs(config.files) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::Failure;
        }
    };

    if inputs.is_empty() {
        eprintln!("No input files matched");
    }

    // Loading the conversion tables is slow; do it once for all inputs
    let context = ConversionContext::new(config.variant);
    let show_progress = !config.quiet && config.format == OutputFormat::Human;

    let mut reports = Vec::with_capacity(inputs.len());

    for input in inputs {
        let report = match batch::plan(&input, &context, config.policy) {
            Ok(plan @ Plan::Convert { .. }) => {
                if let Some(text) = formatter.format_start(&input) {
                    print!("{}", text);
                }

                let mut progress = CliProgress::new(!show_progress);
                match batch::convert_file(&plan, &context, &mut progress) {
                    Ok(BatchOutcome::Converted {
                        input,
                        output,
                        elapsed,
                        result,
                    }) => {
                        progress.finish();
                        FileReport::Converted {
                            input,
                            output,
                            elapsed,
                            members: result.total_members(),
                            markup_converted: result.markup_converted,
                        }
                    }
                    Ok(BatchOutcome::AlreadyConverted { input }) => {
                        progress.finish();
                        FileReport::AlreadyConverted { input }
                    }
                    Err(e) => {
                        progress.abandon();
                        FileReport::Failed {
                            input,
                            error: e.to_string(),
                        }
                    }
                }
            }
            Ok(Plan::AlreadyConverted { input }) => FileReport::AlreadyConverted { input },
            Err(Error::UnsupportedInput { .. }) => FileReport::NotEpub { input },
            Err(e) => FileReport::Failed {
                input,
                error: e.to_string(),
            },
        };

        if let Some(text) = formatter.format_report(&report) {
            if matches!(report, FileReport::Failed { .. }) {
                eprint!("{}", text);
            } else {
                print!("{}", text);
            }
        }
        reports.push(report);
    }

    if let Some(text) = formatter.format_summary(&reports) {
        print!("{}", text);
    }

    ExitCode::for_reports(&reports)
}
