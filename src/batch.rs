//! Batch conversion of EPUB files on disk.
//!
//! Used by the command-line tool: inputs are resolved from paths or a glob
//! pattern, each input gets an output path next to it, and every file is
//! rewritten through an in-memory buffer before the output is written.

use std::fs;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::convert::ConversionContext;
use crate::naming::{OutputName, UnchangedNamePolicy, plan_output_name};
use crate::progress::{NoProgress, RewriteProgress};
use crate::rewrite::{ArchiveRewriter, RewriteResult};
use crate::{Error, Result};

/// File extension accepted as input, without the dot.
pub const EPUB_EXTENSION: &str = "epub";

const GLOB_META: &[char] = &['*', '?', '['];

/// Resolves command-line arguments to input paths.
///
/// A single argument containing glob meta characters is expanded (sorted);
/// otherwise every argument is taken literally, in order.
pub fn resolve_inputs(args: &[String]) -> Result<Vec<PathBuf>> {
    if let [pattern] = args {
        if pattern.contains(GLOB_META) {
            let paths = glob::glob(pattern).map_err(|e| Error::Pattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            let mut resolved = Vec::new();
            for entry in paths {
                match entry {
                    Ok(path) => resolved.push(path),
                    Err(e) => log::warn!("Cannot read '{}': {}", e.path().display(), e.error()),
                }
            }
            resolved.sort();
            return Ok(resolved);
        }
    }

    Ok(args.iter().map(PathBuf::from).collect())
}

/// Returns `true` if `path` has the `.epub` extension.
pub fn is_epub(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(EPUB_EXTENSION))
}

/// Planned conversion of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Convert `input` and write the result to `output`.
    Convert {
        /// Source file.
        input: PathBuf,
        /// Destination file, in the same directory as the source.
        output: PathBuf,
    },
    /// The file name is unchanged by conversion and the policy is to skip.
    AlreadyConverted {
        /// Source file.
        input: PathBuf,
    },
}

/// Plans the conversion of `input`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedInput`] if `input` is not an `.epub` file.
pub fn plan(
    input: &Path,
    context: &ConversionContext,
    policy: UnchangedNamePolicy,
) -> Result<Plan> {
    let file_name = match input.file_name().and_then(|n| n.to_str()) {
        Some(name) if is_epub(input) => name,
        _ => {
            return Err(Error::UnsupportedInput {
                path: input.display().to_string(),
            });
        }
    };

    Ok(match plan_output_name(context, file_name, policy)? {
        OutputName::Renamed(name) | OutputName::Suffixed(name) => Plan::Convert {
            input: input.to_path_buf(),
            output: input.with_file_name(name),
        },
        OutputName::AlreadyConverted => Plan::AlreadyConverted {
            input: input.to_path_buf(),
        },
    })
}

/// Outcome of converting one input file.
#[derive(Debug)]
pub enum BatchOutcome {
    /// The file was converted and written.
    Converted {
        /// Source file.
        input: PathBuf,
        /// Written file.
        output: PathBuf,
        /// Wall-clock time of the conversion.
        elapsed: Duration,
        /// Rewrite statistics.
        result: RewriteResult,
    },
    /// The file was left alone because it is already converted.
    AlreadyConverted {
        /// Source file.
        input: PathBuf,
    },
}

/// Converts one file according to `plan`.
pub fn convert_file(
    plan: &Plan,
    context: &ConversionContext,
    progress: &mut dyn RewriteProgress,
) -> Result<BatchOutcome> {
    let (input, output) = match plan {
        Plan::Convert { input, output } => (input, output),
        Plan::AlreadyConverted { input } => {
            return Ok(BatchOutcome::AlreadyConverted {
                input: input.clone(),
            });
        }
    };

    let started = Instant::now();
    let source = BufReader::new(fs::File::open(input)?);
    let mut buffer = Cursor::new(Vec::new());
    let result =
        ArchiveRewriter::new(context).rewrite_with_progress(source, &mut buffer, progress)?;
    fs::write(output, buffer.into_inner())?;

    Ok(BatchOutcome::Converted {
        input: input.clone(),
        output: output.clone(),
        elapsed: started.elapsed(),
        result,
    })
}

/// Plans and converts one file without progress reporting.
pub fn convert_path(
    input: &Path,
    context: &ConversionContext,
    policy: UnchangedNamePolicy,
) -> Result<BatchOutcome> {
    let plan = plan(input, context, policy)?;
    convert_file(&plan, context, &mut NoProgress)
}
