//! Name transliteration for members and output files.
//!
//! Member names are converted with the same converter as the content. The
//! output file name is the converted input file name; when conversion does
//! not change the name, the [`UnchangedNamePolicy`] decides between writing
//! a suffixed copy and skipping the file.

use std::fmt;
use std::str::FromStr;

use crate::Result;
use crate::convert::ConversionContext;

/// Suffix inserted before the extension when the converted name is unchanged.
pub const DISAMBIGUATION_SUFFIX: &str = "-tc";

/// Converts a member or file name.
pub fn transliterate(context: &ConversionContext, name: &str) -> Result<String> {
    context.convert(name)
}

/// What to do when converting a file name leaves it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnchangedNamePolicy {
    /// Write the output next to the input with [`DISAMBIGUATION_SUFFIX`]
    /// before the extension.
    #[default]
    Suffix,
    /// Treat the file as already converted and skip it.
    Skip,
}

impl FromStr for UnchangedNamePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "suffix" => Ok(Self::Suffix),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown policy '{other}' (expected 'suffix' or 'skip')")),
        }
    }
}

/// Output file name decided for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputName {
    /// The converted name differs from the input name.
    Renamed(String),
    /// The converted name was unchanged; a suffix was added.
    Suffixed(String),
    /// The converted name was unchanged and the policy is to skip.
    AlreadyConverted,
}

impl OutputName {
    /// Returns the file name to write, if any.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::Renamed(name) | Self::Suffixed(name) => Some(name),
            Self::AlreadyConverted => None,
        }
    }
}

impl fmt::Display for OutputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.file_name() {
            Some(name) => f.write_str(name),
            None => f.write_str("(already converted)"),
        }
    }
}

/// Decides the output file name for `file_name` (a bare name, no directory).
///
/// # Example
///
/// ```rust
/// use zhepub::convert::{ConversionContext, ScriptVariant};
/// use zhepub::naming::{OutputName, UnchangedNamePolicy, plan_output_name};
///
/// let context = ConversionContext::new(ScriptVariant::Taiwan);
/// let name = plan_output_name(&context, "novel.epub", UnchangedNamePolicy::Suffix).unwrap();
/// assert_eq!(name, OutputName::Suffixed("novel-tc.epub".into()));
/// ```
pub fn plan_output_name(
    context: &ConversionContext,
    file_name: &str,
    policy: UnchangedNamePolicy,
) -> Result<OutputName> {
    let converted = transliterate(context, file_name)?;
    if converted != file_name {
        return Ok(OutputName::Renamed(converted));
    }

    Ok(match policy {
        UnchangedNamePolicy::Suffix => OutputName::Suffixed(insert_suffix(file_name)),
        UnchangedNamePolicy::Skip => OutputName::AlreadyConverted,
    })
}

/// Inserts [`DISAMBIGUATION_SUFFIX`] before the extension of `file_name`.
pub fn insert_suffix(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => format!(
            "{}{}{}",
            &file_name[..pos],
            DISAMBIGUATION_SUFFIX,
            &file_name[pos..]
        ),
        _ => format!("{file_name}{DISAMBIGUATION_SUFFIX}"),
    }
}
