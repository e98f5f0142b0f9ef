//! Content transformation for markup members.

use crate::convert::ConversionContext;
use crate::member::MarkupKind;
use crate::{Error, Result};

const BOM: char = '\u{feff}';

/// Outcome of transforming one markup member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// Converted payload.
    pub data: Vec<u8>,
    /// Whether the metadata rule replaced anything.
    pub metadata_patched: bool,
}

/// Converts text line by line.
///
/// The text is split on `\n` and every line is converted on its own, then
/// the lines are joined with `\n` again. A `\r` before the line feed stays
/// part of its line and a trailing line feed is kept.
pub fn convert_lines(context: &ConversionContext, text: &str) -> Result<String> {
    let mut output = String::with_capacity(text.len());
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            output.push('\n');
        }
        if !line.is_empty() {
            output.push_str(&context.convert(line)?);
        }
    }
    Ok(output)
}

/// Transforms the payload of a markup member.
///
/// The payload must be UTF-8. A leading byte order mark is kept as is. For
/// the package document the metadata rule of the context is applied to the
/// converted text. Converter errors are returned as raised.
pub fn transform_markup(
    context: &ConversionContext,
    kind: MarkupKind,
    member: &str,
    data: Vec<u8>,
) -> Result<Transformed> {
    let text = String::from_utf8(data).map_err(|source| Error::InvalidText {
        member: member.to_string(),
        source,
    })?;

    let (bom, body) = match text.strip_prefix(BOM) {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };

    let mut converted = convert_lines(context, body)
        .inspect_err(|e| log::error!("Converting member '{}' failed: {}", member, e))?;
    if bom {
        converted.insert(0, BOM);
    }

    if kind.is_package_document() {
        if let Some(patched) = context.rule().apply(&converted) {
            return Ok(Transformed {
                data: patched.into_bytes(),
                metadata_patched: true,
            });
        }
    }

    Ok(Transformed {
        data: converted.into_bytes(),
        metadata_patched: false,
    })
}
