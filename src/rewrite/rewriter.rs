//! Archive rewriter applying conversion to every member.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::convert::ConversionContext;
use crate::member::{MemberClass, MemberRecord};
use crate::naming::transliterate;
use crate::progress::{NoProgress, RewriteProgress};
use crate::transform::transform_markup;
use crate::{Error, Result};

/// Upper bound for pre-sizing a member buffer from its declared size.
///
/// The declared size comes from the archive headers and is not trusted;
/// buffers grow past this bound only as bytes are actually read.
const MAX_PREALLOC: u64 = 16 * crate::progress::BYTES_MIB;

/// Result of a rewrite.
#[must_use = "rewrite result should be checked to verify the conversion completed as expected"]
#[derive(Debug, Clone, Default)]
pub struct RewriteResult {
    /// Members in output order, which is the source order.
    pub members: Vec<MemberRecord>,
    /// Number of markup members that were converted.
    pub markup_converted: usize,
    /// Number of members copied verbatim (directories included).
    pub opaque_copied: usize,
    /// Number of package documents whose language tag was replaced.
    pub metadata_patched: usize,
    /// Uncompressed bytes read from the source.
    pub bytes_read: u64,
    /// Uncompressed bytes written to the output.
    pub bytes_written: u64,
}

impl RewriteResult {
    /// Returns the total number of members in the output archive.
    pub fn total_members(&self) -> usize {
        self.members.len()
    }

    /// Returns `(source_name, output_name)` pairs in archive order.
    pub fn name_mapping(&self) -> impl Iterator<Item = (&str, &str)> {
        self.members
            .iter()
            .map(|m| (m.source_name.as_str(), m.output_name.as_str()))
    }

    /// Returns the number of members whose name was changed by conversion.
    pub fn members_renamed(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.source_name != m.output_name)
            .count()
    }
}

/// Rewrites archives using a shared [`ConversionContext`].
///
/// The rewriter holds no state of its own; one instance can be used for any
/// number of archives.
///
/// # Example
///
/// ```rust,ignore
/// use zhepub::{ArchiveRewriter, ConversionContext};
///
/// let context = ConversionContext::default();
/// let (result, bytes) = ArchiveRewriter::new(&context).rewrite_to_vec(&input)?;
/// for (from, to) in result.name_mapping() {
///     println!("{from} -> {to}");
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ArchiveRewriter<'a> {
    context: &'a ConversionContext,
}

impl<'a> ArchiveRewriter<'a> {
    /// Creates a rewriter using `context` for all conversions.
    pub fn new(context: &'a ConversionContext) -> Self {
        Self { context }
    }

    /// Rewrites `source` into `sink`.
    pub fn rewrite<R, W>(&self, source: R, sink: W) -> Result<RewriteResult>
    where
        R: Read + Seek,
        W: Write + Seek,
    {
        self.rewrite_with_progress(source, sink, &mut NoProgress)
    }

    /// Rewrites an in-memory archive and returns the output bytes.
    pub fn rewrite_to_vec(&self, source: &[u8]) -> Result<(RewriteResult, Vec<u8>)> {
        let mut output = Cursor::new(Vec::new());
        let result = self.rewrite(Cursor::new(source), &mut output)?;
        Ok((result, output.into_inner()))
    }

    /// Rewrites `source` into `sink`, reporting every member to `progress`.
    ///
    /// Both archives are closed when this returns, whether it succeeds or
    /// not. On error the sink holds an incomplete archive and should be
    /// discarded.
    pub fn rewrite_with_progress<R, W, P>(
        &self,
        source: R,
        sink: W,
        progress: &mut P,
    ) -> Result<RewriteResult>
    where
        R: Read + Seek,
        W: Write + Seek,
        P: RewriteProgress + ?Sized,
    {
        let mut archive = ZipArchive::new(source)?;
        let mut writer = ZipWriter::new(sink);
        let mut result = RewriteResult::default();

        // output name -> source name, to reject collisions
        let mut seen: HashMap<String, String> = HashMap::with_capacity(archive.len());

        progress.on_start(archive.len());

        for idx in 0..archive.len() {
            let mut file = archive.by_index(idx)?;
            let source_name = file.name().to_string();
            let class = MemberClass::of(&source_name);
            let is_directory = file.is_dir();
            let compression = file.compression();

            progress.on_member_start(&source_name, file.size());

            let output_name = transliterate(self.context, &source_name)?;
            if let Some(first) = seen.insert(output_name.clone(), source_name.clone()) {
                return Err(Error::DuplicateMember {
                    first,
                    second: source_name,
                    output: output_name,
                });
            }

            let mut options = SimpleFileOptions::default().compression_method(compression);
            if let Some(modified) = file.last_modified() {
                options = options.last_modified_time(modified);
            }
            if let Some(mode) = file.unix_mode() {
                options = options.unix_permissions(mode);
            }

            if is_directory {
                drop(file);
                writer.add_directory(output_name.as_str(), options)?;
                result.opaque_copied += 1;
                log::debug!("{} -> {} (directory)", source_name, output_name);
                progress.on_member_complete(&source_name, MemberClass::Opaque);
                result.members.push(MemberRecord {
                    source_name,
                    output_name,
                    class: MemberClass::Opaque,
                    compression,
                    metadata_patched: false,
                    is_directory: true,
                });
                continue;
            }

            let mut data = Vec::with_capacity(file.size().min(MAX_PREALLOC) as usize);
            file.read_to_end(&mut data)?;
            drop(file);
            result.bytes_read += data.len() as u64;

            let (data, metadata_patched) = match class {
                MemberClass::Markup(kind) => {
                    let transformed = transform_markup(self.context, kind, &source_name, data)?;
                    result.markup_converted += 1;
                    if transformed.metadata_patched {
                        result.metadata_patched += 1;
                    }
                    (transformed.data, transformed.metadata_patched)
                }
                MemberClass::Opaque => {
                    result.opaque_copied += 1;
                    (data, false)
                }
            };

            let options = options.large_file(data.len() as u64 >= u64::from(u32::MAX));
            writer.start_file(output_name.as_str(), options)?;
            writer.write_all(&data)?;
            result.bytes_written += data.len() as u64;

            log::debug!(
                "{} -> {} ({}, {:?}, {} bytes)",
                source_name,
                output_name,
                class,
                compression,
                data.len()
            );
            progress.on_member_complete(&source_name, class);

            result.members.push(MemberRecord {
                source_name,
                output_name,
                class,
                compression,
                metadata_patched,
                is_directory: false,
            });
        }

        writer.finish()?;

        log::info!(
            "Rewrote {} members ({} converted, {} copied, {} renamed)",
            result.total_members(),
            result.markup_converted,
            result.opaque_copied,
            result.members_renamed()
        );

        Ok(result)
    }
}
