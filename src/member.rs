//! Archive member classification.
//!
//! Whether a member is converted is decided by its name alone: the extension
//! of the final path segment is checked against a closed set of markup
//! extensions. Everything else is copied byte for byte.

use std::fmt;

use zip::CompressionMethod;

/// Markup formats whose text is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkupKind {
    /// `.html`
    Html,
    /// `.htm`
    Htm,
    /// `.xhtml`
    Xhtml,
    /// `.ncx` navigation control file.
    Ncx,
    /// `.opf` package document.
    Opf,
}

impl MarkupKind {
    /// All markup kinds.
    pub const ALL: [MarkupKind; 5] = [Self::Html, Self::Htm, Self::Xhtml, Self::Ncx, Self::Opf];

    /// Returns the file extension of this kind, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Htm => "htm",
            Self::Xhtml => "xhtml",
            Self::Ncx => "ncx",
            Self::Opf => "opf",
        }
    }

    /// Matches an extension (ASCII case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(ext))
    }

    /// Returns `true` for the package document, the only kind that carries
    /// the language metadata.
    pub fn is_package_document(self) -> bool {
        matches!(self, Self::Opf)
    }
}

/// How a member is treated by the rewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberClass {
    /// Converted line by line.
    Markup(MarkupKind),
    /// Copied verbatim.
    Opaque,
}

impl MemberClass {
    /// Classifies a member by name.
    ///
    /// ```
    /// use zhepub::member::{MarkupKind, MemberClass};
    ///
    /// assert_eq!(MemberClass::of("OEBPS/content.opf"), MemberClass::Markup(MarkupKind::Opf));
    /// assert_eq!(MemberClass::of("Text/ch01.XHTML"), MemberClass::Markup(MarkupKind::Xhtml));
    /// assert_eq!(MemberClass::of("Images/cover.jpg"), MemberClass::Opaque);
    /// assert_eq!(MemberClass::of("html"), MemberClass::Opaque);
    /// ```
    pub fn of(name: &str) -> Self {
        if name.ends_with('/') {
            return Self::Opaque;
        }
        let file_name = name.rsplit('/').next().unwrap_or(name);
        match file_name.rfind('.') {
            // A leading dot names a hidden file, not an extension.
            Some(pos) if pos > 0 => MarkupKind::from_extension(&file_name[pos + 1..])
                .map_or(Self::Opaque, Self::Markup),
            _ => Self::Opaque,
        }
    }

    /// Returns `true` for markup members.
    pub fn is_markup(self) -> bool {
        matches!(self, Self::Markup(_))
    }
}

impl fmt::Display for MemberClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markup(kind) => write!(f, "markup ({})", kind.extension()),
            Self::Opaque => f.write_str("opaque"),
        }
    }
}

/// One member as it was written to the output archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    /// Name in the source archive.
    pub source_name: String,
    /// Name in the output archive.
    pub output_name: String,
    /// Classification of the member.
    pub class: MemberClass,
    /// Compression method, identical in source and output.
    pub compression: CompressionMethod,
    /// Whether the metadata rule replaced anything in this member.
    pub metadata_patched: bool,
    /// Whether the member is a directory entry.
    pub is_directory: bool,
}
