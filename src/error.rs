//! Error types for EPUB conversion.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when rewriting an EPUB archive, along with a convenient
//! [`Result<T>`] type alias and the [`ErrorKind`] taxonomy used by the
//! adapters to report failures.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`:
//!
//! ```rust,no_run
//! use zhepub::{ArchiveRewriter, ConversionContext, Result};
//!
//! fn convert(input: &[u8]) -> Result<Vec<u8>> {
//!     let context = ConversionContext::default();
//!     let (_result, output) = ArchiveRewriter::new(&context).rewrite_to_vec(input)?;
//!     Ok(output)
//! }
//! ```
//!
//! ## Reporting Only the Kind
//!
//! The upload service never discloses error messages to clients. It reports
//! the [`ErrorKind`] label instead:
//!
//! ```rust
//! use zhepub::{Error, ErrorKind};
//!
//! let err = Error::UnsupportedInput { path: "notes.txt".into() };
//! assert_eq!(err.kind(), ErrorKind::UnsupportedInput);
//! assert_eq!(err.kind().label(), "UnsupportedInputError");
//! ```

use std::fmt;
use std::io;

/// Coarse classification of failures.
///
/// Every [`Error`] maps to exactly one kind. The upload service maps kinds
/// to HTTP status codes and reports the [`label`](Self::label) only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The source is not a valid container, or writing the output failed.
    Archive,
    /// The text converter failed on some text unit.
    Conversion,
    /// An upload request failed validation.
    Validation,
    /// A batch input does not have the expected file extension.
    UnsupportedInput,
    /// The worker running a conversion did not complete.
    Internal,
}

impl ErrorKind {
    /// Returns the stable label reported to clients.
    pub fn label(self) -> &'static str {
        match self {
            Self::Archive => "ArchiveError",
            Self::Conversion => "ConversionError",
            Self::Validation => "ValidationError",
            Self::UnsupportedInput => "UnsupportedInputError",
            Self::Internal => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The main error type for EPUB conversion.
///
/// | Kind | Variants | Typical Cause |
/// |------|----------|---------------|
/// | Archive | [`Io`][Self::Io], [`Zip`][Self::Zip], [`DuplicateMember`][Self::DuplicateMember] | Corrupt input, write failure |
/// | Conversion | [`Conversion`][Self::Conversion], [`InvalidText`][Self::InvalidText] | Converter failure, non UTF-8 markup |
/// | UnsupportedInput | [`UnsupportedInput`][Self::UnsupportedInput], [`Pattern`][Self::Pattern] | Batch input is not an `.epub`, bad glob |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The zip container could not be read or written.
    ///
    /// Returned when the source has no valid central directory, a member
    /// uses a compression method this build cannot decode or re-encode, or
    /// the output writer fails.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Two source members transliterate to the same output name.
    ///
    /// The output would otherwise contain a duplicate entry, so the rewrite
    /// is aborted instead.
    #[error("Members '{first}' and '{second}' both convert to '{output}'")]
    DuplicateMember {
        /// The earlier source member name.
        first: String,
        /// The later source member name.
        second: String,
        /// The shared output name.
        output: String,
    },

    /// The text converter failed.
    #[error("Conversion failed for '{unit}': {reason}")]
    Conversion {
        /// The member (or file name) being converted.
        unit: String,
        /// Description of the failure.
        reason: String,
    },

    /// A markup member is not valid UTF-8.
    #[error("Member '{member}' is not valid UTF-8 text: {source}")]
    InvalidText {
        /// The member name.
        member: String,
        /// The decoding error.
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// A batch input does not carry the `.epub` extension.
    #[error("Not an epub document: {path}")]
    UnsupportedInput {
        /// The rejected path.
        path: String,
    },

    /// An input glob pattern is malformed.
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    Pattern {
        /// The pattern as given.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) | Error::Zip(_) | Error::DuplicateMember { .. } => ErrorKind::Archive,
            Error::Conversion { .. } | Error::InvalidText { .. } => ErrorKind::Conversion,
            Error::UnsupportedInput { .. } | Error::Pattern { .. } => ErrorKind::UnsupportedInput,
        }
    }

    /// Creates a conversion error for the given unit.
    pub fn conversion(unit: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::Conversion {
            unit: unit.into(),
            reason: reason.to_string(),
        }
    }
}

/// A specialized Result type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
