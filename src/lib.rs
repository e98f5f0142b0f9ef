//! # zhepub
//!
//! Converts the Chinese script of EPUB books (simplified to traditional)
//! while keeping the archive itself intact.
//!
//! Markup members (`html`, `htm`, `xhtml`, `ncx`, `opf`) are converted line
//! by line, the package document gets its language tag updated, member names
//! are converted, and every other member is copied byte for byte. Member
//! order and per-member compression methods are preserved.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zhepub::{ArchiveRewriter, ConversionContext, Result, ScriptVariant};
//!
//! fn main() -> Result<()> {
//!     // Build the converter once and reuse it
//!     let context = ConversionContext::new(ScriptVariant::Taiwan);
//!
//!     let input = std::fs::read("novel.epub")?;
//!     let (result, output) = ArchiveRewriter::new(&context).rewrite_to_vec(&input)?;
//!     std::fs::write("novel-tc.epub", output)?;
//!
//!     println!("Converted {} of {} members",
//!         result.markup_converted,
//!         result.total_members());
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Converters
//!
//! The pipeline only sees the [`Converter`] trait, so any engine can be
//! plugged in:
//!
//! ```rust
//! use zhepub::{ConversionContext, Result};
//!
//! let context = ConversionContext::with_converter(|text: &str| -> Result<String> {
//!     Ok(text.replace('书', "書"))
//! });
//! assert_eq!(context.convert("书").unwrap(), "書");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | Command-line batch tool |
//! | `server` | No | Upload web service |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod batch;
pub mod convert;
pub mod error;
pub mod member;
pub mod naming;
pub mod progress;
pub mod rewrite;
pub mod transform;

#[cfg(feature = "server")]
#[cfg_attr(docsrs, doc(cfg(feature = "server")))]
pub mod server;

pub use error::{Error, ErrorKind, Result};

// Re-export conversion API at crate root for convenience
pub use convert::{ConversionContext, Converter, MetadataRule, ScriptVariant, ZhConverter};

// Re-export rewrite API at crate root for convenience
pub use member::{MarkupKind, MemberClass, MemberRecord};
pub use naming::{OutputName, UnchangedNamePolicy};
pub use rewrite::{ArchiveRewriter, RewriteResult};

// Re-export progress API
pub use progress::{NoProgress, RewriteProgress, progress_fn};
