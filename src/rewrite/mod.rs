//! Whole-archive rewriting.
//!
//! This module rewrites an EPUB (zip) archive member by member:
//! - Markup members are converted line by line
//! - The package document additionally gets its language tag replaced
//! - Every other member is copied byte for byte
//! - Every member name is converted
//!
//! # Example
//!
//! ```rust,no_run
//! use zhepub::{ArchiveRewriter, ConversionContext};
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let context = ConversionContext::default();
//! let source = BufReader::new(File::open("novel.epub")?);
//! let sink = File::create("novel-tc.epub")?;
//!
//! let result = ArchiveRewriter::new(&context).rewrite(source, sink)?;
//! println!("Converted {} markup members, copied {} others",
//!          result.markup_converted,
//!          result.opaque_copied);
//! # Ok::<(), zhepub::Error>(())
//! ```
//!
//! # Implementation Notes
//!
//! The rewriter:
//! 1. Opens the source central directory
//! 2. Walks the members in their stored order
//! 3. Reads each payload fully into memory
//! 4. Writes it under the converted name with the source compression method,
//!    modification time and permissions
//!
//! Members are processed sequentially; the output order always equals the
//! source order.

mod rewriter;

pub use rewriter::{ArchiveRewriter, RewriteResult};
