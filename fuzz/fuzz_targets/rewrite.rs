//! Fuzz target for ArchiveRewriter with arbitrary archive bytes.
//!
//! Run with: cargo +nightly fuzz run rewrite
//!
//! The rewriter must return an error for malformed input, never panic. When
//! it succeeds, the output must itself be rewritable with the same member
//! count.

#![no_main]

use libfuzzer_sys::fuzz_target;
use zhepub::{ArchiveRewriter, ConversionContext, Result};

fuzz_target!(|data: &[u8]| {
    let context = ConversionContext::with_converter(|text: &str| -> Result<String> {
        Ok(text.replace('书', "書"))
    });
    let rewriter = ArchiveRewriter::new(&context);

    if let Ok((result, output)) = rewriter.rewrite_to_vec(data) {
        let (again, _) = rewriter
            .rewrite_to_vec(&output)
            .expect("rewritten archive must be readable");
        assert_eq!(result.total_members(), again.total_members());
    }
});
