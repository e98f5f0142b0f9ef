//! Fuzz target for MemberClass::of with arbitrary member names.
//!
//! Run with: cargo +nightly fuzz run member_class

#![no_main]

use libfuzzer_sys::fuzz_target;
use zhepub::MemberClass;

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        let class = MemberClass::of(name);

        if name.ends_with('/') {
            assert_eq!(class, MemberClass::Opaque, "directory classified as markup: {:?}", name);
        }

        // Classification ignores ASCII case
        assert_eq!(class, MemberClass::of(&name.to_ascii_uppercase()));
    }
});
