//! Progress reporting for archive rewrites.
//!
//! The rewriter calls a [`RewriteProgress`] implementation once before the
//! first member and around every member. The CLI uses it to drive a
//! progress bar; the library default is [`NoProgress`].
//!
//! # Example
//!
//! ```rust,ignore
//! use zhepub::progress::progress_fn;
//!
//! let mut progress = progress_fn(|done, total| println!("{done}/{total}"));
//! rewriter.rewrite_with_progress(source, sink, &mut progress)?;
//! ```

use crate::member::MemberClass;

/// IEC byte unit: 1 KiB = 1024 bytes.
pub const BYTES_KIB: u64 = 1024;
/// IEC byte unit: 1 MiB = 1024 KiB.
pub const BYTES_MIB: u64 = 1024 * BYTES_KIB;

/// Progress callbacks for a rewrite.
pub trait RewriteProgress {
    /// Called once with the number of members in the source archive.
    fn on_start(&mut self, total_members: usize) {
        let _ = total_members;
    }

    /// Called before a member is read.
    fn on_member_start(&mut self, name: &str, size: u64) {
        let _ = (name, size);
    }

    /// Called after a member has been written.
    fn on_member_complete(&mut self, name: &str, class: MemberClass) {
        let _ = (name, class);
    }
}

/// Progress reporter that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl RewriteProgress for NoProgress {}

/// Reporter calling a closure with `(members_done, members_total)`.
pub struct FnProgress<F: FnMut(usize, usize)> {
    callback: F,
    done: usize,
    total: usize,
}

impl<F: FnMut(usize, usize)> RewriteProgress for FnProgress<F> {
    fn on_start(&mut self, total_members: usize) {
        self.total = total_members;
        self.done = 0;
        (self.callback)(0, total_members);
    }

    fn on_member_complete(&mut self, _name: &str, _class: MemberClass) {
        self.done += 1;
        (self.callback)(self.done, self.total);
    }
}

/// Creates a reporter from a `(members_done, members_total)` closure.
pub fn progress_fn<F: FnMut(usize, usize)>(callback: F) -> FnProgress<F> {
    FnProgress {
        callback,
        done: 0,
        total: 0,
    }
}

/// Formats a byte count with IEC units, one decimal place.
///
/// ```
/// use zhepub::progress::human_file_size;
///
/// assert_eq!(human_file_size(512), "512 B");
/// assert_eq!(human_file_size(20 * 1024 * 1024), "20.0 MiB");
/// ```
pub fn human_file_size(bytes: u64) -> String {
    const UNITS: [&str; 8] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

    if bytes < BYTES_KIB {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    loop {
        value /= BYTES_KIB as f64;
        if value < BYTES_KIB as f64 || unit == UNITS.len() - 1 {
            break;
        }
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}
