//! Progress reporting.
//!
//! The engine invokes the caller's callback synchronously on the worker
//! thread at every status transition. Keep callbacks fast: they run on the
//! critical path of the worker that fired them.

use crate::item::CopyItem;

/// One progress notification.
///
/// `items` is the same fixed, ordered slice for the whole run; only the
/// fields of individual items change. `item` is the item whose status just
/// changed. Callbacks get read-only access and must not assume anything
/// beyond that.
#[derive(Clone, Copy)]
pub struct ProgressEvent<'a> {
    /// All items of the run, in enqueue order
    pub items: &'a [CopyItem],
    /// The item whose status just changed
    pub item: &'a CopyItem,
}

/// Callback for progress updates.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent<'_>) + Send + Sync>;

/// Create a default progress bar for a run over `total` items.
#[cfg(feature = "progress")]
#[cfg_attr(docsrs, doc(cfg(feature = "progress")))]
#[must_use]
pub fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}
