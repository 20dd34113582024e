//! Copy policy: the skip predicate, lifecycle hooks, and the transfer
//! routine itself, bundled into one injectable trait.
//!
//! Every method has a default, so the unit struct [`DefaultPolicy`] gives
//! plain copy-everything behavior. Implementors override individual pieces:
//! a skip predicate to bypass up-to-date destinations, hooks for
//! side-channel bookkeeping, or [`copy`](CopyPolicy::copy) to substitute a
//! different transfer strategy entirely (memory-mapped, `copy_file_range`,
//! ...). A substituted routine must keep two contracts: observe the
//! [`CancelToken`] at chunk granularity, and account transferred bytes on
//! the item as it goes.

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::item::CopyItem;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};

/// Injectable policy object driving one run's per-item behavior.
///
/// All methods are called on worker threads and must be thread-safe; the
/// same policy instance serves every worker.
#[allow(unused_variables)]
pub trait CopyPolicy: Send + Sync {
    /// Decide whether the destination already satisfies the copy.
    ///
    /// Returning `Ok(true)` completes the item as `Success` without moving
    /// any bytes (its `copied_size` stays `None`). Errors here are treated
    /// exactly like copy errors.
    ///
    /// Default: never skip.
    fn should_skip(&self, item: &CopyItem, cancel: &CancelToken) -> Result<bool> {
        Ok(false)
    }

    /// Called after the item enters `Copying`, before the transfer starts.
    fn before_copy(&self, item: &CopyItem, cancel: &CancelToken) -> Result<()> {
        Ok(())
    }

    /// Called after the transfer attempt, successful or not.
    ///
    /// `error` is the transfer (or `before_copy`) error, if any.
    fn after_copy(&self, item: &CopyItem, error: Option<&Error>) {}

    /// Called instead of the transfer when [`should_skip`](Self::should_skip)
    /// returned `Ok(true)`.
    fn on_skip(&self, item: &CopyItem) {}

    /// Called when the item reaches `Success`.
    fn on_success(&self, item: &CopyItem) {}

    /// Called when the item reaches `Cancel`.
    fn on_cancel(&self, item: &CopyItem) {}

    /// Called when the item reaches `Fail`, after the item's failure has
    /// tripped cancellation for the rest of the run.
    fn on_error(&self, item: &CopyItem, error: &Error) {}

    /// Transfer the item's bytes. Default: [`stream_copy`].
    fn copy(&self, item: &CopyItem, buffer: &mut [u8], cancel: &CancelToken) -> Result<()> {
        stream_copy(item, buffer, cancel)
    }
}

/// The default policy: no skipping, no-op hooks, streaming transfer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl CopyPolicy for DefaultPolicy {}

/// Streaming chunk-wise copy of `item.src()` to `item.dst()`.
///
/// Opens the source for reading and the destination for create-or-truncate
/// read-write, pre-sizes the destination to the source length (allocation
/// up front, less fragmentation), then loops: cancellation check, read up
/// to `buffer.len()` bytes, write them out, account them on the item.
///
/// The caller (the engine) has already removed any pre-existing destination
/// and created the parent directory; it also cleans up the partial
/// destination if this returns an error.
pub fn stream_copy(item: &CopyItem, buffer: &mut [u8], cancel: &CancelToken) -> Result<()> {
    let mut src = File::open(item.src())?;
    let len = src.metadata()?.len();

    let dst = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(item.dst())?;
    dst.set_len(len)?;
    let mut dst = &dst;

    loop {
        cancel.check()?;
        let n = match src.read(buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        dst.write_all(&buffer[..n])?;
        item.add_copied(n as u64);
    }

    Ok(())
}
