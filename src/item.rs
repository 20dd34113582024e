//! Copy items: one file's copy descriptor and mutable status.
//!
//! A [`CopyItem`] is created by the caller from a `(source, destination)`
//! pair, handed to the engine for the duration of the run, and inspected
//! afterwards for the final per-file report. The engine mutates status,
//! byte counters and timestamps through interior mutability; the paths are
//! immutable after creation.
//!
//! Status transitions are monotonic: once an item reaches a terminal
//! status (`Success`, `Fail`, `Cancel`) no further transition happens.

use crate::error::{FailureKind, ItemFailure};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

/// Status of one copy item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    /// Queued, or just picked up by a worker
    Init,
    /// A worker is transferring bytes
    Copying,
    /// Terminal: copied in full, or skipped by the skip policy
    Success,
    /// Terminal: the copy (or skip check) failed
    Fail,
    /// Terminal: cancelled before or during the transfer
    Cancel,
}

impl CopyStatus {
    /// Whether this status is terminal.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, CopyStatus::Success | CopyStatus::Fail | CopyStatus::Cancel)
    }
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CopyStatus::Init => "init",
            CopyStatus::Copying => "copying",
            CopyStatus::Success => "success",
            CopyStatus::Fail => "fail",
            CopyStatus::Cancel => "cancel",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
struct ItemState {
    status: CopyStatus,
    src_size: Option<u64>,
    copied_size: Option<u64>,
    failure: Option<ItemFailure>,
    started_at: Option<SystemTime>,
    finished_at: Option<SystemTime>,
}

/// One unit of copy work.
///
/// # Example
///
/// ```
/// use bulkcp::CopyItem;
///
/// let item = CopyItem::new("a/file.txt", "b/file.txt");
/// assert!(item.src_size().is_none()); // resolved by the engine at load time
/// assert!(item.copied_size().is_none()); // no transfer yet
/// ```
#[derive(Debug)]
pub struct CopyItem {
    src: PathBuf,
    dst: PathBuf,
    state: Mutex<ItemState>,
}

impl CopyItem {
    /// Create a new item for one `(source, destination)` pair.
    pub fn new(src: impl Into<PathBuf>, dst: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            state: Mutex::new(ItemState {
                status: CopyStatus::Init,
                src_size: None,
                copied_size: None,
                failure: None,
                started_at: None,
                finished_at: None,
            }),
        }
    }

    /// Source path.
    #[must_use]
    pub fn src(&self) -> &Path {
        &self.src
    }

    /// Destination path.
    #[must_use]
    pub fn dst(&self) -> &Path {
        &self.dst
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> CopyStatus {
        self.lock().status
    }

    /// Source length in bytes, or `None` before the engine resolved it.
    #[must_use]
    pub fn src_size(&self) -> Option<u64> {
        self.lock().src_size
    }

    /// Bytes transferred so far, or `None` if no transfer ever started.
    ///
    /// Stays `None` for items completed via the skip policy; equals
    /// [`src_size`](Self::src_size) for items that reached `Success`
    /// through an actual copy.
    #[must_use]
    pub fn copied_size(&self) -> Option<u64> {
        self.lock().copied_size
    }

    /// Failure detail, set only when the status is `Fail` or `Cancel`.
    #[must_use]
    pub fn failure(&self) -> Option<ItemFailure> {
        self.lock().failure.clone()
    }

    /// When a worker started processing this item.
    #[must_use]
    pub fn started_at(&self) -> Option<SystemTime> {
        self.lock().started_at
    }

    /// When this item reached its terminal status.
    #[must_use]
    pub fn finished_at(&self) -> Option<SystemTime> {
        self.lock().finished_at
    }

    fn lock(&self) -> MutexGuard<'_, ItemState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub(crate) fn set_src_size(&self, len: u64) {
        self.lock().src_size = Some(len);
    }

    /// Worker picked the item up: stamp the start time.
    pub(crate) fn begin(&self) {
        self.lock().started_at = Some(SystemTime::now());
    }

    /// Transition to `Copying` and start the byte counter at zero.
    pub(crate) fn start_transfer(&self) {
        let mut state = self.lock();
        if state.status.is_terminal() {
            return;
        }
        state.status = CopyStatus::Copying;
        state.copied_size = Some(0);
    }

    pub(crate) fn add_copied(&self, n: u64) {
        let mut state = self.lock();
        if state.status.is_terminal() {
            return;
        }
        state.copied_size = Some(state.copied_size.unwrap_or(0) + n);
    }

    pub(crate) fn succeed(&self) {
        let mut state = self.lock();
        if state.status.is_terminal() {
            return;
        }
        state.status = CopyStatus::Success;
    }

    pub(crate) fn fail(&self, failure: ItemFailure) {
        let mut state = self.lock();
        if state.status.is_terminal() {
            return;
        }
        state.status = match failure.kind {
            FailureKind::Error => CopyStatus::Fail,
            FailureKind::Cancel => CopyStatus::Cancel,
        };
        state.failure = Some(failure);
    }

    /// Leaving the per-item loop body: stamp the end time.
    pub(crate) fn finish(&self) {
        let mut state = self.lock();
        if state.finished_at.is_none() {
            state.finished_at = Some(SystemTime::now());
        }
    }
}
