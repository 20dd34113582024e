//! Cancellation coordination.
//!
//! A [`CancelToken`] merges two signals: the caller's external cancellation
//! flag (if any) and the internal cancel-on-first-error flag, tripped
//! exactly once by whichever worker first hits a non-cancellation failure.
//! Once either signal is set, items not yet started observe it at their
//! first cancellation check and end in `Cancel` status without attempting
//! IO; items already mid-copy stop at their next chunk boundary.

use crate::error::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The shared cancellation signal for one run.
///
/// Handed to the [`CopyPolicy`](crate::CopyPolicy) hooks and the copy
/// routine; substituted transfer strategies must call [`check`](Self::check)
/// at least once per chunk to keep in-flight copies interruptible.
#[derive(Debug)]
pub struct CancelToken {
    external: Option<Arc<AtomicBool>>,
    tripped: AtomicBool,
}

impl CancelToken {
    pub(crate) fn new(external: Option<Arc<AtomicBool>>) -> Self {
        Self {
            external,
            tripped: AtomicBool::new(false),
        }
    }

    /// Whether either the external token or the internal fail-fast flag is set.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.tripped.load(Ordering::Relaxed)
            || self
                .external
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Return `Err(Error::Cancelled)` if the signal is set.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Trip the internal fail-fast flag. Idempotent.
    pub(crate) fn trip(&self) {
        self.tripped.store(true, Ordering::Relaxed);
    }
}
