//! The parallel copy engine.
//!
//! This is the core of the crate: a FIFO work queue over the fixed item
//! slice, a pool of exactly `parallel` workers each owning one reusable
//! transfer buffer, the per-item state machine, fail-fast cancellation,
//! and thread-safe failure aggregation.
//!
//! # Run shape
//!
//! 1. Resolve every source's size up front; a stat failure here fails the
//!    whole run before any item is processed.
//! 2. Start `parallel` workers. Each drains the queue: one item at a time,
//!    driven through Init -> (Copying) -> Success | Fail | Cancel, with
//!    progress reported at every transition.
//! 3. The first non-cancellation failure trips the shared cancellation
//!    signal; items not yet started then end as `Cancel` without touching
//!    the filesystem, while in-flight items run to their own conclusion.
//! 4. After all workers join, collected failures (if any) are returned as
//!    one [`AggregateError`].

use crate::cancel::CancelToken;
use crate::error::{AggregateError, Error, FailureKind, ItemFailure, Result};
use crate::item::CopyItem;
use crate::options::CopyOptions;
use crate::policy::{CopyPolicy, DefaultPolicy};
use crate::progress::{ProgressCallback, ProgressEvent};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Concurrent FIFO over the fixed item slice.
///
/// The item set is loaded once before workers start, so dequeueing is just
/// claiming the next index. Enqueue order is preserved; completion order is
/// not constrained.
#[derive(Debug)]
struct WorkQueue {
    next: AtomicUsize,
    len: usize,
}

impl WorkQueue {
    fn new(len: usize) -> Self {
        Self {
            next: AtomicUsize::new(0),
            len,
        }
    }

    fn pop(&self) -> Option<usize> {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        (index < self.len).then_some(index)
    }
}

/// Shared state of one run.
struct RunState<'a> {
    items: &'a [CopyItem],
    queue: WorkQueue,
    cancel: CancelToken,
    failures: Mutex<Vec<ItemFailure>>,
    progress: Option<&'a ProgressCallback>,
}

impl RunState<'_> {
    fn report(&self, item: &CopyItem) {
        if let Some(callback) = self.progress {
            callback(ProgressEvent {
                items: self.items,
                item,
            });
        }
    }

    fn record(&self, failure: ItemFailure) {
        let mut failures = match self.failures.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        failures.push(failure);
    }
}

/// The engine: runs a fixed set of [`CopyItem`]s through the worker pool.
///
/// # Example
///
/// ```no_run
/// use bulkcp::{Copier, CopyItem, CopyOptions};
///
/// let items = vec![
///     CopyItem::new("data/a.bin", "backup/a.bin"),
///     CopyItem::new("data/b.bin", "backup/b.bin"),
/// ];
///
/// let copier = Copier::new(CopyOptions::default().with_parallel(8));
/// copier.run(&items)?;
/// # Ok::<(), bulkcp::Error>(())
/// ```
pub struct Copier<P: CopyPolicy = DefaultPolicy> {
    options: CopyOptions,
    policy: P,
    progress: Option<ProgressCallback>,
}

impl Copier<DefaultPolicy> {
    /// Create an engine with the default policy (copy everything).
    #[must_use]
    pub fn new(options: CopyOptions) -> Self {
        Self::with_policy(options, DefaultPolicy)
    }
}

impl<P: CopyPolicy> Copier<P> {
    /// Create an engine with a custom [`CopyPolicy`].
    #[must_use]
    pub fn with_policy(options: CopyOptions, policy: P) -> Self {
        Self {
            options,
            policy,
            progress: None,
        }
    }

    /// Register a progress callback.
    ///
    /// Invoked synchronously on worker threads at every status transition;
    /// guaranteed at least the transition into `Init` and into the terminal
    /// status for each item.
    #[must_use]
    pub fn on_progress(
        mut self,
        callback: impl Fn(ProgressEvent<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Copy every item, in parallel.
    ///
    /// Blocks until all workers have retired, then returns `Ok(())` if no
    /// failures were collected, or [`Error::Aggregate`] bundling every
    /// per-item failure. The items themselves carry the per-file report
    /// (final status, byte counts, failure detail) either way.
    ///
    /// # Errors
    ///
    /// - [`Error::SourceNotFound`] if any source cannot be stat'ed at load
    ///   time (no items are processed in that case)
    /// - [`Error::Aggregate`] if any item ended in `Fail` or `Cancel`
    pub fn run(&self, items: &[CopyItem]) -> Result<()> {
        let parallel = self.options.effective_parallel();
        let buffer_size = self.options.effective_buffer_size();

        // Resolve source sizes once, before anything is queued
        for item in items {
            let meta = fs::metadata(item.src()).map_err(|e| Error::SourceNotFound {
                path: item.src().to_path_buf(),
                source: e,
            })?;
            item.set_src_size(meta.len());
        }

        let run = RunState {
            items,
            queue: WorkQueue::new(items.len()),
            cancel: CancelToken::new(self.options.cancel_token.clone()),
            failures: Mutex::new(Vec::new()),
            progress: self.progress.as_ref(),
        };

        // One broadcast closure invocation per pool thread = one worker
        // per thread, each with a private buffer.
        match rayon::ThreadPoolBuilder::new()
            .num_threads(parallel)
            .build()
        {
            Ok(pool) => {
                pool.broadcast(|_| self.worker(&run, buffer_size));
            }
            Err(e) => {
                self.options
                    .warn(&format!("Failed to create thread pool ({e}), using global pool"));
                rayon::broadcast(|_| self.worker(&run, buffer_size));
            }
        }

        let failures = match run.failures.into_inner() {
            Ok(failures) => failures,
            Err(poisoned) => poisoned.into_inner(),
        };
        if failures.is_empty() {
            Ok(())
        } else {
            Err(AggregateError {
                total: items.len(),
                failures,
            }
            .into())
        }
    }

    fn worker(&self, run: &RunState<'_>, buffer_size: usize) {
        // One arena per worker, reused across every item it processes and
        // released when the queue is drained.
        let mut buffer = vec![0u8; buffer_size];
        while let Some(index) = run.queue.pop() {
            self.process(run, &run.items[index], &mut buffer);
        }
    }

    /// Drive one item through the state machine. Never propagates: the
    /// item absorbs its own failure and the worker moves on.
    fn process(&self, run: &RunState<'_>, item: &CopyItem, buffer: &mut [u8]) {
        item.begin();
        run.report(item);

        match self.drive(run, item, buffer) {
            Ok(()) => {
                item.succeed();
                self.policy.on_success(item);
                run.report(item);
            }
            Err(err) => {
                let cause = Arc::new(err);
                let kind = if cause.is_cancelled() {
                    FailureKind::Cancel
                } else {
                    FailureKind::Error
                };
                let failure = ItemFailure {
                    kind,
                    src: item.src().to_path_buf(),
                    dst: item.dst().to_path_buf(),
                    cause: Arc::clone(&cause),
                };
                item.fail(failure.clone());
                run.record(failure);
                match kind {
                    FailureKind::Cancel => self.policy.on_cancel(item),
                    FailureKind::Error => {
                        // Fail fast: stop queued items from starting while
                        // in-flight siblings run to their own conclusion.
                        run.cancel.trip();
                        self.policy.on_error(item, &cause);
                    }
                }
            }
        }

        item.finish();
        run.report(item);
    }

    fn drive(&self, run: &RunState<'_>, item: &CopyItem, buffer: &mut [u8]) -> Result<()> {
        run.cancel.check()?;

        if self.policy.should_skip(item, &run.cancel)? {
            self.policy.on_skip(item);
            return Ok(());
        }

        remove_destination(item.dst())?;
        ensure_parent_dir(item.dst())?;

        item.start_transfer();
        run.report(item);

        let result = self
            .policy
            .before_copy(item, &run.cancel)
            .and_then(|()| self.policy.copy(item, buffer, &run.cancel));
        self.policy.after_copy(item, result.as_ref().err());

        if let Err(err) = result {
            // Best effort: do not leave a partial destination behind
            if let Err(cleanup) = fs::remove_file(item.dst()) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    self.options.warn(&format!(
                        "Failed to remove partial destination {}: {cleanup}",
                        item.dst().display()
                    ));
                }
            }
            return Err(err);
        }
        Ok(())
    }
}

/// Copy every item with the default policy and no progress callback.
///
/// # Errors
///
/// See [`Copier::run`].
pub fn copy_files(items: &[CopyItem], options: &CopyOptions) -> Result<()> {
    Copier::new(options.clone()).run(items)
}

/// Remove a pre-existing destination file, if any.
///
/// On Windows the read-only attribute is cleared first, since deleting a
/// read-only file fails there.
fn remove_destination(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(_meta) => {
            #[cfg(windows)]
            {
                let mut perms = _meta.permissions();
                if perms.readonly() {
                    perms.set_readonly(false);
                    fs::set_permissions(path, perms)?;
                }
            }
            fs::remove_file(path)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
