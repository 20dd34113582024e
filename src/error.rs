//! Error types for bulkcp.
//!
//! This module provides the [`Error`] enum covering everything that can go
//! wrong during a run, the [`Result`] type alias, and the per-item failure
//! values that make up an [`AggregateError`].
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Resolution | [`Error::SourceNotFound`] (pre-run, fails the whole run) |
//! | Copy | [`Error::Io`] (per item, recorded and aggregated) |
//! | Control | [`Error::Cancelled`] (per item, distinct kind) |
//! | Aggregate | [`Error::Aggregate`] (one bundle per failed run) |

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type for bulkcp operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during copy operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Source file missing or unreadable at load time.
    ///
    /// Size resolution happens once, before any item is queued, so this
    /// error fails the whole run with no items processed.
    #[error("Source file is missing or unreadable: {path}")]
    SourceNotFound {
        /// The source path that could not be stat'ed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The run's cancellation signal was observed.
    ///
    /// Raised by the cancellation checks at the top of each item and before
    /// each chunk of the copy loop. Items that fail with this error end in
    /// `Cancel` status rather than `Fail`, and do not trip cancellation for
    /// the rest of the run (they are already a consequence of it).
    #[error("Operation cancelled")]
    Cancelled,

    /// One or more items failed or were cancelled.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl Error {
    /// Whether this error is the distinguished cancellation kind.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Classification of a per-item failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A genuine copy (or skip-check) failure. Trips global cancellation.
    Error,
    /// The item was cancelled, either externally or after a sibling's failure.
    Cancel,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Error => f.write_str("error"),
            FailureKind::Cancel => f.write_str("cancel"),
        }
    }
}

/// One item's failure, carrying its path context and underlying cause.
///
/// The cause is reference-counted so the same failure can be stored on the
/// [`CopyItem`](crate::CopyItem) and in the run's [`AggregateError`].
#[derive(Debug, Clone)]
pub struct ItemFailure {
    /// Whether this item failed or was cancelled
    pub kind: FailureKind,
    /// Source path of the failed item
    pub src: PathBuf,
    /// Destination path of the failed item
    pub dst: PathBuf,
    /// The underlying error
    pub cause: Arc<Error>,
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} copying {} -> {}: {}",
            self.kind,
            self.src.display(),
            self.dst.display(),
            self.cause
        )
    }
}

impl std::error::Error for ItemFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause.as_ref())
    }
}

/// Aggregate failure bundling every per-item failure from one run.
///
/// Produced after all workers have joined, if any failures were collected.
/// A run can carry mostly-successful items and still fail overall; consult
/// each item's status for partial-success bookkeeping.
#[derive(Debug, Clone, Error)]
#[error("{} of {total} items failed or were cancelled", failures.len())]
pub struct AggregateError {
    /// Total number of items in the run
    pub total: usize,
    /// Every per-item failure, in no particular order
    pub failures: Vec<ItemFailure>,
}

impl AggregateError {
    /// Number of failures with the given kind.
    #[must_use]
    pub fn count(&self, kind: FailureKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }
}
