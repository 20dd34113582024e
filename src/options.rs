//! Configuration options for copy runs.
//!
//! This module provides [`CopyOptions`] for configuring the worker pool,
//! the per-worker transfer buffer, and the external cancellation token.
//!
//! # Example
//!
//! ```
//! use bulkcp::CopyOptions;
//!
//! let options = CopyOptions::default()
//!     .with_parallel(8)
//!     .with_buffer_size(256 * 1024);
//! ```

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Default transfer buffer size: 1 MiB per worker.
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Options for copy runs.
///
/// Use [`Default::default()`] to get sensible defaults, then customize
/// using the builder methods. Zero values for `parallel` or `buffer_size`
/// are silently replaced with the defaults when the run starts.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `parallel` | logical core count | Worker threads |
/// | `buffer_size` | 1 MiB | Per-worker transfer buffer |
/// | `cancel_token` | `None` | No external cancellation |
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyOptions {
    /// Number of worker threads (default: logical core count)
    ///
    /// Each worker owns one transfer buffer for its whole lifetime and
    /// drains the shared work queue until it is empty.
    pub parallel: usize,

    /// Transfer buffer size in bytes (default: 1 MiB)
    ///
    /// Also the chunk granularity at which an in-flight copy observes
    /// cancellation.
    pub buffer_size: usize,

    /// External cancellation token (optional)
    ///
    /// Set the flag to `true` to stop new items from starting; items
    /// already mid-copy stop at their next chunk boundary. Callers wanting
    /// a timeout derive this token from a deadline.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub cancel_token: Option<Arc<AtomicBool>>,

    /// Callback for warnings (optional)
    ///
    /// If not set and the `tracing` feature is enabled, warnings are logged
    /// via tracing. Otherwise, warnings are silently ignored.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub warn_handler: Option<fn(&str)>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            cancel_token: None,
            warn_handler: None,
        }
    }
}

fn default_parallel() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

impl CopyOptions {
    /// Set the number of worker threads.
    #[must_use]
    pub fn with_parallel(mut self, n: usize) -> Self {
        self.parallel = n;
        self
    }

    /// Set the per-worker transfer buffer size in bytes.
    #[must_use]
    pub fn with_buffer_size(mut self, bytes: usize) -> Self {
        self.buffer_size = bytes;
        self
    }

    /// Set an external cancellation token.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use std::sync::atomic::AtomicBool;
    /// use bulkcp::CopyOptions;
    ///
    /// let cancel = Arc::new(AtomicBool::new(false));
    /// let options = CopyOptions::default().with_cancel_token(cancel.clone());
    /// ```
    #[must_use]
    pub fn with_cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel_token = Some(token);
        self
    }

    /// Set a warning handler.
    #[must_use]
    pub fn with_warn_handler(mut self, handler: fn(&str)) -> Self {
        self.warn_handler = Some(handler);
        self
    }

    pub(crate) fn effective_parallel(&self) -> usize {
        if self.parallel == 0 {
            default_parallel()
        } else {
            self.parallel
        }
    }

    pub(crate) fn effective_buffer_size(&self) -> usize {
        if self.buffer_size == 0 {
            DEFAULT_BUFFER_SIZE
        } else {
            self.buffer_size
        }
    }

    pub(crate) fn warn(&self, msg: &str) {
        if let Some(handler) = self.warn_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", msg);
        }
    }
}
