//! # bulkcp
//!
//! Bulk-parallel file copying with per-file status, progress and failure
//! reporting.
//!
//! ## Core Features
//!
//! - **Bounded parallelism**: a fixed pool of worker threads drains a FIFO
//!   work queue; each worker owns one reusable transfer buffer
//! - **Per-file state machine**: every item moves Init -> Copying ->
//!   Success / Fail / Cancel, monotonically, with timestamps and byte
//!   counters the caller can inspect after the run
//! - **Fail fast**: the first genuine failure stops queued items from
//!   starting; in-flight copies finish at their own pace
//! - **Cooperative cancellation**: an external `Arc<AtomicBool>` token,
//!   observed at item start and at every chunk boundary
//! - **Aggregated failures**: one error bundling every failed or cancelled
//!   item, never one-at-a-time mid-run
//! - **Injectable policy**: skip predicate, lifecycle hooks, and the
//!   transfer routine itself are overridable through a single trait
//!
//! ## Quick Start
//!
//! ```no_run
//! use bulkcp::{CopyItem, CopyOptions, copy_files};
//!
//! let items = vec![
//!     CopyItem::new("photos/a.jpg", "backup/a.jpg"),
//!     CopyItem::new("photos/b.jpg", "backup/b.jpg"),
//! ];
//!
//! match copy_files(&items, &CopyOptions::default()) {
//!     Ok(()) => println!("all {} files copied", items.len()),
//!     Err(e) => {
//!         // The run failed as a whole, but each item carries its own report
//!         for item in &items {
//!             println!("{}: {}", item.src().display(), item.status());
//!         }
//!         eprintln!("{e}");
//!     }
//! }
//! ```
//!
//! ## Progress and Cancellation
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::sync::atomic::AtomicBool;
//! use bulkcp::{Copier, CopyItem, CopyOptions};
//!
//! let cancel = Arc::new(AtomicBool::new(false));
//! let items = vec![CopyItem::new("in.bin", "out.bin")];
//!
//! let copier = Copier::new(
//!     CopyOptions::default()
//!         .with_parallel(8)
//!         .with_cancel_token(cancel.clone()),
//! )
//! .on_progress(|event| {
//!     println!("[{}] {}", event.item.status(), event.item.src().display());
//! });
//!
//! copier.run(&items)?;
//! # Ok::<(), bulkcp::Error>(())
//! ```
//!
//! ## Custom Policies
//!
//! Implement [`CopyPolicy`] to skip up-to-date destinations, observe
//! lifecycle hooks, or substitute the transfer strategy. See the trait
//! docs for the contracts a substituted routine must keep.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `progress` | Progress bar helper with indicatif |
//! | `tracing` | Structured logging with the tracing crate |
//! | `serde` | Serialize/Deserialize for [`CopyOptions`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod cancel;
mod engine;
mod error;
mod item;
mod options;
mod policy;
mod progress;

pub use cancel::CancelToken;
pub use engine::{Copier, copy_files};
pub use error::{AggregateError, Error, FailureKind, ItemFailure, Result};
pub use item::{CopyItem, CopyStatus};
pub use options::{CopyOptions, DEFAULT_BUFFER_SIZE};
pub use policy::{CopyPolicy, DefaultPolicy, stream_copy};
pub use progress::{ProgressCallback, ProgressEvent};

#[cfg(feature = "progress")]
#[cfg_attr(docsrs, doc(cfg(feature = "progress")))]
pub use progress::create_progress_bar;
