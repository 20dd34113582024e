//! bcp - Bulk Copy
//!
//! Copy a file tree with bounded parallel I/O and a per-file report,
//! powered by bulkcp.

use bulkcp::{
    Copier, CopyItem, CopyOptions, CopyStatus, Error as BulkcpError, create_progress_bar,
};
use clap::Parser;
use indicatif::ProgressBar;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// bcp - Bulk parallel copy
///
/// Copies every file under SOURCE to the mirrored path under DEST using a
/// pool of parallel workers. Prints a summary and, on failure, one line per
/// failed or cancelled file. Ctrl-C cancels the run cooperatively: files
/// not yet started are skipped, in-flight files stop at the next chunk.
#[derive(Parser, Debug)]
#[command(name = "bcp", version, about, long_about = None)]
struct Args {
    /// Source file or directory root
    source: PathBuf,

    /// Destination path or directory root
    dest: PathBuf,

    /// Number of parallel copy workers (default: logical core count)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Per-worker transfer buffer size in bytes (default: 1 MiB)
    #[arg(long, value_name = "BYTES")]
    buffer_size: Option<usize>,

    /// Disable the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Print one line per file status change (disables the progress bar)
    #[arg(short, long)]
    verbose: bool,
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error("Source does not exist: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Failed to enumerate {path}: {source}")]
    Enumerate { path: PathBuf, source: io::Error },

    #[error("Failed to install Ctrl-C handler: {source}")]
    CtrlC { source: ctrlc::Error },

    #[error(transparent)]
    Copy(#[from] BulkcpError),
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("bcp: {err}");
            if let CliError::Copy(BulkcpError::Aggregate(agg)) = &err {
                for failure in &agg.failures {
                    eprintln!("  {failure}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> CliResult<()> {
    let items = build_items(&args.source, &args.dest)?;

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || cancel.store(true, Ordering::Relaxed))
            .map_err(|source| CliError::CtrlC { source })?;
    }

    let mut options = CopyOptions::default().with_cancel_token(cancel);
    if let Some(jobs) = args.jobs {
        options = options.with_parallel(jobs);
    }
    if let Some(buffer_size) = args.buffer_size {
        options = options.with_buffer_size(buffer_size);
    }

    let bar: Option<ProgressBar> =
        (!args.quiet && !args.verbose).then(|| create_progress_bar(items.len() as u64));

    let copier = Copier::new(options);
    let copier = if args.verbose {
        copier.on_progress(|event| {
            println!("[{}] {}", event.item.status(), event.item.src().display());
        })
    } else if let Some(bar) = bar.clone() {
        copier.on_progress(move |event| {
            // The final event per item carries the end timestamp
            if event.item.finished_at().is_some() {
                bar.inc(1);
            }
        })
    } else {
        copier
    };

    let result = copier.run(&items);
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    print_summary(&items);
    result?;
    Ok(())
}

/// Build the item list: a single pair for a file source, or one pair per
/// regular file under a directory source, mirroring relative paths.
fn build_items(source: &Path, dest: &Path) -> CliResult<Vec<CopyItem>> {
    let meta = fs::metadata(source).map_err(|_| CliError::SourceNotFound {
        path: source.to_path_buf(),
    })?;

    if meta.is_file() {
        let dst = if dest.is_dir() {
            match source.file_name() {
                Some(name) => dest.join(name),
                None => dest.to_path_buf(),
            }
        } else {
            dest.to_path_buf()
        };
        return Ok(vec![CopyItem::new(source, dst)]);
    }

    let mut files = Vec::new();
    collect_files(source, &mut files).map_err(|e| CliError::Enumerate {
        path: source.to_path_buf(),
        source: e,
    })?;
    files.sort();

    Ok(files
        .into_iter()
        .map(|src| {
            let dst = match src.strip_prefix(source) {
                Ok(rel) => dest.join(rel),
                Err(_) => dest.join(&src),
            };
            CopyItem::new(src, dst)
        })
        .collect())
}

/// Collect regular files recursively. Symlinks and special files are not
/// followed.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&entry.path(), out)?;
        } else if file_type.is_file() {
            out.push(entry.path());
        }
    }
    Ok(())
}

fn print_summary(items: &[CopyItem]) {
    let mut success = 0usize;
    let mut failed = 0usize;
    let mut cancelled = 0usize;
    let mut bytes = 0u64;
    for item in items {
        match item.status() {
            CopyStatus::Success => success += 1,
            CopyStatus::Fail => failed += 1,
            CopyStatus::Cancel => cancelled += 1,
            CopyStatus::Init | CopyStatus::Copying => {}
        }
        bytes += item.copied_size().unwrap_or(0);
    }
    println!("{success} copied, {failed} failed, {cancelled} cancelled ({bytes} bytes)");
}
