// File inventory for AEC project trees.
//
// Two interchangeable strategies produce the same inventory: a thread-pool
// scanner for synchronous callers and an async scanner for callers already
// inside a tokio runtime. Both share one traversal and one admission
// filter, so the choice of strategy never changes which files are seen.

mod concurrent;
mod error;
mod filter;
mod report;
mod threaded;
mod walk;

pub use concurrent::ConcurrentScanner;
pub use error::{Error, Result};
pub use filter::{PROJECT_SIDECAR, ScanFilter, SkipReason};
pub use report::ScanReport;
pub use threaded::ThreadedScanner;
pub use walk::{Candidate, collect, describe};

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Progress events delivered while a scan runs.
#[derive(Debug, Clone)]
pub enum ScanProgress {
    Counting,
    Counted {
        total: usize,
    },
    FileScanned {
        scanned: usize,
        total: usize,
    },
    FileSkipped {
        path: PathBuf,
        reason: SkipReason,
    },
    FileTooLarge {
        path: PathBuf,
        size: u64,
    },
    EntryError {
        path: PathBuf,
        message: String,
    },
    Stopped {
        scanned: usize,
    },
}

/// Cooperative cancellation shared between the caller and scan workers.
/// Stopping is one-way; a stopped flag stays stopped.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
