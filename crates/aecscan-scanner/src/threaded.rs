use crate::error::{Error, Result};
use crate::filter::ScanFilter;
use crate::walk::{self, Candidate};
use crate::{ScanProgress, StopFlag};
use aecscan_types::FileDescriptor;
use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc;

/// What one worker produced for one candidate.
enum WorkerReport {
    Described(FileDescriptor),
    TooLarge(Candidate, u64),
    Failed(Candidate, std::io::Error),
}

/// Thread-pool scan strategy: a bounded set of OS threads pulls candidates
/// from a shared queue and stats them in parallel.
pub struct ThreadedScanner {
    filter: ScanFilter,
    workers: usize,
    compute_hashes: bool,
    recursive: bool,
}

impl ThreadedScanner {
    pub fn new(filter: ScanFilter, workers: usize) -> Self {
        Self {
            filter,
            workers: workers.max(1),
            compute_hashes: false,
            recursive: true,
        }
    }

    pub fn with_hashing(mut self, compute_hashes: bool) -> Self {
        self.compute_hashes = compute_hashes;
        self
    }

    pub fn with_recursion(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn scan<F>(&self, root: &Path, stop: &StopFlag, mut on_progress: F) -> Result<Vec<FileDescriptor>>
    where
        F: FnMut(ScanProgress),
    {
        if !root.is_dir() {
            return Err(Error::RootNotFound(root.to_path_buf()));
        }

        on_progress(ScanProgress::Counting);
        let candidates = walk::collect(root, &self.filter, self.recursive, |path, reason| {
            on_progress(ScanProgress::FileSkipped {
                path: path.to_path_buf(),
                reason,
            });
        })?;
        let total = candidates.len();
        on_progress(ScanProgress::Counted { total });

        let (work_tx, work_rx) = mpsc::channel::<Candidate>();
        let (report_tx, report_rx) = mpsc::channel::<WorkerReport>();
        for candidate in candidates {
            // Receiver outlives this loop, so sends cannot fail.
            let _ = work_tx.send(candidate);
        }
        drop(work_tx);
        let work_rx = Mutex::new(work_rx);

        let mut descriptors = Vec::with_capacity(total);
        std::thread::scope(|scope| {
            for _ in 0..self.workers {
                let work_rx = &work_rx;
                let report_tx = report_tx.clone();
                let filter = &self.filter;
                let compute_hashes = self.compute_hashes;
                let stop = stop.clone();
                scope.spawn(move || {
                    loop {
                        if stop.is_stopped() {
                            break;
                        }
                        let candidate = match work_rx.lock() {
                            Ok(rx) => match rx.recv() {
                                Ok(c) => c,
                                Err(_) => break,
                            },
                            Err(_) => break,
                        };
                        let report = match walk::describe(&candidate, compute_hashes) {
                            Ok(descriptor) => match filter.skip_file_by_size(descriptor.size) {
                                Some(_) => WorkerReport::TooLarge(candidate, descriptor.size),
                                None => WorkerReport::Described(descriptor),
                            },
                            Err(err) => WorkerReport::Failed(candidate, err),
                        };
                        if report_tx.send(report).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(report_tx);

            let mut processed = 0usize;
            for report in report_rx {
                processed += 1;
                match report {
                    WorkerReport::Described(descriptor) => {
                        on_progress(ScanProgress::FileScanned {
                            scanned: processed,
                            total,
                        });
                        descriptors.push(descriptor);
                    }
                    WorkerReport::TooLarge(candidate, size) => {
                        on_progress(ScanProgress::FileTooLarge {
                            path: candidate.path,
                            size,
                        });
                    }
                    WorkerReport::Failed(candidate, err) => {
                        on_progress(ScanProgress::EntryError {
                            path: candidate.path,
                            message: err.to_string(),
                        });
                    }
                }
            }
        });

        if stop.is_stopped() {
            on_progress(ScanProgress::Stopped {
                scanned: descriptors.len(),
            });
        }
        Ok(descriptors)
    }
}
