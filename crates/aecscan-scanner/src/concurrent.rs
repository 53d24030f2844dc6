use crate::error::{Error, Result};
use crate::filter::ScanFilter;
use crate::walk;
use crate::{ScanProgress, StopFlag};
use aecscan_types::FileDescriptor;
use futures::StreamExt;
use std::path::Path;

/// Async scan strategy: candidates are stat'ed on the blocking pool with a
/// bounded number in flight. Produces the same inventory as
/// [`ThreadedScanner`](crate::ThreadedScanner) for the same root and filter.
pub struct ConcurrentScanner {
    filter: ScanFilter,
    max_in_flight: usize,
    compute_hashes: bool,
    recursive: bool,
}

impl ConcurrentScanner {
    pub fn new(filter: ScanFilter, max_in_flight: usize) -> Self {
        Self {
            filter,
            max_in_flight: max_in_flight.max(1),
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

    pub async fn scan<F>(
        &self,
        root: &Path,
        stop: &StopFlag,
        mut on_progress: F,
    ) -> Result<Vec<FileDescriptor>>
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

        let compute_hashes = self.compute_hashes;
        let stop_for_tasks = stop.clone();
        let mut results = futures::stream::iter(candidates.into_iter().map(move |candidate| {
            let stop = stop_for_tasks.clone();
            tokio::task::spawn_blocking(move || {
                if stop.is_stopped() {
                    return None;
                }
                let outcome = walk::describe(&candidate, compute_hashes);
                Some((candidate, outcome))
            })
        }))
        .buffer_unordered(self.max_in_flight);

        let mut descriptors = Vec::with_capacity(total);
        let mut processed = 0usize;
        while let Some(joined) = results.next().await {
            let Some((candidate, outcome)) = joined.map_err(|_| Error::WorkerPanicked)? else {
                continue;
            };
            processed += 1;
            match outcome {
                Ok(descriptor) => {
                    if self.filter.skip_file_by_size(descriptor.size).is_some() {
                        on_progress(ScanProgress::FileTooLarge {
                            path: candidate.path,
                            size: descriptor.size,
                        });
                    } else {
                        on_progress(ScanProgress::FileScanned {
                            scanned: processed,
                            total,
                        });
                        descriptors.push(descriptor);
                    }
                }
                Err(err) => {
                    on_progress(ScanProgress::EntryError {
                        path: candidate.path,
                        message: err.to_string(),
                    });
                }
            }
        }

        if stop.is_stopped() {
            on_progress(ScanProgress::Stopped {
                scanned: descriptors.len(),
            });
        }
        Ok(descriptors)
    }
}
